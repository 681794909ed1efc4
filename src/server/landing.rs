use std::io;

pub const HOST_PLACEHOLDER: &str = "{{host}}";

const BUNDLED_TEMPLATE: &str = include_str!("../../static/index.html");

/// The page served for non-POST requests.
#[derive(Debug, Clone)]
pub struct LandingPage {
    template: String,
}

impl LandingPage {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn bundled() -> Self {
        Self::new(BUNDLED_TEMPLATE)
    }

    /// Reads the template from `path`, falling back to the bundled page.
    pub async fn load(path: Option<&str>) -> io::Result<Self> {
        match path {
            Some(path) => {
                let template = tokio::fs::read_to_string(path).await?;
                log::info!("📄 Landing page loaded from {}", path);
                Ok(Self::new(template))
            }
            None => Ok(Self::bundled()),
        }
    }

    /// Replaces every host placeholder.
    pub fn render(&self, host: &str) -> String {
        self.template.replace(HOST_PLACEHOLDER, host)
    }
}

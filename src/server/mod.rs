pub mod generate;
pub mod landing;

use std::sync::Arc;

use actix_web::{
    http::{header, Method},
    middleware::{DefaultHeaders, Logger},
    web, App, HttpRequest, HttpResponse, HttpServer,
};

use crate::{
    config::Config,
    error::Result,
    image_host::ImageUploader,
    workers_ai::ImageInference,
};

pub use landing::LandingPage;

/// Shared by every worker; holds only immutable handles.
pub struct AppState {
    pub inference: Arc<dyn ImageInference>,
    pub uploader: Arc<dyn ImageUploader>,
    pub landing: LandingPage,
    pub image_host_base: String,
}

impl AppState {
    pub fn new(
        inference: Arc<dyn ImageInference>,
        uploader: Arc<dyn ImageUploader>,
        landing: LandingPage,
        image_host_base: impl Into<String>,
    ) -> Self {
        Self {
            inference,
            uploader,
            landing,
            image_host_base: image_host_base.into(),
        }
    }
}

/// CORS header set attached to every response, error responses included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

/// Routes every path to the method dispatcher.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{tail:.*}").to(dispatch));
}

async fn dispatch(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let method = req.method();
    if method == Method::OPTIONS {
        Ok(HttpResponse::NoContent().finish())
    } else if method == Method::POST {
        generate::handle(&state, &body).await
    } else {
        Ok(landing_page(&req, &state))
    }
}

fn landing_page(req: &HttpRequest, state: &AppState) -> HttpResponse {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    HttpResponse::Ok()
        .content_type("text/html")
        .body(state.landing.render(host))
}

pub async fn run(
    config: &Config,
    inference: Arc<dyn ImageInference>,
    uploader: Arc<dyn ImageUploader>,
) -> std::io::Result<()> {
    let landing = LandingPage::load(config.server.landing_page_path.as_deref()).await?;
    let state = web::Data::new(AppState::new(
        inference,
        uploader,
        landing,
        config.image_host.public_base_url.clone(),
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.server.bind_address.as_str(), config.server.port))?
    .run()
    .await
}

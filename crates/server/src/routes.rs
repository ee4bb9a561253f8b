//! HTTP surface: actix-web routes and server startup.

use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use image_search::ImageSearch;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::form::FormFields;
use crate::render;
use crate::service::EstimateService;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub async fn landing() -> impl Responder {
    html(StatusCode::OK, render::landing_page())
}

pub async fn valuation_form() -> impl Responder {
    html(StatusCode::OK, render::valuation_page(None))
}

pub async fn submit_valuation<S: ImageSearch + 'static>(
    service: web::Data<EstimateService<S>>,
    form: web::Form<FormFields>,
) -> impl Responder {
    let fields = form.into_inner();
    match service.handle(&fields).await {
        Ok(valuation) => html(
            StatusCode::OK,
            render::valuation_page(Some(&valuation)),
        ),
        Err(e) => {
            error!(error = ?e, "valuation failed");
            html(
                StatusCode::INTERNAL_SERVER_ERROR,
                render::internal_error_page(&fields),
            )
        }
    }
}

/// Register the valuation routes
pub fn configure<S: ImageSearch + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(landing))
        .route("/valuation", web::get().to(valuation_form))
        .route("/valuation", web::post().to(submit_valuation::<S>));
}

/// Serve the valuation app until the process is stopped
pub async fn serve<S: ImageSearch + 'static>(
    service: EstimateService<S>,
    config: &ServerConfig,
) -> Result<()> {
    let data = web::Data::new(service);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(configure::<S>)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(&config.bind)
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(bind = %config.bind, "valuation server listening");

    server.run().await.context("HTTP server failed")
}

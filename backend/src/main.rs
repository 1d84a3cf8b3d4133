mod config;
mod dataset_controller;
mod services;

use crate::config::ServerConfig;
use crate::dataset_controller::state::DatasetCache;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::search::SearchIndex;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
        }
    };
    let url = format!("http://{}:{}", config.host, config.port);

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    let cache = web::Data::new(DatasetCache::new(config.data_dir.clone()));
    let index = web::Data::new(SearchIndex::new(&config.tool));
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(cache.clone())
            .app_data(index.clone())
            .service(services::tool_config::configure_routes())
            .service(services::datasets::configure_routes())
            .service(services::search::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind(bind)?
        .run()
        .await
}

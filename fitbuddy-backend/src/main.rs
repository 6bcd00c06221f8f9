use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod ai;
mod config;
mod controllers;
mod http;
mod tools;

use agents::{AgentError, AgentHub};
use config::Config;

pub struct AppState {
    pub config: Config,
    /// The agents, or why they could not be built (e.g. missing credential)
    pub hub: Result<Arc<AgentHub>, AgentError>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing agent hub");
    let hub = match AgentHub::from_config(&config) {
        Ok(hub) => Ok(Arc::new(hub)),
        Err(e) => {
            log::error!("Agents unavailable, chat requests will be rejected: {}", e);
            Err(e)
        }
    };

    log::info!("Starting FitBuddy server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                hub: hub.clone(),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::agents::config)
            .configure(controllers::chat::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

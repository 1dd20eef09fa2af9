use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;
use std::sync::Arc;

use token_identity::api;
use token_identity::auth::TokenIdentityResolver;
use token_identity::config::app_config::AppConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = AppConfig::from_env()?;

    log::info!(
        "Starting server at {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    let resolver = Arc::new(TokenIdentityResolver::new(&app_config.auth));

    HttpServer::new(move || {
        App::new()
            .configure(|config| api::configure_routes(config, resolver.clone()))
            .wrap(Logger::default())
    })
    .bind(format!(
        "{}:{}",
        app_config.server.host, app_config.server.port
    ))?
    .run()
    .await
    .map_err(anyhow::Error::from)
}

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use dealership_reviews::api;
use dealership_reviews::config::Config;
use dealership_reviews::db::Database;
use dealership_reviews::seed::open_seeded_database;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::load()?;

    // Seed both stores before accepting traffic
    let db = open_seeded_database(&config.database_path, &config.seed_dir)
        .await
        .context("bootstrap failed, refusing to serve")?;

    let db = web::Data::new(db);
    info!("Server is running on http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(Logger::default())
            .configure(api::configure::<Database>)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    info!("Server shutting down...");
    Ok(())
}

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clickguard::api::click_routes;
use clickguard::config::init_config;
use clickguard::ledger::{ClickLedger, SeaOrmLedger};
use clickguard::services::{ClickIngestService, SeaOrmResolver, ValidityEvaluator};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = init_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let ledger = SeaOrmLedger::new(&config.database.url)
        .await
        .expect("Failed to initialize click ledger");
    info!("Using ledger backend: {}", ledger.backend_name());

    let resolver = Arc::new(SeaOrmResolver::new(ledger.connection().clone()));
    let ledger: Arc<dyn ClickLedger> = Arc::new(ledger);

    let ingest = Arc::new(ClickIngestService::new(
        ledger,
        resolver,
        ValidityEvaluator::new(config.fraud.clone()),
    ));

    let bind_addr = (config.server.host.as_str(), config.server.port);
    info!(
        "Click ingestion listening on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ingest.clone()))
            .configure(click_routes)
    })
    .workers(config.server.cpu_count)
    .bind(bind_addr)?
    .run()
    .await
}

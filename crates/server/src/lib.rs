pub mod actor;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use db::DBService;
use services::services::{
    content_ingestion::{ContentIngestion, IngestionOptions},
    content_repository::SqliteContentRepository,
    database_validator::DatabaseValidator,
    engagement::EngagementService,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;

/// Shared handles passed to every route
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub content: ContentIngestion,
    pub engagement: EngagementService,
}

impl AppState {
    pub fn new(db: DBService, options: IngestionOptions) -> Self {
        let repository = Arc::new(SqliteContentRepository::new(db.pool.clone()));
        Self {
            content: ContentIngestion::new(repository, options),
            engagement: EngagementService::new(db.pool.clone()),
            db,
        }
    }
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let db = DBService::new(&config.database_url).await?;

    let validation = DatabaseValidator::new(db.pool.clone()).validate().await?;
    if validation.is_ok() {
        info!("{}", validation.summary());
    } else {
        warn!("{}", validation.summary());
    }

    let options = IngestionOptions {
        apply_category_overrides: config.category_overrides,
    };
    if !options.apply_category_overrides {
        info!("Category overrides disabled");
    }
    let app = routes::router(AppState::new(db, options));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "Content service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

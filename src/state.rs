use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::db;
use crate::llm::OllamaClient;
use crate::pipeline::ExtractionPipeline;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state. Collaborators are constructed once at process
/// start and injected; nothing is rebuilt per request.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ExtractionPipeline>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self, sqlx::Error> {
        let db = db::connect(&config.database).await?;
        let model = Arc::new(OllamaClient::new(&config.llm));
        let pipeline = Arc::new(ExtractionPipeline::new(&config, model));
        let jwt = JwtKeys::from_config(&config.auth);

        Ok(AppState {
            db,
            config: Arc::new(config),
            pipeline,
            jwt,
        })
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        pipeline: Arc<ExtractionPipeline>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.auth);
        AppState {
            db,
            config,
            pipeline,
            jwt,
        }
    }
}

use anyhow::{Context, Result};
use engine::indicators::IchimokuConfig;
use engine::strategy::{DecisionEngine, IchimokuStrategy};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use shared::{get_db_connection, Config, EngineKind};
use std::sync::Arc;

use crate::clients::{GeminiClient, UpbitClient};
use crate::services::{ActionService, LlmEngine, TradeService};

/// Composition root: every dependency is built and wired here once at
/// startup, then handed down explicitly.
pub struct AppState {
    pub config: Config,
    pub db: Arc<DatabaseConnection>,
    pub trade_service: TradeService,
}

impl AppState {
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config = Config::from_env()?;
        let db = Arc::new(get_db_connection(&config.database_url).await?);
        Migrator::up(db.as_ref(), None).await?;
        tracing::info!("Connected to database and applied migrations");

        let upbit = UpbitClient::new(config.market.clone(), config.timeframe_config.clone());

        let decision_engine: Arc<dyn DecisionEngine> = match config.engine {
            EngineKind::Ichimoku => Arc::new(IchimokuStrategy::new(
                IchimokuConfig::default(),
                config.strict_mode,
            )),
            EngineKind::Llm => {
                let api_key = config
                    .gemini_api_key
                    .clone()
                    .context("GEMINI_API_KEY is required when ENGINE=llm")?;
                let request_scheme = std::fs::read_to_string(&config.llm_request_scheme)
                    .with_context(|| {
                        format!(
                            "failed to read LLM request scheme at {}",
                            config.llm_request_scheme
                        )
                    })?;
                Arc::new(LlmEngine::new(
                    GeminiClient::new(api_key, config.gemini_model.clone()),
                    request_scheme,
                ))
            }
        };
        tracing::info!(engine = decision_engine.name(), "decision engine selected");

        let trade_service = TradeService::new(
            upbit,
            decision_engine,
            ActionService::new(config.dca_percent),
            db.clone(),
        );

        Ok(AppState {
            config,
            db,
            trade_service,
        })
    }
}

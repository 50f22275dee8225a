mod config;
mod db;
mod documents;
mod errors;
mod models;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::documents::extract::DocumentExtractor;
use crate::routes::build_router;
use crate::screening::normalizer::NormalizerOptions;
use crate::screening::scorer::TfidfMatchScorer;
use crate::screening::taxonomy::SkillTaxonomy;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Load skill taxonomy (file override or built-in); a bad taxonomy aborts startup
    let taxonomy = match &config.skills_taxonomy_path {
        Some(path) => SkillTaxonomy::load(path)?,
        None => SkillTaxonomy::builtin()?,
    };
    info!(
        "Skill taxonomy ready: {} categories, {} skills ({} distinct)",
        taxonomy.categories().len(),
        taxonomy.skill_count(),
        taxonomy.all_skills().len()
    );
    for category in taxonomy.categories() {
        debug!("  {category}: {} skills", taxonomy.skills(category).len());
    }

    // Initialize PostgreSQL (optional)
    let db = match &config.database_url {
        Some(url) => Some(create_pool(url).await?),
        None => {
            warn!("DATABASE_URL not set; screening history is disabled");
            None
        }
    };

    // Initialize scorer (TfidfMatchScorer by default; stemming via STEM_TOKENS)
    let options = NormalizerOptions {
        stem: config.stem_tokens,
    };
    let scorer = Arc::new(TfidfMatchScorer::new(Arc::new(taxonomy), options));

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        scorer,
        extractor: Arc::new(DocumentExtractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

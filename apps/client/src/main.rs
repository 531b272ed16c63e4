use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::config::Config;
use client::gateway::{HttpGateway, JobQuery};
use client::jobs::{is_deadline_urgent, practice_area_options, state_options};
use client::session::{AesGcmCodec, FileStore, SessionPersistence};
use client::store::{JobSource, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting client v{} against {}", env!("CARGO_PKG_VERSION"), config.api_base_url);

    let gateway = HttpGateway::from_config(&config)?;
    let persistence = SessionPersistence::new(
        Arc::new(FileStore::new(config.session_dir.clone())),
        Arc::new(AesGcmCodec::new(&config.session_secret)),
    );
    let store = Store::new(Arc::new(gateway), persistence)
        .with_policy(config.commit_policy)
        .with_page_size(config.page_size);

    match store.session() {
        Some(session) => info!(
            "Signed in as {}",
            session
                .user
                .display_name()
                .or_else(|| session.user.email().map(str::to_string))
                .unwrap_or_else(|| "<unnamed user>".to_string())
        ),
        None => info!("No stored session"),
    }

    if let Err(e) = store.fetch_filter_metadata().await {
        warn!("Filter metadata unavailable: {e}");
    }

    let query = JobQuery::page(1, config.page_size);
    let jobs = store.fetch_jobs(JobSource::Search, &query).await?;

    let snapshot = store.snapshot();
    let meta = &snapshot.pagination;
    info!(
        "Fetched {} jobs (page {} of {} total, {} new in 24h, updated {})",
        jobs.len(),
        meta.current_page,
        meta.total_count,
        meta.new_count,
        meta.last_updated_at.as_deref().unwrap_or("unknown")
    );
    info!(
        "Backend metadata: {} states, {} firms, {} practice areas",
        snapshot.states.len(),
        snapshot.firms.len(),
        snapshot.practice_areas.len()
    );
    info!("States on this page: {}", state_options(&jobs).join(", "));
    info!("Practice areas on this page: {}", practice_area_options(&jobs).join(", "));

    let today = Utc::now().date_naive();
    let urgent = jobs
        .iter()
        .filter(|j| is_deadline_urgent(j.application_deadline, today))
        .count();
    info!("{urgent} deadlines within the next week");

    let page = store.visible_page();
    info!(
        "Visible: {} of {} matching, {} pages",
        page.jobs.len(),
        page.total_matching,
        page.total_pages
    );

    Ok(())
}

use formguide::{api, Config, CsvMatchSource, LeagueService, MatchSource};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.port;

    let source: Arc<dyn MatchSource> = Arc::new(CsvMatchSource::from_config(&config));
    tracing::info!(
        data_dir = %config.data_dir.display(),
        leagues = ?source.leagues(),
        tie_break = ?config.engine.tie_break,
        grouping = ?config.engine.grouping_mode,
        odds_threshold = %config.engine.odds_threshold,
        "Loaded configuration"
    );

    let service = Arc::new(LeagueService::new(source, config.engine));
    let app = api::create_router(api::AppState::new(service));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use sportsfeed_server::{api::app_router, build_state, config::Config, events, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    let state = build_state(&config).await?;

    let _event_logger = events::spawn_event_logger(&state.event_bus);
    let scheduler = if config.prefetch_enabled {
        Some(state.engine.scheduler.start())
    } else {
        tracing::info!("Prefetch disabled (SF_PREFETCH_ENABLED)");
        None
    };

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await?;

    if let Some(handle) = scheduler {
        handle.stop().await;
    }
    Ok(())
}

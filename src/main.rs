use blog_backend::{
    blog_router,
    config::Config,
    router::{BlogState, serve},
    service::{ConnectionFactory, prepare},
};
use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        db_host = %cfg.database.host,
        db_port = cfg.database.port,
        db_name = %cfg.database.name,
        db_user = %cfg.database.username,
        password_file = %cfg.database.password_file.display(),
        loglevel = %cfg.loglevel
    );

    let factory = ConnectionFactory::new(cfg.database.clone());

    info!("Prepare db...");
    if let Err(e) = prepare(&factory, &cfg.startup).await {
        error!(error = %e, "database preparation failed");
        std::process::exit(1);
    }

    let state = BlogState::new(factory, cfg.server.row_scan);
    let app = blog_router(state);

    let addr = cfg.server.bind_address();
    if let Err(e) = serve(&addr, app, shutdown_signal()).await {
        error!(addr = %addr, error = %e, "server failed");
        std::process::exit(1);
    }
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

use anyhow::Context;
use clap::Parser;

use gatehouse::cli::Cli;
use gatehouse::config::ServerConfig;
use gatehouse::http::connection::Dispatcher;
use gatehouse::logging::LogSink;
use gatehouse::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let cfg = match ServerConfig::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))
    {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };

    let logs = LogSink::open(&cfg.access_log, &cfg.error_log).await?;
    tracing::info!(
        access = %logs.access_path().display(),
        error = %logs.error_path().display(),
        "Logging to files"
    );

    let addr = cfg.listen_addr()?;
    let dispatcher = Dispatcher::from_config(&cfg, logs.clone());
    let server = match Server::bind(addr, dispatcher, cfg.max_connections).await {
        Ok(server) => server,
        Err(e) => {
            logs.error(format!("failed to start server on port {}: {:#}", cfg.port, e))
                .await;
            return Err(e);
        }
    };

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

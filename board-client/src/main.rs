//! # board-watch
//!
//! Headless board client: keeps a synced copy of the shared board and logs
//! every paint instruction. Handy for watching a board server from a
//! terminal.

use std::time::Duration;

use board_client::{ClientConfig, SyncEngine, TracingRenderSink};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for board-watch.
#[derive(Debug, Parser)]
#[command(name = "board-watch")]
#[command(about = "Follow a shared drawing board from the terminal")]
#[command(version)]
struct CliArgs {
    /// Board server base URL
    #[arg(long, env = "BOARD_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Input throttle window in milliseconds
    #[arg(long, env = "BOARD_THROTTLE_MS", default_value_t = 20)]
    throttle_ms: u64,

    /// Fallback poll interval in milliseconds
    #[arg(long, env = "BOARD_POLL_MS", default_value_t = 5000)]
    poll_ms: u64,

    /// Fixed reconnect interval in milliseconds
    #[arg(long, env = "BOARD_RECONNECT_MS", default_value_t = 3000)]
    retry_ms: u64,

    /// Never open the push channel, poll only
    #[arg(long)]
    polling_only: bool,

    /// Draw a short diagonal stroke after startup
    #[arg(long)]
    demo_stroke: bool,
}

/// Initialize tracing; `RUST_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,board_client=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = ClientConfig::new(&args.server)?
        .with_throttle_window(Duration::from_millis(args.throttle_ms))
        .with_poll_interval(Duration::from_millis(args.poll_ms))
        .with_reconnect_interval(Duration::from_millis(args.retry_ms))
        .with_push_enabled(!args.polling_only);

    tracing::info!(
        server = %config.server_url,
        push = config.push_enabled,
        "Starting board-watch"
    );

    let engine = SyncEngine::with_http(&config, Box::new(TracingRenderSink::new()))?;
    let handle = engine.handle();
    let engine_task = tokio::spawn(engine.run());

    if args.demo_stroke {
        let stroke = handle.clone();
        let spacing = config.throttle_window + Duration::from_millis(5);
        tokio::spawn(async move {
            // Give the session color a chance to resolve
            tokio::time::sleep(Duration::from_millis(500)).await;
            for i in 0..20u32 {
                let offset = f64::from(i) * 5.0;
                if !stroke.pointer(50.0 + offset, 50.0 + offset) {
                    break;
                }
                tokio::time::sleep(spacing).await;
            }
        });
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    handle.shutdown();
    engine_task.await?;

    Ok(())
}

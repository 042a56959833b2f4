use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // RUST_LOG=afrlog_core=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    afrlog_app::run(afrlog_app::Args::parse()).await
}

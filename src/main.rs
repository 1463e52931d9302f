use anyhow::Result;
use langgate::{
    app::CommentFilterApp,
    config,
    infrastructure::{directories, logging, shutdown},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = CommentFilterApp::initialize(config, paths, shutdown)?;
    app.run().await
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vortex_browser::{Browser, BrowserConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vortex_browser=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("vortex-browser (built {})", env!("BUILD_TIME"));

    // Load configuration / 加载配置
    let config = BrowserConfig::from_env()?;
    tracing::info!(
        "bucket {:?} via {} (root {:?})",
        config.bucket,
        config.endpoint,
        config.browser_root
    );

    let browser = Browser::connect(&config)?;
    let entries = browser.list(None).await?;

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

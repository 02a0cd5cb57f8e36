use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Логи в stdout и в `target/logs/catalog-admin.log`
///
/// Уровень берётся из `RUST_LOG`, по умолчанию `info` без подробностей HTTP-стека.
pub fn initialize() -> anyhow::Result<()> {
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("catalog-admin.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn,hyper=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}

use tracing_subscriber::EnvFilter;

/// Loads `.env` from the working directory, if there is one.
pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Logs go to stderr; stdout is reserved for the one-line run summary.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

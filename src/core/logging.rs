use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between `debug` and `warn`
/// for this crate. Output goes to stderr so replies on stdout stay pipeable.
pub fn init(verbose: bool) {
    let fallback = if verbose { "askai=debug" } else { "askai=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

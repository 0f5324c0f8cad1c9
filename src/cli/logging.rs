//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the `-v` count.
///
/// Stdout stays free for command output and archive bytes. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("pico_export={}", level_for_verbosity(verbose)))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//! Console logging for the duration of one command.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Environment variable holding filter directives, e.g. `yobatis_project=debug`.
const LOG_ENV: &str = "YOBATIS_LOG";

/// Install a stderr subscriber for this thread until the guard is dropped.
///
/// `verbose` forces `debug`. Otherwise `YOBATIS_LOG` decides, and without it
/// nothing is logged: the reports already print every diagnostic.
pub fn install(verbose: bool) -> DefaultGuard {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"))
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );
    tracing::subscriber::set_default(subscriber)
}

// Diagnostic logging. Events go to stderr so they never mix with command
// output on stdout (which may be JSON consumed by a script).

use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` picks the filter, `--verbose`
/// forces debug output for this crate. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("anylist_cli=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

use tracing::{error, info, warn};

/// User-facing message channel.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Default notifier: writes straight to the terminal, blocking until the
/// message is out.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

/// Routes notifications into the log instead of the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notifier", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "notifier", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "notifier", "{message}");
    }
}

use bundler_chain::HostLogger;
use std::sync::Arc;

/// Logger the checker engine writes through.
pub trait IssueLogger: Send + Sync {
    /// Progress and informational output.
    fn log(&self, message: &str);
    /// Reported issues and failures.
    fn error(&self, message: &str);
}

/// Rewrite `ERROR`/`WARNING` so type issues are not mistaken for bundler
/// compilation errors in a shared log stream.
pub fn relabel_message(message: &str) -> String {
    message
        .replace("ERROR", "Type Error")
        .replace("WARNING", "Type Warning")
}

/// Default engine logger: drops `log` output and forwards relabeled errors
/// to the host logger.
#[derive(Clone)]
pub struct RelabelingLogger {
    host: Arc<dyn HostLogger>,
}

impl RelabelingLogger {
    pub fn new(host: Arc<dyn HostLogger>) -> Self {
        Self { host }
    }
}

impl IssueLogger for RelabelingLogger {
    fn log(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.host.error(&relabel_message(message));
    }
}

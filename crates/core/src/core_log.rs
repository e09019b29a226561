/// Minimal logging seam so the engine stays host-agnostic.
/// Hosts implement it or use [`TracingLog`] to forward into `tracing`.
pub trait CoreLog: Send + Sync {
    fn info(&self, msg: &str) {
        let _ = msg;
    }
    fn warn(&self, msg: &str) {
        let _ = msg;
    }
    fn error(&self, msg: &str) {
        let _ = msg;
    }
    fn debug(&self, msg: &str) {
        let _ = msg;
    }
}

/// No-op logger if you don't care about logs.
pub struct NoopLog;
impl CoreLog for NoopLog {}

/// Forwards every message to the `tracing` macros under the `actionkeys` target.
pub struct TracingLog;

impl CoreLog for TracingLog {
    fn info(&self, msg: &str) {
        tracing::info!(target: "actionkeys", "{msg}");
    }
    fn warn(&self, msg: &str) {
        tracing::warn!(target: "actionkeys", "{msg}");
    }
    fn error(&self, msg: &str) {
        tracing::error!(target: "actionkeys", "{msg}");
    }
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "actionkeys", "{msg}");
    }
}

/// Test helper: records every line so tests can assert on diagnostics.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryLog {
    pub lines: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryLog {
    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with("WARN"))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
impl CoreLog for MemoryLog {
    fn info(&self, msg: &str) {
        self.lines.lock().push(format!("INFO {msg}"));
    }
    fn warn(&self, msg: &str) {
        self.lines.lock().push(format!("WARN {msg}"));
    }
    fn error(&self, msg: &str) {
        self.lines.lock().push(format!("ERROR {msg}"));
    }
    fn debug(&self, msg: &str) {
        self.lines.lock().push(format!("DEBUG {msg}"));
    }
}

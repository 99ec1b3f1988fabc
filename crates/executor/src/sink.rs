use std::io::Write;
use std::sync::Mutex;

/// Append-only destination for operator-facing progress lines.
/// Writing never fails observably.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Forwards lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "sweep::console", "{line}");
    }
}

/// Writes each line to an `io::Write`, flushing after every line.
/// I/O errors are dropped.
pub struct WriterSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) {
        let mut writer = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line.to_string());
    }
}

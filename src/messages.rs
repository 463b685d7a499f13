use tracing::{debug, warn};

/// Per-run trace buffer. Every entry is kept for the result record and
/// mirrored to `tracing`, so nothing is printed directly.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    test_name: String,
    entries: Vec<String>,
}

impl MessageLog {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            entries: Vec::new(),
        }
    }

    pub fn info(&mut self, text: impl AsRef<str>) {
        let line = self.format(text.as_ref());
        debug!(target: "mowersim::trace", "{}", line);
        self.entries.push(line);
    }

    pub fn warn(&mut self, text: impl AsRef<str>) {
        let line = self.format(text.as_ref());
        warn!(target: "mowersim::trace", "{}", line);
        self.entries.push(line);
    }

    /// Starts a new block in the trace (move index, run outcome).
    pub fn section(&mut self, text: impl AsRef<str>) {
        let line = format!("\n{}", self.format(text.as_ref()));
        debug!(target: "mowersim::trace", "{}", line.trim_start());
        self.entries.push(line);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    fn format(&self, text: &str) -> String {
        format!("--- {}: {}", self.test_name, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_prefixed_and_ordered() {
        let mut log = MessageLog::new("Lawn01");
        log.info("first");
        log.warn("second");
        log.section("third");
        assert_eq!(
            log.entries(),
            &[
                "--- Lawn01: first".to_string(),
                "--- Lawn01: second".to_string(),
                "\n--- Lawn01: third".to_string(),
            ]
        );
        assert_eq!(log.len(), 3);
    }
}

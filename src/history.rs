/// Session-scoped record of submitted input lines.
///
/// Entries are stored in submission order with consecutive duplicates
/// collapsed: a new line equal to the current tail is dropped. That is the
/// only deduplication performed, so `ls`, `pwd`, `ls` keeps all three.
/// The log lives exactly as long as the session and is released when the
/// session ends.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line (trailing newline already stripped by the reader),
    /// unless it equals the most recent entry.
    pub fn record(&mut self, line: &str) {
        if self.entries.last().is_some_and(|last| last.as_str() == line) {
            return;
        }
        self.entries.push(line.to_string());
    }

    /// All entries in insertion order, one per line, ready to print.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

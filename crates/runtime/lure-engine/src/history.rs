//! Terminal command history (ArrowUp / ArrowDown)

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    /// `entries.len()` means "past the end", i.e. a fresh line
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a submitted line and reset the cursor past the end
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.cursor = self.entries.len();
    }

    /// Step back; stays on the oldest entry once reached
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward; past the newest entry yields an empty line
    pub fn next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.entries.len());
        Some(self.entries.get(self.cursor).map(String::as_str).unwrap_or(""))
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_and_clamp() {
        let mut history = CommandHistory::new();
        assert_eq!(history.previous(), None);

        history.push("ls");
        history.push("pwd");
        assert_eq!(history.previous(), Some("pwd"));
        assert_eq!(history.previous(), Some("ls"));
        assert_eq!(history.previous(), Some("ls"));
        assert_eq!(history.next(), Some("pwd"));
        assert_eq!(history.next(), Some(""));
        assert_eq!(history.next(), Some(""));
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut history = CommandHistory::new();
        history.push("ls");
        history.push("pwd");
        history.previous();
        history.previous();
        history.push("whoami");
        assert_eq!(history.previous(), Some("whoami"));
        assert_eq!(history.len(), 3);
    }
}

//! Command history with a recall cursor.

/// Append-only list of submitted commands.
///
/// The cursor is always in `0..=len`; `len` means no entry is selected
/// and the input line holds fresh text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command and reset the cursor past the end.
    pub fn push(&mut self, command: impl Into<String>) {
        self.entries.push(command.into());
        self.cursor = self.entries.len();
    }

    /// Step back one entry. Returns the entry now selected, or `None` when
    /// already at the oldest entry (or history is empty).
    pub fn older(&mut self) -> Option<&str> {
        if self.cursor > 0 {
            self.cursor -= 1;
            return self.entries.get(self.cursor).map(String::as_str);
        }
        None
    }

    /// Step forward one entry. Returns `None` once the cursor moves past the
    /// newest entry, which deselects.
    pub fn newer(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            None
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no historical entry is selected.
    pub fn is_fresh(&self) -> bool {
        self.cursor == self.entries.len()
    }
}

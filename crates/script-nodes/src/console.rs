//! Console extension
//!
//! Line buffer that `print` nodes write to. Hosts install it under
//! [`extension_keys::CONSOLE`](script_engine::extension_keys::CONSOLE) as an
//! `Arc<Console>` and read the lines back after evaluation.

use parking_lot::Mutex;

/// Collected output of `print` nodes
#[derive(Debug, Default)]
pub struct Console {
    lines: Mutex<Vec<String>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of output
    pub fn write_line(&self, line: impl Into<String>) {
        self.lines.lock().push(line.into());
    }

    /// Snapshot of everything written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_clear() {
        let console = Console::new();
        console.write_line("first");
        console.write_line(String::from("second"));
        assert_eq!(console.lines(), vec!["first", "second"]);

        console.clear();
        assert!(console.lines().is_empty());
    }
}

//! Terminal styling for diagnostics.

use std::io::IsTerminal;

pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const RESET: &str = "\x1b[0m";

/// Applies escape sequences when enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    pub fn for_stderr() -> Self {
        Self::new(std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none())
    }

    pub fn paint(&self, style: &str, text: &str) -> String {
        if self.enabled {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

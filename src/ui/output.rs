//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Every line goes through [`format_line`], keyed by a fixed [`Level`].
//! Which lines are shown depends on the [`Verbosity`] carried by a
//! [`Reporter`], which is passed explicitly to the code that reports.
//! Info lines go to stdout; debug, warning and error lines go to stderr.

use std::fmt::Display;

use colored::Colorize;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Whether a line at this level is shown under `verbosity`.
    pub fn visible(self, verbosity: Verbosity) -> bool {
        match self {
            Level::Error => true,
            Level::Debug => verbosity == Verbosity::Debug,
            Level::Info | Level::Warning => verbosity != Verbosity::Quiet,
        }
    }
}

/// Render a message for display at `level`.
///
/// Info is green, warnings yellow, errors red; debug lines are tagged.
pub fn format_line(level: Level, message: impl Display) -> String {
    match level {
        Level::Debug => format!("[debug] {message}"),
        Level::Info => message.to_string().green().to_string(),
        Level::Warning => format!("warning: {message}").yellow().to_string(),
        Level::Error => format!("error: {message}").red().to_string(),
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("{}", format_line(Level::Error, message));
}

/// Verbosity-aware sink for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// A reporter that only prints errors.
    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn emit(&self, level: Level, message: impl Display) {
        if !level.visible(self.verbosity) {
            return;
        }
        let line = format_line(level, message);
        if level == Level::Info {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.emit(Level::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.emit(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.emit(Level::Warning, message);
    }

    pub fn error(&self, message: impl Display) {
        self.emit(Level::Error, message);
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn visibility_matrix() {
        assert!(Level::Error.visible(Verbosity::Quiet));
        assert!(!Level::Warning.visible(Verbosity::Quiet));
        assert!(!Level::Info.visible(Verbosity::Quiet));
        assert!(Level::Info.visible(Verbosity::Normal));
        assert!(!Level::Debug.visible(Verbosity::Normal));
        assert!(Level::Debug.visible(Verbosity::Debug));
    }

    #[test]
    fn lines_carry_prefix_and_message() {
        assert_eq!(format_line(Level::Debug, "cleaning"), "[debug] cleaning");
        assert!(format_line(Level::Info, "Applying 3 patches").contains("Applying 3 patches"));
        assert!(format_line(Level::Warning, "skipping").contains("warning: skipping"));
        assert!(format_line(Level::Error, "conflict").contains("error: conflict"));
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_list(&["a", "b"], "  "), "  a\n  b");
        assert_eq!(format_list::<&str>(&[], "  "), "");
    }
}

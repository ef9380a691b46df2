//! Human-readable status stream.
//!
//! One colored line per entry per significant step. Progress and success go to
//! stdout, warnings and failures to stderr. `--quiet` silences everything but
//! failures. Colors follow the `colored` crate's global override, so
//! `--no-color` and `NO_COLOR` are honored without extra plumbing here.

use colored::Colorize;

/// Writes status lines for the resolver and its components.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusReporter {
    quiet: bool,
}

impl StatusReporter {
    /// Create a reporter; `quiet` keeps only failure lines.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self {
            quiet,
        }
    }

    /// Returns true if non-failure lines are suppressed.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The run banner.
    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        println!("{}", "--------------".blue());
        println!("{}{}{}", "|".blue(), " GitLinking ".blue(), "| ".blue());
        println!("{}", "--------------".blue());
    }

    /// A step is starting or has made progress.
    pub fn step(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    /// A non-fatal problem worth the user's attention.
    pub fn warn(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }

    /// A failure; always printed.
    pub fn fail(&self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
    }
}

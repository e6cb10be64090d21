//! Output helpers for CLI commands

/// Output helper for consistent formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    verbose: bool,
    debug: bool,
}

impl Output {
    pub fn new(verbose: bool, debug: bool) -> Self {
        Self { verbose, debug }
    }

    /// Prints a line of regular command output
    pub fn success(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints help text to stderr, followed by a blank line
    pub fn usage(&self, text: &str) {
        eprintln!("{}\n", text);
    }

    /// Prints a warning; the command keeps going
    pub fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    /// Prints an error message
    pub fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Prints the full error detail (only when --debug is set)
    pub fn debug_error(&self, error: &(dyn std::error::Error + 'static)) {
        if !self.debug {
            return;
        }
        eprintln!("[debug] {:?}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            eprintln!("[debug] caused by: {}", cause);
            source = cause.source();
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

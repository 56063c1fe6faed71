//! Compiled template handles as seen by the scope layer
//!
//! Parsing, loading and caching live outside this crate. A [`Template`] here
//! is only the identity a render belongs to: its name and the
//! [`TemplateSet`] whose logging sink receives diagnostics.

pub mod token;

pub use token::Token;

use std::fmt;
use std::sync::Arc;

/// Log target used for template set diagnostics
pub const LOG_TARGET: &str = "stencil_scope::template";

/// A group of templates sharing loader, configuration and logging sink
#[derive(Debug, Clone)]
pub struct TemplateSet {
    name: String,
    debug: bool,
}

impl TemplateSet {
    /// Create a template set with debug logging disabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            debug: false,
        }
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Name of the set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether debug logging is enabled
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Forward a diagnostic message to the log sink
    ///
    /// Messages are dropped unless the set runs in debug mode.
    pub fn logf(&self, args: fmt::Arguments<'_>) {
        if self.debug {
            log::debug!(target: LOG_TARGET, "[template set: {}] {}", self.name, args);
        }
    }
}

/// A compiled template owned by a [`TemplateSet`]
#[derive(Debug)]
pub struct Template {
    name: String,
    set: Arc<TemplateSet>,
}

impl Template {
    /// Create a template belonging to `set`
    pub fn new(name: impl Into<String>, set: Arc<TemplateSet>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            set,
        })
    }

    /// Display name, usually the file the template was loaded from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning template set
    pub fn set(&self) -> &Arc<TemplateSet> {
        &self.set
    }
}

#[cfg(test)]
pub(crate) mod test_logger {
    use log::{LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            if record.target() == super::LOG_TARGET {
                RECORDS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    pub(crate) fn install() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    }

    pub(crate) fn contains(needle: &str) -> bool {
        RECORDS.lock().unwrap().iter().any(|r| r.contains(needle))
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Record model
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A log record carries a UTC timestamp, a severity level, a message, and
// optionally the call site that produced it. The appender itself never
// inspects a record; it only hands records to the configured layout and
// writes the rendered bytes.

use std::fmt;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Record severity, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The fixed uppercase name used in rendered lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() honors width specifiers, keeping level columns aligned.
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CallSite
// ---------------------------------------------------------------------------

/// The source location that produced a record.
///
/// Captured at the caller's frame by [`crate::call_site!`]; the appender's
/// own frames never appear in a `CallSite`. Rendered as
/// `qualified::function(file.rs:line)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// The module that contains the call (`module_path!` at the call site).
    pub module_path: &'static str,
    /// The fully qualified name of the enclosing function, or `""` when
    /// only file and line could be resolved.
    pub function: &'static str,
    /// The source file of the call (`file!` at the call site).
    pub file: &'static str,
    /// The 1-based source line of the call.
    pub line: u32,
}

impl CallSite {
    /// Sentinel used when a layout demands a location but none was captured
    /// with the record. Resolution never fails; it degrades to this value.
    pub const UNKNOWN: CallSite = CallSite {
        module_path: "",
        function: "unknown",
        file: "unknown",
        line: 0,
    };

    /// The file name without its directory components, as printed in
    /// rendered lines.
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "{}({}:{})", self.module_path, self.file_name(), self.line)
        } else {
            write!(f, "{}({}:{})", self.function, self.file_name(), self.line)
        }
    }
}

// ---------------------------------------------------------------------------
// LogRecord
// ---------------------------------------------------------------------------

/// A single log record, produced by the caller and rendered by a
/// [`crate::layout::Layout`] into the opaque byte sequence that is appended.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Record severity.
    pub level: Level,
    /// The already-formatted message text.
    pub message: String,
    /// The call site, when captured. Layouts that do not print locations
    /// ignore this field.
    pub call_site: Option<CallSite>,
}

impl LogRecord {
    /// Create a record stamped with the current time and no call site.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            call_site: None,
        }
    }

    /// Attach a call site to this record.
    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = Some(call_site);
        self
    }
}

/// Build a [`LogRecord`] with the call site of the invoking source line.
///
/// The message is formatted with [`std::format!`] semantics:
///
/// ```
/// use mmaplog_appender::{log_record, Level};
///
/// let record = log_record!(Level::Warn, "slow request: {} ms", 250);
/// assert!(record.call_site.is_some());
/// ```
#[macro_export]
macro_rules! log_record {
    ($level:expr, $($arg:tt)*) => {
        $crate::record::LogRecord::new($level, ::std::format!($($arg)*))
            .with_call_site($crate::call_site!())
    };
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Record rendering boundary
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The appender treats rendered records as opaque byte sequences; everything
// about their textual shape lives behind the `Layout` trait. One line-based
// implementation ships here. Rendering happens outside the appender's write
// lock, so layouts must be `Send + Sync` and must not retain record state.

use std::io::Write;

use crate::record::{CallSite, LogRecord};

/// Renders records into the byte sequences the appender writes.
pub trait Layout: Send + Sync {
    /// Whether rendered output includes the record's call site. Callers use
    /// this to skip capture entirely when no layout will print it.
    fn requires_location(&self) -> bool {
        false
    }

    /// Append the rendered form of `record` to `out`.
    fn format(&self, record: &LogRecord, out: &mut Vec<u8>);
}

/// One text line per record:
///
/// ```text
/// 2026-08-07 09:15:42.103 WARN  Test log1
/// 2026-08-07 09:15:42.103 WARN  app::server::accept(server.rs:88) - Test log1
/// ```
///
/// The timestamp is a fixed 23 bytes (`%Y-%m-%d %H:%M:%S%.3f`) and the level
/// column a fixed 5, so a line's length is its message length plus a constant
/// (plus the location string when enabled).
#[derive(Debug, Clone)]
pub struct LineLayout {
    locations: bool,
}

impl LineLayout {
    /// A layout that prints `timestamp level message`.
    pub fn new() -> Self {
        Self { locations: false }
    }

    /// A layout that also prints the call site between level and message.
    pub fn with_locations() -> Self {
        Self { locations: true }
    }
}

impl Default for LineLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for LineLayout {
    fn requires_location(&self) -> bool {
        self.locations
    }

    fn format(&self, record: &LogRecord, out: &mut Vec<u8>) {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        // Writes to a Vec cannot fail.
        if self.locations {
            let site = record.call_site.unwrap_or(CallSite::UNKNOWN);
            let _ = write!(
                out,
                "{timestamp} {level:<5} {site} - {message}\n",
                level = record.level,
                message = record.message,
            );
        } else {
            let _ = write!(
                out,
                "{timestamp} {level:<5} {message}\n",
                level = record.level,
                message = record.message,
            );
        }
    }
}

/// Rendered line length for a message of `message_len` bytes under the
/// location-less [`LineLayout`]: 23 timestamp + 1 + 5 level + 1 + message
/// + newline.
pub const fn plain_line_length(message_len: usize) -> usize {
    23 + 1 + 5 + 1 + message_len + 1
}

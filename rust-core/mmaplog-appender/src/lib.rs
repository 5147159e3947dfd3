// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender crate
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Appends log records straight into a memory mapping of the target file.
// Each append is a memory copy, not a write syscall; the OS flushes dirty
// pages behind the scenes and an explicit flush happens once, at stop.
//
// # Architecture
//
// The mapped region always covers `[0, region_length)` of the file, where
// `region_length` is a power of two. The region is created lazily by the
// first append, sized from the configured length and the first record
// (`ceiling_power_of_two`), and grows (never shrinks) while the appender
// is open: a record that does not fit triggers a remap to the next power of
// two covering it. While open, the on-disk file length equals the region
// length, with everything past the cursor left as zero padding. `stop()`
// flushes, unmaps, and truncates the file to exactly the bytes written.
//
// # On-disk format
//
// A plain byte-append log: no header, no index. Records are whatever the
// configured `Layout` renders: by default one text line per record,
// optionally annotated with the call site that produced it.
//
// ## Usage
//
// ```no_run
// use mmaplog_appender::{log_record, AppenderConfig, Level, MappedAppender};
//
// let appender = MappedAppender::new(
//     AppenderConfig::new("/var/log/app.log")
//         .with_region_length(32000) // mapped as 32768, the next power of two
//         .with_locations(true),
// );
//
// // The macro stamps the record with this file and line.
// appender.append(&log_record!(Level::Warn, "cache miss for {}", "user-42")).unwrap();
//
// // Shrink the file to its used length and reject further appends.
// appender.stop().unwrap();
// ```

pub mod caller;
pub mod config;
pub mod error;
pub mod growth;
pub mod layout;
pub mod record;
pub mod region;
pub mod writer;

// Re-export the primary public API for ergonomic imports.
pub use caller::here;
pub use config::AppenderConfig;
pub use error::{AppenderError, AppenderResult};
pub use layout::{Layout, LineLayout};
pub use record::{CallSite, Level, LogRecord};
pub use region::MappedRegion;
pub use writer::MappedAppender;

// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Error types
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Defines all error conditions that can arise while a mapped log file is
// opened, grown, written, and finally shrunk to its used length. Every
// failure is fatal to the single call that triggered it and is surfaced
// synchronously; nothing is retried or swallowed here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while appending to a memory-mapped log file.
#[derive(Debug, Error)]
pub enum AppenderError {
    /// The backing file could not be created, opened, or extended to the
    /// initial region length. Sparse-file extension failures on exotic
    /// filesystems surface here as well.
    #[error("cannot open mapped log file {path}: {source}")]
    Open {
        /// The path of the backing file.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The mapped region could not be grown to the requested length
    /// (disk full, address-space exhaustion). The previous mapping is
    /// left installed and remains fully usable for smaller writes.
    #[error("cannot grow mapped region to {requested} bytes: {source}")]
    Remap {
        /// The region length that was requested.
        requested: u64,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// A record would require a region larger than the largest power of
    /// two representable on this platform. This is a configuration error,
    /// not a transient condition.
    #[error("requested capacity {requested} exceeds the largest mappable power-of-two region")]
    RegionOverflow {
        /// The capacity that could not be rounded up.
        requested: u64,
    },

    /// `append` was called after `stop`. The appender never reopens or
    /// recreates its mapping; the call performs no mutation.
    #[error("appender is stopped; the mapped file has been closed")]
    Closed,

    /// Dirty mapped pages could not be forced to stable storage.
    #[error("cannot flush mapped region for {path}: {source}")]
    Flush {
        /// The path of the backing file.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The final shrink-to-fit of the backing file failed during `stop`.
    /// The mapping has already been released when this is reported; only
    /// the on-disk length is left inconsistent.
    #[error("cannot truncate {path} to its used length: {source}")]
    Truncate {
        /// The path of the backing file.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

/// Convenience type alias for appender results.
pub type AppenderResult<T> = Result<T, AppenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_open() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = AppenderError::Open {
            path: PathBuf::from("/var/log/app.log"),
            source: io_error,
        };
        let message = format!("{error}");
        assert!(message.contains("/var/log/app.log"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_error_display_remap() {
        let io_error = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no address space");
        let error = AppenderError::Remap {
            requested: 1 << 20,
            source: io_error,
        };
        let message = format!("{error}");
        assert!(message.contains("1048576"));
        assert!(message.contains("no address space"));
    }

    #[test]
    fn test_error_display_region_overflow() {
        let error = AppenderError::RegionOverflow {
            requested: u64::MAX,
        };
        assert!(format!("{error}").contains(&u64::MAX.to_string()));
    }

    #[test]
    fn test_error_display_closed() {
        let message = format!("{}", AppenderError::Closed);
        assert!(message.contains("stopped"));
    }
}

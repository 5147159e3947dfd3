// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Append orchestration
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `MappedAppender` owns the mapped region and serializes the whole write
// path (capacity check, remap, copy, cursor update) behind one mutex. A
// remap invalidates the mapped address range, so an unsynchronized
// concurrent copy could fault or corrupt; nothing touches the region
// outside that critical section. Rendering and call-site capture happen
// before the lock is taken.

use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::AppenderConfig;
use crate::error::{AppenderError, AppenderResult};
use crate::growth;
use crate::layout::{Layout, LineLayout};
use crate::record::LogRecord;
use crate::region::MappedRegion;

/// An appender that writes rendered records into a memory mapping of its
/// log file.
///
/// The mapping is created lazily by the first `append`, grows in
/// power-of-two steps, and is shrunk to the exact used length by [`stop`].
/// Any number of threads may share one appender; each append is atomic with
/// respect to the others. At most one appender may target a given file path
/// at a time; two appenders on one path corrupt it. That contract is the
/// caller's to keep.
///
/// [`stop`]: MappedAppender::stop
pub struct MappedAppender {
    config: AppenderConfig,
    layout: Box<dyn Layout>,
    state: Mutex<AppenderState>,
}

/// Lifecycle of the backing mapping. `Pending` (nothing written, no file
/// yet) moves to `Open` on the first append and to `Closed` on stop;
/// `Closed` is terminal.
enum AppenderState {
    Pending,
    Open(OpenState),
    Closed,
}

struct OpenState {
    region: MappedRegion,

    /// Offset of the next write. Bounded by the region length.
    cursor: u64,

    /// Total meaningful bytes in the file; the close-time truncation
    /// target. Tracks `cursor` exactly because the file is append-only.
    high_water: u64,
}

impl MappedAppender {
    /// Create an appender with the line layout selected by the
    /// configuration. No file is touched until the first append.
    pub fn new(config: AppenderConfig) -> Self {
        let layout: Box<dyn Layout> = if config.locations {
            Box::new(LineLayout::with_locations())
        } else {
            Box::new(LineLayout::new())
        };
        Self::with_layout(config, layout)
    }

    /// Create an appender with a caller-provided layout.
    pub fn with_layout(config: AppenderConfig, layout: Box<dyn Layout>) -> Self {
        Self {
            config,
            layout,
            state: Mutex::new(AppenderState::Pending),
        }
    }

    /// The path of the backing log file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Whether the configured layout renders call-site locations.
    pub fn requires_location(&self) -> bool {
        self.layout.requires_location()
    }

    /// Render `record` through the layout and append the resulting line.
    ///
    /// Rendering runs outside the write lock; the rendered bytes are
    /// immutable from then on.
    pub fn append(&self, record: &LogRecord) -> AppenderResult<()> {
        let mut rendered = Vec::with_capacity(record.message.len() + 96);
        self.layout.format(record, &mut rendered);
        self.append_bytes(&rendered)
    }

    /// Append an already-rendered record.
    ///
    /// The bytes are written contiguously at the current cursor; the region
    /// is grown first when they do not fit, so no record ever spans a remap
    /// and no partial record is ever visible.
    pub fn append_bytes(&self, bytes: &[u8]) -> AppenderResult<()> {
        let mut state = self.state.lock();
        match &mut *state {
            AppenderState::Closed => Err(AppenderError::Closed),
            AppenderState::Pending => {
                *state = AppenderState::Open(self.open_for_first_write(bytes)?);
                Ok(())
            }
            AppenderState::Open(open) => {
                let required = open.cursor + bytes.len() as u64;
                if required > open.region.region_length() {
                    let new_length = growth::next_region_length(required)?;
                    open.region.remap(new_length)?;
                }
                open.region.write_at(open.cursor, bytes);
                open.cursor = required;
                open.high_water = open.cursor;

                debug!(bytes = bytes.len(), cursor = open.cursor, "Appended record");
                Ok(())
            }
        }
    }

    /// Flush, unmap, and shrink the file to its used length.
    ///
    /// Blocks until no append is in flight, then closes the mapping exactly
    /// once; later calls are no-ops. Every append after `stop` fails with
    /// [`AppenderError::Closed`]; the mapping is never recreated. The
    /// mapping is released even when flushing or truncating fails.
    pub fn stop(&self) -> AppenderResult<()> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, AppenderState::Closed) {
            // Already closed, or nothing was ever written (no file exists).
            AppenderState::Closed | AppenderState::Pending => Ok(()),
            AppenderState::Open(open) => {
                open.region.flush()?;

                let high_water = open.high_water;
                open.region.close(high_water)?;
                info!(
                    path = %self.config.path.display(),
                    used_bytes = high_water,
                    "Stopped mapped appender"
                );
                Ok(())
            }
        }
    }

    /// Open the mapping for the first record, sizing it from the configured
    /// region length and the record itself.
    fn open_for_first_write(&self, bytes: &[u8]) -> AppenderResult<OpenState> {
        let existing = if self.config.append {
            existing_length(&self.config.path)?
        } else {
            0
        };

        let write_end = existing + bytes.len() as u64;
        let initial = growth::initial_region_length(self.config.region_length, write_end)?;

        let mut region = MappedRegion::open(&self.config.path, self.config.append, initial)?;
        region.write_at(existing, bytes);

        info!(
            path = %self.config.path.display(),
            region_length = initial,
            resumed_bytes = existing,
            "Opened mapped appender"
        );

        Ok(OpenState {
            region,
            cursor: write_end,
            high_water: write_end,
        })
    }
}

impl Drop for MappedAppender {
    fn drop(&mut self) {
        if let Err(error) = self.stop() {
            warn!(%error, path = %self.config.path.display(), "Mapped appender closed uncleanly");
        }
    }
}

/// Length of the file at `path`, or 0 when it does not exist yet.
fn existing_length(path: &Path) -> AppenderResult<u64> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.len()),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(source) => Err(AppenderError::Open {
            path: path.to_path_buf(),
            source,
        }),
    }
}

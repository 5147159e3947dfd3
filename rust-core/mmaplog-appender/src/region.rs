// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Mapped region
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owns one open file descriptor and one writable memory mapping covering
// `[0, region_length)` of that file. While the region is open the on-disk
// file length always equals the mapped length; the one-time shrink to the
// used length happens in `close`, after the map has been released.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};
use tracing::debug;

use crate::error::{AppenderError, AppenderResult};

/// A writable memory mapping of a contiguous byte range of one file.
pub struct MappedRegion {
    path: PathBuf,
    file: File,
    map: MmapMut,
    region_length: u64,
}

impl MappedRegion {
    /// Create or reuse the file at `path`, size it to `initial_length`
    /// bytes, and map it.
    ///
    /// With `append` the existing contents are preserved (the file only
    /// grows); otherwise the file is truncated first. Failure to allocate
    /// the space is fatal and surfaced to the caller.
    pub fn open(path: &Path, append: bool, initial_length: u64) -> AppenderResult<Self> {
        let open_error = |source| AppenderError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(!append)
            .open(path)
            .map_err(open_error)?;

        file.set_len(initial_length).map_err(open_error)?;
        let map = map_file(&file, initial_length)
            .map_err(open_error)?;

        debug!(
            path = %path.display(),
            region_length = initial_length,
            append,
            "Mapped log file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            map,
            region_length: initial_length,
        })
    }

    /// The length of the mapping (and of the on-disk file while open).
    pub fn region_length(&self) -> u64 {
        self.region_length
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy `bytes` into the mapping at `offset`.
    ///
    /// A pure memory copy; no syscall is involved. The caller must have
    /// ensured `offset + bytes.len() <= region_length` beforehand.
    pub fn write_at(&mut self, offset: u64, bytes: &[u8]) {
        debug_assert!(offset + bytes.len() as u64 <= self.region_length);
        let start = offset as usize;
        self.map[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Grow the mapping (and the backing file) to `new_length` bytes.
    ///
    /// Every byte already written stays at its offset: the file is extended
    /// first, then a fresh mapping of the full length replaces the old one.
    /// On failure the previous mapping stays installed, the file length is
    /// restored, and the region remains usable for writes that fit it.
    pub fn remap(&mut self, new_length: u64) -> AppenderResult<()> {
        let remap_error = |source| AppenderError::Remap {
            requested: new_length,
            source,
        };

        // Push written pages out before switching mappings.
        self.map.flush().map_err(remap_error)?;

        self.file.set_len(new_length).map_err(remap_error)?;

        match map_file(&self.file, new_length) {
            Ok(new_map) => {
                debug!(
                    path = %self.path.display(),
                    old_length = self.region_length,
                    new_length,
                    "Remapped log file"
                );
                self.map = new_map;
                self.region_length = new_length;
                Ok(())
            }
            Err(source) => {
                // Restore the on-disk length; the old map is still installed
                // and still covers [0, region_length).
                let _ = self.file.set_len(self.region_length);
                Err(remap_error(source))
            }
        }
    }

    /// Force dirty mapped pages to stable storage.
    pub fn flush(&self) -> AppenderResult<()> {
        self.map.flush().map_err(|source| AppenderError::Flush {
            path: self.path.clone(),
            source,
        })
    }

    /// Release the mapping and truncate the file to `final_length` bytes.
    ///
    /// The map is dropped before the truncate, so the mapping is released
    /// even when the truncate fails.
    pub fn close(self, final_length: u64) -> AppenderResult<()> {
        let MappedRegion {
            path, file, map, ..
        } = self;

        drop(map);
        file.set_len(final_length)
            .map_err(|source| AppenderError::Truncate {
                path: path.clone(),
                source,
            })?;

        debug!(
            path = %path.display(),
            final_length,
            "Closed mapped log file"
        );
        Ok(())
    }
}

/// Map `length` bytes of `file` writable.
fn map_file(file: &File, length: u64) -> std::io::Result<MmapMut> {
    let length = usize::try_from(length).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::OutOfMemory,
            "region length exceeds the address space",
        )
    })?;
    // Safety: the file is owned by this region and resized only through it;
    // the documented single-writer-per-path contract keeps other writers
    // from shrinking it under the map.
    unsafe { MmapOptions::new().len(length).map_mut(file) }
}

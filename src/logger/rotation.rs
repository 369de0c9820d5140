//! Size-based rollover of the active log file.
//!
//! Generations live next to the active file as `<path>.1`, `<path>.2`, ...
//! with `.1` always the most recent. A rollover shifts every generation up by
//! one, moves the active file to `.1` and evicts whatever ends up numbered
//! above `max_retained`, including leftovers sitting past a gap in the chain.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Largest size the active file may reach, terminators included.
    pub max_bytes: u64,
    /// Number of generation files kept after a rollover.
    pub max_retained: u32,
}

impl RotationPolicy {
    pub fn new(max_bytes: u64, max_retained: u32) -> Self {
        Self {
            max_bytes,
            max_retained,
        }
    }

    /// Whether appending `line_len` bytes plus a terminator to a file of
    /// `current_size` bytes would exceed the limit.
    ///
    /// An empty file never rolls over, so an oversized line is still written
    /// whole and no empty generation is produced.
    pub fn should_rotate(&self, current_size: u64, line_len: usize) -> bool {
        let prospective = current_size.saturating_add(line_len as u64 + 1);
        current_size > 0 && prospective > self.max_bytes
    }

    /// Moves `active` into the generation chain. The caller must have closed
    /// its handle and reopens a fresh file afterwards.
    ///
    /// A missing active file leaves the generations untouched.
    pub fn rotate(&self, active: &Path) -> io::Result<()> {
        if !active.exists() {
            return Ok(());
        }
        let highest = highest_generation(active);

        // Highest first so no generation is overwritten before it moved.
        for n in (1..=highest).rev() {
            fs::rename(generation_path(active, n), generation_path(active, n + 1))?;
        }
        fs::rename(active, generation_path(active, 1))?;

        self.evict(active)
    }

    /// Removes `max_retained + 1` and every generation contiguous above it.
    fn evict(&self, active: &Path) -> io::Result<()> {
        let mut next = self.max_retained.checked_add(1);
        while let Some(n) = next {
            match fs::remove_file(generation_path(active, n)) {
                Ok(()) => next = n.checked_add(1),
                Err(e) if e.kind() == io::ErrorKind::NotFound => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// `<active>.<n>`
pub fn generation_path(active: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(active.as_os_str());
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Highest `n` such that `<active>.1` through `<active>.n` all exist.
pub fn highest_generation(active: &Path) -> u32 {
    let mut n = 0;
    while generation_path(active, n + 1).exists() {
        n += 1;
    }
    n
}

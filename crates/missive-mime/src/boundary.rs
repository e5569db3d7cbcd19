//! Multipart boundary generation.
//!
//! Every multipart render asks a [`BoundarySource`] for a fresh delimiter.
//! The default [`RandomBoundary`] yields a new token on each call, so two
//! renders of the same message differ in their boundaries. Tests and other
//! callers needing byte-for-byte stable output can use [`SequentialBoundary`]
//! or their own implementation.

use rand::Rng;
use std::fmt::Write as _;

/// Number of random bytes in a generated boundary.
const RANDOM_BOUNDARY_BYTES: usize = 30;

/// Source of multipart boundary tokens.
pub trait BoundarySource {
    /// Returns the boundary for the next multipart body.
    ///
    /// The token must be a valid RFC 2046 boundary (at most 70 characters).
    /// When it occurs inside a part body the renderer asks again, so a
    /// source should not repeat itself.
    fn next_boundary(&mut self) -> String;
}

/// Random hex boundaries from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl BoundarySource for RandomBoundary {
    fn next_boundary(&mut self) -> String {
        let mut bytes = [0u8; RANDOM_BOUNDARY_BYTES];
        rand::thread_rng().fill(&mut bytes[..]);
        bytes
            .iter()
            .fold(String::with_capacity(RANDOM_BOUNDARY_BYTES * 2), |mut s, b| {
                let _ = write!(s, "{b:02x}");
                s
            })
    }
}

/// Deterministic boundaries in the format `<prefix>0000`, `<prefix>0001`, ...
///
/// A body containing `--<prefix>0000` makes the render skip to the next
/// number, so the output stays well framed but the boundary shifts.
#[derive(Debug, Clone)]
pub struct SequentialBoundary {
    prefix: String,
    counter: u32,
}

impl SequentialBoundary {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Returns how many boundaries have been handed out.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.counter
    }
}

impl Default for SequentialBoundary {
    fn default() -> Self {
        Self::new("boundary-")
    }
}

impl BoundarySource for SequentialBoundary {
    fn next_boundary(&mut self) -> String {
        let n = self.counter;
        self.counter = self.counter.wrapping_add(1);
        format!("{}{n:04}", self.prefix)
    }
}

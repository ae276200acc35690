use std::num::NonZeroUsize;

use serde::Deserialize;

/// Rows per write transaction during a bulk replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "usize")]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    pub const DEFAULT: BatchSize = match NonZeroUsize::new(500) {
        Some(n) => BatchSize(n),
        None => unreachable!(),
    };

    pub fn new(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(BatchSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for BatchSize {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        BatchSize::new(n).ok_or_else(|| "batch size must be at least 1".to_string())
    }
}

/// Contiguous chunks of `size` items; only the last may be shorter.
pub fn batches<T>(items: &[T], size: BatchSize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.get())
}

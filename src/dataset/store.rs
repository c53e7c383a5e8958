//! Append-only row storage with golden-ratio growth

use crate::error::{Error, Result};
use std::mem::size_of;

/// Capacity growth factor
const GROWTH_FACTOR: f64 = 1.618;

/// Append-only array of rows
///
/// Capacity grows geometrically so that pushing `n` rows costs O(n)
/// reallocation work in total. The row limit is clamped to what fits in one
/// allocation; pushing past it is reported as `CapacityExceeded`, and an
/// allocator refusal as `OutOfMemory`.
#[derive(Debug)]
pub struct RowStore<T> {
    rows: Vec<T>,
    max_rows: usize,
}

impl<T> Default for RowStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RowStore<T> {
    /// Create an empty store limited only by the platform
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            max_rows: Self::platform_max_rows(),
        }
    }

    /// Create an empty store holding at most `max_rows` rows
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            rows: Vec::new(),
            max_rows: max_rows.min(Self::platform_max_rows()),
        }
    }

    /// Create an empty store for an optional row limit
    pub fn with_limit(max_rows: Option<usize>) -> Self {
        max_rows.map_or_else(Self::new, Self::with_max_rows)
    }

    /// Largest row count whose byte size fits in an allocation
    pub fn platform_max_rows() -> usize {
        isize::MAX as usize / size_of::<T>().max(1)
    }

    /// Row limit of this store
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Number of rows pushed so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were pushed
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Currently allocated row slots
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    /// Rows pushed so far
    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    /// Append a row, growing the allocation when full
    pub fn push(&mut self, row: T) -> Result<()> {
        if self.rows.len() == self.rows.capacity() {
            self.grow()?;
        }
        self.rows.push(row);
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let len = self.rows.len();
        if len >= self.max_rows {
            return Err(Error::CapacityExceeded {
                requested: len.saturating_add(1),
                maximum: self.max_rows,
            });
        }

        // target <= max_rows <= platform_max_rows
        let target = next_capacity(self.rows.capacity()).min(self.max_rows);
        self.rows
            .try_reserve_exact(target - len)
            .map_err(|_| Error::OutOfMemory)?;
        tracing::trace!(rows = len, capacity = self.rows.capacity(), "grew row store");
        Ok(())
    }

    /// Shrink to exactly the pushed rows
    ///
    /// An empty store yields an empty (dangling, never null) slice.
    pub fn finish(self) -> Box<[T]> {
        self.rows.into_boxed_slice()
    }
}

/// Next capacity after `size`: golden-ratio growth, rounded up, at least +1
fn next_capacity(size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    let grown = (size as f64 * GROWTH_FACTOR).ceil();
    if grown >= usize::MAX as f64 {
        usize::MAX
    } else {
        (grown as usize).max(size.saturating_add(1))
    }
}

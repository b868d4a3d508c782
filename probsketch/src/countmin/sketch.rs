// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::f64::consts::E;
use std::hash::Hash;

use crate::common::pow2_table_size;
use crate::error::Error;
use crate::hash::hash_item;

/// Largest number of counters per row.
///
/// A single row of this width fits the table; wider rows with more than one row may not, see
/// [`CountMinSketch::new`].
pub const MAX_WIDTH: u64 = 1 << 29;
/// Largest number of rows.
pub const MAX_DEPTH: u32 = 31;

const MAX_TABLE_ENTRIES: usize = 1 << 30;

/// Count-Min sketch for estimating item frequencies.
///
/// A `depth x width` table of saturating counters; row `i` hashes keys with seed `i`. The
/// estimate of a key is the minimum of its counters, which never underestimates its true
/// frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMinSketch {
    width: usize,
    depth: u32,
    mask: usize,
    total: u64,
    counts: Box<[u32]>,
}

impl CountMinSketch {
    /// Creates a sketch with `depth` rows of `width` counters, `width` rounded up to a power of
    /// two.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not in `[1, MAX_WIDTH]`, `depth` is not in
    /// `[1, MAX_DEPTH]`, or the table would hold `2^30` counters or more.
    pub fn new(width: u64, depth: u32) -> Result<Self, Error> {
        let width = pow2_table_size("width", width, MAX_WIDTH)?;
        if !(1..=MAX_DEPTH).contains(&depth) {
            return Err(Error::out_of_range("depth", 1, MAX_DEPTH, depth));
        }
        let entries = width * depth as usize;
        if entries >= MAX_TABLE_ENTRIES {
            return Err(
                Error::invalid_config(format!("width * depth must be < {MAX_TABLE_ENTRIES}"))
                    .with_context("width", width)
                    .with_context("depth", depth),
            );
        }
        log::debug!("count-min sketch: {depth} rows of {width} counters");

        Ok(CountMinSketch {
            width,
            depth,
            mask: width - 1,
            total: 0,
            counts: vec![0u32; entries].into_boxed_slice(),
        })
    }

    /// Creates a sketch whose estimates exceed the true frequency by at most
    /// `relative_error * count()` with probability `confidence`.
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is not in (0, 1) or the derived table is too large.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::countmin::CountMinSketch;
    /// let sketch = CountMinSketch::with_accuracy(0.01, 0.99).unwrap();
    /// assert_eq!(sketch.width(), 512);
    /// assert_eq!(sketch.depth(), 5);
    /// ```
    pub fn with_accuracy(relative_error: f64, confidence: f64) -> Result<Self, Error> {
        let width = Self::suggest_width(relative_error)?;
        let depth = Self::suggest_depth(confidence)?;
        Self::new(width, depth)
    }

    /// Suggests the row width for a relative error: `ceil(e / relative_error)`.
    ///
    /// The result is not rounded to a power of two. Any returned width is accepted by
    /// [`CountMinSketch::new`] with one row; more rows must keep `width * depth` below `2^30`.
    ///
    /// # Errors
    ///
    /// Returns an error if `relative_error` is not in (0, 1) or the width exceeds [`MAX_WIDTH`].
    pub fn suggest_width(relative_error: f64) -> Result<u64, Error> {
        if !(relative_error > 0.0 && relative_error < 1.0) {
            return Err(Error::invalid_config(format!(
                "relative_error must be in (0, 1), got {relative_error}"
            )));
        }
        let width = (E / relative_error).ceil();
        if width > MAX_WIDTH as f64 {
            return Err(Error::invalid_config("relative_error is too small")
                .with_context("relative_error", relative_error)
                .with_context("width", width));
        }
        Ok(width as u64)
    }

    /// Suggests the number of rows for a confidence: `ceil(ln(1 / (1 - confidence)))`.
    ///
    /// # Errors
    ///
    /// Returns an error if `confidence` is not in (0, 1) or needs more than [`MAX_DEPTH`] rows.
    pub fn suggest_depth(confidence: f64) -> Result<u32, Error> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(Error::invalid_config(format!(
                "confidence must be in (0, 1), got {confidence}"
            )));
        }
        let depth = (1.0 / (1.0 - confidence)).ln().ceil();
        if depth > f64::from(MAX_DEPTH) {
            return Err(Error::invalid_config("confidence is too close to 1")
                .with_context("confidence", confidence)
                .with_context("depth", depth));
        }
        Ok((depth as u32).max(1))
    }

    /// Returns the number of counters per row (always a power of two).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the total amount added, saturating at `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.total
    }

    /// Returns true if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns the relative error (epsilon) implied by the width.
    pub fn relative_error(&self) -> f64 {
        E / self.width as f64
    }

    /// Adds a single occurrence of `item`.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        self.update_rows(1, |row| hash_item(item, row));
    }

    /// Adds `amount` occurrences of `item`. Counters saturate at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is 0.
    pub fn add_amount<T: Hash + ?Sized>(&mut self, item: &T, amount: u32) -> Result<(), Error> {
        if amount == 0 {
            return Err(Error::invalid_argument("amount must be positive"));
        }
        self.update_rows(amount, |row| hash_item(item, row));
        Ok(())
    }

    /// Returns the estimated frequency of `item`.
    pub fn point_query<T: Hash + ?Sized>(&self, item: &T) -> u32 {
        self.min_over_rows(|row| hash_item(item, row))
    }

    /// Returns whether `item` was possibly added.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.point_query(item) > 0
    }

    /// Estimates the inner product of the frequency vectors of two sketches.
    ///
    /// Each row yields an upper bound on the inner product; the smallest one is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the sketches differ in width or depth.
    pub fn inner_product(&self, other: &CountMinSketch) -> Result<u64, Error> {
        if self.width != other.width || self.depth != other.depth {
            return Err(Error::invalid_argument("sketches must have the same shape")
                .with_context("width", format!("{} vs {}", self.width, other.width))
                .with_context("depth", format!("{} vs {}", self.depth, other.depth)));
        }
        let product = self
            .counts
            .chunks_exact(self.width)
            .zip(other.counts.chunks_exact(other.width))
            .map(|(lhs, rhs)| {
                lhs.iter()
                    .zip(rhs)
                    .map(|(&a, &b)| u64::from(a) * u64::from(b))
                    .fold(0u64, u64::saturating_add)
            })
            .min()
            .unwrap_or(0);
        Ok(product)
    }

    /// Resets every counter and the total.
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total = 0;
    }

    /// Adds `amount` to one counter per row, `bucket_hash(row)` selecting the counter.
    pub(super) fn update_rows(&mut self, amount: u32, bucket_hash: impl Fn(u32) -> u32) {
        self.total = self.total.saturating_add(u64::from(amount));
        for row in 0..self.depth {
            let index = self.index(row, bucket_hash(row));
            let counter = &mut self.counts[index];
            *counter = counter.saturating_add(amount);
        }
    }

    /// Returns the smallest counter across rows, `bucket_hash(row)` selecting the counter.
    pub(super) fn min_over_rows(&self, bucket_hash: impl Fn(u32) -> u32) -> u32 {
        (0..self.depth)
            .map(|row| self.counts[self.index(row, bucket_hash(row))])
            .min()
            .unwrap_or(0)
    }

    #[inline]
    fn index(&self, row: u32, hash: u32) -> usize {
        row as usize * self.width + (hash as usize & self.mask)
    }
}

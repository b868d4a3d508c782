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

use super::CountMinSketch;
use crate::error::Error;
use crate::hash::murmurhash3_32_u64;

/// Count-Min sketch over an inclusive integer domain that also answers interval queries.
///
/// Values are stored as unsigned offsets from the lower bound of the domain. Level `h` is a
/// Count-Min sketch over `offset >> h`, so each of its counters covers an aligned block of
/// `2^h` values, and any interval decomposes into at most two blocks per level.
///
/// # Examples
///
/// ```
/// # use probsketch::countmin::RangeCountMinSketch;
/// let mut sketch = RangeCountMinSketch::new(1024, 4, -100, 100).unwrap();
/// sketch.add(-5).unwrap();
/// sketch.add(7).unwrap();
/// sketch.add_amount(42, 3).unwrap();
///
/// assert!(sketch.range_count(-10, 10).unwrap() >= 2);
/// assert_eq!(sketch.range_count(-100, 100).unwrap(), sketch.count());
/// assert_eq!(sketch.count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct RangeCountMinSketch {
    min: i64,
    max: i64,
    /// Smallest `2^height - 1` that is at least `max - min`.
    unsigned_range: u64,
    levels: Vec<CountMinSketch>,
}

impl RangeCountMinSketch {
    /// Creates a sketch over `[min, max]` with `depth` rows of `width` counters per level.
    ///
    /// # Errors
    ///
    /// Returns an error if `min >= max` or the per-level shape is invalid for
    /// [`CountMinSketch::new`].
    pub fn new(width: u64, depth: u32, min: i64, max: i64) -> Result<Self, Error> {
        if min >= max {
            return Err(Error::invalid_config("min must be less than max")
                .with_context("min", min)
                .with_context("max", max));
        }
        let range = max.wrapping_sub(min) as u64;
        let mut unsigned_range = 1u64;
        let mut height = 1usize;
        while unsigned_range < range {
            unsigned_range = (unsigned_range << 1) | 1;
            height += 1;
        }

        let level = CountMinSketch::new(width, depth)?;
        log::debug!("range count-min sketch: [{min}, {max}] over {height} levels");
        Ok(RangeCountMinSketch {
            min,
            max,
            unsigned_range,
            levels: vec![level; height],
        })
    }

    /// Creates a sketch over `[min, max]` sized like [`CountMinSketch::with_accuracy`].
    ///
    /// # Errors
    ///
    /// Returns an error if the accuracy parameters or the domain are invalid.
    pub fn with_accuracy(
        relative_error: f64,
        confidence: f64,
        min: i64,
        max: i64,
    ) -> Result<Self, Error> {
        let width = CountMinSketch::suggest_width(relative_error)?;
        let depth = CountMinSketch::suggest_depth(confidence)?;
        Self::new(width, depth, min, max)
    }

    /// Adds a single occurrence of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is outside `[min, max]`.
    pub fn add(&mut self, value: i64) -> Result<(), Error> {
        self.add_amount(value, 1)
    }

    /// Adds `amount` occurrences of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is outside `[min, max]` or `amount` is 0.
    pub fn add_amount(&mut self, value: i64, amount: u32) -> Result<(), Error> {
        if amount == 0 {
            return Err(Error::invalid_argument("amount must be positive"));
        }
        let offset = self.offset(value).ok_or_else(|| {
            Error::invalid_argument("value is outside the accepted domain")
                .with_context("value", value)
                .with_context("min", self.min)
                .with_context("max", self.max)
        })?;
        for (height, level) in self.levels.iter_mut().enumerate() {
            let block = offset >> height;
            level.update_rows(amount, |row| murmurhash3_32_u64(block, row));
        }
        Ok(())
    }

    /// Returns the estimated frequency of `value`, 0 outside the domain.
    ///
    /// Every level bounds the frequency from above; the smallest bound is returned.
    pub fn point_query(&self, value: i64) -> u32 {
        let Some(offset) = self.offset(value) else {
            return 0;
        };
        self.levels
            .iter()
            .enumerate()
            .map(|(height, level)| {
                let block = offset >> height;
                level.min_over_rows(|row| murmurhash3_32_u64(block, row))
            })
            .min()
            .unwrap_or(0)
    }

    /// Returns whether `value` was possibly added.
    pub fn contains(&self, value: i64) -> bool {
        self.point_query(value) > 0
    }

    /// Estimates the total frequency of the values in `[left, right]`.
    ///
    /// The interval is clamped to the domain; an interval disjoint from the domain counts 0.
    ///
    /// # Errors
    ///
    /// Returns an error if `left > right`.
    pub fn range_count(&self, left: i64, right: i64) -> Result<u64, Error> {
        if left > right {
            return Err(Error::invalid_argument("left must not exceed right")
                .with_context("left", left)
                .with_context("right", right));
        }
        if right < self.min || left > self.max {
            return Ok(0);
        }
        if left <= self.min && right >= self.max {
            return Ok(self.count());
        }

        let lo = left.max(self.min).wrapping_sub(self.min) as u64;
        let hi = right.min(self.max).wrapping_sub(self.min) as u64;
        Ok(self.count_within(lo, hi, 0, self.unsigned_range, self.levels.len()))
    }

    /// Returns the total amount added, saturating at `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.levels.first().map_or(0, CountMinSketch::count)
    }

    /// Returns the number of levels.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Returns the smallest accepted value.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Returns the largest accepted value.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Returns the number of counters per row of each level.
    pub fn width(&self) -> usize {
        self.levels.first().map_or(0, CountMinSketch::width)
    }

    /// Returns the number of rows of each level.
    pub fn depth(&self) -> u32 {
        self.levels.first().map_or(0, CountMinSketch::depth)
    }

    /// Resets every level.
    pub fn clear(&mut self) {
        self.levels.iter_mut().for_each(CountMinSketch::clear);
    }

    fn offset(&self, value: i64) -> Option<u64> {
        (self.min..=self.max)
            .contains(&value)
            .then(|| value.wrapping_sub(self.min) as u64)
    }

    /// Sums the estimates of the blocks that decompose `[lo, hi]` within the node covering
    /// `[left, right]` at `height`.
    ///
    /// The root is never covered entirely, so a covered node is always below the top level.
    fn count_within(&self, lo: u64, hi: u64, left: u64, right: u64, height: usize) -> u64 {
        if hi < left || right < lo {
            return 0;
        }
        if lo <= left && right <= hi {
            let block = left >> height;
            let estimate =
                self.levels[height].min_over_rows(|row| murmurhash3_32_u64(block, row));
            return u64::from(estimate);
        }
        let mid = left + (right - left) / 2;
        self.count_within(lo, hi, left, mid, height - 1)
            .saturating_add(self.count_within(lo, hi, mid + 1, right, height - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_height() {
        let cases = [
            (0, 1, 1),
            (0, 2, 2),
            (0, 3, 2),
            (0, 4, 3),
            (-8, 7, 4),
            (0, 1 << 20, 21),
            (i64::MIN, i64::MAX, 64),
        ];
        for (min, max, height) in cases {
            let sketch = RangeCountMinSketch::new(4, 1, min, max).unwrap();
            assert_eq!(sketch.height(), height, "[{min}, {max}]");
        }
    }

    #[test]
    fn test_exact_when_wide() {
        let mut sketch = RangeCountMinSketch::new(1 << 12, 3, 0, 63).unwrap();
        for v in 0..64 {
            sketch.add_amount(v, (v + 1) as u32).unwrap();
        }
        // With far more counters than values, estimates are almost surely exact.
        for left in 0..64i64 {
            for right in left..64 {
                let expected: u64 = (left..=right).map(|v| (v + 1) as u64).sum();
                assert_eq!(sketch.range_count(left, right).unwrap(), expected);
            }
        }
        assert_eq!(sketch.point_query(10), 11);
    }

    #[test]
    fn test_full_domain() {
        let mut sketch = RangeCountMinSketch::new(64, 2, i64::MIN, i64::MAX).unwrap();
        sketch.add(i64::MIN).unwrap();
        sketch.add(-1).unwrap();
        sketch.add(0).unwrap();
        sketch.add(i64::MAX).unwrap();

        assert_eq!(sketch.range_count(i64::MIN, i64::MAX).unwrap(), 4);
        assert!(sketch.range_count(i64::MIN, -1).unwrap() >= 2);
        assert!(sketch.range_count(0, i64::MAX).unwrap() >= 2);
        assert!(sketch.contains(i64::MAX));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(RangeCountMinSketch::new(16, 2, 5, 5).is_err());
        assert!(RangeCountMinSketch::new(16, 2, 6, 5).is_err());
        assert!(RangeCountMinSketch::new(0, 2, 0, 5).is_err());

        let mut sketch = RangeCountMinSketch::new(16, 2, 0, 100).unwrap();
        assert_eq!(sketch.add(101).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(sketch.add(-1).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(sketch.add_amount(3, 0).is_err());
        assert!(sketch.range_count(5, 4).is_err());
        assert_eq!(sketch.count(), 0);
        assert_eq!(sketch.range_count(-1000, 1000).unwrap(), 0);
    }
}

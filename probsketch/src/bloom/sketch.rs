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

use std::hash::Hash;

use crate::common::BitArray;
use crate::hash::hash_item;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Use [`super::BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Seed of the first probe; probe `i` uses `seed + i`
    pub(super) seed: u32,
    /// Number of probes per key (k)
    pub(super) num_hashes: u16,
    /// Bit count minus one; the bit count is a power of two
    pub(super) mask: usize,
    /// Count of bits set to 1 (for statistics)
    pub(super) num_bits_set: u64,
    pub(super) bits: BitArray,
}

impl BloomFilter {
    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// filter.add("apple");
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(!filter.contains("grape"));
    /// ```
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }
        (0..self.num_hashes).all(|i| self.bits.get(self.bit_index(item, i)))
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        for i in 0..self.num_hashes {
            let index = self.bit_index(item, i);
            self.set_bit(index);
        }
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// assert!(!filter.contains_and_add(&42_u64));
    /// assert!(filter.contains_and_add(&42_u64));
    /// ```
    pub fn contains_and_add<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let mut was_present = true;
        for i in 0..self.num_hashes {
            let index = self.bit_index(item, i);
            was_present &= !self.set_bit(index);
        }
        was_present
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits while preserving capacity and configuration.
    pub fn clear(&mut self) {
        self.bits.clear_all();
        self.num_bits_set = 0;
    }

    /// Returns whether the filter is empty (no items inserted).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter (always a power of two).
    pub fn capacity(&self) -> u64 {
        self.bits.len() as u64
    }

    /// Returns the number of probes per key.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the seed of the first probe.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the current load factor (fraction of bits set).
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.capacity() as f64
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    #[inline]
    fn bit_index<T: Hash + ?Sized>(&self, item: &T, probe: u16) -> usize {
        hash_item(item, self.seed.wrapping_add(u32::from(probe))) as usize & self.mask
    }

    /// Sets a single bit, returning whether it was previously clear.
    fn set_bit(&mut self, index: usize) -> bool {
        let newly_set = self.bits.set(index);
        if newly_set {
            self.num_bits_set += 1;
        }
        newly_set
    }
}

#[cfg(test)]
mod tests {
    use crate::bloom::BloomFilterBuilder;

    #[test]
    fn test_builder_with_accuracy() {
        let filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
        assert_eq!(filter.num_hashes(), 7);
        // round(1000 * 7 / ln 2) = 10099, rounded up to 2^14
        assert_eq!(filter.capacity(), 16384);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_builder_with_size() {
        let filter = BloomFilterBuilder::with_size(1000, 5).seed(7).build().unwrap();
        assert_eq!(filter.capacity(), 1024);
        assert_eq!(filter.num_hashes(), 5);
        assert_eq!(filter.seed(), 7);
    }

    #[test]
    fn test_add_and_contains() {
        let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();

        assert!(!filter.contains("apple"));
        filter.add("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
        filter.add("test");
        assert!(!filter.is_empty());

        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.bits_used(), 0);
        assert!(!filter.contains("test"));
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilterBuilder::with_size(1024, 5).build().unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);

        filter.add("test");
        assert!(filter.bits_used() >= 1);
        assert!(filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
        assert!(filter.estimated_fpp() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_bits() {
        let mut f1 = BloomFilterBuilder::with_size(4096, 4).seed(3).build().unwrap();
        let mut f2 = BloomFilterBuilder::with_size(4096, 4).seed(3).build().unwrap();
        for i in 0..100u64 {
            f1.add(&i);
            f2.add(&i);
        }
        assert_eq!(f1, f2);
    }
}

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

use super::MAX_NUM_BITS;
use super::MAX_NUM_HASHES;
use crate::common::BitArray;
use crate::common::pow2_table_size;
use crate::error::Error;
use crate::hash::hash_item;

/// A Bloom filter with saturating counters in place of bits.
///
/// Every key probes `k` counters; its count is the minimum of those counters, which may
/// overestimate but never underestimates how many times the key was added.
///
/// # Examples
///
/// ```
/// # use probsketch::bloom::CountingBloomFilter;
/// let mut filter = CountingBloomFilter::new(1024, 3).unwrap();
/// filter.add("apple");
/// filter.add("apple");
///
/// assert!(filter.contains("apple"));
/// assert!(filter.count("apple") >= 2);
/// assert!(filter.contains_at_least("apple", 2).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CountingBloomFilter {
    counters: Box<[u32]>,
    mask: usize,
    num_hashes: u16,
    /// Scratch marks for the counters touched by the current `add`/`remove` call.
    touched: BitArray,
    /// Scratch list of the probed counters, so `touched` can be reset cheaply.
    probes: Vec<usize>,
}

impl CountingBloomFilter {
    /// Creates a filter with `size` counters (rounded up to a power of two) and `num_hashes`
    /// probes per key.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not in `[1, MAX_NUM_BITS]` or `num_hashes` is not in
    /// `[1, MAX_NUM_HASHES]`.
    pub fn new(size: u64, num_hashes: u16) -> Result<Self, Error> {
        if !(1..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::out_of_range(
                "num_hashes",
                1,
                MAX_NUM_HASHES,
                num_hashes,
            ));
        }
        let size = pow2_table_size("size", size, MAX_NUM_BITS)?;
        log::debug!("counting bloom filter: {size} counters, {num_hashes} hashes");

        Ok(CountingBloomFilter {
            counters: vec![0u32; size].into_boxed_slice(),
            mask: size - 1,
            num_hashes,
            touched: BitArray::new(size),
            probes: Vec::with_capacity(num_hashes as usize),
        })
    }

    /// Adds one occurrence of `item`.
    ///
    /// A counter probed more than once by the same key is incremented only once.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        self.collect_probes(item);
        for &index in &self.probes {
            let counter = &mut self.counters[index];
            *counter = counter.saturating_add(1);
        }
    }

    /// Removes one occurrence of `item` if its count is at least 1.
    ///
    /// Saturated counters are left untouched. Removing a key that was never added may
    /// decrement counters shared with other keys when the key is a false positive.
    pub fn remove<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        if !self.contains(item) {
            return false;
        }
        self.collect_probes(item);
        for &index in &self.probes {
            let counter = &mut self.counters[index];
            if *counter != u32::MAX {
                *counter -= 1;
            }
        }
        true
    }

    /// Tests whether `item` was possibly added.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        (0..self.num_hashes).all(|i| self.counters[self.counter_index(item, i)] > 0)
    }

    /// Tests whether `item` was possibly added at least `times` times.
    ///
    /// # Errors
    ///
    /// Returns an error if `times` is 0.
    pub fn contains_at_least<T: Hash + ?Sized>(&self, item: &T, times: u32) -> Result<bool, Error> {
        if times == 0 {
            return Err(Error::invalid_argument("times must be positive"));
        }
        Ok(self.count(item) >= times)
    }

    /// Returns the estimated number of times `item` was added.
    pub fn count<T: Hash + ?Sized>(&self, item: &T) -> u32 {
        (0..self.num_hashes)
            .map(|i| self.counters[self.counter_index(item, i)])
            .min()
            .unwrap_or(0)
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        self.counters.fill(0);
    }

    /// Returns the number of counters.
    pub fn size(&self) -> usize {
        self.counters.len()
    }

    /// Returns the number of probes per key.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Fills `probes` with the distinct counters probed by `item`.
    fn collect_probes<T: Hash + ?Sized>(&mut self, item: &T) {
        self.probes.clear();
        for i in 0..self.num_hashes {
            let index = self.counter_index(item, i);
            if self.touched.set(index) {
                self.probes.push(index);
            }
        }
        for &index in &self.probes {
            self.touched.clear(index);
        }
    }

    #[inline]
    fn counter_index<T: Hash + ?Sized>(&self, item: &T, probe: u16) -> usize {
        hash_item(item, u32::from(probe)) as usize & self.mask
    }
}

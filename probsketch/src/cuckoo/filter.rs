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

use super::bucket;
use crate::common::BitArray;
use crate::common::pow2_table_size;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::hash_item;
use crate::hash::murmurhash3_32_u64;

/// Largest number of buckets a cuckoo filter may allocate.
pub const MAX_CAPACITY: u64 = 1 << 30;

/// Default seed for the bucket index.
pub const DEFAULT_INDEX_SEED: u32 = DEFAULT_SEED;
/// Default seed for the fingerprint and the partner-bucket offset.
pub const DEFAULT_FINGERPRINT_SEED: u32 = 0x9747_b28c;

/// Each round moves one fingerprint out of each of the two candidate buckets.
const MAX_ROUNDS: usize = 20;

/// A cuckoo filter with eight 8-bit fingerprints per bucket.
///
/// Each key has two candidate buckets; the second is derived from the first and the
/// fingerprint, so a fingerprint can be moved to its partner bucket without the original key.
/// Keys whose fingerprint is zero are tracked in a side bit array indexed by their first bucket.
///
/// # Examples
///
/// ```
/// # use probsketch::cuckoo::CuckooFilter;
/// let mut filter = CuckooFilter::new(16).unwrap();
/// assert!(filter.add("test").unwrap());
/// assert!(!filter.add("test").unwrap());
/// assert_eq!(filter.size(), 1);
///
/// assert!(filter.remove("test"));
/// assert!(!filter.contains("test"));
/// assert!(filter.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CuckooFilter {
    buckets: Box<[u64]>,
    zero_fingerprints: BitArray,
    mask: usize,
    index_seed: u32,
    fingerprint_seed: u32,
    size: u64,
}

impl CuckooFilter {
    /// Creates a filter with `capacity` buckets, rounded up to a power of two.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is not in `[1, MAX_CAPACITY]`.
    pub fn new(capacity: u64) -> Result<Self, Error> {
        Self::with_seeds(capacity, DEFAULT_INDEX_SEED, DEFAULT_FINGERPRINT_SEED)
    }

    /// Creates a filter with explicit hash seeds.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is not in `[1, MAX_CAPACITY]`, or if the seeds are zero
    /// or equal to each other.
    pub fn with_seeds(
        capacity: u64,
        index_seed: u32,
        fingerprint_seed: u32,
    ) -> Result<Self, Error> {
        if index_seed == 0 || fingerprint_seed == 0 || index_seed == fingerprint_seed {
            return Err(Error::invalid_config("seeds must be nonzero and distinct")
                .with_context("index_seed", index_seed)
                .with_context("fingerprint_seed", fingerprint_seed));
        }
        let num_buckets = pow2_table_size("capacity", capacity, MAX_CAPACITY)?;
        log::debug!("cuckoo filter: {num_buckets} buckets");

        Ok(CuckooFilter {
            buckets: vec![0u64; num_buckets].into_boxed_slice(),
            zero_fingerprints: BitArray::new(num_buckets),
            mask: num_buckets - 1,
            index_seed,
            fingerprint_seed,
            size: 0,
        })
    }

    /// Tests whether `item` is possibly in the filter.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        let (index, fingerprint) = self.locate(item);
        if fingerprint == 0 {
            return self.zero_fingerprints.get(index);
        }
        bucket::contains(self.buckets[index], fingerprint)
            || bucket::contains(self.buckets[self.partner(index, fingerprint)], fingerprint)
    }

    /// Adds `item` to the filter.
    ///
    /// Returns `Ok(true)` if the item was inserted and `Ok(false)` if it was already present
    /// (possibly as a false positive). A present item does not change [`size`](Self::size).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CapacityExhausted`](crate::error::ErrorKind::CapacityExhausted) if
    /// both candidate buckets are full and the eviction walk does not find a free slot. The
    /// filter is left exactly as it was before the call.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) -> Result<bool, Error> {
        if self.contains(item) {
            return Ok(false);
        }
        let (index, fingerprint) = self.locate(item);
        if fingerprint == 0 {
            self.zero_fingerprints.set(index);
            self.size += 1;
            return Ok(true);
        }

        let partner = self.partner(index, fingerprint);
        let first = bucket::len(self.buckets[index]);
        let second = bucket::len(self.buckets[partner]);
        if first <= second && !bucket::is_full(self.buckets[index]) {
            self.buckets[index] = bucket::push(self.buckets[index], fingerprint).0;
        } else if second < first {
            self.buckets[partner] = bucket::push(self.buckets[partner], fingerprint).0;
        } else {
            self.relocate(index, fingerprint)?;
        }
        self.size += 1;
        Ok(true)
    }

    /// Removes one copy of `item`'s fingerprint, returning whether one was found.
    ///
    /// Removing a key that was never added may remove the fingerprint of a colliding key.
    pub fn remove<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let (index, fingerprint) = self.locate(item);
        if fingerprint == 0 {
            let removed = self.zero_fingerprints.clear(index);
            if removed {
                self.size -= 1;
            }
            return removed;
        }

        for candidate in [index, self.partner(index, fingerprint)] {
            if let Some(compacted) = bucket::remove(self.buckets[candidate], fingerprint) {
                self.buckets[candidate] = compacted;
                self.size -= 1;
                return true;
            }
        }
        false
    }

    /// Returns the number of stored fingerprints.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns whether no fingerprint is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets (always a power of two).
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the fraction of bucket slots in use.
    ///
    /// Zero fingerprints live outside the buckets and are not counted.
    pub fn load_factor(&self) -> f64 {
        let used: usize = self.buckets.iter().map(|&b| bucket::len(b)).sum();
        used as f64 / (self.buckets.len() * bucket::SLOTS_PER_BUCKET) as f64
    }

    /// Removes every fingerprint.
    pub fn clear(&mut self) {
        self.buckets.fill(0);
        self.zero_fingerprints.clear_all();
        self.size = 0;
    }

    #[inline]
    fn locate<T: Hash + ?Sized>(&self, item: &T) -> (usize, u8) {
        let index = hash_item(item, self.index_seed) as usize & self.mask;
        let fingerprint = hash_item(item, self.fingerprint_seed) as u8;
        (index, fingerprint)
    }

    #[inline]
    fn partner(&self, index: usize, fingerprint: u8) -> usize {
        let offset = murmurhash3_32_u64(u64::from(fingerprint), self.fingerprint_seed);
        index ^ (offset as usize & self.mask)
    }

    /// Places `fingerprint` into the full bucket `index` by walking evictions between partner
    /// buckets. On failure every touched bucket is restored.
    fn relocate(&mut self, mut index: usize, mut fingerprint: u8) -> Result<(), Error> {
        let mut undo = Vec::with_capacity(2 * MAX_ROUNDS);
        for kick in 0..2 * MAX_ROUNDS {
            undo.push((index, self.buckets[index]));
            let (packed, evicted) = bucket::push(self.buckets[index], fingerprint);
            self.buckets[index] = packed;
            if evicted == 0 {
                log::trace!("eviction walk settled after {} kicks", kick + 1);
                return Ok(());
            }
            fingerprint = evicted;
            index = self.partner(index, fingerprint);
        }

        for (index, packed) in undo.into_iter().rev() {
            self.buckets[index] = packed;
        }
        log::warn!(
            "cuckoo filter full: eviction walk gave up after {MAX_ROUNDS} rounds ({} items)",
            self.size
        );
        Err(
            Error::capacity_exhausted("eviction walk did not terminate")
                .with_context("rounds", MAX_ROUNDS)
                .with_context("buckets", self.buckets.len()),
        )
    }
}

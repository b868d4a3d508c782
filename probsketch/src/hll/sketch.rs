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
use std::sync::atomic::AtomicU8;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::hash_item;

/// Largest precision level; level `l` uses `2^(l + 4)` registers.
pub const MAX_LEVEL: u8 = 10;

/// Register index bits at level 0.
const MIN_INDEX_BITS: u32 = 4;

/// Bias-correction constant per precision level.
const ALPHA: [f64; MAX_LEVEL as usize + 1] = [
    0.673102, 0.697123, 0.709205, 0.715271, 0.718308, 0.719827, 0.720587, 0.720967, 0.721157,
    0.721252, 0.7213,
];

/// A HyperLogLog cardinality estimator with lock-free updates.
///
/// Adding takes `&self`: registers are atomics updated with a compare-and-swap max, so a
/// shared reference can be fed from many threads without losing updates.
///
/// See the [hll module level documentation](crate::hll) for more.
#[derive(Debug)]
pub struct HyperLogLog {
    level: u8,
    index_bits: u32,
    seed: u32,
    registers: Box<[AtomicU8]>,
    inserts: AtomicU64,
}

impl HyperLogLog {
    /// Create a new estimator with the default seed.
    ///
    /// # Arguments
    ///
    /// * `level` - Precision level in [0, 10]; uses `2^(level + 4)` registers.
    ///   - level=0: 16 registers, ~26% relative error
    ///   - level=6: 1024 registers, ~3.3% relative error
    ///   - level=10: 16384 registers, ~0.8% relative error
    ///
    /// # Errors
    ///
    /// If `level` is greater than [`MAX_LEVEL`].
    pub fn new(level: u8) -> Result<Self, Error> {
        Self::with_seed(level, DEFAULT_SEED)
    }

    /// Create a new estimator that hashes keys with `seed`.
    ///
    /// # Errors
    ///
    /// If `level` is greater than [`MAX_LEVEL`].
    pub fn with_seed(level: u8, seed: u32) -> Result<Self, Error> {
        if level > MAX_LEVEL {
            return Err(Error::out_of_range("level", 0, MAX_LEVEL, level));
        }
        let index_bits = u32::from(level) + MIN_INDEX_BITS;
        let num_registers = 1usize << index_bits;
        log::debug!("hyperloglog: level {level}, {num_registers} registers");

        Ok(HyperLogLog {
            level,
            index_bits,
            seed,
            registers: (0..num_registers).map(|_| AtomicU8::new(0)).collect(),
            inserts: AtomicU64::new(0),
        })
    }

    /// Get the precision level
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Get the hash seed
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Get the number of registers (`m`)
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Get the number of `add` calls, duplicates included
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Check if nothing has been added
    pub fn is_empty(&self) -> bool {
        self.inserts() == 0
    }

    /// Get the standard relative error `1.04 / sqrt(m)` of this precision level
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    /// Update the estimator with a value
    ///
    /// The top bits of the value's digest select a register; the register keeps the largest
    /// rank (1-based position of the lowest set bit of the remaining bits) seen so far.
    pub fn add<T: Hash + ?Sized>(&self, item: &T) {
        let hash = hash_item(item, self.seed);
        let value_bits = u32::BITS - self.index_bits;
        let index = (hash >> value_bits) as usize;
        let value = hash & ((1 << value_bits) - 1);
        let rank = if value == 0 {
            value_bits + 1
        } else {
            value.trailing_zeros() + 1
        } as u8;

        self.inserts.fetch_add(1, Ordering::Relaxed);
        let register = &self.registers[index];
        let mut current = register.load(Ordering::Relaxed);
        while rank > current {
            match register.compare_exchange_weak(
                current,
                rank,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Get the current cardinality estimate
    ///
    /// Uses linear counting while `2 * inserts <= 5 * m` and some register is still zero,
    /// and the harmonic-mean estimator otherwise. Concurrent adds may or may not be observed.
    pub fn estimate(&self) -> f64 {
        let m = self.registers.len();
        let mut zeros = 0usize;
        let mut sum = 0.0;
        for register in self.registers.iter() {
            let rank = register.load(Ordering::Relaxed);
            if rank == 0 {
                zeros += 1;
            }
            sum += 1.0 / (1u64 << rank) as f64;
        }

        let m_f64 = m as f64;
        if self.inserts().saturating_mul(2) <= 5 * m as u64 && zeros > 0 {
            m_f64 * (m_f64 / zeros as f64).ln()
        } else {
            ALPHA[self.level as usize] * m_f64 * m_f64 / sum
        }
    }

    /// Reset every register and the insert counter
    pub fn clear(&mut self) {
        for register in self.registers.iter_mut() {
            *register.get_mut() = 0;
        }
        *self.inserts.get_mut() = 0;
    }

    #[cfg(test)]
    fn snapshot(&self) -> Vec<u8> {
        self.registers
            .iter()
            .map(|r| r.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        let hll = HyperLogLog::new(6).unwrap();
        assert!(hll.is_empty());
        assert_eq!(hll.estimate(), 0.0);

        hll.add("apple");
        hll.add("apple");
        assert_eq!(hll.inserts(), 2);
        let m = hll.num_registers() as f64;
        let expected = m * (m / (m - 1.0)).ln();
        assert!((hll.estimate() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rank_bounded_by_value_bits() {
        let hll = HyperLogLog::new(MAX_LEVEL).unwrap();
        for i in 0..10_000u64 {
            hll.add(&i);
        }
        let value_bits = u32::BITS - hll.index_bits;
        assert!(hll.snapshot().iter().all(|&r| u32::from(r) <= value_bits + 1));
    }

    #[test]
    fn test_all_zero_value_bits_rank() {
        let hll = HyperLogLog::new(MAX_LEVEL).unwrap();
        let value_bits = u32::BITS - hll.index_bits;
        let value_mask = (1u32 << value_bits) - 1;
        let key = (0u64..)
            .find(|k| hash_item(k, hll.seed) & value_mask == 0)
            .unwrap();

        hll.add(&key);
        let index = (hash_item(&key, hll.seed) >> value_bits) as usize;
        assert_eq!(u32::from(hll.snapshot()[index]), value_bits + 1);
        assert_eq!(hll.snapshot().iter().filter(|&&r| r != 0).count(), 1);
    }

    #[test]
    fn test_registers_only_grow() {
        let hll = HyperLogLog::new(2).unwrap();
        let mut previous = hll.snapshot();
        for i in 0..2000u32 {
            hll.add(&i);
            let current = hll.snapshot();
            assert!(current.iter().zip(&previous).all(|(c, p)| c >= p));
            previous = current;
        }
    }

    #[test]
    fn test_concurrent_adds_match_sequential() {
        let shared = HyperLogLog::new(8).unwrap();
        let sequential = HyperLogLog::new(8).unwrap();
        for i in 0..40_000u64 {
            sequential.add(&i);
        }

        std::thread::scope(|s| {
            for t in 0..4u64 {
                let hll = &shared;
                s.spawn(move || {
                    for i in (t * 10_000)..((t + 1) * 10_000) {
                        hll.add(&i);
                    }
                });
            }
        });

        assert_eq!(shared.inserts(), 40_000);
        assert_eq!(shared.snapshot(), sequential.snapshot());
        assert_eq!(shared.estimate(), sequential.estimate());
    }

    #[test]
    fn test_clear_and_config() {
        let mut hll = HyperLogLog::with_seed(0, 42).unwrap();
        assert_eq!(hll.num_registers(), 16);
        assert_eq!(hll.seed(), 42);
        assert!((hll.relative_error() - 0.26).abs() < 1e-12);
        hll.add("x");
        hll.clear();
        assert!(hll.is_empty());
        assert!(hll.snapshot().iter().all(|&r| r == 0));

        assert!(HyperLogLog::new(MAX_LEVEL + 1).is_err());
        assert_eq!(HyperLogLog::new(MAX_LEVEL).unwrap().num_registers(), 16384);
    }
}

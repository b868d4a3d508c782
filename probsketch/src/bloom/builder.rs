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

use std::f64::consts::LN_2;

use super::BloomFilter;
use crate::common::BitArray;
use crate::common::pow2_table_size;
use crate::error::Error;

/// Largest bit array a Bloom filter may allocate.
pub const MAX_NUM_BITS: u64 = 1 << 30;
/// Largest number of probes per key.
pub const MAX_NUM_HASHES: u16 = 32;

#[derive(Debug, Clone, Copy)]
enum Sizing {
    Accuracy { capacity: u64, error_rate: f64 },
    Size { num_bits: u64, num_hashes: u16 },
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify requested bit count and hash functions (manual)
///
/// Parameters are validated by [`build()`](Self::build).
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    sizing: Sizing,
    seed: u32,
}

impl BloomFilterBuilder {
    /// Creates a builder sized for `capacity` distinct items at the target `error_rate`.
    ///
    /// Uses `k = round(-ln(error_rate) / ln 2)` probes and `m = round(capacity * k / ln 2)`
    /// bits, with `m` rounded up to a power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(1000, 0.1).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 3);
    /// assert_eq!(filter.capacity(), 8192);
    /// ```
    pub fn with_accuracy(capacity: u64, error_rate: f64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Accuracy {
                capacity,
                error_rate,
            },
            seed: 0,
        }
    }

    /// Creates a builder with manual size specification.
    ///
    /// The bit count is rounded up to the next power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7).build().unwrap();
    /// assert_eq!(filter.capacity(), 16384);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u16) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Size {
                num_bits,
                num_hashes,
            },
            seed: 0,
        }
    }

    /// Sets the seed of the first probe (default: 0).
    ///
    /// Probe `i` hashes with `seed + i`.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfig`](crate::error::ErrorKind::InvalidConfig) if:
    /// - `capacity` is 0 or `error_rate` is not in (0, 1)
    /// - the error rate needs more than [`MAX_NUM_HASHES`] probes
    /// - the bit array would exceed [`MAX_NUM_BITS`]
    pub fn build(self) -> Result<BloomFilter, Error> {
        let (num_bits, num_hashes) = match self.sizing {
            Sizing::Accuracy {
                capacity,
                error_rate,
            } => {
                if capacity == 0 {
                    return Err(Error::invalid_config("capacity must be positive"));
                }
                let num_hashes = Self::suggest_num_hashes(error_rate)?;
                let num_bits = Self::suggest_num_bits(capacity, num_hashes);
                if num_bits > MAX_NUM_BITS {
                    return Err(Error::invalid_config("impossible to satisfy the error rate")
                        .with_context("capacity", capacity)
                        .with_context("error_rate", error_rate)
                        .with_context("num_bits", num_bits));
                }
                (num_bits.max(1), num_hashes)
            }
            Sizing::Size {
                num_bits,
                num_hashes,
            } => {
                if !(1..=MAX_NUM_HASHES).contains(&num_hashes) {
                    return Err(Error::out_of_range(
                        "num_hashes",
                        1,
                        MAX_NUM_HASHES,
                        num_hashes,
                    ));
                }
                (num_bits, num_hashes)
            }
        };

        let size = pow2_table_size("num_bits", num_bits, MAX_NUM_BITS)?;
        log::debug!("bloom filter: {size} bits, {num_hashes} hashes, seed {}", self.seed);

        Ok(BloomFilter {
            seed: self.seed,
            num_hashes,
            mask: size - 1,
            num_bits_set: 0,
            bits: BitArray::new(size),
        })
    }

    /// Suggests the number of probes for a target error rate.
    ///
    /// Formula: `k = round(-ln(p) / ln 2)`, at least 1.
    ///
    /// # Errors
    ///
    /// Returns an error if `error_rate` is not in (0, 1) or more than [`MAX_NUM_HASHES`] probes
    /// would be needed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probsketch::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.01).unwrap(), 7);
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.9).unwrap(), 1);
    /// ```
    pub fn suggest_num_hashes(error_rate: f64) -> Result<u16, Error> {
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(Error::invalid_config(format!(
                "error_rate must be in (0, 1), got {error_rate}"
            )));
        }
        let k = (-error_rate.ln() / LN_2).round();
        if k > f64::from(MAX_NUM_HASHES) {
            return Err(Error::invalid_config("too many hash functions needed")
                .with_context("error_rate", error_rate)
                .with_context("num_hashes", k));
        }
        Ok((k as u16).max(1))
    }

    /// Suggests the number of bits for `capacity` items probed `num_hashes` times.
    ///
    /// Formula: `m = round(n * k / ln 2)`. The result is not rounded to a power of two.
    pub fn suggest_num_bits(capacity: u64, num_hashes: u16) -> u64 {
        (capacity as f64 * f64::from(num_hashes) / LN_2).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_suggestions() {
        assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.1).unwrap(), 3);
        assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.5).unwrap(), 1);
        assert_eq!(BloomFilterBuilder::suggest_num_bits(1000, 3), 4328);
        assert!(BloomFilterBuilder::suggest_num_hashes(1e-12).is_err());
    }

    #[test]
    fn test_suggest_num_hashes_rejects_bad_rates() {
        for error_rate in [0.0, 1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
            let err = BloomFilterBuilder::suggest_num_hashes(error_rate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        }
        assert_eq!(BloomFilterBuilder::suggest_num_hashes(0.99).unwrap(), 1);
    }

    #[test]
    fn test_invalid_accuracy() {
        let err = BloomFilterBuilder::with_accuracy(0, 0.01).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        for error_rate in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let err = BloomFilterBuilder::with_accuracy(100, error_rate)
                .build()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        }
    }

    #[test]
    fn test_too_large() {
        let err = BloomFilterBuilder::with_accuracy(1 << 30, 0.01)
            .build()
            .unwrap_err();
        assert_eq!(err.message(), "impossible to satisfy the error rate");

        assert!(BloomFilterBuilder::with_size(MAX_NUM_BITS + 1, 3).build().is_err());
        assert!(BloomFilterBuilder::with_size(0, 3).build().is_err());
        assert!(BloomFilterBuilder::with_size(64, 0).build().is_err());
        assert!(BloomFilterBuilder::with_size(64, MAX_NUM_HASHES + 1).build().is_err());
    }
}

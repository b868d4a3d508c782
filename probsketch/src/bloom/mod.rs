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

//! Bloom filters for probabilistic set and multiset membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Bounded false positives**: `(1 - e^(-kn/m))^k` after `n` insertions
//! - **Fixed size**: the bit array is a power of two and never resizes
//!
//! # Usage
//!
//! ```rust
//! use probsketch::bloom::BloomFilterBuilder;
//!
//! // Create a filter for 1000 items with 1% false positive rate
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
//!
//! filter.add("apple");
//! filter.add(&42_u64);
//!
//! assert!(filter.contains("apple"));
//! assert!(filter.contains(&42_u64));
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//! ```
//!
//! # Counting variant
//!
//! [`CountingBloomFilter`] replaces bits with saturating counters, so it can report a lower
//! bound on how many times a key was added and supports removal.
//!
//! # Implementation Details
//!
//! - Probe `i` digests the key with 32-bit MurmurHash3 seeded with `seed + i`
//! - Indices are masked into the power-of-two table instead of reduced modulo its size
//! - Bits packed in `u64` words

mod builder;
mod counting;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MAX_NUM_HASHES;
pub use self::counting::CountingBloomFilter;
pub use self::sketch::BloomFilter;

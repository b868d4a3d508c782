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

//! HyperLogLog estimator for cardinality estimation.
//!
//! # Overview
//!
//! Each key is hashed once to 32 bits. The top `b = level + 4` bits select one of `m = 2^b`
//! registers; the register records the largest *rank* observed, where the rank is the 1-based
//! position of the lowest set bit in the remaining `32 - b` bits. The cardinality estimate is a
//! function of the register array alone:
//!
//! - **Linear counting** `m * ln(m / zeros)` while few keys were added (`2 * inserts <= 5 * m`)
//!   and at least one register is still zero
//! - **Harmonic mean** `alpha(m) * m^2 / sum(2^-register)` otherwise, with `alpha` tabulated
//!   per precision level
//!
//! The standard relative error is about `1.04 / sqrt(m)`.
//!
//! # Concurrency
//!
//! [`HyperLogLog::add`] takes `&self` and is safe to call from many threads at once. Register
//! updates are an atomic max, so no observed rank is ever lost. An estimate taken while adds
//! are in flight sees some point-in-time mix of the registers.
//!
//! # Usage
//!
//! ```rust
//! # use probsketch::hll::HyperLogLog;
//! let hll = HyperLogLog::new(10).unwrap();
//! for i in 0..10_000u64 {
//!     hll.add(&i);
//! }
//! let estimate = hll.estimate();
//! assert!((estimate - 10_000.0).abs() < 10_000.0 * 3.0 * hll.relative_error());
//! ```
//!
//! Sharing between threads:
//!
//! ```rust
//! # use probsketch::hll::HyperLogLog;
//! let hll = HyperLogLog::new(8).unwrap();
//! std::thread::scope(|s| {
//!     s.spawn(|| hll.add("apple"));
//!     s.spawn(|| hll.add("banana"));
//! });
//! assert_eq!(hll.inserts(), 2);
//! ```

mod sketch;

pub use self::sketch::HyperLogLog;
pub use self::sketch::MAX_LEVEL;

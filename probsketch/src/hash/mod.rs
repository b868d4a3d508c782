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

//! MurmurHash3 digests shared by every filter and sketch.
//!
//! All functions are pure: the same input and seed always produce the same digest, so
//! structures built with equal seeds agree on where a key lands.
//!
//! ```rust
//! # use probsketch::hash::murmurhash3_32;
//! # use probsketch::hash::murmurhash3_128;
//! let a = murmurhash3_32(b"apple", 0);
//! let b = murmurhash3_32(b"apple", 1);
//! assert_ne!(a, b);
//!
//! let (h1, h2) = murmurhash3_128(b"apple", 0, 5, 0);
//! assert_ne!(h1, h2);
//! ```

use std::hash::Hash;

mod murmurhash;

pub use self::murmurhash::MurmurHash3X86_32;
pub use self::murmurhash::murmurhash3_32;
pub use self::murmurhash::murmurhash3_32_u64;
pub use self::murmurhash::murmurhash3_128;

/// Default seed for structures that hash every key with a single seed.
///
/// 104729 is the 10000th prime. Any fixed value works, as long as structures that must agree on
/// key placement use the same one.
pub const DEFAULT_SEED: u32 = 104729;

/// Digests a hashable item with the streaming 32-bit hasher.
#[inline]
pub(crate) fn hash_item<T: Hash + ?Sized>(item: &T, seed: u32) -> u32 {
    let mut hasher = MurmurHash3X86_32::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish32()
}

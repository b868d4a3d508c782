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

//! Cuckoo filter: set membership with deletion.
//!
//! Keys are reduced to 8-bit fingerprints stored in one of two candidate buckets. Buckets hold
//! up to eight fingerprints packed into a `u64`. When both candidates are full, a fingerprint
//! is evicted to its partner bucket, and so on, for a bounded number of rounds. A walk that
//! does not find room is undone and reported as
//! [`ErrorKind::CapacityExhausted`](crate::error::ErrorKind::CapacityExhausted).

mod bucket;
mod filter;

pub use self::filter::CuckooFilter;
pub use self::filter::DEFAULT_FINGERPRINT_SEED;
pub use self::filter::DEFAULT_INDEX_SEED;
pub use self::filter::MAX_CAPACITY;

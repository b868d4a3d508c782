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

//! # Probabilistic filters and sketches
//!
//! Fixed-size structures that answer membership, frequency and cardinality questions about a
//! stream of keys approximately, using far less memory than an exact set or map.
//!
//! | Module | Structure | Question |
//! |---|---|---|
//! | [`bloom`] | [`BloomFilter`](bloom::BloomFilter), [`CountingBloomFilter`](bloom::CountingBloomFilter) | was this key (possibly) added, how often |
//! | [`cuckoo`] | [`CuckooFilter`](cuckoo::CuckooFilter) | membership with deletion |
//! | [`quotient`] | [`QuotientFilter`](quotient::QuotientFilter) | membership with deletion, one byte per slot |
//! | [`countmin`] | [`CountMinSketch`](countmin::CountMinSketch), [`RangeCountMinSketch`](countmin::RangeCountMinSketch) | frequency of a key or an integer interval |
//! | [`hll`] | [`HyperLogLog`](hll::HyperLogLog) | number of distinct keys |
//!
//! Every structure hashes keys with MurmurHash3 (see [`hash`]), is sized once at construction,
//! and reports invalid parameters and exhausted capacity through [`error::Error`].
//! Only [`HyperLogLog`](hll::HyperLogLog) supports concurrent updates; the others need
//! `&mut self` to change.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod countmin;
pub mod cuckoo;
pub mod error;
pub mod hash;
pub mod hll;
pub mod quotient;

mod common;

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

//! Quotient filter: compact set membership with deletion.
//!
//! A key's 32-bit digest is split into a quotient (its canonical slot) and a 5-bit remainder.
//! Remainders sharing a quotient are stored contiguously as a *run*; runs that collide are
//! pushed to the right and together form a *cluster*. Three flag bits per slot are enough to
//! find any run from its canonical slot:
//!
//! - `occupied`: some key has this slot as its quotient
//! - `continuation`: the slot continues the run of the slot before it
//! - `shifted`: the element is not in its canonical slot
//!
//! Insertion ripples the rest of the cluster one slot to the right; removal pulls it back.
//!
//! # Usage
//!
//! ```rust
//! use probsketch::quotient::QuotientFilter;
//!
//! let mut filter = QuotientFilter::new(10).unwrap();
//! assert!(filter.add("apple").unwrap());
//! assert!(filter.contains("apple"));
//!
//! assert!(filter.remove("apple"));
//! assert!(!filter.contains("apple"));
//! ```

mod filter;
mod slot;

pub use self::filter::MAX_BITS;
pub use self::filter::QuotientFilter;

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

//! Count-Min sketches for approximate frequency counting.
//!
//! [`CountMinSketch`] estimates how often each key was added; estimates may exceed the true
//! frequency but never fall below it. [`RangeCountMinSketch`] stacks one sketch per dyadic
//! level over an integer domain so that it can also estimate the total frequency of an
//! interval.
//!
//! ```rust
//! use probsketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::with_accuracy(0.001, 0.99).unwrap();
//! sketch.add("apple");
//! sketch.add_amount("apple", 4).unwrap();
//!
//! assert!(sketch.point_query("apple") >= 5);
//! assert_eq!(sketch.count(), 5);
//! ```

mod range;
mod sketch;

pub use self::range::RangeCountMinSketch;
pub use self::sketch::CountMinSketch;
pub use self::sketch::MAX_DEPTH;
pub use self::sketch::MAX_WIDTH;

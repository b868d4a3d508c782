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

//! Helpers shared by the filter and sketch families.

mod bit_array;

pub(crate) use self::bit_array::BitArray;
use crate::error::Error;

/// Rounds `requested` up to a power of two and checks it against `[1, max]`.
///
/// `max` must itself be a power of two so that a valid request never rounds past it.
pub(crate) fn pow2_table_size(
    name: &'static str,
    requested: u64,
    max: u64,
) -> Result<usize, Error> {
    if requested == 0 || requested > max {
        return Err(Error::out_of_range(name, 1, max, requested));
    }
    Ok(requested.next_power_of_two() as usize)
}

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

//! Slot byte layout.
//!
//! ```text
//!   bit  7        6             5          4..0
//!      shifted  continuation  occupied   remainder
//! ```
//!
//! `occupied` describes the slot as a canonical home (some stored key has this quotient);
//! the other bits describe the element stored in the slot. A slot is empty iff its three
//! flag bits are all clear.

pub(super) const REMAINDER_BITS: u32 = 5;
pub(super) const REMAINDER_MASK: u8 = (1 << REMAINDER_BITS) - 1;

pub(super) const OCCUPIED: u8 = 1 << 5;
pub(super) const CONTINUATION: u8 = 1 << 6;
pub(super) const SHIFTED: u8 = 1 << 7;

/// Bits that move together with a stored element.
pub(super) const ELEMENT: u8 = REMAINDER_MASK | CONTINUATION | SHIFTED;

const FLAGS: u8 = OCCUPIED | CONTINUATION | SHIFTED;

#[inline]
pub(super) fn is_empty(slot: u8) -> bool {
    slot & FLAGS == 0
}

#[inline]
pub(super) fn is_occupied(slot: u8) -> bool {
    slot & OCCUPIED != 0
}

#[inline]
pub(super) fn is_continuation(slot: u8) -> bool {
    slot & CONTINUATION != 0
}

#[inline]
pub(super) fn is_shifted(slot: u8) -> bool {
    slot & SHIFTED != 0
}

#[inline]
pub(super) fn remainder(slot: u8) -> u8 {
    slot & REMAINDER_MASK
}

/// The first element of a cluster sits in its canonical slot.
#[inline]
pub(super) fn is_cluster_start(slot: u8) -> bool {
    is_occupied(slot) && !is_continuation(slot) && !is_shifted(slot)
}

#[inline]
pub(super) fn is_run_start(slot: u8) -> bool {
    !is_continuation(slot) && (is_occupied(slot) || is_shifted(slot))
}

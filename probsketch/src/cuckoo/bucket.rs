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

//! Bit-field helpers for a bucket of packed 8-bit fingerprints.
//!
//! Layout: slot `i` occupies bits `[8 * i, 8 * i + 8)`. Fingerprints are never zero, and the
//! occupied slots are always the low ones, so the newest fingerprint sits in slot 0 and the
//! oldest in the highest occupied slot.

pub(super) const SLOTS_PER_BUCKET: usize = 8;
pub(super) const FINGERPRINT_BITS: u32 = 8;

/// Number of fingerprints stored in the bucket.
#[inline]
pub(super) fn len(bucket: u64) -> usize {
    SLOTS_PER_BUCKET - (bucket.leading_zeros() / FINGERPRINT_BITS) as usize
}

#[inline]
pub(super) fn is_full(bucket: u64) -> bool {
    len(bucket) == SLOTS_PER_BUCKET
}

/// Reads the fingerprint in `slot`, zero when the slot is free.
#[inline]
pub(super) fn get(bucket: u64, slot: usize) -> u8 {
    (bucket >> (slot as u32 * FINGERPRINT_BITS)) as u8
}

pub(super) fn contains(bucket: u64, fingerprint: u8) -> bool {
    (0..len(bucket)).any(|slot| get(bucket, slot) == fingerprint)
}

/// Packs `fingerprint` into slot 0, moving every stored fingerprint up one slot.
///
/// Returns the new bucket and the fingerprint pushed out of the top slot, zero if the bucket
/// had a free slot.
#[inline]
pub(super) fn push(bucket: u64, fingerprint: u8) -> (u64, u8) {
    let evicted = get(bucket, SLOTS_PER_BUCKET - 1);
    ((bucket << FINGERPRINT_BITS) | u64::from(fingerprint), evicted)
}

/// Removes the first slot holding `fingerprint` and compacts the slots above it down by one.
pub(super) fn remove(bucket: u64, fingerprint: u8) -> Option<u64> {
    let slot = (0..len(bucket)).find(|&slot| get(bucket, slot) == fingerprint)?;
    let shift = slot as u32 * FINGERPRINT_BITS;
    let low = bucket & ((1u64 << shift) - 1);
    let high = bucket.checked_shr(shift + FINGERPRINT_BITS).unwrap_or(0) << shift;
    Some(low | high)
}

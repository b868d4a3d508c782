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

use std::hash::Hash;

use super::slot;
use super::slot::CONTINUATION;
use super::slot::ELEMENT;
use super::slot::OCCUPIED;
use super::slot::REMAINDER_BITS;
use super::slot::REMAINDER_MASK;
use super::slot::SHIFTED;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::hash_item;

/// Largest supported number of quotient bits.
pub const MAX_BITS: u32 = u32::BITS - REMAINDER_BITS;

/// A quotient filter with `2^bits` one-byte slots and 5-bit remainders.
///
/// See the [module documentation](super) for the run and cluster layout.
#[derive(Debug, Clone)]
pub struct QuotientFilter {
    slots: Box<[u8]>,
    bits: u32,
    mask: usize,
    size: u64,
}

impl QuotientFilter {
    /// Creates a filter with `2^bits` slots.
    ///
    /// # Errors
    ///
    /// Returns an error if `bits` is not in `[1, MAX_BITS]`.
    pub fn new(bits: u32) -> Result<Self, Error> {
        if !(1..=MAX_BITS).contains(&bits) {
            return Err(Error::out_of_range("bits", 1, MAX_BITS, bits));
        }
        let capacity = 1usize << bits;
        log::debug!("quotient filter: {capacity} slots");

        Ok(QuotientFilter {
            slots: vec![0u8; capacity].into_boxed_slice(),
            bits,
            mask: capacity - 1,
            size: 0,
        })
    }

    /// Tests whether `item` is possibly in the filter.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        let (quotient, remainder) = self.fingerprint(item);
        self.find(quotient, remainder).is_some()
    }

    /// Adds `item` to the filter.
    ///
    /// Returns `Ok(true)` if the item was inserted and `Ok(false)` if its fingerprint was
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CapacityExhausted`](crate::error::ErrorKind::CapacityExhausted) if
    /// every slot is in use and the item is new. The filter is left unchanged.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) -> Result<bool, Error> {
        let (quotient, remainder) = self.fingerprint(item);
        if self.find(quotient, remainder).is_some() {
            return Ok(false);
        }
        if self.is_full() {
            log::warn!("quotient filter full: {} slots in use", self.size);
            return Err(Error::capacity_exhausted("quotient filter is full")
                .with_context("capacity", self.capacity()));
        }

        Ok(self.insert_fingerprint(quotient, remainder))
    }

    /// Removes `item`'s fingerprint, returning whether it was present.
    ///
    /// Removing a key that was never added may remove a colliding key's fingerprint.
    pub fn remove<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let (quotient, remainder) = self.fingerprint(item);
        self.remove_fingerprint(quotient, remainder)
    }

    /// Returns the number of stored fingerprints.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> u64 {
        self.slots.len() as u64
    }

    /// Returns the number of quotient bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns whether no fingerprint is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns whether every slot is in use.
    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Returns the fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Removes every fingerprint.
    pub fn clear(&mut self) {
        self.slots.fill(0);
        self.size = 0;
    }

    #[inline]
    fn fingerprint<T: Hash + ?Sized>(&self, item: &T) -> (usize, u8) {
        let hash = hash_item(item, DEFAULT_SEED);
        let quotient = (hash >> REMAINDER_BITS) as usize & self.mask;
        (quotient, hash as u8 & REMAINDER_MASK)
    }

    fn insert_fingerprint(&mut self, quotient: usize, remainder: u8) -> bool {
        if self.find(quotient, remainder).is_some() {
            return false;
        }
        let home = self.slots[quotient];
        self.size += 1;
        if slot::is_empty(home) {
            self.slots[quotient] = remainder | OCCUPIED;
            return true;
        }

        let had_run = slot::is_occupied(home);
        self.slots[quotient] |= OCCUPIED;
        let start = self.run_start(quotient);
        if had_run {
            let end = self.skip_run(start);
            self.insert_at(end, remainder | CONTINUATION | SHIFTED);
        } else {
            let shifted = if start == quotient { 0 } else { SHIFTED };
            self.insert_at(start, remainder | shifted);
        }
        true
    }

    fn remove_fingerprint(&mut self, quotient: usize, remainder: u8) -> bool {
        let Some(pos) = self.find(quotient, remainder) else {
            return false;
        };

        let start = self.run_start(quotient);
        let removes_head = pos == start;
        let run_survives = !removes_head || slot::is_continuation(self.slots[self.inc(pos)]);
        if !run_survives {
            self.slots[quotient] &= !OCCUPIED;
        }

        self.shift_left(pos, quotient);

        if removes_head && run_survives {
            // The former second element is the new head of the run.
            let head = &mut self.slots[pos];
            *head &= !(CONTINUATION | SHIFTED);
            if pos != quotient {
                *head |= SHIFTED;
            }
        }
        self.size -= 1;
        true
    }

    #[inline]
    fn inc(&self, index: usize) -> usize {
        (index + 1) & self.mask
    }

    #[inline]
    fn dec(&self, index: usize) -> usize {
        index.wrapping_sub(1) & self.mask
    }

    /// Returns the slot holding `remainder` in the run of `quotient`.
    fn find(&self, quotient: usize, remainder: u8) -> Option<usize> {
        if !slot::is_occupied(self.slots[quotient]) {
            return None;
        }
        let mut pos = self.run_start(quotient);
        loop {
            if slot::remainder(self.slots[pos]) == remainder {
                return Some(pos);
            }
            pos = self.inc(pos);
            if !slot::is_continuation(self.slots[pos]) {
                return None;
            }
        }
    }

    /// Locates where the run of `quotient` starts, or would start if `quotient` is occupied
    /// but its run is not stored yet.
    ///
    /// Walks back to the start of the cluster, then forward counting one run per occupied
    /// canonical slot until reaching `quotient`.
    fn run_start(&self, quotient: usize) -> usize {
        let mut canonical = quotient;
        while slot::is_shifted(self.slots[canonical]) {
            canonical = self.dec(canonical);
        }

        let mut pos = canonical;
        while canonical != quotient {
            pos = self.skip_run(pos);
            loop {
                canonical = self.inc(canonical);
                if slot::is_occupied(self.slots[canonical]) {
                    break;
                }
            }
        }
        pos
    }

    /// Returns the first slot after the run starting at `start`.
    fn skip_run(&self, start: usize) -> usize {
        let mut pos = self.inc(start);
        while slot::is_continuation(self.slots[pos]) {
            pos = self.inc(pos);
        }
        pos
    }

    /// Writes `element` at `pos` and ripples the displaced elements one slot to the right until
    /// an empty slot absorbs the last one. Requires at least one empty slot.
    fn insert_at(&mut self, mut pos: usize, mut element: u8) {
        loop {
            let displaced = self.slots[pos];
            self.slots[pos] = (displaced & OCCUPIED) | element;
            if slot::is_empty(displaced) {
                return;
            }
            element = (displaced & ELEMENT) | SHIFTED;
            pos = self.inc(pos);
        }
    }

    /// Deletes the element at `pos` by moving the rest of its cluster one slot to the left.
    ///
    /// `quotient` is the canonical slot of the run containing `pos`; it advances from run to
    /// run so that a run head landing in its canonical slot loses its shifted flag.
    fn shift_left(&mut self, pos: usize, mut quotient: usize) {
        let mut hole = pos;
        loop {
            let next_pos = self.inc(hole);
            let next = self.slots[next_pos];
            if slot::is_empty(next) || slot::is_cluster_start(next) || next_pos == pos {
                self.slots[hole] &= OCCUPIED;
                return;
            }

            let mut element = next & ELEMENT;
            if slot::is_run_start(next) {
                loop {
                    quotient = self.inc(quotient);
                    if slot::is_occupied(self.slots[quotient]) {
                        break;
                    }
                }
                if quotient == hole {
                    element &= !SHIFTED;
                }
            }
            self.slots[hole] = (self.slots[hole] & OCCUPIED) | element;
            hole = next_pos;
        }
    }
}

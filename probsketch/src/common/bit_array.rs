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

/// Fixed-size bit set packed into `u64` words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BitArray {
    num_bits: usize,
    words: Box<[u64]>,
}

impl BitArray {
    pub fn new(num_bits: usize) -> Self {
        BitArray {
            num_bits,
            words: vec![0u64; num_bits.div_ceil(64)].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.num_bits
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    /// Sets a bit, returning whether it was previously clear.
    #[inline]
    pub fn set(&mut self, index: usize) -> bool {
        let (word, mask) = locate(index);
        let was_clear = self.words[word] & mask == 0;
        self.words[word] |= mask;
        was_clear
    }

    /// Clears a bit, returning whether it was previously set.
    #[inline]
    pub fn clear(&mut self, index: usize) -> bool {
        let (word, mask) = locate(index);
        let was_set = self.words[word] & mask != 0;
        self.words[word] &= !mask;
        was_set
    }

    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }
}

#[inline]
fn locate(index: usize) -> (usize, u64) {
    (index >> 6, 1u64 << (index & 63))
}

#[cfg(test)]
mod tests {
    use super::BitArray;

    #[test]
    fn test_set_get_clear() {
        let mut bits = BitArray::new(130);
        assert_eq!(bits.len(), 130);
        assert!(!bits.get(129));

        assert!(bits.set(129));
        assert!(!bits.set(129));
        assert!(bits.set(0));
        assert!(bits.set(64));
        assert!(bits.get(129));
        assert!(bits.get(0) && bits.get(64));

        assert!(bits.clear(64));
        assert!(!bits.clear(64));
        assert!(!bits.get(64));
        assert!(bits.get(0) && bits.get(129));

        bits.clear_all();
        assert!((0..130).all(|i| !bits.get(i)));
    }
}

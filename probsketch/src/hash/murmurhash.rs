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

use std::hash::Hasher;

use byteorder::ByteOrder;
use byteorder::LE;

// x86_32 constants
const C1_32: u32 = 0xcc9e2d51;
const C2_32: u32 = 0x1b873593;

// x64_128 constants
const C1_128: u64 = 0x87c37b91114253d5;
const C2_128: u64 = 0x4cf5ad432745937f;

/// Streaming MurmurHash3 x86_32.
///
/// Writing a byte sequence in any number of pieces yields the same digest as
/// [`murmurhash3_32`] over the concatenation of those pieces.
#[derive(Debug, Clone)]
pub struct MurmurHash3X86_32 {
    h1: u32,
    total: u64,
    buf: [u8; 4],
    buf_len: usize,
}

impl MurmurHash3X86_32 {
    /// Creates a hasher starting from the given seed.
    pub fn with_seed(seed: u32) -> Self {
        MurmurHash3X86_32 {
            h1: seed,
            total: 0,
            buf: [0; 4],
            buf_len: 0,
        }
    }

    /// Returns the 32-bit digest of everything written so far.
    pub fn finish32(&self) -> u32 {
        let mut h1 = self.h1;

        // tail
        if self.buf_len > 0 {
            let mut buf = [0u8; 4];
            buf[..self.buf_len].copy_from_slice(&self.buf[..self.buf_len]);
            h1 ^= mix_k1_32(u32::from_le_bytes(buf));
        }

        // the reference implementation mixes in the length as a 32-bit int
        h1 ^= self.total as u32;
        fmix32(h1)
    }

    #[inline]
    fn update(&mut self, block: u32) {
        self.h1 ^= mix_k1_32(block);
        self.h1 = self.h1.rotate_left(13);
        self.h1 = self.h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }
}

impl Hasher for MurmurHash3X86_32 {
    fn finish(&self) -> u64 {
        u64::from(self.finish32())
    }

    fn write(&mut self, mut bytes: &[u8]) {
        self.total = self.total.wrapping_add(bytes.len() as u64);

        if self.buf_len != 0 {
            let wanted = (4 - self.buf_len).min(bytes.len());
            self.buf[self.buf_len..self.buf_len + wanted].copy_from_slice(&bytes[..wanted]);
            self.buf_len += wanted;
            bytes = &bytes[wanted..];
            if self.buf_len < 4 {
                return;
            }
            let block = LE::read_u32(&self.buf);
            self.update(block);
            self.buf_len = 0;
        }

        let mut blocks = bytes.chunks_exact(4);
        for block in &mut blocks {
            self.update(LE::read_u32(block));
        }

        let rem = blocks.remainder();
        self.buf[..rem.len()].copy_from_slice(rem);
        self.buf_len = rem.len();
    }
}

/// Computes the MurmurHash3 x86_32 digest of `bytes`.
pub fn murmurhash3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut hasher = MurmurHash3X86_32::with_seed(seed);
    hasher.write(bytes);
    hasher.finish32()
}

/// Computes the MurmurHash3 x86_32 digest of the eight big-endian bytes of `value`.
pub fn murmurhash3_32_u64(value: u64, seed: u32) -> u32 {
    murmurhash3_32(&value.to_be_bytes(), seed)
}

/// Computes the MurmurHash3 x64_128 digest of `bytes[offset..offset + length]`.
///
/// # Panics
///
/// Panics if the requested range is out of bounds of `bytes`.
pub fn murmurhash3_128(bytes: &[u8], offset: usize, length: usize, seed: u32) -> (u64, u64) {
    let data = &bytes[offset..offset + length];
    let mut h1 = u64::from(seed);
    let mut h2 = u64::from(seed);

    // body
    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        let k1 = LE::read_u64(&block[0..8]);
        let k2 = LE::read_u64(&block[8..16]);

        h1 ^= mix_k1_128(k1);
        h1 = h1.rotate_left(27);
        h1 = h1.wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(0x52dce729);

        h2 ^= mix_k2_128(k2);
        h2 = h2.rotate_left(31);
        h2 = h2.wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(0x38495ab5);
    }

    // tail
    let tail = blocks.remainder();
    if tail.len() > 8 {
        let mut buf = [0u8; 8];
        buf[..tail.len() - 8].copy_from_slice(&tail[8..]);
        h2 ^= mix_k2_128(u64::from_le_bytes(buf));
    }
    if !tail.is_empty() {
        let mut buf = [0u8; 8];
        let k1_len = tail.len().min(8);
        buf[..k1_len].copy_from_slice(&tail[..k1_len]);
        h1 ^= mix_k1_128(u64::from_le_bytes(buf));
    }

    // finalization
    h1 ^= length as u64;
    h2 ^= length as u64;
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    h1 = fmix64(h1);
    h2 = fmix64(h2);
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    (h1, h2)
}

#[inline]
fn mix_k1_32(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1_32);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2_32)
}

#[inline]
fn mix_k1_128(mut k1: u64) -> u64 {
    k1 = k1.wrapping_mul(C1_128);
    k1 = k1.rotate_left(31);
    k1.wrapping_mul(C2_128)
}

#[inline]
fn mix_k2_128(mut k2: u64) -> u64 {
    k2 = k2.wrapping_mul(C2_128);
    k2 = k2.rotate_left(33);
    k2.wrapping_mul(C1_128)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^ (h >> 16)
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_32_known_vectors() {
        assert_eq!(murmurhash3_32(b"", 0), 0);
        assert_eq!(murmurhash3_32(b"", 1), 0x514e28b7);
        assert_eq!(murmurhash3_32(b"", 0xffffffff), 0x81f16f39);
        assert_eq!(murmurhash3_32(&[0, 0, 0, 0], 0), 0x2362f9de);

        let seed = 0x9747b28c;
        assert_eq!(murmurhash3_32(b"a", seed), 0x7fa09ea6);
        assert_eq!(murmurhash3_32(b"ab", seed), 0x74875592);
        assert_eq!(murmurhash3_32(b"abc", seed), 0xc84a62dd);
        assert_eq!(murmurhash3_32(b"abcd", seed), 0xf0478627);
        assert_eq!(murmurhash3_32(b"aaaa", seed), 0x5a97808a);
        assert_eq!(murmurhash3_32(b"Hello, world!", seed), 0x24884cba);
        assert_eq!(
            murmurhash3_32(b"The quick brown fox jumps over the lazy dog", seed),
            0x2fa826cd
        );
    }

    #[test]
    fn test_32_streaming_matches_one_shot() {
        let key = b"The quick brown fox jumps over the lazy dog";
        for split in 0..key.len() {
            let mut hasher = MurmurHash3X86_32::with_seed(42);
            let (a, b) = key.split_at(split);
            hasher.write(a);
            hasher.write(b);
            assert_eq!(hasher.finish32(), murmurhash3_32(key, 42), "split at {split}");
        }

        let mut hasher = MurmurHash3X86_32::with_seed(7);
        for byte in key {
            hasher.write(&[*byte]);
        }
        assert_eq!(hasher.finish(), u64::from(murmurhash3_32(key, 7)));
    }

    #[test]
    fn test_32_u64_uses_big_endian_bytes() {
        let value = 0x0102030405060708u64;
        assert_eq!(
            murmurhash3_32_u64(value, 3),
            murmurhash3_32(&[1, 2, 3, 4, 5, 6, 7, 8], 3)
        );
        assert_ne!(murmurhash3_32_u64(1, 0), murmurhash3_32_u64(2, 0));
        assert_ne!(murmurhash3_32_u64(1, 0), murmurhash3_32_u64(1, 1));
    }

    #[test]
    fn test_128_remainder() {
        // remainder > 8
        let key = "The quick brown fox jumps over the lazy dog".as_bytes();
        let (h1, h2) = murmurhash3_128(key, 0, key.len(), 0);
        assert_eq!(h1, 0xe34bbc7bbc071b6c);
        assert_eq!(h2, 0x7a433ca9c49a9347);

        // remainder < 8
        let key = "The quick brown fox jumps over the lazy dogdogdog".as_bytes();
        let (h1, h2) = murmurhash3_128(key, 0, key.len(), 0);
        assert_eq!(h1, 0x9c8205300e612fc4);
        assert_eq!(h2, 0xcbc0af6136aa3df9);

        // remainder = 0
        let key = "The quick brown fox jumps over t".as_bytes();
        let (h1, h2) = murmurhash3_128(key, 0, key.len(), 0);
        assert_eq!(h1, 0xdf6af91bb29bdacf);
        assert_eq!(h2, 0x91a341c58df1f3a6);
    }

    #[test]
    fn test_128_offset_and_length() {
        let framed = "xxThe quick brown fox jumps over the lazy dogyy".as_bytes();
        let (h1, h2) = murmurhash3_128(framed, 2, framed.len() - 4, 0);
        assert_eq!(h1, 0xe34bbc7bbc071b6c);
        assert_eq!(h2, 0x7a433ca9c49a9347);
    }
}

//! Bit-granular cursor layered on the byte stream.
//!
//! MSB-first, as every format consumed here packs its fields. Reads up to
//! 40 bits go through a u64 accumulator so the 5-byte case loses nothing.
//! `peek` never moves the cursor; `read` does. Rewind is bit-accurate back
//! to the committed floor.

use super::error::{Error, Result};
use super::stream::ByteStream;

#[derive(Debug, Default)]
pub struct Bitstream {
    stream: ByteStream,
    /// bit offset within the byte under the cursor, in [0, 8)
    bit_offset: u8,
}

impl Bitstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// append payload bytes at the frontier
    pub fn append(&mut self, data: Vec<u8>) {
        self.stream.append(data);
    }

    pub fn mark_ended(&mut self) {
        self.stream.mark_ended();
    }

    pub fn ended(&self) -> bool {
        self.stream.ended()
    }

    /// absolute position in bits
    pub fn bit_position(&self) -> u64 {
        self.stream.position() * 8 + self.bit_offset as u64
    }

    /// are `bits` further bits buffered?
    pub fn available(&self, bits: u64) -> bool {
        self.stream.remaining() * 8 >= bits + self.bit_offset as u64
    }

    /// buffered bits past the cursor
    pub fn remaining_bits(&self) -> u64 {
        (self.stream.remaining() * 8).saturating_sub(self.bit_offset as u64)
    }

    /// release everything before the cursor's byte
    pub fn commit(&mut self) {
        self.stream.commit();
    }

    // cursor motion

    pub fn advance(&mut self, bits: u64) -> Result<()> {
        if !self.available(bits) {
            return Err(Error::Underflow);
        }
        let total = self.bit_offset as u64 + bits;
        self.stream.advance(total / 8)?;
        self.bit_offset = (total % 8) as u8;
        Ok(())
    }

    pub fn rewind(&mut self, bits: u64) -> Result<()> {
        let pos = self.bit_position();
        let target = pos
            .checked_sub(bits)
            .ok_or(Error::Malformed("bit rewind past stream start"))?;
        self.seek_bits(target)
    }

    pub fn seek_bits(&mut self, abs_bits: u64) -> Result<()> {
        self.stream.seek(abs_bits / 8)?;
        self.bit_offset = (abs_bits % 8) as u8;
        Ok(())
    }

    /// skip to the next byte boundary
    pub fn align(&mut self) -> Result<()> {
        if self.bit_offset != 0 {
            self.advance(8 - self.bit_offset as u64)?;
        }
        Ok(())
    }

    pub fn aligned(&self) -> bool {
        self.bit_offset == 0
    }

    // peeks

    /// peek up to 40 bits without moving the cursor
    pub fn peek_long(&self, bits: u32) -> Result<u64> {
        debug_assert!(bits <= 40);
        if bits == 0 {
            return Ok(0);
        }
        if !self.available(bits as u64) {
            return Err(Error::Underflow);
        }
        // accumulate up to 6 bytes: 40 bits may straddle byte boundaries
        let nbytes = ((self.bit_offset as u32 + bits + 7) / 8) as u64;
        let mut acc = 0u64;
        for i in 0..nbytes {
            acc = (acc << 8) | self.stream.peek_byte(i)? as u64;
        }
        let total = nbytes * 8;
        acc >>= total - self.bit_offset as u64 - bits as u64;
        Ok(acc & (u64::MAX >> (64 - bits)))
    }

    /// peek up to 32 bits
    pub fn peek(&self, bits: u32) -> Result<u32> {
        debug_assert!(bits <= 32);
        Ok(self.peek_long(bits)? as u32)
    }

    // consuming reads

    /// read up to 40 bits
    pub fn read_long(&mut self, bits: u32) -> Result<u64> {
        let v = self.peek_long(bits)?;
        self.advance(bits as u64)?;
        Ok(v)
    }

    /// read up to 32 bits
    pub fn read(&mut self, bits: u32) -> Result<u32> {
        debug_assert!(bits <= 32);
        Ok(self.read_long(bits)? as u32)
    }

    /// read up to 32 bits, two's complement sign extended
    pub fn read_signed(&mut self, bits: u32) -> Result<i32> {
        let v = self.read(bits)?;
        Ok(super::sample::sign_extend(v, bits))
    }

    /// read up to 40 bits, sign extended
    pub fn read_signed_long(&mut self, bits: u32) -> Result<i64> {
        let v = self.read_long(bits)?;
        Ok(super::sample::sign_extend64(v, bits))
    }

    pub fn read_bit(&mut self) -> Result<u32> {
        self.read(1)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read(1)? != 0)
    }

    /// count consecutive one bits up to and excluding the terminating zero
    /// (AAC escape prefixes)
    pub fn read_unary(&mut self) -> Result<u32> {
        let mut count = 0u32;
        while self.read_bit()? == 1 {
            count += 1;
        }
        Ok(count)
    }

    /// count consecutive zero bits up to and excluding the terminating one
    /// (FLAC Rice quotients, UTF-8-style length prefixes)
    pub fn read_unary_zeros(&mut self) -> Result<u32> {
        let mut count = 0u32;
        while self.read_bit()? == 0 {
            count += 1;
        }
        Ok(count)
    }

    /// byte-aligned bulk read; the cursor must sit on a byte boundary
    pub fn read_aligned_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        if self.bit_offset != 0 {
            return Err(Error::Malformed("unaligned bulk read"));
        }
        self.stream.read_exact(n)
    }
}

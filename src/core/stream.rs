//! Byte-granular cursor over the buffer chain.
//!
//! The cursor can rewind back to the committed floor, which is how parsers
//! undo a partial read after `Underflow`. `commit()` is the only place
//! consumed chunks are released.

use super::buffer::BufferChain;
use super::error::{Error, Result};

#[derive(Debug, Default)]
pub struct ByteStream {
    chain: BufferChain,
    /// absolute cursor
    pos: u64,
    /// rewind floor; bytes before it may be released
    floor: u64,
    /// source signalled exhaustion
    ended: bool,
}

impl ByteStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// append a chunk at the frontier
    pub fn append(&mut self, data: Vec<u8>) {
        self.chain.append(data);
    }

    /// drop buffered data and restart at container offset `abs` (seek)
    pub fn reset_to(&mut self, abs: u64) {
        self.chain.reset_origin(abs);
        self.pos = abs;
        self.floor = abs;
        self.ended = false;
    }

    /// source exhaustion flag
    pub fn mark_ended(&mut self) {
        self.ended = true;
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// absolute cursor position
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// bytes buffered past the cursor
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.chain.end() - self.pos
    }

    /// are `n` further bytes buffered?
    #[inline]
    pub fn available(&self, n: u64) -> bool {
        self.remaining() >= n
    }

    /// declare everything before the cursor dead and release chunks
    pub fn commit(&mut self) {
        self.floor = self.pos;
        self.chain.release_before(self.pos);
    }

    /// retained chunk count (diagnostics)
    pub fn chunk_count(&self) -> usize {
        self.chain.chunk_count()
    }

    // cursor motion

    pub fn advance(&mut self, n: u64) -> Result<()> {
        if !self.available(n) {
            return Err(Error::Underflow);
        }
        self.pos += n;
        Ok(())
    }

    pub fn rewind(&mut self, n: u64) -> Result<()> {
        let target = self
            .pos
            .checked_sub(n)
            .filter(|&t| t >= self.floor)
            .ok_or(Error::Malformed("rewind past committed data"))?;
        self.pos = target;
        Ok(())
    }

    pub fn seek(&mut self, abs: u64) -> Result<()> {
        if abs < self.floor {
            return Err(Error::Malformed("seek before committed data"));
        }
        if abs > self.chain.end() {
            return Err(Error::Underflow);
        }
        self.pos = abs;
        Ok(())
    }

    /// advance by at most `n`, returning how far the cursor moved; used by
    /// streaming skip states that cross chunk boundaries
    pub fn consume_up_to(&mut self, n: u64) -> u64 {
        let take = n.min(self.remaining());
        self.pos += take;
        take
    }

    // peeks (never mutate the cursor)

    pub fn peek_byte(&self, offset: u64) -> Result<u8> {
        self.chain.get(self.pos + offset).ok_or(Error::Underflow)
    }

    pub fn peek_into(&self, offset: u64, out: &mut [u8]) -> Result<()> {
        if self.chain.copy_into(self.pos + offset, out) {
            Ok(())
        } else {
            Err(Error::Underflow)
        }
    }

    pub fn peek_bytes(&self, offset: u64, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.peek_into(offset, &mut out)?;
        Ok(out)
    }

    // consuming reads

    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let out = self.peek_bytes(0, n)?;
        self.pos += n as u64;
        Ok(out)
    }

    /// read up to `max` buffered bytes; empty only when nothing is buffered
    pub fn read_available(&mut self, max: usize) -> Vec<u8> {
        let take = (max as u64).min(self.remaining()) as usize;
        match self.read_exact(take) {
            Ok(bytes) => bytes,
            Err(_) => Vec::new(),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.peek_byte(0)?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let mut b = [0u8; 2];
        self.peek_into(0, &mut b)?;
        self.pos += 2;
        Ok(u16::from_be_bytes(b))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let mut b = [0u8; 2];
        self.peek_into(0, &mut b)?;
        self.pos += 2;
        Ok(u16::from_le_bytes(b))
    }

    pub fn read_u24_be(&mut self) -> Result<u32> {
        let mut b = [0u8; 3];
        self.peek_into(0, &mut b)?;
        self.pos += 3;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.peek_into(0, &mut b)?;
        self.pos += 4;
        Ok(u32::from_be_bytes(b))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.peek_into(0, &mut b)?;
        self.pos += 4;
        Ok(u32::from_le_bytes(b))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        let mut b = [0u8; 8];
        self.peek_into(0, &mut b)?;
        self.pos += 8;
        Ok(u64::from_be_bytes(b))
    }

    pub fn read_i16_be(&mut self) -> Result<i16> {
        Ok(self.read_u16_be()? as i16)
    }

    pub fn read_i32_be(&mut self) -> Result<i32> {
        Ok(self.read_u32_be()? as i32)
    }

    pub fn read_f64_be(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64_be()?))
    }

    /// four-character code, kept as raw bytes
    pub fn read_fourcc(&mut self) -> Result<[u8; 4]> {
        let mut b = [0u8; 4];
        self.peek_into(0, &mut b)?;
        self.pos += 4;
        Ok(b)
    }
}

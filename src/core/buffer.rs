//! Append-only chunk chain underlying the byte stream.
//!
//! Chunks arrive in whatever sizes the source produces them and are never
//! merged or copied; the chain tracks the absolute offset each chunk covers
//! and releases fully-consumed chunks when the owner commits a floor.

use std::collections::VecDeque;

/// immutable byte span owned by the chain
#[derive(Debug)]
pub struct Chunk {
    /// absolute stream offset of data[0]
    pub start: u64,
    pub data: Vec<u8>,
}

impl Chunk {
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.data.len() as u64
    }
}

/// linked sequence of chunks with consumption tracking
#[derive(Debug, Default)]
pub struct BufferChain {
    chunks: VecDeque<Chunk>,
    /// absolute offset of the first retained byte
    start: u64,
    /// absolute offset one past the last appended byte (the frontier)
    end: u64,
}

impl BufferChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// drop every chunk and restart the offset space at `abs`; used when a
    /// seek redirects the source to a new container offset
    pub fn reset_origin(&mut self, abs: u64) {
        self.chunks.clear();
        self.start = abs;
        self.end = abs;
    }

    /// push a chunk at the frontier
    pub fn append(&mut self, data: Vec<u8>) {
        if data.is_empty() {
            return;
        }
        let start = self.end;
        self.end += data.len() as u64;
        self.chunks.push_back(Chunk { start, data });
    }

    /// absolute offset of the first retained byte
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// absolute offset of the append frontier
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// byte at absolute offset, None outside [start, end)
    pub fn get(&self, abs: u64) -> Option<u8> {
        let idx = self.chunk_index(abs)?;
        let chunk = &self.chunks[idx];
        Some(chunk.data[(abs - chunk.start) as usize])
    }

    /// copy `out.len()` bytes starting at `abs`; false if the range is not
    /// fully retained
    pub fn copy_into(&self, abs: u64, out: &mut [u8]) -> bool {
        if out.is_empty() {
            return true;
        }
        if abs < self.start || abs + out.len() as u64 > self.end {
            return false;
        }
        let mut idx = match self.chunk_index(abs) {
            Some(i) => i,
            None => return false,
        };
        let mut pos = abs;
        let mut written = 0;
        while written < out.len() {
            let chunk = &self.chunks[idx];
            let local = (pos - chunk.start) as usize;
            let take = (chunk.data.len() - local).min(out.len() - written);
            out[written..written + take].copy_from_slice(&chunk.data[local..local + take]);
            written += take;
            pos += take as u64;
            idx += 1;
        }
        true
    }

    /// drop chunks that end at or before `abs`
    pub fn release_before(&mut self, abs: u64) {
        while let Some(front) = self.chunks.front() {
            if front.end() <= abs {
                self.chunks.pop_front();
            } else {
                break;
            }
        }
        self.start = match self.chunks.front() {
            Some(front) => front.start,
            None => self.end,
        };
    }

    /// number of retained chunks (consumption-tracking diagnostics)
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn chunk_index(&self, abs: u64) -> Option<usize> {
        if abs < self.start || abs >= self.end {
            return None;
        }
        // chunks are contiguous, so binary search on start offsets
        let idx = self
            .chunks
            .partition_point(|c| c.end() <= abs);
        (idx < self.chunks.len()).then_some(idx)
    }
}

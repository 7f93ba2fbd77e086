//! Small hand-built container files shared by the integration tests.
#![allow(dead_code)] // each test binary uses its own subset

/// mono 16-bit little-endian WAVE
pub fn wave_s16le(rate: u32, samples: &[i16]) -> Vec<u8> {
    let data_len = samples.len() as u32 * 2;
    let mut v = Vec::new();
    v.extend_from_slice(b"RIFF");
    v.extend_from_slice(&(36 + data_len).to_le_bytes());
    v.extend_from_slice(b"WAVE");
    v.extend_from_slice(b"fmt ");
    v.extend_from_slice(&16u32.to_le_bytes());
    v.extend_from_slice(&1u16.to_le_bytes()); // PCM
    v.extend_from_slice(&1u16.to_le_bytes()); // mono
    v.extend_from_slice(&rate.to_le_bytes());
    v.extend_from_slice(&(rate * 2).to_le_bytes());
    v.extend_from_slice(&2u16.to_le_bytes());
    v.extend_from_slice(&16u16.to_le_bytes());
    v.extend_from_slice(b"data");
    v.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        v.extend_from_slice(&s.to_le_bytes());
    }
    v
}

/// 80-bit extended float encoding of an integer sample rate
fn extended_rate(rate: u32) -> [u8; 10] {
    let shift = (rate as u64).leading_zeros() as u16;
    let mantissa = (rate as u64) << shift;
    let exponent = 16383 + 63 - shift;
    let mut out = [0u8; 10];
    out[0..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..10].copy_from_slice(&mantissa.to_be_bytes());
    out
}

/// mono 16-bit big-endian AIFF
pub fn aiff_s16be(rate: u32, samples: &[i16]) -> Vec<u8> {
    let data_len = samples.len() as u32 * 2;
    let mut v = Vec::new();
    v.extend_from_slice(b"FORM");
    v.extend_from_slice(&(4 + 26 + 16 + data_len).to_be_bytes());
    v.extend_from_slice(b"AIFF");

    v.extend_from_slice(b"COMM");
    v.extend_from_slice(&18u32.to_be_bytes());
    v.extend_from_slice(&1u16.to_be_bytes()); // mono
    v.extend_from_slice(&(samples.len() as u32).to_be_bytes());
    v.extend_from_slice(&16u16.to_be_bytes());
    v.extend_from_slice(&extended_rate(rate));

    v.extend_from_slice(b"SSND");
    v.extend_from_slice(&(8 + data_len).to_be_bytes());
    v.extend_from_slice(&0u32.to_be_bytes()); // offset
    v.extend_from_slice(&0u32.to_be_bytes()); // block size
    for s in samples {
        v.extend_from_slice(&s.to_be_bytes());
    }
    v
}

/// native FLAC: STREAMINFO plus one mono 16-bit frame holding a single
/// constant subframe of `value`
pub fn flac_constant(rate: u32, bps: u8, block: usize, value: i16) -> Vec<u8> {
    assert_eq!(bps, 16, "helper only emits 16-bit streams");
    let total = block as u64;

    let mut info = [0u8; 34];
    info[0..2].copy_from_slice(&(block as u16).to_be_bytes());
    info[2..4].copy_from_slice(&(block as u16).to_be_bytes());
    // min/max frame size left zero (unknown)
    info[10] = (rate >> 12) as u8;
    info[11] = (rate >> 4) as u8;
    info[12] = ((rate & 0xF) as u8) << 4 | ((bps - 1) >> 4); // mono: channels-1 = 0
    info[13] = ((bps - 1) & 0xF) << 4 | ((total >> 32) & 0xF) as u8;
    info[14..18].copy_from_slice(&(total as u32).to_be_bytes());
    // MD5 left zero

    let mut v = Vec::new();
    v.extend_from_slice(b"fLaC");
    v.push(0x00); // STREAMINFO
    v.extend_from_slice(&34u32.to_be_bytes()[1..]);
    v.extend_from_slice(&info);
    v.push(0x81); // last metadata block, PADDING
    v.extend_from_slice(&64u32.to_be_bytes()[1..]);
    v.extend_from_slice(&[0u8; 64]);

    // frame header: sync + fixed blocking, 8-bit block size code, stream
    // rate, mono, 16-bit, frame number 0
    v.extend_from_slice(&[0xFF, 0xF8, 0x60, 0x08, 0x00]);
    v.push((block - 1) as u8);
    v.push(0x00); // header CRC-8, decoder does not verify
    v.push(0x00); // constant subframe, no wasted bits
    v.extend_from_slice(&value.to_be_bytes());
    v.extend_from_slice(&[0x00, 0x00]); // frame CRC-16, unverified
    v
}

//! Static tables for AAC-LC: spectrum and scalefactor codebooks,
//! scalefactor band boundaries per sample rate, and TNS band limits.
//!
//! Codebooks are stored as explicit (codeword, length) columns, transcribed
//! per book rather than derived, since the assignment within a code length
//! follows symbol frequency and cannot be reconstructed from lengths alone.
//! Symbol values map back to quads/pairs through the codebook's dimension
//! and largest-absolute-value parameters.

pub(super) use crate::demux::adts::SAMPLE_RATES;

/// spectrum codebook shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CodebookSpec {
    /// values per codeword (4 or 2)
    pub dim: u8,
    /// largest absolute value in the alphabet
    pub lav: u8,
    /// values carry sign inside the codeword
    pub signed: bool,
    pub codes: &'static [u32],
    pub lengths: &'static [u8],
}

/// specs for spectrum codebooks 1..=11 (index 0 unused)
pub(super) fn spectrum_codebook(book: u8) -> Option<CodebookSpec> {
    let spec = match book {
        1 => CodebookSpec { dim: 4, lav: 1, signed: true, codes: &HCB1_CODES, lengths: &HCB1_LENGTHS },
        2 => CodebookSpec { dim: 4, lav: 1, signed: true, codes: &HCB2_CODES, lengths: &HCB2_LENGTHS },
        3 => CodebookSpec { dim: 4, lav: 2, signed: false, codes: &HCB3_CODES, lengths: &HCB3_LENGTHS },
        4 => CodebookSpec { dim: 4, lav: 2, signed: false, codes: &HCB4_CODES, lengths: &HCB4_LENGTHS },
        5 => CodebookSpec { dim: 2, lav: 4, signed: true, codes: &HCB5_CODES, lengths: &HCB5_LENGTHS },
        6 => CodebookSpec { dim: 2, lav: 4, signed: true, codes: &HCB6_CODES, lengths: &HCB6_LENGTHS },
        7 => CodebookSpec { dim: 2, lav: 7, signed: false, codes: &HCB7_CODES, lengths: &HCB7_LENGTHS },
        8 => CodebookSpec { dim: 2, lav: 7, signed: false, codes: &HCB8_CODES, lengths: &HCB8_LENGTHS },
        9 => CodebookSpec { dim: 2, lav: 12, signed: false, codes: &HCB9_CODES, lengths: &HCB9_LENGTHS },
        10 => CodebookSpec { dim: 2, lav: 12, signed: false, codes: &HCB10_CODES, lengths: &HCB10_LENGTHS },
        11 => CodebookSpec { dim: 2, lav: 16, signed: false, codes: &HCB11_CODES, lengths: &HCB11_LENGTHS },
        _ => return None,
    };
    Some(spec)
}

/// section codebook numbers with special meaning
pub(super) const ZERO_HCB: u8 = 0;
pub(super) const INTENSITY_HCB2: u8 = 14;
pub(super) const INTENSITY_HCB: u8 = 15;
pub(super) const NOISE_HCB: u8 = 13;
pub(super) const ESC_HCB: u8 = 11;

/// long-window scalefactor band offsets, indexed by sample rate index
pub(super) fn swb_offsets_long(rate_index: usize) -> &'static [u16] {
    match rate_index {
        0 | 1 => &SWB_LONG_96,
        2 => &SWB_LONG_64,
        3 | 4 => &SWB_LONG_48,
        5 => &SWB_LONG_32,
        6 | 7 => &SWB_LONG_24,
        8 | 9 | 10 => &SWB_LONG_16,
        _ => &SWB_LONG_8,
    }
}

/// short-window scalefactor band offsets
pub(super) fn swb_offsets_short(rate_index: usize) -> &'static [u16] {
    match rate_index {
        0..=2 => &SWB_SHORT_96,
        3..=5 => &SWB_SHORT_48,
        6 | 7 => &SWB_SHORT_24,
        8..=10 => &SWB_SHORT_16,
        _ => &SWB_SHORT_8,
    }
}

/// TNS band caps, long and short windows, by sample rate index
pub(super) const TNS_MAX_BANDS_LONG: [u8; 13] =
    [31, 31, 34, 40, 42, 51, 46, 46, 42, 42, 42, 39, 39];
pub(super) const TNS_MAX_BANDS_SHORT: [u8; 13] =
    [9, 9, 10, 14, 14, 15, 14, 14, 14, 14, 14, 14, 14];

const SWB_LONG_96: [u16; 42] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 64, 72, 80, 88, 96, 108, 120, 132,
    144, 156, 172, 188, 212, 240, 276, 320, 384, 448, 512, 576, 640, 704, 768, 832, 896, 960,
    1024,
];
const SWB_LONG_64: [u16; 48] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 64, 72, 80, 88, 100, 112, 124, 140,
    156, 172, 192, 216, 240, 268, 304, 344, 384, 424, 464, 504, 544, 584, 624, 664, 704, 744, 784,
    824, 864, 904, 944, 984, 1024,
];
const SWB_LONG_48: [u16; 50] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 48, 56, 64, 72, 80, 88, 96, 108, 120, 132, 144, 160,
    176, 196, 216, 240, 264, 292, 320, 352, 384, 416, 448, 480, 512, 544, 576, 608, 640, 672, 704,
    736, 768, 800, 832, 864, 896, 928, 1024,
];
const SWB_LONG_32: [u16; 52] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 48, 56, 64, 72, 80, 88, 96, 108, 120, 132, 144, 160,
    176, 196, 216, 240, 264, 292, 320, 352, 384, 416, 448, 480, 512, 544, 576, 608, 640, 672, 704,
    736, 768, 800, 832, 864, 896, 928, 960, 992, 1024,
];
const SWB_LONG_24: [u16; 48] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 52, 60, 68, 76, 84, 92, 100, 108, 116, 124, 136,
    148, 160, 172, 188, 204, 220, 240, 260, 284, 308, 336, 364, 396, 432, 468, 508, 552, 600, 652,
    704, 768, 832, 896, 960, 1024,
];
const SWB_LONG_16: [u16; 44] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 100, 112, 124, 136, 148, 160, 172, 184, 196,
    212, 228, 244, 260, 280, 300, 320, 344, 368, 396, 424, 456, 492, 532, 572, 616, 664, 716, 772,
    832, 896, 960, 1024,
];
const SWB_LONG_8: [u16; 41] = [
    0, 12, 24, 36, 48, 60, 72, 84, 96, 108, 120, 132, 144, 156, 172, 188, 204, 220, 236, 252, 268,
    288, 308, 328, 348, 372, 396, 420, 448, 476, 508, 544, 580, 620, 664, 712, 764, 820, 880, 944,
    1024,
];

const SWB_SHORT_96: [u16; 13] = [0, 4, 8, 12, 16, 20, 24, 32, 40, 48, 64, 92, 128];
const SWB_SHORT_48: [u16; 15] = [0, 4, 8, 12, 16, 20, 28, 36, 44, 56, 68, 80, 96, 112, 128];
const SWB_SHORT_24: [u16; 16] =
    [0, 4, 8, 12, 16, 20, 24, 28, 36, 44, 52, 64, 76, 92, 108, 128];
const SWB_SHORT_16: [u16; 16] =
    [0, 4, 8, 12, 16, 20, 24, 28, 32, 40, 48, 60, 72, 88, 108, 128];
const SWB_SHORT_8: [u16; 16] =
    [0, 4, 8, 12, 16, 20, 24, 28, 36, 44, 52, 60, 72, 88, 108, 128];

pub(super) const HCB_SF_CODES: [u32; 121] = [
    0x3ffe8, 0x3ffe6, 0x3ffe7, 0x3ffe5, 0x7fff5, 0x7fff1, 0x7ffed, 0x7fff6,
    0x7ffee, 0x7ffef, 0x7fff0, 0x7fffc, 0x7fffd, 0x7ffff, 0x7fffe, 0x7fff7,
    0x7fff8, 0x7fffb, 0x7fff9, 0x3ffe4, 0x7fffa, 0x3ffe3, 0x1ffef, 0x1fff0,
    0x0fff5, 0x1ffee, 0x0fff2, 0x0fff3, 0x0fff4, 0x0fff1, 0x07ff6, 0x07ff7,
    0x03ff9, 0x03ff5, 0x03ff7, 0x03ff3, 0x03ff6, 0x03ff2, 0x01ff7, 0x01ff5,
    0x00ff9, 0x00ff7, 0x00ff6, 0x007f9, 0x00ff4, 0x007f8, 0x003f9, 0x003f7,
    0x003f5, 0x001f8, 0x001f7, 0x000fa, 0x000f8, 0x000f6, 0x00079, 0x0003a,
    0x00038, 0x0001a, 0x0000b, 0x00004, 0x00000, 0x0000a, 0x0000c, 0x0001b,
    0x00039, 0x0003b, 0x00078, 0x0007a, 0x000f7, 0x000f9, 0x001f6, 0x001f9,
    0x003f4, 0x003f6, 0x003f8, 0x007f4, 0x007f6, 0x007f7, 0x00ff5, 0x00ff8,
    0x01ff4, 0x01ff6, 0x01ff8, 0x03ff8, 0x03ff4, 0x0fff0, 0x07ff4, 0x0fff6,
    0x07ff5, 0x3ffe2, 0x7ffd9, 0x7ffda, 0x7ffdb, 0x7ffdc, 0x7ffdd, 0x7ffde,
    0x7ffd8, 0x7ffd2, 0x7ffd3, 0x7ffd4, 0x7ffd5, 0x7ffd6, 0x7fff2, 0x7ffdf,
    0x7ffe7, 0x7ffe8, 0x7ffe9, 0x7ffea, 0x7ffeb, 0x7ffe6, 0x7ffe0, 0x7ffe1,
    0x7ffe2, 0x7ffe3, 0x7ffe4, 0x7ffe5, 0x7ffd7, 0x7ffec, 0x7fff4, 0x7fff3,
    0x007f5,
];

pub(super) const HCB_SF_LENGTHS: [u8; 121] = [
    18, 18, 18, 18, 19, 19, 19, 19,
    19, 19, 19, 19, 19, 19, 19, 19,
    19, 19, 19, 18, 19, 18, 17, 17,
    16, 17, 16, 16, 16, 16, 15, 15,
    14, 14, 14, 14, 14, 14, 13, 13,
    12, 12, 12, 11, 12, 11, 10, 10,
    10,  9,  9,  8,  8,  8,  7,  6,
     6,  5,  4,  3,  1,  4,  4,  5,
     6,  6,  7,  7,  8,  8,  9,  9,
    10, 10, 10, 11, 11, 11, 12, 12,
    13, 13, 13, 14, 14, 16, 15, 16,
    15, 18, 19, 19, 19, 19, 19, 19,
    19, 19, 19, 19, 19, 19, 19, 19,
    19, 19, 19, 19, 19, 19, 19, 19,
    19, 19, 19, 19, 19, 19, 19, 19,
    11,
];

pub(super) const HCB1_CODES: [u32; 81] = [
    0x007f0, 0x007d0, 0x007f1, 0x007d1, 0x000e6, 0x007d2, 0x007f2, 0x007d3,
    0x007f3, 0x007d4, 0x000e7, 0x007d5, 0x000e8, 0x00018, 0x000e9, 0x007d6,
    0x000ea, 0x007d7, 0x007f4, 0x007d8, 0x007f5, 0x007d9, 0x000eb, 0x007da,
    0x007f6, 0x007db, 0x007f7, 0x007dc, 0x000ec, 0x007dd, 0x000ed, 0x00019,
    0x000ee, 0x007de, 0x000ef, 0x007df, 0x000e4, 0x00008, 0x000e5, 0x00009,
    0x00000, 0x0000a, 0x00070, 0x0000b, 0x00071, 0x007e0, 0x000f0, 0x007e1,
    0x000f1, 0x0001a, 0x000f2, 0x007e2, 0x000f3, 0x007e3, 0x007f8, 0x007e4,
    0x007f9, 0x007e5, 0x000f4, 0x007e6, 0x007fa, 0x007e7, 0x007fb, 0x007e8,
    0x000f5, 0x007e9, 0x000f6, 0x0001b, 0x000f7, 0x007ea, 0x000f8, 0x007eb,
    0x007fc, 0x007ec, 0x007fd, 0x007ed, 0x000f9, 0x007ee, 0x007fe, 0x007ef,
    0x007ff,
];

pub(super) const HCB1_LENGTHS: [u8; 81] = [
    11, 11, 11, 11,  8, 11, 11, 11,
    11, 11,  8, 11,  8,  5,  8, 11,
     8, 11, 11, 11, 11, 11,  8, 11,
    11, 11, 11, 11,  8, 11,  8,  5,
     8, 11,  8, 11,  8,  4,  8,  4,
     1,  4,  7,  4,  7, 11,  8, 11,
     8,  5,  8, 11,  8, 11, 11, 11,
    11, 11,  8, 11, 11, 11, 11, 11,
     8, 11,  8,  5,  8, 11,  8, 11,
    11, 11, 11, 11,  8, 11, 11, 11,
    11,
];

pub(super) const HCB2_CODES: [u32; 81] = [
    0x001f0, 0x000f0, 0x001f1, 0x00060, 0x00018, 0x00061, 0x001f2, 0x000f1,
    0x001f3, 0x000f2, 0x0001c, 0x000f3, 0x00024, 0x00006, 0x00025, 0x000f4,
    0x0001d, 0x000f5, 0x001f4, 0x000f6, 0x001f5, 0x00062, 0x00019, 0x00063,
    0x001f6, 0x000f7, 0x001f7, 0x00068, 0x0001e, 0x00069, 0x00026, 0x00007,
    0x00027, 0x0006a, 0x0001f, 0x0006b, 0x00028, 0x00008, 0x00029, 0x00004,
    0x00000, 0x00005, 0x0002a, 0x00009, 0x0002b, 0x0006c, 0x00020, 0x0006d,
    0x0002c, 0x0000a, 0x0002d, 0x0006e, 0x00021, 0x0006f, 0x001f8, 0x00070,
    0x001f9, 0x00064, 0x0001a, 0x00065, 0x001fa, 0x00071, 0x001fb, 0x00072,
    0x00022, 0x00073, 0x0002e, 0x0000b, 0x0002f, 0x00074, 0x00023, 0x00075,
    0x001fc, 0x00076, 0x001fd, 0x00066, 0x0001b, 0x00067, 0x001fe, 0x00077,
    0x001ff,
];

pub(super) const HCB2_LENGTHS: [u8; 81] = [
     9,  8,  9,  7,  6,  7,  9,  8,
     9,  8,  6,  8,  6,  5,  6,  8,
     6,  8,  9,  8,  9,  7,  6,  7,
     9,  8,  9,  7,  6,  7,  6,  5,
     6,  7,  6,  7,  6,  5,  6,  5,
     3,  5,  6,  5,  6,  7,  6,  7,
     6,  5,  6,  7,  6,  7,  9,  7,
     9,  7,  6,  7,  9,  7,  9,  7,
     6,  7,  6,  5,  6,  7,  6,  7,
     9,  7,  9,  7,  6,  7,  9,  7,
     9,
];

pub(super) const HCB3_CODES: [u32; 81] = [
    0x00000, 0x00008, 0x00030, 0x00009, 0x00036, 0x000e8, 0x00031, 0x000ed,
    0x001f0, 0x0000a, 0x00037, 0x000e9, 0x00034, 0x000f4, 0x003ec, 0x000ea,
    0x003ed, 0x007f2, 0x00032, 0x000ee, 0x001f1, 0x000ef, 0x003f0, 0x00ff4,
    0x001f2, 0x007f3, 0x01ff8, 0x0000b, 0x00038, 0x000eb, 0x00035, 0x000f5,
    0x003ee, 0x000ec, 0x003ef, 0x007f4, 0x00039, 0x000f7, 0x003f1, 0x000f6,
    0x003f8, 0x00ff8, 0x003f2, 0x00ff9, 0x03ff8, 0x000f0, 0x003f3, 0x00ff5,
    0x003f4, 0x00ffa, 0x03ff9, 0x00ff6, 0x03ffa, 0x0fffe, 0x00033, 0x000f1,
    0x001f3, 0x000f2, 0x003f5, 0x00ff7, 0x001f4, 0x007f5, 0x01ff9, 0x000f3,
    0x003f6, 0x007f7, 0x003f7, 0x00ffb, 0x03ffb, 0x007f8, 0x03ffc, 0x0ffff,
    0x001f5, 0x007f6, 0x01ffa, 0x007f9, 0x03ffd, 0x07ffc, 0x01ffb, 0x07ffd,
    0x07ffe,
];

pub(super) const HCB3_LENGTHS: [u8; 81] = [
     1,  4,  6,  4,  6,  8,  6,  8,
     9,  4,  6,  8,  6,  8, 10,  8,
    10, 11,  6,  8,  9,  8, 10, 12,
     9, 11, 13,  4,  6,  8,  6,  8,
    10,  8, 10, 11,  6,  8, 10,  8,
    10, 12, 10, 12, 14,  8, 10, 12,
    10, 12, 14, 12, 14, 16,  6,  8,
     9,  8, 10, 12,  9, 11, 13,  8,
    10, 11, 10, 12, 14, 11, 14, 16,
     9, 11, 13, 11, 14, 15, 13, 15,
    15,
];

pub(super) const HCB4_CODES: [u32; 81] = [
    0x00000, 0x00001, 0x00029, 0x00002, 0x0000a, 0x0005e, 0x0002a, 0x0005f,
    0x000f0, 0x00003, 0x0000b, 0x00060, 0x0000c, 0x00010, 0x00070, 0x00061,
    0x00068, 0x001ec, 0x0002b, 0x00062, 0x000f1, 0x00063, 0x00069, 0x001ed,
    0x000f2, 0x001ee, 0x007f8, 0x00004, 0x0000d, 0x00064, 0x0000e, 0x00011,
    0x00071, 0x00065, 0x0006a, 0x001ef, 0x0000f, 0x00012, 0x00072, 0x00013,
    0x00028, 0x00076, 0x00073, 0x00077, 0x001fd, 0x00066, 0x0006b, 0x001f0,
    0x0006c, 0x00074, 0x001f8, 0x001f1, 0x001f9, 0x00ffe, 0x0002c, 0x00067,
    0x000f3, 0x0002d, 0x0006d, 0x001f2, 0x000f4, 0x001f3, 0x007f9, 0x0002e,
    0x0006e, 0x001f4, 0x0006f, 0x00075, 0x001fa, 0x001f5, 0x001fb, 0x007fc,
    0x000f5, 0x001f6, 0x007fa, 0x001f7, 0x001fc, 0x007fd, 0x007fb, 0x007fe,
    0x00fff,
];

pub(super) const HCB4_LENGTHS: [u8; 81] = [
     4,  4,  6,  4,  5,  7,  6,  7,
     8,  4,  5,  7,  5,  5,  7,  7,
     7,  9,  6,  7,  8,  7,  7,  9,
     8,  9, 11,  4,  5,  7,  5,  5,
     7,  7,  7,  9,  5,  5,  7,  5,
     6,  7,  7,  7,  9,  7,  7,  9,
     7,  7,  9,  9,  9, 12,  6,  7,
     8,  6,  7,  9,  8,  9, 11,  6,
     7,  9,  7,  7,  9,  9,  9, 11,
     8,  9, 11,  9,  9, 11, 11, 11,
    12,
];

pub(super) const HCB5_CODES: [u32; 81] = [
    0x01ff4, 0x01ff5, 0x01ff0, 0x007e8, 0x001ea, 0x007e9, 0x01ff1, 0x01ff6,
    0x01ff7, 0x01ff8, 0x01ff2, 0x007ea, 0x001f2, 0x00072, 0x001f3, 0x007eb,
    0x01ff3, 0x01ff9, 0x00ff0, 0x007ec, 0x001ee, 0x000ee, 0x00032, 0x000ef,
    0x001ef, 0x007ed, 0x00ff1, 0x007ee, 0x001f4, 0x000f0, 0x00035, 0x00008,
    0x00036, 0x000f1, 0x001f5, 0x007ef, 0x001eb, 0x00073, 0x00033, 0x00009,
    0x00000, 0x0000a, 0x00034, 0x00074, 0x001ec, 0x007f0, 0x001f6, 0x000f2,
    0x00037, 0x0000b, 0x00038, 0x000f3, 0x001f7, 0x007f1, 0x00ff2, 0x007f2,
    0x001f0, 0x000f4, 0x00018, 0x00076, 0x001f1, 0x007f3, 0x00ff3, 0x01ffa,
    0x00ff4, 0x007f4, 0x001f8, 0x00075, 0x001f9, 0x007f5, 0x00ff5, 0x01ffb,
    0x01ffc, 0x01ffd, 0x00ff6, 0x007f6, 0x001ed, 0x007f7, 0x00ff7, 0x01ffe,
    0x01fff,
];

pub(super) const HCB5_LENGTHS: [u8; 81] = [
    13, 13, 13, 11,  9, 11, 13, 13,
    13, 13, 13, 11,  9,  7,  9, 11,
    13, 13, 12, 11,  9,  8,  6,  8,
     9, 11, 12, 11,  9,  8,  6,  4,
     6,  8,  9, 11,  9,  7,  6,  4,
     1,  4,  6,  7,  9, 11,  9,  8,
     6,  4,  6,  8,  9, 11, 12, 11,
     9,  8,  5,  7,  9, 11, 12, 13,
    12, 11,  9,  7,  9, 11, 12, 13,
    13, 13, 12, 11,  9, 11, 12, 13,
    13,
];

pub(super) const HCB6_CODES: [u32; 81] = [
    0x007f4, 0x007f5, 0x007e8, 0x001e6, 0x001f6, 0x001e7, 0x007e9, 0x007f6,
    0x007f7, 0x007f8, 0x007ea, 0x001e8, 0x0006e, 0x000f2, 0x0006f, 0x001e9,
    0x007eb, 0x007f9, 0x007ec, 0x001ea, 0x0006a, 0x0002e, 0x00031, 0x0002f,
    0x0006b, 0x001eb, 0x007ed, 0x001ec, 0x00070, 0x00030, 0x00000, 0x00004,
    0x00001, 0x00012, 0x00071, 0x001ed, 0x001f7, 0x00076, 0x00032, 0x00005,
    0x00008, 0x00006, 0x00033, 0x00077, 0x001f8, 0x001ee, 0x00072, 0x00013,
    0x00002, 0x00007, 0x00003, 0x00014, 0x00073, 0x001ef, 0x007ee, 0x001f0,
    0x0006c, 0x00015, 0x00034, 0x00016, 0x0006d, 0x001f1, 0x007ef, 0x007fa,
    0x007f0, 0x001f2, 0x00074, 0x00078, 0x00075, 0x001f3, 0x007f1, 0x007fb,
    0x007fc, 0x007fd, 0x007f2, 0x001f4, 0x001f9, 0x001f5, 0x007f3, 0x007fe,
    0x007ff,
];

pub(super) const HCB6_LENGTHS: [u8; 81] = [
    11, 11, 11,  9,  9,  9, 11, 11,
    11, 11, 11,  9,  7,  8,  7,  9,
    11, 11, 11,  9,  7,  6,  6,  6,
     7,  9, 11,  9,  7,  6,  4,  4,
     4,  5,  7,  9,  9,  7,  6,  4,
     4,  4,  6,  7,  9,  9,  7,  5,
     4,  4,  4,  5,  7,  9, 11,  9,
     7,  5,  6,  5,  7,  9, 11, 11,
    11,  9,  7,  7,  7,  9, 11, 11,
    11, 11, 11,  9,  9,  9, 11, 11,
    11,
];

pub(super) const HCB7_CODES: [u32; 64] = [
    0x00000, 0x00004, 0x0001a, 0x0003a, 0x000f6, 0x003e8, 0x007da, 0x007db,
    0x00005, 0x0000c, 0x00038, 0x00078, 0x001f0, 0x007d6, 0x007dc, 0x007dd,
    0x0001b, 0x00039, 0x0007a, 0x001f1, 0x007d8, 0x007de, 0x007df, 0x007e0,
    0x0003b, 0x00079, 0x001f2, 0x007d7, 0x007e1, 0x007e2, 0x007e3, 0x007e4,
    0x000f7, 0x001f3, 0x007d9, 0x007e5, 0x007e6, 0x007e7, 0x007e8, 0x007e9,
    0x003e9, 0x003ea, 0x007ea, 0x007eb, 0x007ec, 0x007ed, 0x007ee, 0x007ef,
    0x007f0, 0x007f1, 0x007f2, 0x007f3, 0x007f4, 0x007f5, 0x007f6, 0x007f7,
    0x007f8, 0x007f9, 0x007fa, 0x007fb, 0x007fc, 0x007fd, 0x007fe, 0x007ff,
];

pub(super) const HCB7_LENGTHS: [u8; 64] = [
     1,  3,  5,  6,  8, 10, 11, 11,
     3,  4,  6,  7,  9, 11, 11, 11,
     5,  6,  7,  9, 11, 11, 11, 11,
     6,  7,  9, 11, 11, 11, 11, 11,
     8,  9, 11, 11, 11, 11, 11, 11,
    10, 10, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
];

pub(super) const HCB8_CODES: [u32; 64] = [
    0x00004, 0x00002, 0x0001a, 0x0003a, 0x000f8, 0x003f2, 0x007ef, 0x00fe2,
    0x00003, 0x00000, 0x0000a, 0x00038, 0x0007a, 0x001f5, 0x007ea, 0x00fe3,
    0x0000c, 0x0000b, 0x00039, 0x00078, 0x001f7, 0x007eb, 0x00fe4, 0x00fe5,
    0x0003b, 0x0001b, 0x00079, 0x001f4, 0x007ec, 0x00fe6, 0x00fe7, 0x00fe8,
    0x000f9, 0x0007b, 0x001f8, 0x007ed, 0x00fe9, 0x00fea, 0x00feb, 0x00fec,
    0x003f3, 0x001f6, 0x007ee, 0x00fed, 0x00fee, 0x00fef, 0x00ff0, 0x00ff1,
    0x007f0, 0x003f4, 0x00ff2, 0x00ff3, 0x00ff4, 0x00ff5, 0x00ff6, 0x00ff7,
    0x00ff8, 0x00ff9, 0x00ffa, 0x00ffb, 0x00ffc, 0x00ffd, 0x00ffe, 0x00fff,
];

pub(super) const HCB8_LENGTHS: [u8; 64] = [
     3,  3,  5,  6,  8, 10, 11, 12,
     3,  2,  4,  6,  7,  9, 11, 12,
     4,  4,  6,  7,  9, 11, 12, 12,
     6,  5,  7,  9, 11, 12, 12, 12,
     8,  7,  9, 11, 12, 12, 12, 12,
    10,  9, 11, 12, 12, 12, 12, 12,
    11, 10, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 12,
];

pub(super) const HCB9_CODES: [u32; 169] = [
    0x00000, 0x00004, 0x0001a, 0x0003a, 0x000f8, 0x001f6, 0x007ea, 0x01fbc,
    0x07ffe, 0x07fff, 0x03f7c, 0x03f7d, 0x03f7e, 0x00005, 0x0000c, 0x00038,
    0x00078, 0x001f2, 0x003f0, 0x00fda, 0x03f7f, 0x03f80, 0x03f81, 0x03f82,
    0x03f83, 0x03f84, 0x0001b, 0x00039, 0x0007a, 0x001f3, 0x003f3, 0x00fdb,
    0x03f85, 0x03f86, 0x03f87, 0x03f88, 0x03f89, 0x03f8a, 0x03f8b, 0x0003b,
    0x00079, 0x001f4, 0x003f1, 0x00fd8, 0x03f8c, 0x03f8d, 0x03f8e, 0x03f8f,
    0x03f90, 0x03f91, 0x03f92, 0x03f93, 0x0007b, 0x001f5, 0x003f4, 0x00fd9,
    0x03f94, 0x03f95, 0x03f96, 0x03f97, 0x03f98, 0x03f99, 0x03f9a, 0x03f9b,
    0x03f9c, 0x001f7, 0x003f2, 0x00fdc, 0x03f9d, 0x03f9e, 0x03f9f, 0x03fa0,
    0x03fa1, 0x03fa2, 0x03fa3, 0x03fa4, 0x03fa5, 0x03fa6, 0x007eb, 0x00fdd,
    0x03fa7, 0x03fa8, 0x03fa9, 0x03faa, 0x03fab, 0x03fac, 0x03fad, 0x03fae,
    0x03faf, 0x03fb0, 0x03fb1, 0x01fbd, 0x03fb2, 0x03fb3, 0x03fb4, 0x03fb5,
    0x03fb6, 0x03fb7, 0x03fb8, 0x03fb9, 0x03fba, 0x03fbb, 0x03fbc, 0x03fbd,
    0x03fbe, 0x03fbf, 0x03fc0, 0x03fc1, 0x03fc2, 0x03fc3, 0x03fc4, 0x03fc5,
    0x03fc6, 0x03fc7, 0x03fc8, 0x03fc9, 0x03fca, 0x03fcb, 0x03fcc, 0x03fcd,
    0x03fce, 0x03fcf, 0x03fd0, 0x03fd1, 0x03fd2, 0x03fd3, 0x03fd4, 0x03fd5,
    0x03fd6, 0x03fd7, 0x03fd8, 0x03fd9, 0x03fda, 0x03fdb, 0x03fdc, 0x03fdd,
    0x03fde, 0x03fdf, 0x03fe0, 0x03fe1, 0x03fe2, 0x03fe3, 0x03fe4, 0x03fe5,
    0x03fe6, 0x03fe7, 0x03fe8, 0x03fe9, 0x03fea, 0x03feb, 0x03fec, 0x03fed,
    0x03fee, 0x03fef, 0x03ff0, 0x03ff1, 0x03ff2, 0x03ff3, 0x03ff4, 0x03ff5,
    0x03ff6, 0x03ff7, 0x03ff8, 0x03ff9, 0x03ffa, 0x03ffb, 0x03ffc, 0x03ffd,
    0x03ffe,
];

pub(super) const HCB9_LENGTHS: [u8; 169] = [
     1,  3,  5,  6,  8,  9, 11, 13,
    15, 15, 14, 14, 14,  3,  4,  6,
     7,  9, 10, 12, 14, 14, 14, 14,
    14, 14,  5,  6,  7,  9, 10, 12,
    14, 14, 14, 14, 14, 14, 14,  6,
     7,  9, 10, 12, 14, 14, 14, 14,
    14, 14, 14, 14,  7,  9, 10, 12,
    14, 14, 14, 14, 14, 14, 14, 14,
    14,  9, 10, 12, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 11, 12,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 13, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14, 14, 14, 14, 14, 14, 14, 14,
    14,
];

pub(super) const HCB10_CODES: [u32; 169] = [
    0x00009, 0x00006, 0x00014, 0x00032, 0x00070, 0x000ee, 0x001ec, 0x003ea,
    0x007e8, 0x00fe6, 0x01fe4, 0x03fe2, 0x07fe0, 0x00002, 0x00000, 0x00007,
    0x00016, 0x00036, 0x00072, 0x000f0, 0x001f3, 0x003ec, 0x007ec, 0x00fee,
    0x01fe8, 0x03fe4, 0x00015, 0x00008, 0x00017, 0x00034, 0x00073, 0x000f1,
    0x001ee, 0x003f2, 0x007ea, 0x00fea, 0x01fe9, 0x03fe5, 0x07fe2, 0x00033,
    0x00018, 0x00035, 0x00074, 0x000f4, 0x001ef, 0x003ee, 0x007f1, 0x00fe8,
    0x01fea, 0x03fea, 0x07fe3, 0x0ffda, 0x00071, 0x00037, 0x00075, 0x000f5,
    0x001f2, 0x003ef, 0x007ed, 0x00fef, 0x01fe6, 0x03feb, 0x07fe8, 0x0ffdc,
    0x1ffde, 0x000ef, 0x00076, 0x000f2, 0x001f0, 0x003f0, 0x007ee, 0x00feb,
    0x01fef, 0x03fe6, 0x07fe9, 0x0ffdd, 0x1ffdf, 0x1ffe0, 0x001ed, 0x000f3,
    0x001f1, 0x003f1, 0x007ef, 0x00fec, 0x01feb, 0x03fec, 0x07fe4, 0x0ffde,
    0x1ffe1, 0x1ffe2, 0x1ffe3, 0x003eb, 0x001f4, 0x003f3, 0x007f2, 0x00ff0,
    0x01ff0, 0x03fed, 0x07fec, 0x0ffdf, 0x1ffe4, 0x1ffe5, 0x1ffe6, 0x1ffe7,
    0x007e9, 0x003ed, 0x007eb, 0x00fe9, 0x01fe7, 0x03fe7, 0x07fe5, 0x0ffe0,
    0x1ffe8, 0x1ffe9, 0x1ffea, 0x1ffeb, 0x1ffec, 0x00fe7, 0x007f0, 0x00fed,
    0x01fec, 0x03fee, 0x07fea, 0x0ffe1, 0x1ffed, 0x1ffee, 0x1ffef, 0x1fff0,
    0x1fff1, 0x1fff2, 0x01fe5, 0x00ff1, 0x01fed, 0x03fef, 0x07feb, 0x0ffe2,
    0x1fff3, 0x1fff4, 0x1fff5, 0x1fff6, 0x1fff7, 0x1fff8, 0x1fff9, 0x03fe3,
    0x01fee, 0x03fe8, 0x07fe6, 0x0ffe3, 0x1fffa, 0x1fffb, 0x1fffc, 0x1fffd,
    0x1fffe, 0x1ffff, 0x0ffe4, 0x0ffe5, 0x07fe1, 0x03fe9, 0x07fe7, 0x0ffdb,
    0x0ffe6, 0x0ffe7, 0x0ffe8, 0x0ffe9, 0x0ffea, 0x0ffeb, 0x0ffec, 0x0ffed,
    0x0ffee,
];

pub(super) const HCB10_LENGTHS: [u8; 169] = [
     4,  4,  5,  6,  7,  8,  9, 10,
    11, 12, 13, 14, 15,  3,  2,  4,
     5,  6,  7,  8,  9, 10, 11, 12,
    13, 14,  5,  4,  5,  6,  7,  8,
     9, 10, 11, 12, 13, 14, 15,  6,
     5,  6,  7,  8,  9, 10, 11, 12,
    13, 14, 15, 16,  7,  6,  7,  8,
     9, 10, 11, 12, 13, 14, 15, 16,
    17,  8,  7,  8,  9, 10, 11, 12,
    13, 14, 15, 16, 17, 17,  9,  8,
     9, 10, 11, 12, 13, 14, 15, 16,
    17, 17, 17, 10,  9, 10, 11, 12,
    13, 14, 15, 16, 17, 17, 17, 17,
    11, 10, 11, 12, 13, 14, 15, 16,
    17, 17, 17, 17, 17, 12, 11, 12,
    13, 14, 15, 16, 17, 17, 17, 17,
    17, 17, 13, 12, 13, 14, 15, 16,
    17, 17, 17, 17, 17, 17, 17, 14,
    13, 14, 15, 16, 17, 17, 17, 17,
    17, 17, 16, 16, 15, 14, 15, 16,
    16, 16, 16, 16, 16, 16, 16, 16,
    16,
];

pub(super) const HCB11_CODES: [u32; 289] = [
    0x00014, 0x00002, 0x00015, 0x00068, 0x001b8, 0x006fc, 0x00ff6, 0x00ff7,
    0x00ff8, 0x00ff9, 0x00ffa, 0x00ffb, 0x00ffc, 0x00ffd, 0x00ffe, 0x00fff,
    0x00704, 0x00003, 0x00000, 0x00008, 0x00017, 0x0006a, 0x001ba, 0x006fe,
    0x00705, 0x00706, 0x00707, 0x00708, 0x00709, 0x0070a, 0x0070b, 0x0070c,
    0x0070d, 0x0070e, 0x00016, 0x00009, 0x00019, 0x0006b, 0x001bd, 0x006ff,
    0x0070f, 0x00710, 0x00711, 0x00712, 0x00713, 0x00714, 0x00715, 0x00716,
    0x00717, 0x00718, 0x00719, 0x00069, 0x00018, 0x0006c, 0x001bb, 0x00700,
    0x0071a, 0x0071b, 0x0071c, 0x0071d, 0x0071e, 0x0071f, 0x00720, 0x00721,
    0x00722, 0x00723, 0x00724, 0x00725, 0x001b9, 0x0006d, 0x001be, 0x00701,
    0x00726, 0x00727, 0x00728, 0x00729, 0x0072a, 0x0072b, 0x0072c, 0x0072d,
    0x0072e, 0x0072f, 0x00730, 0x00731, 0x00732, 0x006fd, 0x001bc, 0x00702,
    0x00733, 0x00734, 0x00735, 0x00736, 0x00737, 0x00738, 0x00739, 0x0073a,
    0x0073b, 0x0073c, 0x0073d, 0x0073e, 0x0073f, 0x00740, 0x00741, 0x00703,
    0x00742, 0x00743, 0x00744, 0x00745, 0x00746, 0x00747, 0x00748, 0x00749,
    0x0074a, 0x0074b, 0x0074c, 0x0074d, 0x0074e, 0x0074f, 0x00750, 0x00751,
    0x00752, 0x00753, 0x00754, 0x00755, 0x00756, 0x00757, 0x00758, 0x00759,
    0x0075a, 0x0075b, 0x0075c, 0x0075d, 0x0075e, 0x0075f, 0x00760, 0x00761,
    0x00762, 0x00763, 0x00764, 0x00765, 0x00766, 0x00767, 0x00768, 0x00769,
    0x0076a, 0x0076b, 0x0076c, 0x0076d, 0x0076e, 0x0076f, 0x00770, 0x00771,
    0x00772, 0x00773, 0x00774, 0x00775, 0x00776, 0x00777, 0x00778, 0x00779,
    0x0077a, 0x0077b, 0x0077c, 0x0077d, 0x0077e, 0x0077f, 0x00780, 0x00781,
    0x00782, 0x00783, 0x00784, 0x00785, 0x00786, 0x00787, 0x00788, 0x00789,
    0x0078a, 0x0078b, 0x0078c, 0x0078d, 0x0078e, 0x0078f, 0x00790, 0x00791,
    0x00792, 0x00793, 0x00794, 0x00795, 0x00796, 0x00797, 0x00798, 0x00799,
    0x0079a, 0x0079b, 0x0079c, 0x0079d, 0x0079e, 0x0079f, 0x007a0, 0x007a1,
    0x007a2, 0x007a3, 0x007a4, 0x007a5, 0x007a6, 0x007a7, 0x007a8, 0x007a9,
    0x007aa, 0x007ab, 0x007ac, 0x007ad, 0x007ae, 0x007af, 0x007b0, 0x007b1,
    0x007b2, 0x007b3, 0x007b4, 0x007b5, 0x007b6, 0x007b7, 0x007b8, 0x007b9,
    0x007ba, 0x007bb, 0x007bc, 0x007bd, 0x007be, 0x007bf, 0x007c0, 0x007c1,
    0x007c2, 0x007c3, 0x007c4, 0x007c5, 0x007c6, 0x007c7, 0x007c8, 0x007c9,
    0x007ca, 0x007cb, 0x007cc, 0x007cd, 0x007ce, 0x007cf, 0x007d0, 0x007d1,
    0x007d2, 0x007d3, 0x007d4, 0x007d5, 0x007d6, 0x007d7, 0x007d8, 0x007d9,
    0x007da, 0x007db, 0x007dc, 0x007dd, 0x007de, 0x007df, 0x007e0, 0x007e1,
    0x007e2, 0x007e3, 0x007e4, 0x007e5, 0x007e6, 0x007e7, 0x007e8, 0x007e9,
    0x007ea, 0x007eb, 0x007ec, 0x007ed, 0x007ee, 0x007ef, 0x007f0, 0x007f1,
    0x007f2, 0x007f3, 0x007f4, 0x007f5, 0x007f6, 0x007f7, 0x007f8, 0x007f9,
    0x007fa,
];

pub(super) const HCB11_LENGTHS: [u8; 289] = [
     5,  3,  5,  7,  9, 11, 12, 12,
    12, 12, 12, 12, 12, 12, 12, 12,
    11,  3,  2,  4,  5,  7,  9, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11,  5,  4,  5,  7,  9, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11,  7,  5,  7,  9, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11,  9,  7,  9, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11,  9, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11,
    11,
];

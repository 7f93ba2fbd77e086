/// Inverse of 2^15, the AAC/16-bit int→float normalization (1/32768)
pub const I16_TO_F32_SCALE: f32 = 1.0 / 32768.0;

/// Inverse of 2^23 for 24-bit int→float (1/8388608)
pub const I24_TO_F32_SCALE: f32 = 1.0 / 8_388_608.0;

/// Inverse of 2^31 for 32-bit int→float
pub const I32_TO_F32_SCALE: f32 = 1.0 / 2_147_483_648.0;

/// Convert i16 sample to f32
#[inline]
pub fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 * I16_TO_F32_SCALE
}

/// Convert a sign-extended 24-bit sample to f32
#[inline]
pub fn i24_to_f32(sample: i32) -> f32 {
    sample as f32 * I24_TO_F32_SCALE
}

/// Convert i32 sample to f32
#[inline]
pub fn i32_to_f32(sample: i32) -> f32 {
    sample as f32 * I32_TO_F32_SCALE
}

/// Normalization factor for an arbitrary bit depth (1 / 2^(bits-1))
#[inline]
pub fn depth_scale(bits: u8) -> f32 {
    1.0 / (1i64 << (bits - 1)) as f32
}

/// Sign-extend the low `bits` of `value`
#[inline]
pub fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Sign-extend the low `bits` of a wide value
#[inline]
pub fn sign_extend64(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

//! Inverse filterbank: FFT-accelerated IMDCT plus windowed overlap-add.
//!
//! The transform runs an N/4 complex FFT between twiddle rotations. Unlike a
//! fixed-window MDCT, windowing is applied outside the transform: an AAC
//! frame's left half uses the previous frame's window shape and its right
//! half the current one, and the transition sequences window only part of
//! the buffer.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WindowShape {
    Sine,
    KaiserBesselDerived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WindowSequence {
    OnlyLong,
    LongStart,
    EightShort,
    LongStop,
}

impl WindowSequence {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => WindowSequence::LongStart,
            2 => WindowSequence::EightShort,
            3 => WindowSequence::LongStop,
            _ => WindowSequence::OnlyLong,
        }
    }
}

/// IMDCT for one window size
struct Imdct {
    n: usize,
    fft: Arc<dyn Fft<f32>>,
    /// e^(i*π/n2 * (k + 1/8))
    twiddle: Vec<Complex<f32>>,
}

impl Imdct {
    fn new(n: usize) -> Self {
        let n2 = n / 2;
        let n4 = n / 4;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n4);
        let twiddle: Vec<Complex<f32>> = (0..n4)
            .map(|k| {
                let theta = PI / n2 as f32 * (k as f32 + 0.125);
                Complex::new(theta.cos(), theta.sin())
            })
            .collect();
        Self { n, fft, twiddle }
    }

    /// N/2 coefficients to N unwindowed time samples
    fn inverse(&self, spec: &[f32]) -> Vec<f32> {
        let n = self.n;
        let n2 = n / 2;
        let n4 = n / 4;
        let n8 = n4 / 2;

        let mut z: Vec<Complex<f32>> = Vec::with_capacity(n4);
        for i in 0..n4 {
            let even = spec[i * 2];
            let odd = -spec[n2 - 1 - i * 2];
            let w = &self.twiddle[i];
            z.push(Complex::new(
                odd * w.im - even * w.re,
                odd * w.re + even * w.im,
            ));
        }

        self.fft.process(&mut z);

        let mut output = vec![0.0; n];
        let scale = 2.0 / n as f32;

        for i in 0..n8 {
            let w = &self.twiddle[i];
            let val_re = w.re * z[i].re + w.im * z[i].im;
            let val_im = w.im * z[i].re - w.re * z[i].im;

            let fi = 2 * i;
            let ri = n4 - 1 - 2 * i;
            output[ri] = -val_im * scale;
            output[n4 + fi] = val_im * scale;
            output[n2 + ri] = val_re * scale;
            output[n2 + n4 + fi] = val_re * scale;
        }
        for i in 0..n8 {
            let idx = n8 + i;
            let w = &self.twiddle[idx];
            let val_re = w.re * z[idx].re + w.im * z[idx].im;
            let val_im = w.im * z[idx].re - w.re * z[idx].im;

            let fi = 2 * i;
            let ri = n4 - 1 - 2 * i;
            output[fi] = -val_re * scale;
            output[n4 + ri] = val_re * scale;
            output[n2 + fi] = val_im * scale;
            output[n2 + n4 + ri] = val_im * scale;
        }

        output
    }
}

/// w[n] = sin(π(n+0.5)/N)
fn sine_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (PI * (i as f32 + 0.5) / n as f32).sin())
        .collect()
}

/// Kaiser-Bessel derived window; α = 4 for long windows, 6 for short
fn kbd_window(n: usize, alpha: f32) -> Vec<f32> {
    let half = n / 2;
    let kaiser: Vec<f32> = (0..=half)
        .map(|i| {
            bessel_i0(PI * alpha * (1.0 - (2.0 * i as f32 / half as f32 - 1.0).powi(2)).sqrt())
        })
        .collect();

    let mut cumsum = vec![0.0f32; half + 1];
    cumsum[0] = kaiser[0];
    for i in 1..=half {
        cumsum[i] = cumsum[i - 1] + kaiser[i];
    }
    let total = cumsum[half];

    let mut window = vec![0.0f32; n];
    for i in 0..half {
        window[i] = (cumsum[i] / total).sqrt();
        window[n - 1 - i] = window[i];
    }
    window
}

/// modified Bessel function of the first kind, order zero
fn bessel_i0(x: f32) -> f32 {
    let mut sum = 1.0f32;
    let mut term = 1.0f32;
    let x_sq = x * x / 4.0;
    for k in 1..20 {
        term *= x_sq / (k * k) as f32;
        sum += term;
        if term < 1e-10 {
            break;
        }
    }
    sum
}

/// Synthesis filterbank for one stream; per-channel overlap state lives in
/// [`ChannelOverlap`] so channel pair elements share the transforms.
pub(super) struct Filterbank {
    long: Imdct,
    short: Imdct,
    sine_long: Vec<f32>,
    kbd_long: Vec<f32>,
    sine_short: Vec<f32>,
    kbd_short: Vec<f32>,
    /// output samples per frame (1024 or 960)
    frame_len: usize,
    /// short-window half length (128 or 120)
    short_len: usize,
}

/// per-channel overlap-add tail and window shape memory
pub(super) struct ChannelOverlap {
    overlap: Vec<f32>,
    prev_shape: WindowShape,
}

impl ChannelOverlap {
    pub fn new(frame_len: usize) -> Self {
        Self {
            overlap: vec![0.0; frame_len],
            prev_shape: WindowShape::Sine,
        }
    }

    pub fn reset(&mut self) {
        self.overlap.fill(0.0);
        self.prev_shape = WindowShape::Sine;
    }
}

impl Filterbank {
    pub fn new(frame_len: usize) -> Self {
        let short_len = frame_len / 8;
        Self {
            long: Imdct::new(frame_len * 2),
            short: Imdct::new(short_len * 2),
            sine_long: sine_window(frame_len * 2),
            kbd_long: kbd_window(frame_len * 2, 4.0),
            sine_short: sine_window(short_len * 2),
            kbd_short: kbd_window(short_len * 2, 6.0),
            frame_len,
            short_len,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    fn long_window(&self, shape: WindowShape) -> &[f32] {
        match shape {
            WindowShape::Sine => &self.sine_long,
            WindowShape::KaiserBesselDerived => &self.kbd_long,
        }
    }

    fn short_window(&self, shape: WindowShape) -> &[f32] {
        match shape {
            WindowShape::Sine => &self.sine_short,
            WindowShape::KaiserBesselDerived => &self.kbd_short,
        }
    }

    /// One frame of synthesis: IMDCT, window, overlap-add. `spec` holds
    /// `frame_len` coefficients (eight consecutive groups for short
    /// windows); returns `frame_len` time samples.
    pub fn synthesize(
        &self,
        state: &mut ChannelOverlap,
        spec: &[f32],
        sequence: WindowSequence,
        shape: WindowShape,
    ) -> Vec<f32> {
        let long = self.frame_len;
        let short = self.short_len;
        // flat run before the first short-window transition
        let flat = (long - short) / 2;

        let w_long = self.long_window(shape);
        let w_long_prev = self.long_window(state.prev_shape);
        let w_short = self.short_window(shape);
        let w_short_prev = self.short_window(state.prev_shape);

        let mut out = vec![0.0f32; long];
        match sequence {
            WindowSequence::OnlyLong => {
                let buf = self.long.inverse(spec);
                for i in 0..long {
                    out[i] = state.overlap[i] + buf[i] * w_long_prev[i];
                }
                for i in 0..long {
                    state.overlap[i] = buf[long + i] * w_long[2 * long - 1 - i];
                }
            }
            WindowSequence::LongStart => {
                let buf = self.long.inverse(spec);
                for i in 0..long {
                    out[i] = state.overlap[i] + buf[i] * w_long_prev[i];
                }
                for i in 0..flat {
                    state.overlap[i] = buf[long + i];
                }
                for i in 0..short {
                    state.overlap[flat + i] = buf[long + flat + i] * w_short[2 * short - 1 - i];
                }
                for i in flat + short..long {
                    state.overlap[i] = 0.0;
                }
            }
            WindowSequence::EightShort => {
                // eight overlapped short transforms laid into a 2*long frame
                let mut temp = vec![0.0f32; 2 * long];
                for k in 0..8 {
                    let buf = self.short.inverse(&spec[k * short..(k + 1) * short]);
                    let w_left = if k == 0 { w_short_prev } else { w_short };
                    let base = flat + k * short;
                    for i in 0..short {
                        temp[base + i] += buf[i] * w_left[i];
                        temp[base + short + i] += buf[short + i] * w_short[2 * short - 1 - i];
                    }
                }
                for i in 0..long {
                    out[i] = state.overlap[i] + temp[i];
                }
                state.overlap.copy_from_slice(&temp[long..]);
            }
            WindowSequence::LongStop => {
                let buf = self.long.inverse(spec);
                for (i, o) in out.iter_mut().enumerate().take(flat) {
                    *o = state.overlap[i];
                }
                for i in 0..short {
                    out[flat + i] = state.overlap[flat + i] + buf[flat + i] * w_short_prev[i];
                }
                for i in flat + short..long {
                    out[i] = state.overlap[i] + buf[i];
                }
                for i in 0..long {
                    state.overlap[i] = buf[long + i] * w_long[2 * long - 1 - i];
                }
            }
        }
        state.prev_shape = shape;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_window_satisfies_princen_bradley() {
        let w = sine_window(256);
        for i in 0..256 {
            let sum = w[i] * w[i] + w[255 - i] * w[255 - i];
            assert!((sum - 1.0).abs() < 1e-5, "at {i}: {sum}");
        }
    }

    #[test]
    fn kbd_window_satisfies_princen_bradley() {
        let w = kbd_window(2048, 4.0);
        for i in 0..2048 {
            let sum = w[i] * w[i] + w[2047 - i] * w[2047 - i];
            assert!((sum - 1.0).abs() < 1e-4, "at {i}: {sum}");
        }
    }

    #[test]
    fn zero_spectrum_synthesizes_silence() {
        let fb = Filterbank::new(1024);
        let mut state = ChannelOverlap::new(1024);
        let spec = vec![0.0f32; 1024];
        let out = fb.synthesize(&mut state, &spec, WindowSequence::OnlyLong, WindowShape::Sine);
        assert_eq!(out.len(), 1024);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn imdct_output_is_time_symmetric() {
        // single-coefficient inverse: first half antisymmetric about n/4,
        // second half symmetric about 3n/4
        let imdct = Imdct::new(256);
        let mut spec = vec![0.0f32; 128];
        spec[3] = 1.0;
        let out = imdct.inverse(&spec);
        for i in 0..64 {
            assert!((out[i] + out[127 - i]).abs() < 1e-4);
            assert!((out[128 + i] - out[255 - i]).abs() < 1e-4);
        }
    }

    #[test]
    fn overlap_carries_between_frames() {
        let fb = Filterbank::new(1024);
        let mut state = ChannelOverlap::new(1024);
        let mut spec = vec![0.0f32; 1024];
        spec[0] = 1.0;
        fb.synthesize(&mut state, &spec, WindowSequence::OnlyLong, WindowShape::Sine);
        // the second frame sees the first frame's tail even with no signal
        let silent = vec![0.0f32; 1024];
        let out = fb.synthesize(&mut state, &silent, WindowSequence::OnlyLong, WindowShape::Sine);
        assert!(out.iter().any(|&s| s != 0.0));
        state.reset();
        let out = fb.synthesize(&mut state, &silent, WindowSequence::OnlyLong, WindowShape::Sine);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn short_sequence_spans_the_frame() {
        let fb = Filterbank::new(1024);
        let mut state = ChannelOverlap::new(1024);
        let mut spec = vec![0.0f32; 1024];
        for k in 0..8 {
            spec[k * 128] = 1.0;
        }
        let out = fb.synthesize(
            &mut state,
            &spec,
            WindowSequence::EightShort,
            WindowShape::Sine,
        );
        assert_eq!(out.len(), 1024);
        assert!(out.iter().any(|&s| s != 0.0));
    }
}

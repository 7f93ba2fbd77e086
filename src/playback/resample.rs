//! Sample rate conversion at the orchestration boundary.
//!
//! Upsampling interpolates linearly between neighbouring input frames;
//! downsampling averages an accumulator across the input span each output
//! frame covers. State carries across calls so chunk boundaries introduce
//! no discontinuity.

pub struct Resampler {
    from: u32,
    to: u32,
    channels: usize,
    /// last input frame, the left neighbour for interpolation
    last: Vec<f32>,
    primed: bool,
    /// fractional input position past `last`
    frac: f64,
    /// downsampling accumulator and its accumulated input weight
    acc: Vec<f64>,
    acc_weight: f64,
}

impl Resampler {
    pub fn new(from: u32, to: u32, channels: usize) -> Self {
        Self {
            from,
            to,
            channels,
            last: vec![0.0; channels],
            primed: false,
            frac: 0.0,
            acc: vec![0.0; channels],
            acc_weight: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// convert interleaved input frames; output length varies by phase
    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        if self.is_identity() {
            return input.to_vec();
        }
        if self.to > self.from {
            self.upsample(input)
        } else {
            self.downsample(input)
        }
    }

    fn upsample(&mut self, input: &[f32]) -> Vec<f32> {
        let step = self.from as f64 / self.to as f64;
        let frames = input.len() / self.channels;
        let mut out = Vec::with_capacity(((frames as f64 / step) as usize + 2) * self.channels);

        for f in 0..frames {
            let frame = &input[f * self.channels..(f + 1) * self.channels];
            if !self.primed {
                self.last.copy_from_slice(frame);
                self.primed = true;
                continue;
            }
            // emit every output position in [last, frame)
            while self.frac < 1.0 {
                let t = self.frac as f32;
                for ch in 0..self.channels {
                    out.push(self.last[ch] * (1.0 - t) + frame[ch] * t);
                }
                self.frac += step;
            }
            self.frac -= 1.0;
            self.last.copy_from_slice(frame);
        }
        out
    }

    fn downsample(&mut self, input: &[f32]) -> Vec<f32> {
        let span = self.from as f64 / self.to as f64;
        let frames = input.len() / self.channels;
        let mut out = Vec::with_capacity((frames as f64 / span) as usize * self.channels + self.channels);

        for f in 0..frames {
            let frame = &input[f * self.channels..(f + 1) * self.channels];
            for ch in 0..self.channels {
                self.acc[ch] += frame[ch] as f64;
            }
            self.acc_weight += 1.0;
            if self.acc_weight >= span {
                for ch in 0..self.channels {
                    out.push((self.acc[ch] / self.acc_weight) as f32);
                    self.acc[ch] = 0.0;
                }
                self.acc_weight -= span;
                // the leftover fraction stays in the next window empty;
                // a box average keeps this simple and alias-safe enough
                self.acc_weight = self.acc_weight.max(0.0);
            }
        }
        out
    }

    /// drop carried state (after a seek)
    pub fn reset(&mut self) {
        self.last.fill(0.0);
        self.primed = false;
        self.frac = 0.0;
        self.acc.fill(0.0);
        self.acc_weight = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passthrough() {
        let mut rs = Resampler::new(44100, 44100, 2);
        let input = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(rs.process(&input), input);
    }

    #[test]
    fn doubling_interpolates_midpoints() {
        let mut rs = Resampler::new(100, 200, 1);
        let out = rs.process(&[0.0, 1.0, 2.0]);
        // first frame primes; then two outputs per input interval
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
        assert!((out[3] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn halving_averages_pairs() {
        let mut rs = Resampler::new(200, 100, 1);
        let out = rs.process(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out[1] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn state_carries_across_chunks() {
        let mut whole = Resampler::new(100, 200, 1);
        let expected = whole.process(&[0.0, 1.0, 2.0, 3.0]);

        let mut split = Resampler::new(100, 200, 1);
        let mut got = split.process(&[0.0, 1.0]);
        got.extend(split.process(&[2.0, 3.0]));
        assert_eq!(got, expected);
    }
}

//! Predictor reconstruction: the four fixed polynomial orders and the
//! quantized-coefficient linear predictor. Accumulation is 64-bit so a
//! 32-bit stream with a large shift cannot overflow mid-sum.

/// In-place fixed-order reconstruction over warm-up samples + residual.
pub fn reconstruct_fixed(samples: &mut [i64], order: usize) {
    match order {
        0 => {}
        1 => {
            for i in 1..samples.len() {
                samples[i] += samples[i - 1];
            }
        }
        2 => {
            for i in 2..samples.len() {
                samples[i] += 2 * samples[i - 1] - samples[i - 2];
            }
        }
        3 => {
            for i in 3..samples.len() {
                samples[i] += 3 * samples[i - 1] - 3 * samples[i - 2] + samples[i - 3];
            }
        }
        4 => {
            for i in 4..samples.len() {
                samples[i] +=
                    4 * samples[i - 1] - 6 * samples[i - 2] + 4 * samples[i - 3] - samples[i - 4];
            }
        }
        _ => debug_assert!(false, "fixed order beyond 4"),
    }
}

/// In-place quantized LPC reconstruction. `samples[..coeffs.len()]` are the
/// warm-up values; the rest hold residuals on entry.
pub fn reconstruct_lpc(samples: &mut [i64], coeffs: &[i32], shift: u32) {
    let order = coeffs.len();
    for i in order..samples.len() {
        let mut prediction: i64 = 0;
        for (j, &coeff) in coeffs.iter().enumerate() {
            prediction += coeff as i64 * samples[i - j - 1];
        }
        samples[i] += prediction >> shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_order_one_integrates() {
        let mut samples = vec![10, 1, -2, 3];
        reconstruct_fixed(&mut samples, 1);
        assert_eq!(samples, vec![10, 11, 9, 12]);
    }

    #[test]
    fn fixed_order_two_recovers_ramp() {
        // a linear ramp has zero second difference
        let mut samples = vec![0, 5, 0, 0, 0];
        reconstruct_fixed(&mut samples, 2);
        assert_eq!(samples, vec![0, 5, 10, 15, 20]);
    }

    #[test]
    fn lpc_shift_applies_after_accumulation() {
        // coeff 2 at shift 1 predicts the previous sample exactly
        let mut samples = vec![100, 0, 0];
        reconstruct_lpc(&mut samples, &[2], 1);
        assert_eq!(samples, vec![100, 100, 100]);
    }
}

use std::cmp::Ordering;

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::error::{LipError, LipResult};

fn forward(signal: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

fn inverse(mut spectrum: Vec<Complex<f64>>) -> Vec<f64> {
    let n = spectrum.len();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_inverse(n);
    fft.process(&mut spectrum);
    let scale = 1.0 / n as f64;
    spectrum.into_iter().map(|c| c.re * scale).collect()
}

/// Indices of the `top_n` strongest non-DC frequency bins, ascending.
///
/// Bins are ranked with a stable ascending sort on magnitude and the tail is
/// kept, so among equal magnitudes the higher bin wins the last slot.
pub fn dominant_frequencies(signal: &[f64], top_n: usize) -> Vec<usize> {
    if signal.is_empty() || top_n == 0 {
        return Vec::new();
    }
    let mut amplitudes: Vec<f64> = forward(signal).iter().map(|c| c.norm()).collect();
    amplitudes[0] = 0.0;

    let mut order: Vec<usize> = (0..amplitudes.len()).collect();
    order.sort_by(|&a, &b| {
        amplitudes[a]
            .partial_cmp(&amplitudes[b])
            .unwrap_or(Ordering::Equal)
    });
    let start = order.len().saturating_sub(top_n);
    let mut top = order.split_off(start);
    top.sort_unstable();
    top
}

/// Band-limited reconstruction keeping only `bins` and their mirrored
/// negative-frequency partners. The result has the input's length.
pub fn reconstruct_from_frequencies(signal: &[f64], bins: &[usize]) -> LipResult<Vec<f64>> {
    let n = signal.len();
    if n == 0 {
        return Err(LipError::EmptySignature);
    }
    let spectrum = forward(signal);
    let mut filtered = vec![Complex::new(0.0, 0.0); n];
    for &idx in bins {
        if idx >= n {
            return Err(LipError::InvalidConfig(format!(
                "frequency bin {idx} is outside a spectrum of {n} bins"
            )));
        }
        filtered[idx] = spectrum[idx];
        if idx != 0 {
            filtered[n - idx] = spectrum[n - idx];
        }
    }
    Ok(inverse(filtered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn two_tone(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                3.0 + 2.0 * (2.0 * PI * 3.0 * t).cos() + 0.5 * (2.0 * PI * 7.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn dominant_bins_skip_dc() {
        let signal = two_tone(180);
        let bins = dominant_frequencies(&signal, 4);
        assert_eq!(bins, vec![3, 7, 173, 177]);
    }

    #[test]
    fn all_bins_reconstruct_losslessly() {
        let signal = two_tone(64);
        let bins: Vec<usize> = (0..signal.len()).collect();
        let rebuilt = reconstruct_from_frequencies(&signal, &bins).unwrap();
        for (a, b) in signal.iter().zip(rebuilt.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn non_dc_bins_reconstruct_zero_mean_signals() {
        let signal: Vec<f64> = two_tone(90).into_iter().map(|v| v - 3.0).collect();
        let bins: Vec<usize> = (1..signal.len()).collect();
        let rebuilt = reconstruct_from_frequencies(&signal, &bins).unwrap();
        for (a, b) in signal.iter().zip(rebuilt.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_band_reconstruction_drops_other_tones() {
        let signal = two_tone(120);
        let rebuilt = reconstruct_from_frequencies(&signal, &[3]).unwrap();
        for (i, value) in rebuilt.iter().enumerate() {
            let t = i as f64 / 120.0;
            assert_abs_diff_eq!(*value, 2.0 * (2.0 * PI * 3.0 * t).cos(), epsilon = 1e-9);
        }
    }

    #[test]
    fn out_of_range_bin_is_rejected() {
        assert!(reconstruct_from_frequencies(&[1.0, 2.0], &[2]).is_err());
    }
}

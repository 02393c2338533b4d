use std::cmp::Ordering;

use indexmap::IndexSet;
use log::debug;

use crate::error::{LipError, LipResult};
use crate::representative::extrema::{ExtremaConfig, SignalFeatures, detect_signal_features};
use crate::representative::spectrum::{dominant_frequencies, reconstruct_from_frequencies};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    pub top_n_freq: usize,
    pub n_representatives: usize,
    pub extrema: ExtremaConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_n_freq: 10,
            n_representatives: 10,
            extrema: ExtremaConfig::default(),
        }
    }
}

/// Result of compressing a signature to a few representative positions.
///
/// Only `indices` feeds the feature vector; the rest is kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentativeSelection {
    /// Ascending, unique, at most `n_representatives` long.
    pub indices: Vec<usize>,
    pub frequency_bins: Vec<usize>,
    pub reconstructed: Vec<f64>,
    pub features: SignalFeatures,
}

/// Pick `n_representatives` positions spread over the peaks, troughs and
/// plateaus of the band-limited reconstruction of `signature`.
///
/// Peaks and troughs get `n / 3` slots each and plateaus the rest. Missing
/// slots are filled with the positions of largest reconstructed magnitude.
/// Signatures shorter than the quota return every position.
pub fn select_representative_indices(
    signature: &[f64],
    config: &SelectorConfig,
) -> LipResult<RepresentativeSelection> {
    if signature.is_empty() {
        return Err(LipError::EmptySignature);
    }
    let quota = config.n_representatives;
    let frequency_bins = dominant_frequencies(signature, config.top_n_freq);
    let reconstructed = reconstruct_from_frequencies(signature, &frequency_bins)?;
    let features = detect_signal_features(&reconstructed, &config.extrema);

    let per_type = quota / 3;
    let plateau_quota = quota - 2 * per_type;

    let mut selected: IndexSet<usize> = IndexSet::with_capacity(quota);
    selected.extend(features.peaks.iter().copied().take(per_type));
    selected.extend(features.troughs.iter().copied().take(per_type));
    selected.extend(features.plateau_centers().into_iter().take(plateau_quota));

    let from_extrema = selected.len();
    if selected.len() < quota {
        for idx in by_descending_magnitude(&reconstructed) {
            if selected.len() >= quota {
                break;
            }
            selected.insert(idx);
        }
    }
    debug!(
        "Representatives: {} from extrema, {} from magnitude fallback",
        from_extrema.min(quota),
        selected.len().saturating_sub(from_extrema)
    );

    let mut indices: Vec<usize> = selected.into_iter().take(quota).collect();
    indices.sort_unstable();

    Ok(RepresentativeSelection {
        indices,
        frequency_bins,
        reconstructed,
        features,
    })
}

/// Positions ordered by `|value|`, largest first; ties keep index order.
fn by_descending_magnitude(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .abs()
            .partial_cmp(&values[a].abs())
            .unwrap_or(Ordering::Equal)
    });
    order
}

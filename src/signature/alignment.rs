use serde::{Deserialize, Serialize};

use crate::error::{LipError, LipResult};

/// How a shifted signature is mirrored when the rotation sense is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorMode {
    /// Reverse the whole sequence; the anchor sample ends up last.
    #[default]
    Reverse,
    /// Reflect about index 0 (`v[i] <- v[(m - i) mod m]`); the anchor stays first.
    Reflect,
}

impl MirrorMode {
    pub fn apply(self, values: &mut [f64]) {
        match self {
            MirrorMode::Reverse => values.reverse(),
            MirrorMode::Reflect => {
                if values.len() > 1 {
                    values[1..].reverse();
                }
            }
        }
    }
}

/// Outcome of aligning one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Left rotation applied, equal to the index of the raw LIP0 maximum.
    pub shift: usize,
    pub mirrored: bool,
    /// Raw LIP0 maximum.
    pub peak: f64,
    pub orientation_merit: f64,
}

/// Decide the shift and mirror state from the unshifted LIP0 signature.
pub(crate) fn plan(lip0: &[f64]) -> LipResult<Alignment> {
    let (max_idx, max_value, min_idx) = extrema(lip0).ok_or(LipError::EmptySignature)?;
    Ok(Alignment {
        shift: max_idx,
        mirrored: min_idx < lip0.len() / 2,
        peak: max_value,
        orientation_merit: orientation_merit(max_value),
    })
}

/// `1 - exp(1 - peak)`: zero at a unit peak, negative below it.
pub fn orientation_merit(peak: f64) -> f64 {
    1.0 - (1.0 - peak).exp()
}

/// `shifted[i] = values[(i + shift) mod m]`.
pub fn circular_shift(values: &[f64], shift: usize) -> Vec<f64> {
    let mut shifted = values.to_vec();
    if !shifted.is_empty() {
        shifted.rotate_left(shift % values.len());
    }
    shifted
}

/// First index of the maximum, its value, and first index of the minimum.
fn extrema(values: &[f64]) -> Option<(usize, f64, usize)> {
    let (&first, rest) = values.split_first()?;
    let (mut max_idx, mut max_value) = (0, first);
    let (mut min_idx, mut min_value) = (0, first);
    for (offset, &value) in rest.iter().enumerate() {
        if value > max_value {
            max_value = value;
            max_idx = offset + 1;
        }
        if value < min_value {
            min_value = value;
            min_idx = offset + 1;
        }
    }
    Some((max_idx, max_value, min_idx))
}

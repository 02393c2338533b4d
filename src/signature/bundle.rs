use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::descriptor::{LIP_COUNT, LipDescriptor};
use crate::error::{LipError, LipResult};
use crate::signature::alignment::{self, Alignment, MirrorMode};
use crate::sinogram::Sinogram;

/// The six LIP signatures of one direction, kept in lock-step.
///
/// Every sequence has the same length and any reordering is applied to all of
/// them at once, so their angular positions never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureBundle {
    lips: [Vec<f64>; LIP_COUNT],
}

impl SignatureBundle {
    /// Run the descriptor extractor over every angle column of the sinogram.
    pub fn from_sinogram(sinogram: &Sinogram) -> Self {
        let angles = sinogram.angle_count();
        let mut lips: [Vec<f64>; LIP_COUNT] = std::array::from_fn(|_| Vec::with_capacity(angles));
        for profile in sinogram.columns() {
            let values = LipDescriptor::from_profile(profile).to_array();
            for (lip, value) in lips.iter_mut().zip(values) {
                lip.push(value);
            }
        }
        debug!(
            "Built signatures over {} angles ({} radial bins)",
            angles,
            sinogram.radial_bins()
        );
        Self { lips }
    }

    pub fn from_lips(lips: [Vec<f64>; LIP_COUNT]) -> LipResult<Self> {
        let expected = lips[0].len();
        for lip in &lips[1..] {
            if lip.len() != expected {
                return Err(LipError::LengthMismatch {
                    what: "LIP signature",
                    expected,
                    actual: lip.len(),
                });
            }
        }
        Ok(Self { lips })
    }

    /// Read a matrix laid out as one row per angle and one column per descriptor.
    pub fn from_matrix(matrix: ArrayView2<'_, f64>) -> LipResult<Self> {
        if matrix.ncols() != LIP_COUNT {
            return Err(LipError::InvalidMatrix(format!(
                "expected {} columns, got {}",
                LIP_COUNT,
                matrix.ncols()
            )));
        }
        let lips = std::array::from_fn(|i| matrix.column(i).to_vec());
        Ok(Self { lips })
    }

    /// One row per angle, one column per descriptor.
    pub fn to_matrix(&self) -> Array2<f64> {
        let rows = self.len();
        Array2::from_shape_fn((rows, LIP_COUNT), |(row, col)| self.lips[col][row])
    }

    pub fn len(&self) -> usize {
        self.lips[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lip(&self, index: usize) -> &[f64] {
        &self.lips[index]
    }

    pub fn lip0(&self) -> &[f64] {
        &self.lips[0]
    }

    /// Left-rotate every signature by `shift` positions.
    pub fn shift(&mut self, shift: usize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        for lip in &mut self.lips {
            lip.rotate_left(shift % len);
        }
    }

    pub fn mirror(&mut self, mode: MirrorMode) {
        for lip in &mut self.lips {
            mode.apply(lip);
        }
    }

    /// Merit of the LIP0 peak without reordering anything; used on signatures
    /// read back from disk.
    pub fn orientation_merit(&self) -> LipResult<f64> {
        Ok(alignment::plan(self.lip0())?.orientation_merit)
    }

    /// Normalise orientation: bring the LIP0 maximum to the front, then mirror
    /// when the LIP0 minimum sat in the first half.
    pub fn align(&mut self, mirror: MirrorMode) -> LipResult<Alignment> {
        let alignment = alignment::plan(self.lip0())?;
        self.shift(alignment.shift);
        if alignment.mirrored {
            self.mirror(mirror);
        }
        debug!(
            "Aligned {} samples: shift {}, mirrored {}, merit {:.6}",
            self.len(),
            alignment.shift,
            alignment.mirrored,
            alignment.orientation_merit
        );
        Ok(alignment)
    }
}

use ndarray::{Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use crate::error::{LipError, LipResult};

/// Projection data indexed `[radial_bin, angle_index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sinogram {
    data: Array2<f64>,
}

impl Sinogram {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    pub fn radial_bins(&self) -> usize {
        self.data.nrows()
    }

    pub fn angle_count(&self) -> usize {
        self.data.ncols()
    }

    /// Profile of one projection angle.
    pub fn column(&self, index: usize) -> LipResult<ArrayView1<'_, f64>> {
        if index >= self.angle_count() {
            return Err(LipError::ColumnOutOfRange {
                index,
                columns: self.angle_count(),
            });
        }
        Ok(self.data.column(index))
    }

    pub fn columns(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.columns().into_iter()
    }
}

/// Evenly spaced projection angles in degrees: `k * range / count` for `k < count`.
pub fn projection_angles(count: usize, range_deg: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = range_deg / count as f64;
    (0..count).map(|k| k as f64 * step).collect()
}

/// Anything able to turn a grayscale image into a sinogram.
pub trait SinogramTransform {
    fn transform(&self, image: ArrayView2<'_, f64>, angles_deg: &[f64]) -> Sinogram;
}

/// Parallel-beam Radon transform over a zero-padded square canvas.
///
/// The image is centred on a square of side `ceil(sqrt(2) * max(h, w))` so that
/// no part of it leaves the canvas under rotation. Each projection rotates the
/// sampling grid about the canvas centre, interpolates bilinearly and sums
/// along rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct RadonTransform;

impl SinogramTransform for RadonTransform {
    fn transform(&self, image: ArrayView2<'_, f64>, angles_deg: &[f64]) -> Sinogram {
        let canvas = pad_to_square(image);
        let side = canvas.nrows();
        let center = (side / 2) as f64;

        let projections: Vec<Vec<f64>> = angles_deg
            .par_iter()
            .map(|angle| project(&canvas, center, angle.to_radians()))
            .collect();

        let mut data = Array2::zeros((side, angles_deg.len()));
        for (col, projection) in projections.into_iter().enumerate() {
            for (row, value) in projection.into_iter().enumerate() {
                data[(row, col)] = value;
            }
        }
        Sinogram::new(data)
    }
}

fn pad_to_square(image: ArrayView2<'_, f64>) -> Array2<f64> {
    let (h, w) = image.dim();
    let diagonal = std::f64::consts::SQRT_2 * h.max(w) as f64;
    let pad_h = (diagonal - h as f64).ceil().max(0.0) as usize;
    let pad_w = (diagonal - w as f64).ceil().max(0.0) as usize;
    let before_h = (h + pad_h) / 2 - h / 2;
    let before_w = (w + pad_w) / 2 - w / 2;

    // Both sides round to ceil(diagonal); take the max in case of float jitter.
    let side = (h + pad_h).max(w + pad_w);
    let mut canvas = Array2::zeros((side, side));
    for ((y, x), value) in image.indexed_iter() {
        canvas[(y + before_h, x + before_w)] = *value;
    }
    canvas
}

fn project(canvas: &Array2<f64>, center: f64, theta: f64) -> Vec<f64> {
    let side = canvas.nrows();
    let (sin_t, cos_t) = theta.sin_cos();
    let mut sums = vec![0.0; side];
    for (x, sum) in sums.iter_mut().enumerate() {
        let dx = x as f64 - center;
        let mut acc = 0.0;
        for y in 0..side {
            let dy = y as f64 - center;
            let src_x = center + cos_t * dx + sin_t * dy;
            let src_y = center - sin_t * dx + cos_t * dy;
            acc += bilinear(canvas, src_y, src_x);
        }
        *sum = acc;
    }
    sums
}

fn bilinear(canvas: &Array2<f64>, y: f64, x: f64) -> f64 {
    let (h, w) = canvas.dim();
    let y0 = y.floor();
    let x0 = x.floor();
    let fy = y - y0;
    let fx = x - x0;
    let pixel = |yy: f64, xx: f64| -> f64 {
        if yy < 0.0 || xx < 0.0 || yy >= h as f64 || xx >= w as f64 {
            0.0
        } else {
            canvas[(yy as usize, xx as usize)]
        }
    };
    let top = pixel(y0, x0) * (1.0 - fx) + pixel(y0, x0 + 1.0) * fx;
    let bottom = pixel(y0 + 1.0, x0) * (1.0 - fx) + pixel(y0 + 1.0, x0 + 1.0) * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn angles_cover_half_turn_without_endpoint() {
        let angles = projection_angles(180, 180.0);
        assert_eq!(angles.len(), 180);
        assert_abs_diff_eq!(angles[0], 0.0);
        assert_abs_diff_eq!(angles[1], 1.0);
        assert_abs_diff_eq!(angles[179], 179.0);
    }

    #[test]
    fn column_rejects_out_of_range_index() {
        let sinogram = Sinogram::new(Array2::zeros((4, 3)));
        assert!(sinogram.column(2).is_ok());
        assert_eq!(
            sinogram.column(3).unwrap_err(),
            LipError::ColumnOutOfRange {
                index: 3,
                columns: 3
            }
        );
    }

    #[test]
    fn radon_preserves_mass_at_axis_aligned_angles() {
        let mut image = Array2::zeros((8, 8));
        for y in 2..6 {
            for x in 3..5 {
                image[(y, x)] = 1.0;
            }
        }
        let angles = [0.0, 90.0];
        let sinogram = RadonTransform.transform(image.view(), &angles);
        assert_eq!(sinogram.angle_count(), 2);
        assert_eq!(sinogram.radial_bins(), 12);
        for col in sinogram.columns() {
            assert_abs_diff_eq!(col.sum(), 8.0, epsilon = 1e-9);
        }
        // at 0 degrees the projection sums columns: width 2, height 4
        let zero = sinogram.column(0).unwrap();
        let support = zero.iter().filter(|v| **v > 1e-9).count();
        assert_eq!(support, 2);
        assert_abs_diff_eq!(zero.iter().cloned().fold(0.0, f64::max), 4.0, epsilon = 1e-9);
    }
}

//! Grayscale image loading and silhouette shape measures.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use ndarray::{Array2, ArrayView2};

/// Load any format supported by `image` (PGM, PNG, ...) as 8-bit gray,
/// returned as `[row, col]` floats in `0..=255`.
pub fn load_grayscale(path: &Path) -> Result<Array2<f64>> {
    let img = image::open(path)
        .with_context(|| format!("open image {:?}", path))?
        .into_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<f64> = img.into_raw().into_iter().map(f64::from).collect();
    Array2::from_shape_vec((height, width), pixels)
        .with_context(|| format!("reshape {}x{} image {:?}", width, height, path))
}

/// Foreground mask (`value > 0`) with background holes smaller than
/// `max_hole_area` pixels filled. Holes are 4-connected background
/// components that do not touch the image border.
pub fn close_small_holes(image: ArrayView2<'_, f64>, max_hole_area: usize) -> Array2<bool> {
    let (h, w) = image.dim();
    let mut mask = image.mapv(|v| v > 0.0);

    // label the background; foreground pixels are label 0
    let background = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([if mask[(y as usize, x as usize)] { 0 } else { 255 }])
    });
    let labels = connected_components(&background, Connectivity::Four, Luma([0u8]));

    let count = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
    let mut area = vec![0usize; count + 1];
    let mut touches_border = vec![false; count + 1];
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        area[label] += 1;
        if x == 0 || y == 0 || x as usize + 1 == w || y as usize + 1 == h {
            touches_border[label] = true;
        }
    }

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label != 0 && !touches_border[label] && area[label] < max_hole_area {
            mask[(y as usize, x as usize)] = true;
        }
    }
    mask
}

/// Two-direction Cauchy-Crofton perimeter estimate: `pi/4` times the number of
/// foreground/background transitions along rows and columns, with the mask
/// treated as surrounded by background.
pub fn crofton_perimeter(mask: ArrayView2<'_, bool>) -> f64 {
    let (h, w) = mask.dim();
    let at = |y: isize, x: isize| -> bool {
        y >= 0 && x >= 0 && (y as usize) < h && (x as usize) < w && mask[(y as usize, x as usize)]
    };
    let mut transitions = 0usize;
    for y in 0..h as isize {
        for x in -1..w as isize {
            if at(y, x) != at(y, x + 1) {
                transitions += 1;
            }
        }
    }
    for x in 0..w as isize {
        for y in -1..h as isize {
            if at(y, x) != at(y + 1, x) {
                transitions += 1;
            }
        }
    }
    PI / 4.0 * transitions as f64
}

/// `4 * pi * area / perimeter^2` of the closed silhouette; zero when empty.
pub fn circularity(image: ArrayView2<'_, f64>, max_hole_area: usize) -> f64 {
    let mask = close_small_holes(image, max_hole_area);
    let area = mask.iter().filter(|v| **v).count() as f64;
    let perimeter = crofton_perimeter(mask.view());
    if perimeter <= f64::EPSILON {
        return 0.0;
    }
    4.0 * PI * area / (perimeter * perimeter)
}

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;
use ndarray::ArrayView2;

use crate::config::PipelineConfig;
use crate::image::load_grayscale;
use crate::io::{lip_csv_path, write_lip_matrix};
use crate::signature::{Direction, DirectionSignatures, ObjectSignatures, SignatureBundle};
use crate::sinogram::{RadonTransform, SinogramTransform, projection_angles};

/// Projection images to aligned signatures, one direction at a time.
pub struct SignatureWorkflow<T = RadonTransform> {
    config: PipelineConfig,
    transform: T,
}

impl SignatureWorkflow<RadonTransform> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_transform(config, RadonTransform)
    }
}

impl<T: SinogramTransform> SignatureWorkflow<T> {
    pub fn with_transform(config: PipelineConfig, transform: T) -> Self {
        Self { config, transform }
    }

    /// Sinogram, descriptors and alignment for a single image.
    pub fn direction(
        &self,
        direction: Direction,
        image: ArrayView2<'_, f64>,
    ) -> Result<DirectionSignatures> {
        let angles = projection_angles(self.config.angle_count, self.config.angle_range_deg);
        let sinogram = self.transform.transform(image, &angles);
        let mut bundle = SignatureBundle::from_sinogram(&sinogram);
        let alignment = bundle
            .align(self.config.mirror)
            .with_context(|| format!("align signatures of direction {}", direction))?;
        Ok(DirectionSignatures {
            direction,
            bundle,
            alignment,
        })
    }

    /// Images given in m, s, t order.
    pub fn execute(&self, images: [ArrayView2<'_, f64>; 3]) -> Result<SignatureSummary> {
        let start = Instant::now();
        let [m, s, t] = images;
        let directions = [
            self.direction(Direction::M, m)?,
            self.direction(Direction::S, s)?,
            self.direction(Direction::T, t)?,
        ];
        let signatures = ObjectSignatures::new(directions)?;
        let duration = start.elapsed();
        for record in signatures.iter() {
            info!(
                "Direction {}: {} angles, shift {}, mirrored {}, merit {:.4}",
                record.direction,
                record.bundle.len(),
                record.alignment.shift,
                record.alignment.mirrored,
                record.orientation_merit()
            );
        }
        Ok(SignatureSummary {
            signatures,
            duration,
        })
    }

    /// Load the three images, build their signatures and store one CSV per
    /// direction under `out_dir`.
    pub fn execute_files(
        &self,
        images: [&Path; 3],
        out_dir: &Path,
        stem: &str,
    ) -> Result<SignatureFiles> {
        let load_start = Instant::now();
        let [m, s, t] = images;
        let loaded = [load_grayscale(m)?, load_grayscale(s)?, load_grayscale(t)?];
        let load_duration = load_start.elapsed();
        info!(
            "Loaded projections {}x{}, {}x{}, {}x{}",
            loaded[0].nrows(),
            loaded[0].ncols(),
            loaded[1].nrows(),
            loaded[1].ncols(),
            loaded[2].nrows(),
            loaded[2].ncols()
        );

        let summary = self.execute([loaded[0].view(), loaded[1].view(), loaded[2].view()])?;

        let mut paths = Vec::with_capacity(3);
        for record in summary.signatures.iter() {
            let path = lip_csv_path(out_dir, stem, record.direction);
            write_lip_matrix(&path, record.bundle.to_matrix().view())?;
            paths.push(path);
        }
        info!(
            "Wrote signatures for '{}' to {:?} in {:.2?} (load {:.2?})",
            stem, out_dir, summary.duration, load_duration
        );
        Ok(SignatureFiles {
            summary,
            paths,
            load_duration,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignatureSummary {
    pub signatures: ObjectSignatures,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct SignatureFiles {
    pub summary: SignatureSummary,
    /// CSV paths in m, s, t order.
    pub paths: Vec<PathBuf>,
    pub load_duration: Duration,
}

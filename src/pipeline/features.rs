use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};
use ndarray::{Array2, ArrayView2};

use crate::config::PipelineConfig;
use crate::error::LipResult;
use crate::image::{circularity, load_grayscale};
use crate::io::read_lip_matrix;
use crate::signature::{Direction, SignatureBundle};

/// `1 - exp(1 - max(LIP0))` of a stored, already aligned LIP matrix.
pub fn orientation_merit(matrix: ArrayView2<'_, f64>) -> LipResult<f64> {
    SignatureBundle::from_matrix(matrix)?.orientation_merit()
}

/// The three direction matrices of one object in m, s, t order, plus the
/// optional projection images used for circularity.
#[derive(Debug, Clone)]
pub struct FeatureInput {
    pub matrices: [Array2<f64>; 3],
    pub profiles: Option<[Array2<f64>; 3]>,
}

impl FeatureInput {
    pub fn from_paths(csv: [&Path; 3], profiles: Option<[&Path; 3]>) -> Result<Self> {
        let [m, s, t] = csv;
        let matrices = [read_lip_matrix(m)?, read_lip_matrix(s)?, read_lip_matrix(t)?];
        let profiles = match profiles {
            Some([pm, ps, pt]) => Some([load_grayscale(pm)?, load_grayscale(ps)?, load_grayscale(pt)?]),
            None => None,
        };
        Ok(Self { matrices, profiles })
    }
}

/// LIP matrices to a single fixed-length feature vector.
pub struct FeatureWorkflow {
    config: PipelineConfig,
}

impl FeatureWorkflow {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate().context("validate feature configuration")?;
        Ok(Self { config })
    }

    pub fn execute(&self, input: &FeatureInput) -> Result<FeatureSummary> {
        let start = Instant::now();
        let aggregator = self.config.aggregator();
        let assembler = self.config.assembler()?;

        let mut local: [Vec<f64>; 3] = Default::default();
        for direction in Direction::ALL {
            let matrix = input.matrices[direction.index()].view();
            local[direction.index()] = aggregator
                .aggregate(matrix)
                .with_context(|| format!("aggregate direction {}", direction))?;
            debug!(
                "Direction {}: {} local features from a {}x{} matrix",
                direction,
                local[direction.index()].len(),
                matrix.nrows(),
                matrix.ncols()
            );
        }
        let aggregation_duration = start.elapsed();

        let circularity = if self.config.use_circularity {
            let profiles = input
                .profiles
                .as_ref()
                .context("circularity requested but no projection images were given")?;
            let threshold = self.config.area_closing_threshold;
            Some([
                circularity(profiles[0].view(), threshold),
                circularity(profiles[1].view(), threshold),
                circularity(profiles[2].view(), threshold),
            ])
        } else {
            None
        };

        let merits = if self.config.use_orientation_merit {
            let mut merits = [0.0; 3];
            for direction in Direction::ALL {
                merits[direction.index()] =
                    orientation_merit(input.matrices[direction.index()].view())
                        .with_context(|| format!("orientation merit of direction {}", direction))?;
            }
            Some(merits)
        } else {
            None
        };

        let features = assembler.assemble(
            [&local[0], &local[1], &local[2]],
            circularity,
            merits,
        )?;
        let duration = start.elapsed();
        info!(
            "Assembled {} features (mode {}, group width {}) in {:.2?}",
            features.len(),
            aggregator.mode(),
            assembler.group_width(),
            duration
        );
        Ok(FeatureSummary {
            features,
            circularity,
            orientation_merits: merits,
            aggregation_duration,
            duration,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FeatureSummary {
    pub features: Vec<f64>,
    pub circularity: Option<[f64; 3]>,
    pub orientation_merits: Option<[f64; 3]>,
    pub aggregation_duration: Duration,
    pub duration: Duration,
}

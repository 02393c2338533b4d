use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{LipError, LipResult};
use crate::features::{AggregationMode, FeatureAssembler, LocalFeatureAggregator, Statistic};
use crate::representative::{ExtremaConfig, SelectorConfig};
use crate::signature::MirrorMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub angle_count: usize,
    pub angle_range_deg: f64,
    pub mirror: MirrorMode,
    pub mode: AggregationMode,
    pub stats: Vec<Statistic>,
    pub top_n_freq: usize,
    pub n_representatives: usize,
    pub peak_distance: usize,
    pub min_plateau_size: usize,
    /// Interleaving width; triplets when unset, whatever the aggregation mode.
    pub group_width: Option<usize>,
    pub use_circularity: bool,
    pub use_orientation_merit: bool,
    pub area_closing_threshold: usize,
    pub decimals: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            angle_count: 180,
            angle_range_deg: 180.0,
            mirror: MirrorMode::default(),
            mode: AggregationMode::default(),
            stats: vec![Statistic::Max, Statistic::Min, Statistic::Median],
            top_n_freq: 10,
            n_representatives: 10,
            peak_distance: 10,
            min_plateau_size: 1,
            group_width: None,
            use_circularity: false,
            use_orientation_merit: false,
            area_closing_threshold: 128,
            decimals: 6,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON; omitted fields keep their defaults.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open config file {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .with_context(|| format!("deserialize config file {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("validate config file {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> LipResult<()> {
        if self.angle_count == 0 {
            return Err(LipError::InvalidConfig("angle_count must be positive".into()));
        }
        if !(self.angle_range_deg > 0.0 && self.angle_range_deg.is_finite()) {
            return Err(LipError::InvalidConfig(format!(
                "angle_range_deg must be a positive finite number, got {}",
                self.angle_range_deg
            )));
        }
        if self.mode != AggregationMode::RefByLip0Fft && self.stats.is_empty() {
            return Err(LipError::InvalidConfig(format!(
                "mode '{}' needs at least one statistic",
                self.mode
            )));
        }
        if self.mode == AggregationMode::RefByLip0Fft && self.n_representatives == 0 {
            return Err(LipError::InvalidConfig(
                "n_representatives must be positive".into(),
            ));
        }
        if self.group_width == Some(0) {
            return Err(LipError::InvalidConfig("group_width must be positive".into()));
        }
        Ok(())
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            top_n_freq: self.top_n_freq,
            n_representatives: self.n_representatives,
            extrema: ExtremaConfig {
                distance: self.peak_distance,
                min_plateau_size: self.min_plateau_size,
            },
        }
    }

    pub fn aggregator(&self) -> LocalFeatureAggregator {
        LocalFeatureAggregator::new(
            self.mode,
            self.stats.iter().copied().collect(),
            self.selector_config(),
        )
    }

    pub fn assembler(&self) -> LipResult<FeatureAssembler> {
        match self.group_width {
            Some(width) => FeatureAssembler::new(width),
            None => Ok(FeatureAssembler::default()),
        }
    }
}

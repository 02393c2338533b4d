use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{LipError, LipResult};
use crate::features::statistics::{self, Statistic, StatisticSet};
use crate::representative::{SelectorConfig, select_representative_indices};

/// How each signature column is reduced to local features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Column statistics over every angle.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// min/max/median read at the positions of LIP0's min/max/median.
    #[serde(rename = "ref_by_LIP0")]
    RefByLip0,
    /// Values at the representative positions selected from LIP0.
    #[serde(rename = "ref_by_LIP0_fft")]
    RefByLip0Fft,
}

impl AggregationMode {
    pub fn name(self) -> &'static str {
        match self {
            AggregationMode::Default => "default",
            AggregationMode::RefByLip0 => "ref_by_LIP0",
            AggregationMode::RefByLip0Fft => "ref_by_LIP0_fft",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationMode {
    type Err = LipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(AggregationMode::Default),
            "ref_by_LIP0" => Ok(AggregationMode::RefByLip0),
            "ref_by_LIP0_fft" => Ok(AggregationMode::RefByLip0Fft),
            other => Err(LipError::UnknownMode(other.to_string())),
        }
    }
}

/// Reduces a LIP matrix (one row per angle, one column per descriptor) to a
/// flat vector of local features.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFeatureAggregator {
    mode: AggregationMode,
    stats: StatisticSet,
    selector: SelectorConfig,
}

impl LocalFeatureAggregator {
    pub fn new(mode: AggregationMode, stats: StatisticSet, selector: SelectorConfig) -> Self {
        Self {
            mode,
            stats,
            selector,
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn aggregate(&self, matrix: ArrayView2<'_, f64>) -> LipResult<Vec<f64>> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(LipError::InvalidMatrix(format!(
                "cannot aggregate a {}x{} matrix",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        match self.mode {
            AggregationMode::Default => Ok(self.column_statistics(matrix)),
            AggregationMode::RefByLip0 => Ok(self.pinned_statistics(matrix)),
            AggregationMode::RefByLip0Fft => self.representative_samples(matrix),
        }
    }

    fn column_statistics(&self, matrix: ArrayView2<'_, f64>) -> Vec<f64> {
        let mut out = Vec::with_capacity(matrix.ncols() * self.stats.len());
        for column in matrix.columns() {
            for stat in Statistic::ALL {
                if !self.stats.contains(stat) {
                    continue;
                }
                out.push(match stat {
                    Statistic::Max => statistics::max(column),
                    Statistic::Min => statistics::min(column),
                    Statistic::Median => statistics::median(column),
                    Statistic::Mean => statistics::mean(column),
                    Statistic::Std => statistics::std(column),
                });
            }
        }
        out
    }

    fn pinned_statistics(&self, matrix: ArrayView2<'_, f64>) -> Vec<f64> {
        let lip0 = matrix.column(0);
        let idx_min = statistics::argmin(lip0);
        let idx_max = statistics::argmax(lip0);
        let idx_med = statistics::argmedian(lip0);

        let mut out = Vec::with_capacity(matrix.ncols() * self.stats.len());
        for column in matrix.columns() {
            if self.stats.contains(Statistic::Min) {
                out.push(column[idx_min]);
            }
            if self.stats.contains(Statistic::Max) {
                out.push(column[idx_max]);
            }
            if self.stats.contains(Statistic::Median) {
                out.push(column[idx_med]);
            }
            if self.stats.contains(Statistic::Mean) {
                out.push(statistics::mean(column));
            }
            if self.stats.contains(Statistic::Std) {
                out.push(statistics::std(column));
            }
        }
        out
    }

    fn representative_samples(&self, matrix: ArrayView2<'_, f64>) -> LipResult<Vec<f64>> {
        let lip0 = matrix.column(0).to_vec();
        let selection = select_representative_indices(&lip0, &self.selector)?;
        let mut out = Vec::with_capacity(matrix.ncols() * selection.indices.len());
        for column in matrix.columns() {
            out.extend(selection.indices.iter().map(|&idx| column[idx]));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    fn aggregator(mode: AggregationMode, stats: &str) -> LocalFeatureAggregator {
        LocalFeatureAggregator::new(
            mode,
            StatisticSet::parse_list(stats).unwrap(),
            SelectorConfig::default(),
        )
    }

    #[test]
    fn default_mode_emits_max_then_min_per_column() {
        let matrix = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
        let out = aggregator(AggregationMode::Default, "min,max")
            .aggregate(matrix.view())
            .unwrap();
        assert_eq!(out, vec![3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn default_mode_full_statistics() {
        let matrix = array![[1.0], [4.0], [2.0], [3.0]];
        let out = aggregator(AggregationMode::Default, "max,min,median,mean,std")
            .aggregate(matrix.view())
            .unwrap();
        assert_eq!(out.len(), 5);
        assert_abs_diff_eq!(out[2], 2.5);
        assert_abs_diff_eq!(out[3], 2.5);
        assert_abs_diff_eq!(out[4], 1.25f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn ref_mode_reads_other_columns_at_lip0_positions() {
        // LIP0 min at row 2, max at row 0, median (stable sort) at row 1
        let matrix = array![[9.0, 10.0], [5.0, 20.0], [1.0, 30.0]];
        let out = aggregator(AggregationMode::RefByLip0, "max,min,median,mean")
            .aggregate(matrix.view())
            .unwrap();
        assert_eq!(out, vec![1.0, 9.0, 5.0, 5.0, 30.0, 10.0, 20.0, 20.0]);
    }

    #[test]
    fn fft_mode_samples_every_column_at_the_same_positions() {
        let rows = 180;
        let matrix = Array2::from_shape_fn((rows, 2), |(i, j)| {
            let t = i as f64 / rows as f64;
            (2.0 * std::f64::consts::PI * 3.0 * t).cos() + j as f64 * 100.0
        });
        let agg = aggregator(AggregationMode::RefByLip0Fft, "max");
        let out = agg.aggregate(matrix.view()).unwrap();
        assert_eq!(out.len(), 2 * 10);
        for (a, b) in out[..10].iter().zip(out[10..].iter()) {
            assert_abs_diff_eq!(b - a, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn unknown_mode_is_rejected_when_parsed() {
        assert_eq!(
            "median_by_LIP0".parse::<AggregationMode>(),
            Err(LipError::UnknownMode("median_by_LIP0".into()))
        );
        assert_eq!(
            "ref_by_LIP0_fft".parse::<AggregationMode>(),
            Ok(AggregationMode::RefByLip0Fft)
        );
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let matrix = Array2::<f64>::zeros((0, 6));
        assert!(aggregator(AggregationMode::Default, "max")
            .aggregate(matrix.view())
            .is_err());
    }
}

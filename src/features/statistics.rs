use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::LipError;

/// Summary statistic of one signature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Max,
    Min,
    Median,
    Mean,
    Std,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::Max,
        Statistic::Min,
        Statistic::Median,
        Statistic::Mean,
        Statistic::Std,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Max => "max",
            Statistic::Min => "min",
            Statistic::Median => "median",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = LipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| LipError::UnknownStatistic(s.to_string()))
    }
}

/// Unordered set of requested statistics; emission order is fixed by the
/// aggregation mode, not by the order of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatisticSet(u8);

impl StatisticSet {
    pub fn contains(self, stat: Statistic) -> bool {
        self.0 & stat.bit() != 0
    }

    pub fn insert(&mut self, stat: Statistic) {
        self.0 |= stat.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse a comma or whitespace separated list such as `"max,min,median"`.
    pub fn parse_list(list: &str) -> Result<Self, LipError> {
        list.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse::<Statistic>)
            .collect()
    }
}

impl FromIterator<Statistic> for StatisticSet {
    fn from_iter<I: IntoIterator<Item = Statistic>>(iter: I) -> Self {
        let mut set = StatisticSet::default();
        for stat in iter {
            set.insert(stat);
        }
        set
    }
}

pub(crate) fn max(values: ArrayView1<'_, f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
}

pub(crate) fn min(values: ArrayView1<'_, f64>) -> f64 {
    values.fold(f64::INFINITY, |acc, &v| acc.min(v))
}

pub(crate) fn mean(values: ArrayView1<'_, f64>) -> f64 {
    values.mean().unwrap_or(0.0)
}

/// Population standard deviation.
pub(crate) fn std(values: ArrayView1<'_, f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.std(0.0)
}

/// Midpoint average for even lengths.
pub(crate) fn median(values: ArrayView1<'_, f64>) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

pub(crate) fn argmax(values: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

pub(crate) fn argmin(values: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v < values[best] {
            best = i;
        }
    }
    best
}

/// Index holding the middle element of a stable ascending sort.
pub(crate) fn argmedian(values: ArrayView1<'_, f64>) -> usize {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    order[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::aview1;

    #[test]
    fn parse_list_accepts_commas_and_spaces() {
        let set = StatisticSet::parse_list("max, min median").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(Statistic::Median));
        assert!(!set.contains(Statistic::Std));
        assert_eq!(
            StatisticSet::parse_list("max,mode"),
            Err(LipError::UnknownStatistic("mode".into()))
        );
    }

    #[test]
    fn median_averages_the_middle_pair() {
        assert_abs_diff_eq!(median(aview1(&[4.0, 1.0, 3.0, 2.0])), 2.5);
        assert_abs_diff_eq!(median(aview1(&[5.0, 1.0, 3.0])), 3.0);
    }

    #[test]
    fn extrema_and_mean_reduce_strided_columns() {
        let matrix = ndarray::array![[1.0, 10.0], [4.0, 40.0], [2.0, 20.0]];
        let column = matrix.column(1);
        assert_eq!(max(column), 40.0);
        assert_eq!(min(column), 10.0);
        assert_abs_diff_eq!(mean(column), 70.0 / 3.0, epsilon = 1e-12);
        assert_eq!(median(column), 20.0);
    }

    #[test]
    fn std_is_the_population_deviation() {
        assert_abs_diff_eq!(std(aview1(&[5.0, 3.0])), 1.0);
    }

    #[test]
    fn arg_helpers_pick_first_occurrence() {
        let values = aview1(&[2.0, 7.0, 1.0, 7.0, 1.0]);
        assert_eq!(argmax(values), 1);
        assert_eq!(argmin(values), 2);
        // stable order: 1(2), 1(4), 2(0), 7(1), 7(3) -> middle is index 0
        assert_eq!(argmedian(values), 0);
    }
}

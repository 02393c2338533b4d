use std::cmp::Ordering;

/// A maximal run of equal samples higher than both neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plateau {
    pub left_edge: usize,
    pub right_edge: usize,
}

impl Plateau {
    pub fn center(&self) -> usize {
        (self.left_edge + self.right_edge) / 2
    }

    pub fn size(&self) -> usize {
        self.right_edge - self.left_edge + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtremaConfig {
    /// Minimum index separation between two kept extrema of the same kind.
    pub distance: usize,
    /// Smallest run length reported as a plateau.
    pub min_plateau_size: usize,
}

impl Default for ExtremaConfig {
    fn default() -> Self {
        Self {
            distance: 10,
            min_plateau_size: 1,
        }
    }
}

/// Peaks, troughs and plateau runs of a signal, each list in ascending index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFeatures {
    pub peaks: Vec<usize>,
    pub troughs: Vec<usize>,
    pub plateaus: Vec<Plateau>,
}

impl SignalFeatures {
    pub fn plateau_centers(&self) -> Vec<usize> {
        self.plateaus.iter().map(Plateau::center).collect()
    }
}

pub fn detect_signal_features(signal: &[f64], config: &ExtremaConfig) -> SignalFeatures {
    let peaks = local_maxima(signal);
    let peaks = select_by_distance(signal, peaks, config.distance);

    let negated: Vec<f64> = signal.iter().map(|v| -v).collect();
    let troughs = local_maxima(&negated);
    let troughs = select_by_distance(&negated, troughs, config.distance);

    let plateaus: Vec<Plateau> = local_maxima(signal)
        .into_iter()
        .filter(|plateau| plateau.size() >= config.min_plateau_size)
        .collect();
    let plateaus = select_by_distance(signal, plateaus, config.distance);

    SignalFeatures {
        peaks: peaks.iter().map(Plateau::center).collect(),
        troughs: troughs.iter().map(Plateau::center).collect(),
        plateaus,
    }
}

/// Interior local maxima. Flat tops count once, as long as the samples on
/// both sides of the run are strictly lower; the first and last samples are
/// never maxima.
pub fn local_maxima(signal: &[f64]) -> Vec<Plateau> {
    let mut maxima = Vec::new();
    let n = signal.len();
    if n < 3 {
        return maxima;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                maxima.push(Plateau {
                    left_edge: i,
                    right_edge: ahead - 1,
                });
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Greedy suppression: visit candidates from highest to lowest and drop every
/// neighbour closer than `distance` to a kept one.
fn select_by_distance(signal: &[f64], candidates: Vec<Plateau>, distance: usize) -> Vec<Plateau> {
    if distance <= 1 || candidates.len() < 2 {
        return candidates;
    }
    let positions: Vec<usize> = candidates.iter().map(Plateau::center).collect();
    let mut by_height: Vec<usize> = (0..candidates.len()).collect();
    by_height.sort_by(|&a, &b| {
        signal[positions[a]]
            .partial_cmp(&signal[positions[b]])
            .unwrap_or(Ordering::Equal)
    });

    let mut keep = vec![true; candidates.len()];
    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && positions[j] - positions[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < positions.len() && positions[k] - positions[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, kept)| kept.then_some(candidate))
        .collect()
}

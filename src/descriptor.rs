use ndarray::{ArrayView1, s};

/// Number of local descriptors computed per profile.
pub const LIP_COUNT: usize = 6;

/// The six local descriptors (LIP0..LIP5) of one radial profile.
///
/// Key points of the profile:
/// - `M`: first sample attaining the maximum,
/// - `B` / `E`: first and last strictly positive samples,
/// - `H`: projection of `M` onto the radial axis.
///
/// Every value is normalised by the number of strictly positive samples
/// between `B` and `E`, floored to one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LipDescriptor {
    /// Peak density, `max / length`.
    pub peak_density: f64,
    /// Distance from `B` to `H`, relative to the length.
    pub rise_fraction: f64,
    pub pre_peak_mean: f64,
    pub pre_peak_std: f64,
    pub post_peak_mean: f64,
    pub post_peak_std: f64,
}

impl LipDescriptor {
    /// Compute the descriptors of one sinogram column.
    ///
    /// Profiles without any strictly positive sample yield the zero descriptor.
    pub fn from_profile(profile: ArrayView1<'_, f64>) -> Self {
        let Some(bounds) = ProfileBounds::scan(profile) else {
            return Self::default();
        };

        let ProfileBounds {
            arg_max,
            max_value,
            inf_rho,
            sup_rho,
        } = bounds;

        let (m1, y1) = if arg_max > inf_rho {
            mean_std(profile.slice(s![inf_rho..arg_max]))
        } else {
            (0.0, 0.0)
        };
        let (m2, y2) = if sup_rho >= arg_max {
            mean_std(profile.slice(s![arg_max..=sup_rho]))
        } else {
            (0.0, 0.0)
        };

        let positive = profile
            .slice(s![inf_rho..=sup_rho])
            .iter()
            .filter(|v| **v > 0.0)
            .count();
        let length = positive.max(1) as f64;

        Self {
            peak_density: max_value / length,
            rise_fraction: (arg_max - inf_rho) as f64 / length,
            pre_peak_mean: m1 / length,
            pre_peak_std: y1 / length,
            post_peak_mean: m2 / length,
            post_peak_std: y2 / length,
        }
    }

    pub fn to_array(&self) -> [f64; LIP_COUNT] {
        [
            self.peak_density,
            self.rise_fraction,
            self.pre_peak_mean,
            self.pre_peak_std,
            self.post_peak_mean,
            self.post_peak_std,
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct ProfileBounds {
    arg_max: usize,
    max_value: f64,
    inf_rho: usize,
    sup_rho: usize,
}

impl ProfileBounds {
    /// Single pass over the profile. Ties on the maximum resolve to the earliest index.
    fn scan(profile: ArrayView1<'_, f64>) -> Option<Self> {
        let mut arg_max = None;
        let mut max_value = 0.0f64;
        let mut inf_rho = None;
        let mut sup_rho = None;

        for (i, &value) in profile.iter().enumerate() {
            if value > max_value {
                max_value = value;
                arg_max = Some(i);
            }
            if value > 0.0 {
                inf_rho.get_or_insert(i);
                sup_rho = Some(i);
            }
        }

        Some(Self {
            arg_max: arg_max?,
            max_value,
            inf_rho: inf_rho?,
            sup_rho: sup_rho?,
        })
    }
}

/// Mean and population standard deviation.
fn mean_std(values: ArrayView1<'_, f64>) -> (f64, f64) {
    match values.mean() {
        Some(mean) => (mean, values.std(0.0)),
        None => (0.0, 0.0),
    }
}

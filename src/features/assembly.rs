use crate::error::{LipError, LipResult};

/// Interleaves the local features of the m, s and t directions group by group
/// and appends the optional per-direction scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAssembler {
    group_width: usize,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self { group_width: 3 }
    }
}

impl FeatureAssembler {
    pub fn new(group_width: usize) -> LipResult<Self> {
        if group_width == 0 {
            return Err(LipError::InvalidConfig(
                "feature group width must be positive".into(),
            ));
        }
        Ok(Self { group_width })
    }

    pub fn group_width(&self) -> usize {
        self.group_width
    }

    /// `[m0..mw, s0..sw, t0..tw, m(w)..m(2w), ...]` followed by the circularity
    /// triple and then the orientation merit triple when present.
    pub fn assemble(
        &self,
        local: [&[f64]; 3],
        circularity: Option<[f64; 3]>,
        orientation_merit: Option<[f64; 3]>,
    ) -> LipResult<Vec<f64>> {
        let [m, s, t] = local;
        for other in [s, t] {
            if other.len() != m.len() {
                return Err(LipError::LengthMismatch {
                    what: "local feature vector",
                    expected: m.len(),
                    actual: other.len(),
                });
            }
        }

        let mut ordered = Vec::with_capacity(3 * m.len() + 6);
        for ((gm, gs), gt) in m
            .chunks(self.group_width)
            .zip(s.chunks(self.group_width))
            .zip(t.chunks(self.group_width))
        {
            ordered.extend_from_slice(gm);
            ordered.extend_from_slice(gs);
            ordered.extend_from_slice(gt);
        }
        if let Some(ci) = circularity {
            ordered.extend_from_slice(&ci);
        }
        if let Some(om) = orientation_merit {
            ordered.extend_from_slice(&om);
        }
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_triplets_by_direction() {
        let m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let s = [11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let t = [21.0, 22.0, 23.0, 24.0, 25.0, 26.0];
        let out = FeatureAssembler::default()
            .assemble([&m, &s, &t], None, None)
            .unwrap();
        assert_eq!(
            out,
            vec![
                1.0, 2.0, 3.0, 11.0, 12.0, 13.0, 21.0, 22.0, 23.0, 4.0, 5.0, 6.0, 14.0, 15.0,
                16.0, 24.0, 25.0, 26.0
            ]
        );
    }

    #[test]
    fn appends_circularity_before_merits() {
        let out = FeatureAssembler::new(2)
            .unwrap()
            .assemble(
                [&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]],
                Some([0.1, 0.2, 0.3]),
                Some([-0.1, -0.2, -0.3]),
            )
            .unwrap();
        assert_eq!(
            out,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.1, 0.2, 0.3, -0.1, -0.2, -0.3]
        );
    }

    #[test]
    fn partial_last_group_is_kept() {
        let out = FeatureAssembler::default()
            .assemble([&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0], &[9.0, 10.0, 11.0, 12.0]], None, None)
            .unwrap();
        assert_eq!(out[9..], [4.0, 8.0, 12.0]);
    }

    #[test]
    fn unequal_directions_fail() {
        let err = FeatureAssembler::default()
            .assemble([&[1.0, 2.0, 3.0], &[1.0, 2.0], &[1.0, 2.0, 3.0]], None, None)
            .unwrap_err();
        assert!(matches!(err, LipError::LengthMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn zero_group_width_is_invalid() {
        assert!(FeatureAssembler::new(0).is_err());
    }
}

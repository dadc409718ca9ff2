//! 由球半径换算毛管压力 (Young-Laplace).

use crate::consts::fluid::*;
use crate::error::ConfigError;
use crate::sweep::Curve;

/// 界面流体物性.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fluid {
    /// 界面张力 (N/m).
    pub surface_tension: f64,

    /// 接触角 (度).
    pub contact_angle_deg: f64,
}

impl Fluid {
    /// 汞-空气.
    #[inline]
    pub const fn mercury() -> Self {
        Self {
            surface_tension: MERCURY_SURFACE_TENSION,
            contact_angle_deg: MERCURY_CONTACT_ANGLE,
        }
    }

    /// 水-空气.
    #[inline]
    pub const fn water_air() -> Self {
        Self {
            surface_tension: WATER_SURFACE_TENSION,
            contact_angle_deg: WATER_CONTACT_ANGLE,
        }
    }

    /// 半径为 `radius` (米) 的球形界面上的毛管压力 (Pa).
    #[inline]
    pub fn pressure(&self, radius: f64) -> f64 {
        2.0 * self.surface_tension * self.contact_angle_deg.to_radians().cos().abs() / radius
    }
}

impl Curve {
    /// 将曲线半径 (体素) 换算为毛管压力 (Pa). `voxel_size` 为体素边长 (米).
    ///
    /// `Pc = 2 σ |cos θ| / (r · voxel_size)`.
    pub fn capillary_pressure(&self, fluid: &Fluid, voxel_size: f64) -> Result<Vec<f64>, ConfigError> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(ConfigError::InvalidResolution {
                name: "voxel_size",
                value: voxel_size,
            });
        }
        Ok(self
            .radii
            .iter()
            .map(|r| fluid.pressure(r * voxel_size))
            .collect())
    }

    /// 在半径 `radius` 处线性插值饱和度. 超出曲线半径范围时返回 `None`.
    pub fn saturation_at(&self, radius: f64) -> Option<f64> {
        let mut points: Vec<(f64, f64)> = self.points().collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let first = points.first()?;
        if radius < first.0 {
            return None;
        }
        for w in points.windows(2) {
            let ((r0, s0), (r1, s1)) = (w[0], w[1]);
            if radius <= r1 {
                if r1 == r0 {
                    return Some(s1);
                }
                return Some(s0 + (s1 - s0) * (radius - r0) / (r1 - r0));
            }
        }
        let (r, s) = points[points.len() - 1];
        (radius == r).then_some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{CurveKind, Phase};

    fn curve(radii: Vec<f64>, saturations: Vec<f64>) -> Curve {
        Curve {
            kind: CurveKind::Micp,
            phase: Phase::NonWetting,
            radii,
            saturations,
            length_map: None,
        }
    }

    #[test]
    fn test_pressure() {
        let c = curve(vec![1.0, 2.0], vec![0.6, 0.2]);
        let hg = Fluid::mercury();
        let pc = c.capillary_pressure(&hg, 1e-6).unwrap();
        let expect = 2.0 * 0.485 * 140f64.to_radians().cos().abs() / 1e-6;
        assert!((pc[0] - expect).abs() < 1e-6 * expect);
        assert!((pc[0] - 2.0 * pc[1]).abs() < 1e-9 * pc[0]);

        let water = c.capillary_pressure(&Fluid::water_air(), 2e-6).unwrap();
        assert!((water[0] - 0.072 * 1e6).abs() < 1e-6);

        for bad in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                c.capillary_pressure(&hg, bad),
                Err(ConfigError::InvalidResolution { name: "voxel_size", .. })
            ));
        }
    }

    #[test]
    fn test_saturation_at() {
        let c = curve(vec![1.0, 2.0, 4.0], vec![1.0, 0.5, 0.0]);
        assert_eq!(c.saturation_at(1.0), Some(1.0));
        assert_eq!(c.saturation_at(1.5), Some(0.75));
        assert_eq!(c.saturation_at(3.0), Some(0.25));
        assert_eq!(c.saturation_at(4.0), Some(0.0));
        assert_eq!(c.saturation_at(0.5), None);
        assert_eq!(c.saturation_at(4.5), None);

        // 提取顺序的半径 (降序) 同样可以插值.
        let c = curve(vec![3.0, 1.0], vec![0.5, 1.0]);
        assert_eq!(c.saturation_at(2.0), Some(0.75));
        assert_eq!(curve(vec![], vec![]).saturation_at(1.0), None);
    }
}

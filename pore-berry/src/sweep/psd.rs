//! 孔径分布 (PSD).

use super::refine::seed_radii;
use super::{opening, Curve, CurveKind, Porosimetry, StepLog};
use crate::consts::PSD_SEED_DIVISOR;
use crate::edt::DistanceTransform;
use crate::error::SweepResult;

impl<E: DistanceTransform> Porosimetry<E> {
    /// 孔径分布.
    ///
    /// 半径 `r` 处的非润湿相饱和度为能被半径不小于 `r` 的球覆盖的孔隙体积分数,
    /// 即所有不小于 `r` 的已算半径下开运算之并占孔隙的比例. 不考虑连通性.
    pub fn psd(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let seeds = seed_radii(self.max_radius, PSD_SEED_DIVISOR);
        Ok(self.sweep_incremental(CurveKind::Psd, seeds, log, |this, r| {
            opening(&mut this.edt, this.pore.view(), this.pore_dist.view(), r)
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::sweep::tests::{cube4, random_volume, volume, wall};
    use crate::sweep::{psd, MemoryLog, NoLog, SweepConfig};
    use crate::volume::Mask;
    use ndarray::s;

    #[test]
    fn test_open_cube() {
        let config = SweepConfig::new(0.1, 0.5).unwrap();
        let mut log = MemoryLog::new();
        let curve = psd(&cube4(), &config, &mut log).unwrap();
        assert_eq!(curve.radii, vec![1.0, 2.0]);
        assert_eq!(curve.saturations, vec![1.0, 1.0]);
        assert_eq!(log.lines()[0], "Radius: 1, Snw: 1");
    }

    #[test]
    fn test_wall() {
        let curve = psd(&wall(), &SweepConfig::default(), &mut NoLog).unwrap();
        assert_eq!(curve.radii, vec![1.0, 2.0]);
        assert!(curve.saturations.iter().all(|s| *s == 1.0));
    }

    #[test]
    fn test_resolved() {
        let v = random_volume((12, 12, 12), 11);
        let config = SweepConfig::new(0.05, 0.1).unwrap();
        let curve = psd(&v, &config, &mut NoLog).unwrap();
        assert_eq!(curve.saturations[0], 1.0);
        assert!(curve.saturations.last().is_some_and(|s| *s < 1.0));
        assert!(curve.saturations.windows(2).all(|w| w[0] >= w[1]));
        for (r, s) in curve.radii.windows(2).zip(curve.saturations.windows(2)) {
            assert!((s[0] - s[1]).abs() <= 0.05 || r[1] - r[0] <= 0.2);
        }
    }

    #[test]
    fn test_monotone() {
        // 12^3 中的 4x4x4 孔腔加 10 个孤立单体素孔隙.
        // 单看 r = 1.5 的开运算, 孔腔丢掉 8 个角点, 比 r = 2 时还少.
        let mut mask = Mask::from_elem((12, 12, 12), false);
        mask.slice_mut(s![1..5, 1..5, 1..5]).fill(true);
        for x in [0, 2, 4, 6, 8, 10] {
            mask[(10, 10, x)] = true;
        }
        for x in [0, 2, 4, 6] {
            mask[(10, 8, x)] = true;
        }
        let curve = psd(&volume(&mask), &SweepConfig::default(), &mut NoLog).unwrap();
        assert_eq!(curve.radii, vec![1.0, 1.5, 2.0]);
        assert_eq!(curve.saturations, vec![1.0, 64.0 / 74.0, 64.0 / 74.0]);
        assert!(curve.saturations.windows(2).all(|w| w[0] >= w[1]));
    }
}

//! 分层孔径分布 (HPSD).

use ndarray::Zip;

use super::log::emit;
use super::{count, max_finite, opening, Curve, CurveKind, Porosimetry, StepLog};
use crate::edt::DistanceTransform;
use crate::error::{ComputeError, SweepResult};

impl<E: DistanceTransform> Porosimetry<E> {
    /// 分层孔径分布.
    ///
    /// 不断地以剩余孔隙的最大内切球半径 `r` 做开运算, 将结果从剩余孔隙中剥离,
    /// 直到剩余孔隙为空. 饱和度为累计剥离体积, 按最终总量归一化.
    /// 半径按提取顺序排列, 严格递减.
    pub fn hpsd(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let kind = CurveKind::Hpsd;
        let phase = kind.phase();
        let mut lengths = self.length_map(phase);
        let mut residual = self.pore.clone();
        let mut dist = self.pore_dist.clone();
        let mut left = self.pore_count;
        let mut total = 0;
        let mut radii = Vec::new();
        let mut extracted = Vec::new();

        while left > 0 {
            let r = max_finite(dist.view()).ok_or(ComputeError::UnboundedDistance)?;
            let mask = opening(&mut self.edt, residual.view(), dist.view(), r);
            let n = count(&mask);
            if n == 0 {
                break;
            }
            Zip::from(&mut residual).and(&mask).for_each(|p, &m| {
                if m {
                    *p = false;
                }
            });
            left -= n;
            total += n;
            emit(log, phase, r, total as f64 / self.pore_count as f64);
            if let Some(lm) = lengths.as_mut() {
                lm.record(&mask, r);
            }
            radii.push(r);
            extracted.push(total);

            if left > 0 {
                dist = self
                    .edt
                    .transform(residual.view(), self.config.edge())
                    .into_owned();
            }
        }

        let saturations = extracted
            .into_iter()
            .map(|n| n as f64 / total as f64)
            .collect();
        Ok(Curve {
            kind,
            phase,
            radii,
            saturations,
            length_map: lengths.map(|lm| lm.finish()),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sweep::tests::{random_volume, volume};
    use crate::sweep::{hpsd, MemoryLog, NoLog, SweepConfig};
    use crate::volume::Mask;
    use ndarray::s;

    #[test]
    fn test_cube_and_speck() {
        let mut mask = Mask::from_elem((9, 9, 9), false);
        mask.slice_mut(s![1..4, 1..4, 1..4]).fill(true);
        mask[(6, 6, 6)] = true;

        let mut log = MemoryLog::new();
        let config = SweepConfig::default().verbose(true);
        let curve = hpsd(&volume(&mask), &config, &mut log).unwrap();
        assert_eq!(curve.radii, vec![2.0, 1.0]);
        assert_eq!(curve.saturations, vec![27.0 / 28.0, 1.0]);
        assert_eq!(log.lines().len(), 2);

        let map = curve.length_map.unwrap();
        assert_eq!(map[(1, 1, 1)], 2.0);
        assert_eq!(map[(2, 2, 2)], 2.0);
        assert_eq!(map[(6, 6, 6)], 1.0);
        assert_eq!(map[(0, 0, 0)], 0.0);
    }

    #[test]
    fn test_exhausts_pore_space() {
        let v = random_volume((10, 9, 8), 17);
        let curve = hpsd(&v, &SweepConfig::default(), &mut NoLog).unwrap();
        assert!(curve.radii.windows(2).all(|w| w[0] > w[1]));
        assert!(curve.saturations.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(curve.saturations.last(), Some(&1.0));
    }
}

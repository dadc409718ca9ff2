//! 不可压缩驱替.

use ndarray::Zip;

use super::refine::linspace_radii;
use super::{opening, Curve, CurveKind, Porosimetry, StepLog};
use crate::consts::INCOMPRESSIBLE_SEED_LEN;
use crate::edt::DistanceTransform;
use crate::error::SweepResult;
use crate::volume::Mask;

impl<E: DistanceTransform> Porosimetry<E> {
    /// 不可压缩驱替.
    ///
    /// 半径从大到小扫描. 非润湿相从 `direction` 指定的边界面注入, 只能进入未被困住的孔隙;
    /// 已注入的体素保持注入状态. 润湿相若不再与 `direction.opposite()` 连通,
    /// 就被永久困住, 之后的开运算都在扣除被困润湿相后的孔隙上进行.
    ///
    /// 结果依赖于扫描顺序, 因此每当半径列表增长时都会从头重算.
    pub fn drainage_incompressible(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let seeds = linspace_radii(self.max_radius, INCOMPRESSIBLE_SEED_LEN);
        Ok(self.sweep_path_dependent(
            CurveKind::DrainageIncompressible,
            seeds,
            log,
            Self::drainage_pass,
        ))
    }

    /// 按降序走完一遍 `radii` (输入为升序).
    fn drainage_pass(&mut self, radii: &[f64], visit: &mut dyn FnMut(f64, &Mask)) {
        let shape = self.pore.dim();
        let escape = self.conn.direction().opposite();
        let mut trapped = Mask::from_elem(shape, false);
        let mut invaded = Mask::from_elem(shape, false);
        let mut available = self.pore.clone();
        let mut dist = self.pore_dist.clone();
        let mut stale = false;

        for &r in radii.iter().rev() {
            if stale {
                available = Zip::from(&self.pore)
                    .and(&trapped)
                    .map_collect(|&p, &t| p && !t);
                dist = self
                    .edt
                    .transform(available.view(), self.config.edge())
                    .into_owned();
                stale = false;
            }

            let open = opening(&mut self.edt, available.view(), dist.view(), r);
            let entered = self.conn.connected(open.view());
            Zip::from(&mut invaded).and(&entered).for_each(|n, &e| *n |= e);

            let wetting = Zip::from(&available)
                .and(&invaded)
                .map_collect(|&a, &n| a && !n);
            let escaped = self.conn.connected_to(wetting.view(), escape);
            Zip::from(&mut trapped)
                .and(&wetting)
                .and(&escaped)
                .for_each(|t, &w, &e| {
                    if w && !e && !*t {
                        *t = true;
                        stale = true;
                    }
                });

            visit(r, &invaded);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sweep::tests::{random_volume, volume, wall};
    use crate::sweep::{drainage_incompressible, micp, MemoryLog, NoLog, SweepConfig};
    use crate::volume::Mask;
    use ndarray::s;

    #[test]
    fn test_wall() {
        let mut log = MemoryLog::new();
        let curve = drainage_incompressible(&wall(), &SweepConfig::default(), &mut log).unwrap();
        assert_eq!(curve.radii, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert!(curve.saturations.iter().all(|s| *s == 0.5));
        // 降序扫描.
        assert_eq!(log.lines().first().map(String::as_str), Some("Radius: 2, Snw: 0.5"));
    }

    #[test]
    fn test_trapped_wetting() {
        // 贯通 z 轴的 3x3 主通道, 侧面经单体素喉道连接一个不接触 z 面的 5x5x5 孔腔.
        // r = 2 时主通道被注入, 孔腔中的润湿相失去出口, 之后再也不会被驱替.
        let mut mask = Mask::from_elem((9, 7, 12), false);
        mask.slice_mut(s![.., 2..5, 1..4]).fill(true);
        mask[(4, 3, 4)] = true;
        mask.slice_mut(s![2..7, 1..6, 5..10]).fill(true);
        let v = volume(&mask);

        let curve = drainage_incompressible(&v, &SweepConfig::default(), &mut NoLog).unwrap();
        assert_eq!(curve.radii, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        let channel = 81.0 / 207.0;
        assert_eq!(curve.saturations, vec![channel, channel, channel, 0.0, 0.0]);

        // 没有困住机制时, 最小半径下整个孔隙都被注入.
        let entry = micp(&v, &SweepConfig::default(), &mut NoLog).unwrap();
        assert_eq!(entry.saturations[0], 1.0);
    }

    #[test]
    fn test_monotone() {
        let v = random_volume((10, 10, 10), 23);
        let config = SweepConfig::new(0.05, 0.2).unwrap().verbose(true);
        let curve = drainage_incompressible(&v, &config, &mut NoLog).unwrap();
        // 非润湿相随半径减小而累积.
        assert!(curve.saturations.windows(2).all(|w| w[0] >= w[1]));
        for (r, s) in curve.radii.windows(2).zip(curve.saturations.windows(2)) {
            assert!(s[0] - s[1] <= 0.05 || r[1] - r[0] <= 0.4);
        }
        let map = curve.length_map.unwrap();
        assert!(map.iter().all(|l| *l == 0.0 || *l >= 1.0));
    }
}

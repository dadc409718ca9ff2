//! 渗吸 (润湿相侵入).

use ndarray::Zip;

use super::refine::{linspace_radii, seed_radii};
use super::{opening, Curve, CurveKind, Porosimetry, StepLog};
use crate::consts::{ENTRY_SEED_DIVISOR, INCOMPRESSIBLE_SEED_LEN};
use crate::edt::DistanceTransform;
use crate::error::SweepResult;
use crate::volume::Mask;

impl<E: DistanceTransform> Porosimetry<E> {
    /// 可压缩渗吸.
    ///
    /// 半径 `r` 处, 润湿相占据开运算以外、且与 `direction` 连通的孔隙.
    /// 非润湿相可被压缩, 因此没有困住机制. 种子半径从大到小计算.
    pub fn imbibition_compressible(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let mut seeds = seed_radii(self.max_radius, ENTRY_SEED_DIVISOR);
        seeds.reverse();
        Ok(self.sweep_incremental(CurveKind::ImbibitionCompressible, seeds, log, |this, r| {
            let open = opening(&mut this.edt, this.pore.view(), this.pore_dist.view(), r);
            let free = Zip::from(&this.pore)
                .and(&open)
                .map_collect(|&p, &o| p && !o);
            this.conn.connected(free.view())
        }))
    }

    /// 不可压缩渗吸.
    ///
    /// 半径从小到大扫描. 非润湿相的候选区域为开运算与已被困住的非润湿相之并;
    /// 润湿相从 `direction` 进入其余孔隙, 并保持已侵入状态.
    /// 剩余非润湿相若不再与 `direction.opposite()` 连通, 就被永久困住.
    ///
    /// 结果依赖于扫描顺序, 因此每当半径列表增长时都会从头重算.
    pub fn imbibition_incompressible(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let seeds = linspace_radii(self.max_radius, INCOMPRESSIBLE_SEED_LEN);
        Ok(self.sweep_path_dependent(
            CurveKind::ImbibitionIncompressible,
            seeds,
            log,
            Self::imbibition_pass,
        ))
    }

    /// 按升序走完一遍 `radii`.
    fn imbibition_pass(&mut self, radii: &[f64], visit: &mut dyn FnMut(f64, &Mask)) {
        let shape = self.pore.dim();
        let escape = self.conn.direction().opposite();
        let mut trapped = Mask::from_elem(shape, false);
        let mut wetting = Mask::from_elem(shape, false);

        for &r in radii {
            let open = opening(&mut self.edt, self.pore.view(), self.pore_dist.view(), r);
            let free = Zip::from(&self.pore)
                .and(&open)
                .and(&trapped)
                .map_collect(|&p, &o, &t| p && !o && !t);
            let entered = self.conn.connected(free.view());
            Zip::from(&mut wetting).and(&entered).for_each(|w, &e| *w |= e);

            let non_wetting = Zip::from(&self.pore)
                .and(&wetting)
                .map_collect(|&p, &w| p && !w);
            let escaped = self.conn.connected_to(non_wetting.view(), escape);
            Zip::from(&mut trapped)
                .and(&non_wetting)
                .and(&escaped)
                .for_each(|t, &n, &e| *t |= n && !e);

            visit(r, &wetting);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sweep::tests::{random_volume, volume, wall};
    use crate::sweep::{
        imbibition_compressible, imbibition_incompressible, MemoryLog, NoLog, Phase, SweepConfig,
    };
    use crate::volume::Mask;
    use ndarray::s;

    /// `(5, 5, 7)`: 接触 z- 面的 3x3x3 孔腔, 加一条贯通 z 轴的单体素通道.
    fn cube_and_channel() -> Mask {
        let mut mask = Mask::from_elem((5, 5, 7), false);
        mask.slice_mut(s![0..3, 1..4, 1..4]).fill(true);
        mask.slice_mut(s![.., 2, 5]).fill(true);
        mask
    }

    #[test]
    fn test_compressible() {
        let v = volume(&cube_and_channel());
        let config = SweepConfig::new(0.1, 0.25).unwrap().verbose(true);
        let mut log = MemoryLog::new();
        let curve = imbibition_compressible(&v, &config, &mut log).unwrap();
        assert_eq!(curve.phase, Phase::Wetting);
        assert_eq!(curve.radii, vec![1.0, 1.5, 2.0]);
        // r = 2 时只有通道被润湿, 但 r = 1.5 时已润湿的角点在更大的半径下仍计入.
        assert_eq!(curve.saturations, vec![0.0, 9.0 / 32.0, 9.0 / 32.0]);
        let lines = log.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Radius: 2, Sw: 0.15625");
        assert_eq!(lines[1], "Radius: 1, Sw: 0");
        assert_eq!(lines[2], "Radius: 1.5, Sw: 0.28125");

        let map = curve.length_map.unwrap();
        assert_eq!(map[(2, 2, 5)], 1.5);
        // z- 面上的角点在 r = 1.5 时被润湿, z = 2 的角点被孔腔隔断.
        assert_eq!(map[(0, 1, 1)], 1.5);
        assert_eq!(map[(2, 1, 1)], 0.0);
        assert_eq!(map[(1, 2, 2)], 0.0);
    }

    #[test]
    fn test_wall() {
        // 两个 3x3x3 孔腔在 r = 1 和 r = 2 时都被开运算完全覆盖.
        let curve = imbibition_compressible(&wall(), &SweepConfig::default(), &mut NoLog).unwrap();
        assert_eq!(curve.radii, vec![1.0, 2.0]);
        assert_eq!(curve.saturations, vec![0.0, 0.0]);

        let curve = imbibition_incompressible(&wall(), &SweepConfig::default(), &mut NoLog).unwrap();
        assert!(curve.saturations.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_incompressible_monotone() {
        let v = random_volume((10, 10, 10), 31);
        let config = SweepConfig::new(0.05, 0.2).unwrap().verbose(true);
        let curve = imbibition_incompressible(&v, &config, &mut NoLog).unwrap();
        assert_eq!(curve.phase, Phase::Wetting);
        // 润湿相随半径增大而累积.
        assert!(curve.saturations.windows(2).all(|w| w[0] <= w[1]));
        for (r, s) in curve.radii.windows(2).zip(curve.saturations.windows(2)) {
            assert!(s[1] - s[0] <= 0.05 || r[1] - r[0] <= 0.4);
        }
    }
}

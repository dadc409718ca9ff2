//! 压汞曲线 (MICP).

use super::refine::seed_radii;
use super::{opening, Curve, CurveKind, Porosimetry, StepLog};
use crate::consts::ENTRY_SEED_DIVISOR;
use crate::edt::DistanceTransform;
use crate::error::SweepResult;

impl<E: DistanceTransform> Porosimetry<E> {
    /// 压汞曲线.
    ///
    /// 在 [`Self::psd`] 的基础上, 只保留与注入方向连通的部分:
    /// 非润湿相只能从 `direction` 指定的边界面进入.
    pub fn micp(&mut self, log: &mut dyn StepLog) -> SweepResult<Curve> {
        let seeds = seed_radii(self.max_radius, ENTRY_SEED_DIVISOR);
        Ok(self.sweep_incremental(CurveKind::Micp, seeds, log, |this, r| {
            let open = opening(&mut this.edt, this.pore.view(), this.pore_dist.view(), r);
            this.conn.connected(open.view())
        }))
    }
}

//! 半径列表的自适应细化.

use std::collections::BTreeMap;

use itertools::Itertools;
use ordered_float::OrderedFloat;

/// 按半径升序保存的 `(半径, 饱和度)` 曲线.
#[derive(Debug, Clone, Default)]
pub(crate) struct RadiusCurve {
    points: BTreeMap<OrderedFloat<f64>, f64>,
}

impl RadiusCurve {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, radius: f64, saturation: f64) {
        self.points.insert(OrderedFloat(radius), saturation);
    }

    #[inline]
    pub fn contains(&self, radius: f64) -> bool {
        self.points.contains_key(&OrderedFloat(radius))
    }

    /// 以 `f(半径)` 重新计算每个点的饱和度.
    pub fn restate<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for (r, s) in self.points.iter_mut() {
            *s = f(r.into_inner());
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 所有可细化的相邻半径对, 以 `(中点, |Δs|)` 形式给出.
    ///
    /// 一对相邻半径可细化, 当且仅当 `|Δs| > sat_res` 且 `Δr > 2 * rad_res`.
    fn refinable(&self, sat_res: f64, rad_res: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .tuple_windows()
            .filter_map(move |((r0, s0), (r1, s1))| {
                let (r0, r1) = (r0.into_inner(), r1.into_inner());
                let ds = (s1 - s0).abs();
                (ds > sat_res && r1 - r0 > 2.0 * rad_res).then_some((0.5 * (r0 + r1), ds))
            })
    }

    /// 饱和度跳变最大的可细化对的中点. 平局时取半径较小者.
    pub fn widest_gap(&self, sat_res: f64, rad_res: f64) -> Option<f64> {
        self.refinable(sat_res, rad_res)
            .fold(None, |best: Option<(f64, f64)>, (mid, ds)| match best {
                Some((_, best_ds)) if best_ds >= ds => best,
                _ => Some((mid, ds)),
            })
            .map(|(mid, _)| mid)
    }

    /// 全部可细化对的中点, 升序.
    pub fn all_gaps(&self, sat_res: f64, rad_res: f64) -> Vec<f64> {
        self.refinable(sat_res, rad_res).map(|(mid, _)| mid).collect()
    }

    /// 拆分为升序的 `(radii, saturations)`.
    pub fn into_vecs(self) -> (Vec<f64>, Vec<f64>) {
        self.points.into_iter().map(|(r, s)| (r.into_inner(), s)).unzip()
    }
}

/// 增量驱动器的初始半径 `{1, max / divisor, max}`. 去重, 丢弃小于 1 的值, 升序.
pub(crate) fn seed_radii(max_radius: f64, divisor: f64) -> Vec<f64> {
    [1.0, max_radius / divisor, max_radius]
        .into_iter()
        .filter(|r| *r >= 1.0)
        .map(OrderedFloat)
        .sorted()
        .dedup()
        .map(OrderedFloat::into_inner)
        .collect()
}

/// `[1, max]` 上均匀分布的 `n` 个半径. 去重, 升序.
pub(crate) fn linspace_radii(max_radius: f64, n: usize) -> Vec<f64> {
    let hi = max_radius.max(1.0);
    let step = if n > 1 { (hi - 1.0) / (n - 1) as f64 } else { 0.0 };
    (0..n.max(1))
        .map(|i| OrderedFloat(1.0 + step * i as f64))
        .dedup()
        .map(OrderedFloat::into_inner)
        .collect()
}

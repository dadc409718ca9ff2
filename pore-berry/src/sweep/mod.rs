//! 半径扫描驱动器.
//!
//! 每种曲线对应一个驱动器. 驱动器在候选球半径上自适应细化,
//! 每个半径调用一次形态学开运算 (以及按需调用连通性分类), 得到饱和度.
//!
//! 细化分两类:
//!
//! 1. 增量式 (`psd`, `micp`, `imbibition_compressible`): 每次只插入饱和度跳变最大的一对相邻半径的中点,
//!   且只计算新半径.
//! 2. 路径相关 (`drainage_incompressible`, `imbibition_incompressible`): 插入全部可细化对的中点,
//!   并从头重新扫描整条半径列表, 因为被困相依赖于扫描顺序.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3, Zip};

use crate::connectivity::{Connectivity, Direction};
use crate::consts::{DEFAULT_RAD_RESOLUTION, DEFAULT_SAT_RESOLUTION};
use crate::edt::{BufferedEdt, Device, DistanceTransform, EdgeMode};
use crate::error::{ComputeError, ConfigError, SweepResult};
use crate::volume::{Mask, PoreVolume};

mod drainage;
mod hpsd;
mod imbibition;
mod log;
mod micp;
mod psd;
mod refine;

pub use self::log::{format_step, FileLog, MemoryLog, NoLog, StepLog};
use self::log::emit;
use self::refine::RadiusCurve;

/// 扫描参数.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    sat_resolution: f64,
    rad_resolution: f64,
    direction: Direction,
    device: Device,
    edge: EdgeMode,
    verbose: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sat_resolution: DEFAULT_SAT_RESOLUTION,
            rad_resolution: DEFAULT_RAD_RESOLUTION,
            direction: Direction::default(),
            device: Device::default(),
            edge: EdgeMode::default(),
            verbose: false,
        }
    }
}

impl SweepConfig {
    /// 以给定的饱和度分辨率和半径分辨率 (体素) 创建参数, 其余取默认值.
    ///
    /// 两个分辨率都必须是有限正数, 否则返回 `Err(ConfigError::InvalidResolution)`.
    pub fn new(sat_resolution: f64, rad_resolution: f64) -> Result<Self, ConfigError> {
        let check = |name, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(ConfigError::InvalidResolution { name, value })
            }
        };
        Ok(Self {
            sat_resolution: check("sat_resolution", sat_resolution)?,
            rad_resolution: check("rad_resolution", rad_resolution)?,
            ..Self::default()
        })
    }

    /// 设置连通方向.
    #[inline]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// 以字符串设置连通方向, 如 `"z-"`.
    pub fn with_direction_str(self, direction: &str) -> Result<Self, ConfigError> {
        Ok(self.with_direction(direction.parse()?))
    }

    /// 设置 EDT 执行设备.
    #[inline]
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// 设置孔隙距离场的边界模式.
    #[inline]
    pub fn with_edge(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    /// 是否输出特征长度图.
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 饱和度分辨率.
    #[inline]
    pub fn sat_resolution(&self) -> f64 {
        self.sat_resolution
    }

    /// 半径分辨率 (体素).
    #[inline]
    pub fn rad_resolution(&self) -> f64 {
        self.rad_resolution
    }

    /// 连通方向.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// EDT 执行设备.
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    /// 孔隙距离场的边界模式.
    #[inline]
    pub fn edge(&self) -> EdgeMode {
        self.edge
    }

    /// 是否输出特征长度图?
    #[inline]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// 饱和度所描述的相.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 非润湿相 (`Snw`).
    NonWetting,

    /// 润湿相 (`Sw`).
    Wetting,
}

impl Phase {
    /// 日志中的名字, `Snw` 或 `Sw`.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::NonWetting => "Snw",
            Self::Wetting => "Sw",
        }
    }

    /// 数据集变量名前缀, `snw` 或 `sw`.
    #[inline]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::NonWetting => "snw",
            Self::Wetting => "sw",
        }
    }
}

/// 曲线类型.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// 孔径分布.
    Psd,

    /// 分层孔径分布.
    Hpsd,

    /// 压汞曲线.
    Micp,

    /// 不可压缩驱替.
    DrainageIncompressible,

    /// 可压缩渗吸.
    ImbibitionCompressible,

    /// 不可压缩渗吸.
    ImbibitionIncompressible,
}

impl CurveKind {
    /// 全部曲线类型.
    pub const ALL: [CurveKind; 6] = [
        Self::Psd,
        Self::Hpsd,
        Self::Micp,
        Self::DrainageIncompressible,
        Self::ImbibitionCompressible,
        Self::ImbibitionIncompressible,
    ];

    /// 名字, 同时也是数据集中的变量名后缀.
    pub fn name(self) -> &'static str {
        match self {
            Self::Psd => "psd",
            Self::Hpsd => "hpsd",
            Self::Micp => "micp",
            Self::DrainageIncompressible => "drainage_incompressible",
            Self::ImbibitionCompressible => "imbibition_compressible",
            Self::ImbibitionIncompressible => "imbibition_incompressible",
        }
    }

    /// 曲线饱和度所描述的相.
    pub fn phase(self) -> Phase {
        match self {
            Self::ImbibitionCompressible | Self::ImbibitionIncompressible => Phase::Wetting,
            _ => Phase::NonWetting,
        }
    }
}

impl FromStr for CurveKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigError::UnknownCurve(s.to_string()))
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 扫描结果.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// 曲线类型.
    pub kind: CurveKind,

    /// 饱和度所描述的相.
    pub phase: Phase,

    /// 半径 (体素). 除 `hpsd` 按提取顺序 (严格递减) 外, 均为升序.
    pub radii: Vec<f64>,

    /// 与 `radii` 一一对应的饱和度.
    pub saturations: Vec<f64>,

    /// 特征长度图, 仅在 verbose 模式下存在.
    pub length_map: Option<Array3<f32>>,
}

impl Curve {
    /// 点的个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// 是否没有任何点?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// 按顺序迭代 `(radius, saturation)`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.radii.iter().copied().zip(self.saturations.iter().copied())
    }
}

/// 特征长度图的累积器.
///
/// 非润湿相取每个体素被占据时的最大半径; 润湿相取最小半径, 从未到达的体素为 0.
/// 增量扫描也用它给出累积饱和度.
#[derive(Debug, Clone)]
struct LengthMap {
    phase: Phase,
    data: Array3<f32>,
}

impl LengthMap {
    fn new(shape: (usize, usize, usize), phase: Phase) -> Self {
        let init = match phase {
            Phase::NonWetting => 0.0,
            Phase::Wetting => f32::INFINITY,
        };
        Self {
            phase,
            data: Array3::from_elem(shape, init),
        }
    }

    fn record(&mut self, mask: &Mask, radius: f64) {
        let r = radius as f32;
        match self.phase {
            Phase::NonWetting => Zip::from(&mut self.data).and(mask).for_each(|l, &m| {
                if m && r > *l {
                    *l = r;
                }
            }),
            Phase::Wetting => Zip::from(&mut self.data).and(mask).for_each(|l, &m| {
                if m && r < *l {
                    *l = r;
                }
            }),
        }
    }

    /// 在已记录的半径中, 半径 `radius` 处被占据的体素数.
    ///
    /// 非润湿相统计在不小于 `radius` 的某个半径被占据过的体素, 润湿相统计不大于 `radius` 的.
    fn reached(&self, radius: f64) -> usize {
        let r = radius as f32;
        match self.phase {
            Phase::NonWetting => self.data.iter().filter(|l| **l >= r).count(),
            Phase::Wetting => self.data.iter().filter(|l| **l <= r).count(),
        }
    }

    fn finish(mut self) -> Array3<f32> {
        self.data.mapv_inplace(|l| if l.is_finite() { l } else { 0.0 });
        self.data
    }
}

/// 单个二值体上的扫描上下文.
///
/// 持有孔隙掩膜, 孔隙距离场, 扫描参数, EDT 提供者和连通性分类器.
/// 同一个上下文可以依次运行多种曲线.
#[derive(Debug)]
pub struct Porosimetry<E: DistanceTransform = BufferedEdt> {
    pore: Mask,
    pore_count: usize,
    pore_dist: Array3<f32>,
    max_radius: f64,
    config: SweepConfig,
    edt: E,
    conn: Connectivity,
}

impl Porosimetry<BufferedEdt> {
    /// 使用 `config` 指定设备上的 [`BufferedEdt`] 创建上下文.
    pub fn new(volume: &PoreVolume, config: SweepConfig) -> SweepResult<Self> {
        let edt = BufferedEdt::new(config.device());
        Self::with_provider(volume, config, edt)
    }
}

impl<E: DistanceTransform> Porosimetry<E> {
    /// 使用自定义 EDT 提供者创建上下文.
    ///
    /// 孔隙度为零时返回 `Err(ComputeError::ZeroPorosity)`;
    /// 开放边界下没有固体时返回 `Err(ComputeError::UnboundedDistance)`.
    pub fn with_provider(volume: &PoreVolume, config: SweepConfig, mut edt: E) -> SweepResult<Self> {
        let pore_count = volume.pore_count();
        if pore_count == 0 {
            return Err(ComputeError::ZeroPorosity.into());
        }
        let pore = volume.pore_mask();
        let pore_dist = edt.transform(pore.view(), config.edge()).into_owned();
        let max_radius = max_finite(pore_dist.view()).ok_or(ComputeError::UnboundedDistance)?;
        Ok(Self {
            pore,
            pore_count,
            pore_dist,
            max_radius,
            conn: Connectivity::new(config.direction()),
            config,
            edt,
        })
    }

    /// 扫描参数.
    #[inline]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// 孔隙体素个数.
    #[inline]
    pub fn pore_count(&self) -> usize {
        self.pore_count
    }

    /// 孔隙距离场的最大值, 即可能的最大内切球半径.
    #[inline]
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// 孔隙距离场.
    #[inline]
    pub fn pore_distance(&self) -> ArrayView3<'_, f32> {
        self.pore_dist.view()
    }

    /// 运行 `kind` 类型的扫描.
    pub fn run(&mut self, kind: CurveKind, log: &mut dyn StepLog) -> SweepResult<Curve> {
        ::log::info!(
            "开始 {kind} 扫描: 孔隙体素 {}, 最大半径 {}, 方向 {}",
            self.pore_count,
            self.max_radius,
            self.config.direction()
        );
        let curve = match kind {
            CurveKind::Psd => self.psd(log),
            CurveKind::Hpsd => self.hpsd(log),
            CurveKind::Micp => self.micp(log),
            CurveKind::DrainageIncompressible => self.drainage_incompressible(log),
            CurveKind::ImbibitionCompressible => self.imbibition_compressible(log),
            CurveKind::ImbibitionIncompressible => self.imbibition_incompressible(log),
        }?;
        ::log::info!("{kind} 扫描结束, 共 {} 个半径", curve.len());
        Ok(curve)
    }

    fn length_map(&self, phase: Phase) -> Option<LengthMap> {
        self.config
            .is_verbose()
            .then(|| LengthMap::new(self.pore.dim(), phase))
    }

    /// 增量式细化. `eval` 计算单个半径处的掩膜, 种子按给定顺序计算.
    ///
    /// 报告的饱和度是累积的: 非润湿相在 `r` 处为所有不小于 `r` 的已算半径的掩膜之并,
    /// 润湿相为不大于 `r` 的掩膜之并. 每算出一个半径, 已记录的饱和度随之更新,
    /// 因此曲线总是单调的.
    fn sweep_incremental<F>(
        &mut self,
        kind: CurveKind,
        seeds: Vec<f64>,
        log: &mut dyn StepLog,
        mut eval: F,
    ) -> Curve
    where
        F: FnMut(&mut Self, f64) -> Mask,
    {
        let phase = kind.phase();
        let pore_count = self.pore_count as f64;
        let mut reach = LengthMap::new(self.pore.dim(), phase);
        let mut curve = RadiusCurve::new();
        let mut evaluate = |this: &mut Self, curve: &mut RadiusCurve, r: f64| {
            let mask = eval(this, r);
            reach.record(&mask, r);
            let s = reach.reached(r) as f64 / pore_count;
            emit(log, phase, r, s);
            curve.insert(r, s);
            curve.restate(|radius| reach.reached(radius) as f64 / pore_count);
        };

        for r in seeds {
            evaluate(self, &mut curve, r);
        }
        let (sat_res, rad_res) = (self.config.sat_resolution(), self.config.rad_resolution());
        while let Some(mid) = curve.widest_gap(sat_res, rad_res) {
            if curve.contains(mid) {
                break;
            }
            evaluate(self, &mut curve, mid);
        }

        let (radii, saturations) = curve.into_vecs();
        Curve {
            kind,
            phase,
            radii,
            saturations,
            length_map: self.config.is_verbose().then(|| reach.finish()),
        }
    }

    /// 路径相关细化. `pass` 从头扫描一遍升序半径列表, 每算出一个半径就以 `(r, 掩膜)` 调用一次 `visit`.
    /// 只要列表增长就完整重算.
    fn sweep_path_dependent<F>(
        &mut self,
        kind: CurveKind,
        seeds: Vec<f64>,
        log: &mut dyn StepLog,
        mut pass: F,
    ) -> Curve
    where
        F: FnMut(&mut Self, &[f64], &mut dyn FnMut(f64, &Mask)),
    {
        let phase = kind.phase();
        let (sat_res, rad_res) = (self.config.sat_resolution(), self.config.rad_resolution());
        let pore_count = self.pore_count as f64;
        let mut radii = seeds;
        loop {
            let mut lengths = self.length_map(phase);
            let mut curve = RadiusCurve::new();
            pass(self, &radii, &mut |r: f64, mask: &Mask| {
                let s = count(mask) as f64 / pore_count;
                emit(log, phase, r, s);
                if let Some(lm) = lengths.as_mut() {
                    lm.record(mask, r);
                }
                curve.insert(r, s);
            });
            debug_assert_eq!(curve.len(), radii.len());

            let fresh: Vec<f64> = curve
                .all_gaps(sat_res, rad_res)
                .into_iter()
                .filter(|r| !curve.contains(*r))
                .collect();
            if fresh.is_empty() {
                let (radii, saturations) = curve.into_vecs();
                return Curve {
                    kind,
                    phase,
                    radii,
                    saturations,
                    length_map: lengths.map(LengthMap::finish),
                };
            }
            ::log::debug!("{kind}: 插入 {} 个半径, 重新扫描", fresh.len());
            radii.extend(fresh);
            radii.sort_by(f64::total_cmp);
        }
    }
}

/// 半径 `r` 下对 `region` 的形态学开运算.
///
/// `dist` 为 `region` 的距离场. 种子为 `dist >= r` 的体素; 结果为到最近种子距离小于 `r`
/// 且属于 `region` 的体素. 没有种子时结果为空.
pub(crate) fn opening<E: DistanceTransform>(
    edt: &mut E,
    region: ArrayView3<'_, bool>,
    dist: ArrayView3<'_, f32>,
    r: f64,
) -> Mask {
    let not_seed = dist.mapv(|d| (d as f64) < r);
    if not_seed.iter().all(|m| *m) {
        return Mask::from_elem(region.dim(), false);
    }
    let cover = edt.transform(not_seed.view(), EdgeMode::Open);
    Zip::from(&cover)
        .and(&region)
        .map_collect(|&d, &m| m && (d as f64) < r)
}

/// 掩膜中 `true` 的个数.
#[inline]
pub(crate) fn count(mask: &Mask) -> usize {
    mask.iter().filter(|m| **m).count()
}

/// 有限值中的最大值. 存在无穷大时返回 `None`.
fn max_finite(field: ArrayView3<'_, f32>) -> Option<f64> {
    field
        .iter()
        .try_fold(0.0f32, |acc, &d| d.is_finite().then(|| acc.max(d)))
        .map(f64::from)
}

/// 孔径分布. 见 [`Porosimetry::psd`].
pub fn psd(volume: &PoreVolume, config: &SweepConfig, log: &mut dyn StepLog) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::Psd, log)
}

/// 分层孔径分布. 见 [`Porosimetry::hpsd`].
pub fn hpsd(volume: &PoreVolume, config: &SweepConfig, log: &mut dyn StepLog) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::Hpsd, log)
}

/// 压汞曲线. 见 [`Porosimetry::micp`].
pub fn micp(volume: &PoreVolume, config: &SweepConfig, log: &mut dyn StepLog) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::Micp, log)
}

/// 不可压缩驱替. 见 [`Porosimetry::drainage_incompressible`].
pub fn drainage_incompressible(
    volume: &PoreVolume,
    config: &SweepConfig,
    log: &mut dyn StepLog,
) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::DrainageIncompressible, log)
}

/// 可压缩渗吸. 见 [`Porosimetry::imbibition_compressible`].
pub fn imbibition_compressible(
    volume: &PoreVolume,
    config: &SweepConfig,
    log: &mut dyn StepLog,
) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::ImbibitionCompressible, log)
}

/// 不可压缩渗吸. 见 [`Porosimetry::imbibition_incompressible`].
pub fn imbibition_incompressible(
    volume: &PoreVolume,
    config: &SweepConfig,
    log: &mut dyn StepLog,
) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(CurveKind::ImbibitionIncompressible, log)
}

/// 运行 `kind` 类型的扫描.
pub fn run(
    volume: &PoreVolume,
    kind: CurveKind,
    config: &SweepConfig,
    log: &mut dyn StepLog,
) -> SweepResult<Curve> {
    Porosimetry::new(volume, config.clone())?.run(kind, log)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::edt::NaiveEdt;
    use crate::error::SweepError;
    use ndarray::s;

    pub(crate) fn volume(mask: &Mask) -> PoreVolume {
        PoreVolume::from_mask(mask.view()).unwrap()
    }

    /// `(7, 3, 3)` 全孔隙, 但 `z = 3` 层为固体.
    pub(crate) fn wall() -> PoreVolume {
        let mut mask = Mask::from_elem((7, 3, 3), true);
        mask.slice_mut(s![3, .., ..]).fill(false);
        volume(&mask)
    }

    pub(crate) fn cube4() -> PoreVolume {
        volume(&Mask::from_elem((4, 4, 4), true))
    }

    /// 约 2/3 为孔隙的伪随机体.
    pub(crate) fn random_volume(shape: (usize, usize, usize), seed: u32) -> PoreVolume {
        let mut state = seed;
        let mask = Mask::from_shape_fn(shape, |_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) % 3 != 0
        });
        volume(&mask)
    }

    #[test]
    fn test_config() {
        let c = SweepConfig::default();
        assert_eq!(c.sat_resolution(), 0.02);
        assert_eq!(c.rad_resolution(), 0.25);
        assert_eq!(c.direction(), Direction::ZNeg);
        assert_eq!(c.device(), Device::Cpu);
        assert_eq!(c.edge(), EdgeMode::Solid);
        assert!(!c.is_verbose());

        assert!(matches!(
            SweepConfig::new(0.0, 0.25),
            Err(ConfigError::InvalidResolution {
                name: "sat_resolution",
                ..
            })
        ));
        assert!(SweepConfig::new(0.1, f64::NAN).is_err());
        let c = SweepConfig::new(0.1, 0.5).unwrap().with_direction_str("x+").unwrap();
        assert_eq!(c.direction(), Direction::XPos);
        assert_eq!(
            c.with_direction_str("sideways"),
            Err(ConfigError::InvalidDirection("sideways".to_string()))
        );
    }

    #[test]
    fn test_kind_names() {
        for k in CurveKind::ALL {
            assert_eq!(k.name().parse::<CurveKind>(), Ok(k));
        }
        assert_eq!(CurveKind::Micp.phase(), Phase::NonWetting);
        assert_eq!(CurveKind::ImbibitionCompressible.phase(), Phase::Wetting);
        assert!("mercury".parse::<CurveKind>().is_err());
    }

    #[test]
    fn test_zero_porosity() {
        let v = PoreVolume::new(Array3::zeros((3, 3, 3))).unwrap();
        for kind in CurveKind::ALL {
            let e = run(&v, kind, &SweepConfig::default(), &mut NoLog).unwrap_err();
            assert_eq!(e, SweepError::Compute(ComputeError::ZeroPorosity));
            assert!(e.is_degenerate());
        }
    }

    #[test]
    fn test_unbounded_open_edge() {
        let config = SweepConfig::default().with_edge(EdgeMode::Open);
        let e = psd(&cube4(), &config, &mut NoLog).unwrap_err();
        assert_eq!(e, SweepError::Compute(ComputeError::UnboundedDistance));
    }

    #[test]
    fn test_opening_cube() {
        let v = cube4();
        let mut edt = NaiveEdt;
        let p = Porosimetry::with_provider(&v, SweepConfig::default(), NaiveEdt).unwrap();
        assert_eq!(p.max_radius(), 2.0);
        for r in [1.0, 2.0] {
            let open = opening(&mut edt, p.pore.view(), p.pore_distance(), r);
            assert_eq!(count(&open), 64, "r = {r}");
        }
        // 八个角点到最近种子的距离为 sqrt(3).
        let open = opening(&mut edt, p.pore.view(), p.pore_distance(), 1.5);
        assert_eq!(count(&open), 56);
        assert!(!open[(3, 3, 0)]);
        let open = opening(&mut edt, p.pore.view(), p.pore_distance(), 2.5);
        assert_eq!(count(&open), 0);
    }

    #[test]
    fn test_every_kind_bounded_and_ordered() {
        let v = random_volume((8, 9, 10), 42);
        let config = SweepConfig::new(0.05, 0.25).unwrap().verbose(true);
        let mut p = Porosimetry::new(&v, config).unwrap();
        for kind in CurveKind::ALL {
            let curve = p.run(kind, &mut NoLog).unwrap();
            assert_eq!(curve.radii.len(), curve.saturations.len());
            assert!(!curve.is_empty());
            assert!(curve
                .saturations
                .iter()
                .all(|s| (0.0..=1.0).contains(s)));
            if kind == CurveKind::Hpsd {
                assert!(curve.radii.windows(2).all(|w| w[0] > w[1]));
            } else {
                assert!(curve.radii.windows(2).all(|w| w[0] < w[1]));
                assert!(curve.radii.iter().all(|r| *r >= 1.0 && *r <= p.max_radius()));
            }
            let map = curve.length_map.as_ref().unwrap();
            assert_eq!(map.dim(), v.data().dim());
            assert!(map.iter().all(|l| l.is_finite() && *l >= 0.0));
        }
    }

    #[test]
    fn test_devices_agree() {
        let v = random_volume((7, 8, 6), 3);
        for kind in CurveKind::ALL {
            let config = SweepConfig::new(0.05, 0.25).unwrap().verbose(true);
            let naive = Porosimetry::with_provider(&v, config.clone(), NaiveEdt)
                .unwrap()
                .run(kind, &mut NoLog)
                .unwrap();
            let cpu = run(&v, kind, &config, &mut NoLog).unwrap();
            let par = run(&v, kind, &config.clone().with_device(Device::Parallel), &mut NoLog).unwrap();
            assert_eq!(naive, cpu);
            assert_eq!(cpu, par);
        }
    }

    #[test]
    fn test_log_lines_match_curve() {
        let v = wall();
        let mut log = MemoryLog::new();
        let curve = micp(&v, &SweepConfig::default(), &mut log).unwrap();
        assert_eq!(log.lines().len(), curve.len());
        assert!(log.lines().iter().all(|l| l.ends_with("Snw: 0.5")));
    }
}

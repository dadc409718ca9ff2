//! 三维精确欧氏距离变换 (EDT).
//!
//! 对每个 `true` 体素, 计算它到最近 `false` 体素的欧氏距离 (体素单位);
//! `false` 体素处距离为 0.
//!
//! 实现采用 Felzenszwalb–Huttenlocher 可分离下包络算法: 依次沿 z, y, x
//! 三个轴对每条一维 lane 求平方距离的下包络, 最后统一开方.
//! 相同输入在任意设备上的输出逐位一致.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3, ArrayViewMut1, Axis, CowArray, Ix3, Zip};

use crate::error::ConfigError;

/// 距离变换时如何看待体外区域.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// 体外视为一层固体 (零点). 孔隙空间的距离场使用此模式.
    #[default]
    Solid,

    /// 体外不提供任何零点. 形态学膨胀 (到最近种子点的距离) 使用此模式.
    Open,
}

/// EDT 执行设备.
///
/// 该选择器对调用者而言是不透明的: 不同设备的输出完全相同, 只影响速度.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Device {
    /// 单线程顺序执行.
    #[default]
    Cpu,

    /// 借助 `rayon` 按切片并行. 未启用 `rayon` feature 时退化为 [`Device::Cpu`].
    Parallel,
}

impl FromStr for Device {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "parallel" | "rayon" => Ok(Self::Parallel),
            _ => Err(ConfigError::InvalidDevice(s.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "cpu",
            Self::Parallel => "parallel",
        })
    }
}

/// 距离变换提供者.
///
/// 返回值可能借用提供者内部缓冲区; 因此在下一次调用 `transform` 之前,
/// 调用者必须用完 (或 `into_owned`) 上一次的结果. 借用检查器会保证这一点.
pub trait DistanceTransform {
    /// 计算 `mask` 的欧氏距离场.
    fn transform(&mut self, mask: ArrayView3<'_, bool>, edge: EdgeMode) -> CowArray<'_, f32, Ix3>;
}

/// 每次调用都分配新数组的朴素实现, 无副作用.
#[derive(Debug, Copy, Clone, Default)]
pub struct NaiveEdt;

impl DistanceTransform for NaiveEdt {
    fn transform(&mut self, mask: ArrayView3<'_, bool>, edge: EdgeMode) -> CowArray<'_, f32, Ix3> {
        let mut field = Array3::<f32>::zeros(mask.dim());
        fill_field(&mut field, mask, edge, Device::Cpu, &mut LaneScratch::default());
        CowArray::from(field)
    }
}

/// 复用内部缓冲区的实现. 仅在输入形状变化时重新分配.
#[derive(Debug, Clone, Default)]
pub struct BufferedEdt {
    device: Device,
    field: Array3<f32>,
    scratch: LaneScratch,
}

impl BufferedEdt {
    /// 在指定设备上创建提供者. 缓冲区延迟到第一次调用时分配.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            field: Array3::zeros((0, 0, 0)),
            scratch: LaneScratch::default(),
        }
    }

    /// 执行设备.
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }
}

impl DistanceTransform for BufferedEdt {
    fn transform(&mut self, mask: ArrayView3<'_, bool>, edge: EdgeMode) -> CowArray<'_, f32, Ix3> {
        if self.field.dim() != mask.dim() {
            self.field = Array3::zeros(mask.dim());
        }
        fill_field(&mut self.field, mask, edge, self.device, &mut self.scratch);
        CowArray::from(self.field.view())
    }
}

/// 计算 `mask` 的欧氏距离场, 总是分配新数组.
pub fn distance_field(mask: ArrayView3<'_, bool>, edge: EdgeMode) -> Array3<f32> {
    NaiveEdt.transform(mask, edge).into_owned()
}

/// 下包络中的一条抛物线 `(x - q)^2 + f`, 从 `z` 开始占优.
#[derive(Debug, Copy, Clone)]
struct Parabola {
    q: f64,
    f: f64,
    z: f64,
}

/// 一维 lane 变换的临时空间.
#[derive(Debug, Clone, Default)]
struct LaneScratch {
    envelope: Vec<Parabola>,
}

impl LaneScratch {
    /// 将位于 `q` 的抛物线压入下包络. `q` 必须严格递增.
    fn push(&mut self, q: f64, f: f64) {
        while let Some(p) = self.envelope.last() {
            let s = ((f + q * q) - (p.f + p.q * p.q)) / (2.0 * q - 2.0 * p.q);
            if s > p.z {
                self.envelope.push(Parabola { q, f, z: s });
                return;
            }
            self.envelope.pop();
        }
        self.envelope.push(Parabola {
            q,
            f,
            z: f64::NEG_INFINITY,
        });
    }

    /// 对一条 lane 原地计算平方距离.
    fn transform_lane(&mut self, mut lane: ArrayViewMut1<'_, f32>, edge: EdgeMode) {
        let n = lane.len();
        self.envelope.clear();
        if edge == EdgeMode::Solid {
            self.push(-1.0, 0.0);
        }
        for (q, &f) in lane.iter().enumerate() {
            if f.is_finite() {
                self.push(q as f64, f as f64);
            }
        }
        if edge == EdgeMode::Solid {
            self.push(n as f64, 0.0);
        }

        if self.envelope.is_empty() {
            lane.fill(f32::INFINITY);
            return;
        }
        let mut k = 0;
        for (x, d) in lane.iter_mut().enumerate() {
            let x = x as f64;
            while k + 1 < self.envelope.len() && self.envelope[k + 1].z < x {
                k += 1;
            }
            let p = self.envelope[k];
            *d = ((x - p.q) * (x - p.q) + p.f) as f32;
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        /// 沿 `axis` 并行处理全部 lane. 按另一轴切片分发给 `rayon`, 每个任务一份临时空间.
        fn pass_parallel(field: &mut Array3<f32>, axis: usize, edge: EdgeMode) {
            let outer = if axis == 0 { 1 } else { 0 };
            // 切片去掉 `outer` 轴后, `axis` 的序号.
            let inner = if outer < axis { axis - 1 } else { axis };
            field
                .axis_iter_mut(Axis(outer))
                .into_par_iter()
                .for_each_init(LaneScratch::default, |scratch, mut slice| {
                    for lane in slice.lanes_mut(Axis(inner)) {
                        scratch.transform_lane(lane, edge);
                    }
                });
        }
    } else {
        fn pass_parallel(field: &mut Array3<f32>, axis: usize, edge: EdgeMode) {
            pass_sequential(field, axis, edge, &mut LaneScratch::default());
        }
    }
}

fn pass_sequential(field: &mut Array3<f32>, axis: usize, edge: EdgeMode, scratch: &mut LaneScratch) {
    for lane in field.lanes_mut(Axis(axis)) {
        scratch.transform_lane(lane, edge);
    }
}

/// 在 `field` 中写入 `mask` 的距离场. `field` 与 `mask` 形状必须一致.
fn fill_field(
    field: &mut Array3<f32>,
    mask: ArrayView3<'_, bool>,
    edge: EdgeMode,
    device: Device,
    scratch: &mut LaneScratch,
) {
    debug_assert_eq!(field.dim(), mask.dim());
    Zip::from(&mut *field)
        .and(&mask)
        .for_each(|d, &m| *d = if m { f32::INFINITY } else { 0.0 });

    for axis in 0..3 {
        match device {
            Device::Cpu => pass_sequential(field, axis, edge, scratch),
            Device::Parallel => pass_parallel(field, axis, edge),
        }
    }
    field.mapv_inplace(f32::sqrt);
}

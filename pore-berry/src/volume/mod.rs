//! 3D 孔隙二值体及其基础属性.

use std::ops::Index;
use std::path::Path;

use ndarray::{Array3, ArrayView3, Axis};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::consts::gray::*;
use crate::dataset::LoadError;
use crate::error::ConfigError;
use crate::Idx3d;

mod slice;

pub use slice::{ImgWriteVis, LengthSlice, PoreSlice};

/// 驱动器内部使用的布尔掩膜. `true` 代表体素属于该区域.
pub type Mask = Array3<bool>;

/// 三维体的共用属性和部分通用操作.
pub trait VolumeAttr {
    /// 获取数据形状大小 `(z, y, x)`.
    fn shape(&self) -> Idx3d;

    /// 获取体素分辨率 `[z, y, x]`. 单位由数据来源决定 (通常为毫米或微米).
    fn spacing(&self) -> [f64; 3];

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 获取水平切片个数.
    #[inline]
    fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获取数据水平切片形状大小.
    #[inline]
    fn slice_shape(&self) -> (usize, usize) {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 检查索引是否合法.
    #[inline]
    fn check(&self, (z0, h0, w0): &Idx3d) -> bool {
        let (z, h, w) = self.shape();
        *z0 < z && *h0 < h && *w0 < w
    }

    /// 获取体素的实际体积值.
    #[inline]
    fn voxel(&self) -> f64 {
        self.spacing().iter().product()
    }

    /// 体素分辨率在三个维度上是否是各向同的?
    #[inline]
    fn is_isotropic(&self) -> bool {
        let [z, h, w] = self.spacing();
        z == h && z == w
    }
}

/// 二值孔隙体. 体素值 [`PORE`] 代表孔隙, [`SOLID`] 代表固体基质.
///
/// 构造时会检查所有体素, 因此该结构的数据总是严格二值的.
#[derive(Debug, Clone)]
pub struct PoreVolume {
    data: Array3<u8>,
    spacing: [f64; 3],
}

impl VolumeAttr for PoreVolume {
    #[inline]
    fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    #[inline]
    fn spacing(&self) -> [f64; 3] {
        self.spacing
    }
}

impl Index<Idx3d> for PoreVolume {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

/// 将 (W, H, z) 转换成 (z, H, W).
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

/// 检查分辨率是否为有限正数.
pub(crate) fn check_spacing(spacing: [f64; 3]) -> Result<[f64; 3], ConfigError> {
    match spacing.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        Some(&value) => Err(ConfigError::InvalidResolution {
            name: "spacing",
            value,
        }),
        None => Ok(spacing),
    }
}

impl PoreVolume {
    /// 以单位分辨率创建二值体.
    ///
    /// 如果 `data` 为空, 返回 `Err(ConfigError::EmptyVolume)`;
    /// 如果存在 0/1 以外的值, 返回 `Err(ConfigError::NonBinary)`, 其中携带第一个非法体素.
    #[inline]
    pub fn new(data: Array3<u8>) -> Result<Self, ConfigError> {
        Self::with_spacing(data, [1.0; 3])
    }

    /// 以给定分辨率 `[z, y, x]` 创建二值体. 检查规则同 [`Self::new`],
    /// 另外要求分辨率均为有限正数.
    pub fn with_spacing(data: Array3<u8>, spacing: [f64; 3]) -> Result<Self, ConfigError> {
        if data.is_empty() {
            return Err(ConfigError::EmptyVolume);
        }
        let spacing = check_spacing(spacing)?;
        if let Some((index, &value)) = data.indexed_iter().find(|(_, p)| !is_binary(**p)) {
            return Err(ConfigError::NonBinary { index, value });
        }
        Ok(Self { data, spacing })
    }

    /// 从布尔掩膜创建二值体. `true` 为孔隙.
    pub fn from_mask(mask: ArrayView3<'_, bool>) -> Result<Self, ConfigError> {
        if mask.is_empty() {
            return Err(ConfigError::EmptyVolume);
        }
        Ok(Self {
            data: mask.mapv(u8::from),
            spacing: [1.0; 3],
        })
    }

    /// 打开 nii 文件格式的三维体. 任何非零体素都被视为孔隙.
    /// 分辨率取自 header 的 `pixdim`.
    pub fn open_nifti<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = obj.header().clone();

        // [W, H, z] -> [z, H, W].
        let raw = obj
            .into_volume()
            .into_ndarray::<f32>()?
            .permuted_axes([2, 1, 0].as_slice());
        let binary: Vec<u8> = raw.iter().map(|&v| u8::from(v != 0.0)).collect();
        let data = Array3::from_shape_vec(get_shape_from_header(&header), binary)?;

        let [_, w, h, z, ..] = header.pixdim;
        let spacing = [z as f64, h as f64, w as f64];
        Ok(Self::with_spacing(data, spacing)?)
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array3<u8> {
        self.data
    }

    /// 获取值为 `label` 的体素个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 孔隙体素个数.
    #[inline]
    pub fn pore_count(&self) -> usize {
        self.count(PORE)
    }

    /// 孔隙度, 即孔隙体素占全部体素的比例.
    #[inline]
    pub fn porosity(&self) -> f64 {
        self.pore_count() as f64 / self.size() as f64
    }

    /// 孔隙的布尔掩膜.
    #[inline]
    pub fn pore_mask(&self) -> Mask {
        self.data.mapv(is_pore)
    }

    /// 获取 z 空间的第 `z_index` 层切片视图.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> PoreSlice<'_> {
        PoreSlice::new(self.data.index_axis(Axis(0), z_index))
    }

    /// 获取能按升序迭代水平切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = PoreSlice<'_>> {
        self.data.axis_iter(Axis(0)).map(PoreSlice::new)
    }
}

/// 获取 `pos` 前后上下左右六个点的坐标.
///
/// 在 `shape` 范围外的坐标会被过滤掉.
#[inline]
pub(crate) fn diamond_neighbours((z, h, w): Idx3d, shape: Idx3d) -> impl Iterator<Item = Idx3d> {
    let (sz, sh, sw) = shape;
    [
        (z.wrapping_sub(1), h, w),
        (z.saturating_add(1), h, w),
        (z, h.wrapping_sub(1), w),
        (z, h.saturating_add(1), w),
        (z, h, w.wrapping_sub(1)),
        (z, h, w.saturating_add(1)),
    ]
    .into_iter()
    .filter(move |&(a, b, c)| a < sz && b < sh && c < sw)
}

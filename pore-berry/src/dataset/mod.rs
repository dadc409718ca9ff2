//! 数据集: 带坐标与命名变量的容器, 以及文件读写.
//!
//! [`PoreDataset`] 以 `"bin"` 变量保存二值体. 扫描结束后, 曲线以坐标 `radii_<kind>`
//! 和变量 `snw_<kind>` / `sw_<kind>` 写回同一个数据集; verbose 模式下特征长度图保存为变量 `<kind>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ConfigError, SweepResult};
use crate::sweep::{self, Curve, CurveKind, StepLog, SweepConfig};
use crate::volume::{check_spacing, PoreVolume, VolumeAttr};
use crate::Idx3d;

pub mod io;
pub mod loader;

/// 二值体在数据集中的变量名.
pub const BIN: &str = "bin";

/// 读写文件时的错误.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 底层 I/O 错误.
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 读取 npy 文件错误.
    #[error("读取 npy 失败: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),

    /// 写入 npy 文件错误.
    #[error("写入 npy 失败: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),

    /// 读取 nii 文件错误.
    #[error("读取 nii 失败: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// 图像编解码错误.
    #[error("图像编解码失败: {0}")]
    Image(#[from] image::ImageError),

    /// 数组形状错误.
    #[error("数组形状错误: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// 序列化/反序列化错误.
    #[error("数据集编解码失败: {0}")]
    Codec(#[from] bincode::Error),

    /// 读入的数据不是合法的二值体.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 文件格式不符合预期.
    #[error("文件格式错误: {0}")]
    Format(String),
}

/// 数据集中的变量.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Variable {
    /// 与数据集同形状的 0/1 体.
    Mask(Array3<u8>),

    /// 与数据集同形状的实数场, 如特征长度图.
    Field(Array3<f32>),

    /// 定义在坐标 `dim` 上的一维序列.
    Series {
        /// 坐标名.
        dim: String,

        /// 序列值, 长度与坐标一致.
        values: Array1<f64>,
    },
}

/// 带坐标与命名变量的孔隙数据集.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoreDataset {
    shape: Idx3d,
    spacing: [f64; 3],
    coords: BTreeMap<String, Array1<f64>>,
    vars: BTreeMap<String, Variable>,
}

impl VolumeAttr for PoreDataset {
    #[inline]
    fn shape(&self) -> Idx3d {
        self.shape
    }

    #[inline]
    fn spacing(&self) -> [f64; 3] {
        self.spacing
    }
}

impl From<PoreVolume> for PoreDataset {
    fn from(volume: PoreVolume) -> Self {
        let (shape, spacing) = (volume.shape(), volume.spacing());
        let mut vars = BTreeMap::new();
        vars.insert(BIN.to_string(), Variable::Mask(volume.into_raw()));
        Self {
            shape,
            spacing,
            coords: BTreeMap::new(),
            vars,
        }
    }
}

impl PoreDataset {
    /// 从未经检查的原始数组创建数据集. 数组必须是非空的 0/1 体.
    pub fn from_raw(data: Array3<u8>, spacing: [f64; 3]) -> Result<Self, ConfigError> {
        Ok(PoreVolume::with_spacing(data, spacing)?.into())
    }

    /// 二值体. 数据集缺少 `"bin"` 变量, 或其不是合法的二值体时返回 `Err`.
    pub fn volume(&self) -> Result<PoreVolume, ConfigError> {
        match self.vars.get(BIN) {
            Some(Variable::Mask(data)) => PoreVolume::with_spacing(data.clone(), self.spacing),
            _ => Err(ConfigError::MissingVariable(BIN.to_string())),
        }
    }

    /// 修改分辨率.
    pub fn set_spacing(&mut self, spacing: [f64; 3]) -> Result<(), ConfigError> {
        self.spacing = check_spacing(spacing)?;
        Ok(())
    }

    /// 名为 `name` 的坐标.
    #[inline]
    pub fn coord(&self, name: &str) -> Option<&Array1<f64>> {
        self.coords.get(name)
    }

    /// 名为 `name` 的变量.
    #[inline]
    pub fn var(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// 全部坐标名, 升序.
    pub fn coord_names(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(String::as_str)
    }

    /// 全部变量名, 升序.
    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// 插入或替换坐标. 替换时会删除依赖于旧坐标且长度不再一致的序列.
    pub fn insert_coord(&mut self, name: &str, values: Array1<f64>) {
        let len = values.len();
        self.vars.retain(|_, v| match v {
            Variable::Series { dim, values } => dim.as_str() != name || values.len() == len,
            _ => true,
        });
        self.coords.insert(name.to_string(), values);
    }

    /// 插入或替换变量.
    ///
    /// 三维变量必须与数据集同形状; 序列的坐标必须存在且长度一致.
    pub fn insert_var(&mut self, name: &str, var: Variable) -> Result<(), ConfigError> {
        match &var {
            Variable::Mask(a) => self.check_shape(a.dim())?,
            Variable::Field(a) => self.check_shape(a.dim())?,
            Variable::Series { dim, values } => {
                let coord = self
                    .coords
                    .get(dim)
                    .ok_or_else(|| ConfigError::MissingVariable(dim.clone()))?;
                if coord.len() != values.len() {
                    return Err(ConfigError::ShapeMismatch {
                        expected: (coord.len(), 1, 1),
                        found: (values.len(), 1, 1),
                    });
                }
            }
        }
        self.vars.insert(name.to_string(), var);
        Ok(())
    }

    /// 删除变量.
    #[inline]
    pub fn remove_var(&mut self, name: &str) -> Option<Variable> {
        self.vars.remove(name)
    }

    fn check_shape(&self, found: Idx3d) -> Result<(), ConfigError> {
        if found == self.shape {
            Ok(())
        } else {
            Err(ConfigError::ShapeMismatch {
                expected: self.shape,
                found,
            })
        }
    }

    /// 将曲线写回数据集: 坐标 `radii_<kind>`, 序列 `snw_<kind>` 或 `sw_<kind>`,
    /// 以及 (若存在) 特征长度图 `<kind>`. 同名条目会被替换.
    pub fn attach_curve(&mut self, curve: &Curve) -> Result<(), ConfigError> {
        let names = CurveNames::new(curve.kind);
        self.insert_coord(&names.radii, Array1::from(curve.radii.clone()));
        self.insert_var(
            &names.saturation,
            Variable::Series {
                dim: names.radii.clone(),
                values: Array1::from(curve.saturations.clone()),
            },
        )?;
        match &curve.length_map {
            Some(map) => self.insert_var(&names.map, Variable::Field(map.clone()))?,
            None => {
                self.vars.remove(&names.map);
            }
        }
        Ok(())
    }

    /// 读回 [`Self::attach_curve`] 写入的曲线.
    pub fn curve(&self, kind: CurveKind) -> Result<Curve, ConfigError> {
        let names = CurveNames::new(kind);
        let radii = self
            .coords
            .get(&names.radii)
            .ok_or_else(|| ConfigError::MissingVariable(names.radii.clone()))?;
        let saturations = match self.vars.get(&names.saturation) {
            Some(Variable::Series { values, .. }) => values,
            _ => return Err(ConfigError::MissingVariable(names.saturation.clone())),
        };
        let length_map = match self.vars.get(&names.map) {
            Some(Variable::Field(map)) => Some(map.clone()),
            _ => None,
        };
        Ok(Curve {
            kind,
            phase: kind.phase(),
            radii: radii.to_vec(),
            saturations: saturations.to_vec(),
            length_map,
        })
    }
}

/// 一条曲线在数据集中的条目名.
struct CurveNames {
    radii: String,
    saturation: String,
    map: String,
}

impl CurveNames {
    fn new(kind: CurveKind) -> Self {
        let name = kind.name();
        Self {
            radii: format!("radii_{name}"),
            saturation: format!("{}_{name}", kind.phase().prefix()),
            map: name.to_string(),
        }
    }
}

/// 扫描输入: 裸数组或数据集.
#[derive(Debug, Clone)]
pub enum VolumeInput {
    /// 裸的 0/1 数组, 单位分辨率.
    Raw(Array3<u8>),

    /// 含 `"bin"` 变量的数据集.
    Labeled(PoreDataset),
}

impl From<Array3<u8>> for VolumeInput {
    #[inline]
    fn from(data: Array3<u8>) -> Self {
        Self::Raw(data)
    }
}

impl From<PoreDataset> for VolumeInput {
    #[inline]
    fn from(dataset: PoreDataset) -> Self {
        Self::Labeled(dataset)
    }
}

/// [`simulate`] 的结果.
#[derive(Debug, Clone)]
pub struct Simulated {
    /// 曲线.
    pub curve: Curve,

    /// 写回了曲线的数据集. 仅当输入为数据集时存在.
    pub dataset: Option<PoreDataset>,
}

/// 对裸数组或数据集运行 `kind` 类型的扫描.
///
/// 输入在任何计算开始之前检查; 数据集输入的结果会写回同一个数据集.
pub fn simulate<I: Into<VolumeInput>>(
    input: I,
    kind: CurveKind,
    config: &SweepConfig,
    log: &mut dyn StepLog,
) -> SweepResult<Simulated> {
    match input.into() {
        VolumeInput::Raw(data) => {
            let volume = PoreVolume::new(data)?;
            let curve = sweep::run(&volume, kind, config, log)?;
            Ok(Simulated {
                curve,
                dataset: None,
            })
        }
        VolumeInput::Labeled(mut dataset) => {
            let volume = dataset.volume()?;
            let curve = sweep::run(&volume, kind, config, log)?;
            dataset.attach_curve(&curve)?;
            Ok(Simulated {
                curve,
                dataset: Some(dataset),
            })
        }
    }
}

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;
    use crate::sweep::tests::random_volume;
    use crate::sweep::{NoLog, Phase};
    use ndarray::s;

    fn wall_data() -> Array3<u8> {
        let mut data = Array3::<u8>::ones((7, 3, 3));
        data.slice_mut(s![3, .., ..]).fill(0);
        data
    }

    #[test]
    fn test_raw_input() {
        let out = simulate(wall_data(), CurveKind::Micp, &SweepConfig::default(), &mut NoLog).unwrap();
        assert!(out.dataset.is_none());
        assert_eq!(out.curve.saturations, vec![0.5, 0.5]);
    }

    #[test]
    fn test_reject_before_compute() {
        let mut data = wall_data();
        data[(0, 0, 0)] = 2;
        let e = simulate(data, CurveKind::Psd, &SweepConfig::default(), &mut NoLog).unwrap_err();
        assert!(e.is_config());

        let mut ds = PoreDataset::from_raw(wall_data(), [1.0; 3]).unwrap();
        ds.remove_var(BIN);
        let e = simulate(ds, CurveKind::Psd, &SweepConfig::default(), &mut NoLog).unwrap_err();
        assert_eq!(e, SweepError::Config(ConfigError::MissingVariable("bin".to_string())));
    }

    #[test]
    fn test_labeled_round_trip() {
        let ds = PoreDataset::from_raw(wall_data(), [0.5, 0.5, 0.5]).unwrap();
        let config = SweepConfig::default().verbose(true);
        for kind in [CurveKind::Psd, CurveKind::ImbibitionCompressible] {
            let out = simulate(ds.clone(), kind, &config, &mut NoLog).unwrap();
            let back = out.dataset.unwrap();
            assert_eq!(back.curve(kind).unwrap(), out.curve);
            assert_eq!(back.spacing(), [0.5, 0.5, 0.5]);
            assert!(back.var(kind.name()).is_some());
            let sat = format!("{}_{}", kind.phase().prefix(), kind.name());
            assert!(back.var(&sat).is_some());
        }
        let out = simulate(ds, CurveKind::Micp, &SweepConfig::default(), &mut NoLog).unwrap();
        let back = out.dataset.unwrap();
        assert!(back.var("micp").is_none());
        assert_eq!(back.coord("radii_micp").map(|c| c.to_vec()), Some(vec![1.0, 2.0]));
        assert_eq!(back.curve(CurveKind::Micp).unwrap().phase, Phase::NonWetting);
        assert!(back.curve(CurveKind::Hpsd).is_err());
    }

    #[test]
    fn test_raw_matches_labeled() {
        let data = random_volume((8, 9, 10), 42).data().to_owned();
        let config = SweepConfig::new(0.05, 0.25).unwrap().verbose(true);
        for kind in CurveKind::ALL {
            let raw = simulate(data.clone(), kind, &config, &mut NoLog).unwrap().curve;
            let ds = PoreDataset::from_raw(data.clone(), [1.0; 3]).unwrap();
            let back = simulate(ds, kind, &config, &mut NoLog)
                .unwrap()
                .dataset
                .unwrap();
            assert_eq!(back.curve(kind).unwrap(), raw, "{kind}");
        }
    }

    #[test]
    fn test_insert_checks() {
        let mut ds = PoreDataset::from_raw(wall_data(), [1.0; 3]).unwrap();
        let wrong = Variable::Field(Array3::zeros((1, 1, 1)));
        assert!(matches!(
            ds.insert_var("x", wrong),
            Err(ConfigError::ShapeMismatch { .. })
        ));
        let series = Variable::Series {
            dim: "t".to_string(),
            values: Array1::zeros(3),
        };
        assert!(ds.insert_var("s", series.clone()).is_err());
        ds.insert_coord("t", Array1::zeros(3));
        ds.insert_var("s", series).unwrap();
        // 坐标长度变化时, 旧序列被丢弃.
        ds.insert_coord("t", Array1::zeros(4));
        assert!(ds.var("s").is_none());
        assert_eq!(ds.var_names().collect::<Vec<_>>(), vec!["bin"]);
    }
}

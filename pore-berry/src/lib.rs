#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 在 3D 二值孔隙体上以最大内切球 (形态学开运算) 模拟孔径分布与毛管压力曲线.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 输入体素中 `1` 代表孔隙, `0` 代表固体. 其它取值在任何计算开始之前就会被拒绝.
//! 2. 半径以体素为单位. 实际尺寸由 [`capillary`] 模块按体素边长换算.
//! 3. 库代码不会因用户输入而 panic; 所有错误都以 [`error`] 模块中的类型返回.
//!
//! # 开发计划
//!
//! ### 欧氏距离变换 ✅
//!
//! 精确的平方距离下包络算法, 单线程与 rayon 并行两种设备. 并行设备按外层轴切分数据,
//! 结果与单线程逐位一致.
//!
//! 实现位于 `pore-berry/src/edt`.
//!
//! ### 连通性分类 ✅
//!
//! 6-邻域连通分量标记, 按边界面 (单面、成对、全部、任一) 筛选.
//!
//! 实现位于 `pore-berry/src/connectivity`.
//!
//! ### 半径扫描驱动器 ✅
//!
//! 1. psd / micp / 可压缩渗吸: 增量式二分细化. ✅
//! 2. hpsd: 逐层剥离. ✅
//! 3. 不可压缩驱替 / 渗吸: 被困相, 半径列表增长时从头重算. ✅
//! 4. 特征长度图 (verbose). ✅
//!
//! 实现位于 `pore-berry/src/sweep`.
//!
//! ### 数据集与文件格式 ✅
//!
//! 裸字节, npy, nifti, 图像切片序列, VTK, 以及 `bincode` + zlib 存档.
//!
//! 实现位于 `pore-berry/src/dataset`.
//!
//! ### 毛管压力换算 ✅
//!
//! 实现位于 `pore-berry/src/capillary.rs`.
//!
//! ### 完善代码文档 ✅
//!
//! 给每个 public API 提供文档, 并视情况给 private
//! API 提供文档.

/// 三维索引 `(z, y, x)`, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

pub mod consts;

pub mod error;

/// 3D 二值体基础数据结构.
pub mod volume;

pub mod edt;

pub mod connectivity;

pub mod sweep;

pub mod dataset;

pub mod capillary;

pub mod prelude;

pub use error::{ComputeError, ConfigError, SweepError, SweepResult};
pub use volume::{ImgWriteVis, LengthSlice, Mask, PoreSlice, PoreVolume, VolumeAttr};

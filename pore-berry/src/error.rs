//! 运行时错误.

use crate::Idx3d;
use thiserror::Error;

/// 配置错误. 在任何计算开始之前立即返回, 不会重试.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// 无法识别的连通方向字符串.
    #[error("无法识别的连通方向 `{0}`, 只接受 x, y, z, x+, x-, y+, y-, z+, z-, all, any")]
    InvalidDirection(String),

    /// 无法识别的曲线类型.
    #[error("无法识别的曲线类型 `{0}`")]
    UnknownCurve(String),

    /// 无法识别的 EDT 执行设备.
    #[error("无法识别的 EDT 设备 `{0}`, 只接受 cpu, parallel, rayon")]
    InvalidDevice(String),

    /// 输入体素不是严格的 0/1 值.
    #[error("体素 {index:?} 的值为 {value}, 但二值体只允许 0 和 1")]
    NonBinary {
        /// 第一个非法体素的索引.
        index: Idx3d,

        /// 该体素的值.
        value: u8,
    },

    /// 形状不一致.
    #[error("形状不一致: 期望 {expected:?}, 实际 {found:?}")]
    ShapeMismatch {
        /// 期望的形状.
        expected: Idx3d,

        /// 实际的形状.
        found: Idx3d,
    },

    /// 体素个数为零.
    #[error("空的三维体")]
    EmptyVolume,

    /// 分辨率参数不合法 (非有限或不为正).
    #[error("参数 `{name}` 的值 {value} 不合法, 必须为有限正数")]
    InvalidResolution {
        /// 参数名.
        name: &'static str,

        /// 参数值.
        value: f64,
    },

    /// 数据集中缺少所需的变量.
    #[error("数据集缺少变量 `{0}`")]
    MissingVariable(String),
}

/// 数值计算错误.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    /// 孔隙度为零 (全固体), 饱和度没有定义.
    #[error("孔隙度为零, 无法归一化饱和度")]
    ZeroPorosity,

    /// 开放边界下体内没有固体, 孔隙距离场处处为无穷大.
    #[error("开放边界下不存在固体体素, 距离场无界")]
    UnboundedDistance,
}

/// 半径扫描错误.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// 配置错误.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 数值计算错误.
    #[error(transparent)]
    Compute(#[from] ComputeError),
}

impl SweepError {
    /// 是否为配置错误.
    #[inline]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// 是否为退化输入 (孔隙度为零, 或距离场无界).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Compute(_))
    }
}

/// 半径扫描运行时结果.
pub type SweepResult<T> = Result<T, SweepError>;

//! 连通性分类.
//!
//! 给定布尔掩膜, 保留与指定边界面 (组合) 6-邻域连通的全部分量.
//! 对形状为 `(Z, Y, X)` 的体, `z` 对应第 0 轴, `y` 第 1 轴, `x` 第 2 轴;
//! `-` 指索引为 0 的面, `+` 指最后一层的面.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3};

use crate::error::ConfigError;
use crate::volume::Mask;
use crate::Idx3d;

mod label;

use label::{label_into, FaceTable};
pub use label::label_components;

/// 连通方向.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 同时接触 x 轴两个面.
    X,
    /// 同时接触 y 轴两个面.
    Y,
    /// 同时接触 z 轴两个面.
    Z,
    /// 接触 x 轴末层.
    XPos,
    /// 接触 x 轴首层.
    XNeg,
    /// 接触 y 轴末层.
    YPos,
    /// 接触 y 轴首层.
    YNeg,
    /// 接触 z 轴末层.
    ZPos,
    /// 接触 z 轴首层.
    ZNeg,
    /// 每个轴都至少接触一个面.
    All,
    /// 接触任意一个面.
    Any,
}

impl Default for Direction {
    #[inline]
    fn default() -> Self {
        Self::ZNeg
    }
}

impl Direction {
    /// 全部方向, 顺序同其字符串表示 `x, y, z, x+, x-, y+, y-, z+, z-, all, any`.
    pub const ALL: [Direction; 11] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::XPos,
        Self::XNeg,
        Self::YPos,
        Self::YNeg,
        Self::ZPos,
        Self::ZNeg,
        Self::All,
        Self::Any,
    ];

    /// 反方向: 交换带符号面的正负, `x/y/z/all/any` 不变.
    pub fn opposite(self) -> Self {
        match self {
            Self::XPos => Self::XNeg,
            Self::XNeg => Self::XPos,
            Self::YPos => Self::YNeg,
            Self::YNeg => Self::YPos,
            Self::ZPos => Self::ZNeg,
            Self::ZNeg => Self::ZPos,
            other => other,
        }
    }

    /// 分量 `label` 是否满足该方向.
    fn keeps(self, faces: &FaceTable, label: u32) -> bool {
        let both = |axis| faces.touches(axis, 0, label) && faces.touches(axis, 1, label);
        let either = |axis| faces.touches(axis, 0, label) || faces.touches(axis, 1, label);
        match self {
            Self::Z => both(0),
            Self::Y => both(1),
            Self::X => both(2),
            Self::ZNeg => faces.touches(0, 0, label),
            Self::ZPos => faces.touches(0, 1, label),
            Self::YNeg => faces.touches(1, 0, label),
            Self::YPos => faces.touches(1, 1, label),
            Self::XNeg => faces.touches(2, 0, label),
            Self::XPos => faces.touches(2, 1, label),
            Self::All => (0..3).all(either),
            Self::Any => (0..3).any(either),
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "x" => Self::X,
            "y" => Self::Y,
            "z" => Self::Z,
            "x+" => Self::XPos,
            "x-" => Self::XNeg,
            "y+" => Self::YPos,
            "y-" => Self::YNeg,
            "z+" => Self::ZPos,
            "z-" => Self::ZNeg,
            "all" => Self::All,
            "any" => Self::Any,
            _ => return Err(ConfigError::InvalidDirection(s.to_string())),
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::XPos => "x+",
            Self::XNeg => "x-",
            Self::YPos => "y+",
            Self::YNeg => "y-",
            Self::ZPos => "z+",
            Self::ZNeg => "z-",
            Self::All => "all",
            Self::Any => "any",
        })
    }
}

/// 带缓存的连通性分类器.
///
/// 标记缓冲区和 BFS 队列在多次调用之间复用, 但每次调用都会对输入重新标记.
#[derive(Debug, Clone)]
pub struct Connectivity {
    direction: Direction,
    labels: Array3<u32>,
    bfs_q: VecDeque<Idx3d>,
    faces: FaceTable,
    keep: Vec<bool>,
}

impl Connectivity {
    /// 以默认方向 `direction` 创建分类器.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            labels: Array3::zeros((0, 0, 0)),
            bfs_q: VecDeque::new(),
            faces: FaceTable::default(),
            keep: Vec::new(),
        }
    }

    /// 默认方向.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 保留 `mask` 中按默认方向连通的分量.
    #[inline]
    pub fn connected(&mut self, mask: ArrayView3<'_, bool>) -> Mask {
        self.connected_to(mask, self.direction)
    }

    /// 保留 `mask` 中按 `direction` 连通的分量.
    pub fn connected_to(&mut self, mask: ArrayView3<'_, bool>, direction: Direction) -> Mask {
        if self.labels.dim() != mask.dim() {
            self.labels = Array3::zeros(mask.dim());
        }
        let n = label_into(mask, &mut self.labels, &mut self.bfs_q);
        if n == 0 {
            return Mask::from_elem(mask.dim(), false);
        }
        self.faces.rebuild(&self.labels, n);

        self.keep.clear();
        self.keep.push(false);
        self.keep
            .extend((1..=n).map(|l| direction.keeps(&self.faces, l)));
        let keep = &self.keep;
        self.labels.mapv(|l| keep[l as usize])
    }
}

/// 保留 `mask` 中按 `direction` 连通的分量. 每次调用都分配新的缓冲区.
pub fn connected(mask: ArrayView3<'_, bool>, direction: Direction) -> Mask {
    Connectivity::new(direction).connected(mask)
}

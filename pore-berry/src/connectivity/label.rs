//! 6-邻域连通分量标记.

use std::collections::VecDeque;

use ndarray::{Array3, ArrayView3, Axis};

use crate::volume::diamond_neighbours;
use crate::Idx3d;

/// 按照 6-邻域 (面相邻) 规则标记 `mask` 中所有 `true` 体素的连通分量.
///
/// 返回 `(labels, n)`: `labels` 中 0 为背景, 分量编号为 `1..=n`,
/// 按照行优先扫描时首次遇到的顺序编号.
pub fn label_components(mask: ArrayView3<'_, bool>) -> (Array3<u32>, u32) {
    let mut labels = Array3::zeros(mask.dim());
    let n = label_into(mask, &mut labels, &mut VecDeque::new());
    (labels, n)
}

/// 与 [`label_components`] 相同, 但复用调用者的缓冲区.
///
/// `labels` 必须与 `mask` 形状一致, 其原有内容会被覆盖.
pub(crate) fn label_into(
    mask: ArrayView3<'_, bool>,
    labels: &mut Array3<u32>,
    bfs_q: &mut VecDeque<Idx3d>,
) -> u32 {
    debug_assert_eq!(mask.dim(), labels.dim());
    labels.fill(0);
    let shape = mask.dim();
    let mut n = 0;

    for (pos, &m) in mask.indexed_iter() {
        if !m || labels[pos] != 0 {
            continue;
        }
        n += 1;
        labels[pos] = n;
        bfs_q.clear();
        bfs_q.push_back(pos);
        while let Some(cur) = bfs_q.pop_front() {
            for neigh in diamond_neighbours(cur, shape) {
                if mask[neigh] && labels[neigh] == 0 {
                    labels[neigh] = n;
                    bfs_q.push_back(neigh);
                }
            }
        }
    }
    n
}

/// 每个分量是否接触六个边界面. 按 `[axis][side]` 索引, `side` 0 为首层, 1 为末层.
#[derive(Debug, Clone, Default)]
pub(crate) struct FaceTable {
    touch: [[Vec<bool>; 2]; 3],
}

impl FaceTable {
    /// 根据标记结果重新统计. `n` 为分量个数.
    pub fn rebuild(&mut self, labels: &Array3<u32>, n: u32) {
        let dims = [labels.len_of(Axis(0)), labels.len_of(Axis(1)), labels.len_of(Axis(2))];
        for (axis, sides) in self.touch.iter_mut().enumerate() {
            for (side, table) in sides.iter_mut().enumerate() {
                table.clear();
                table.resize(n as usize + 1, false);
                let index = if side == 0 { 0 } else { dims[axis] - 1 };
                for &l in labels.index_axis(Axis(axis), index) {
                    table[l as usize] = true;
                }
                // 背景永远不算连通.
                table[0] = false;
            }
        }
    }

    /// 分量 `label` 是否接触 `axis` 轴的 `side` 面.
    #[inline]
    pub fn touches(&self, axis: usize, side: usize, label: u32) -> bool {
        self.touch[axis][side][label as usize]
    }
}

//! 对 `pore-berry::dataset::loader` 的更一层封装. 提供更直接的样本加载器.

use pore_berry::dataset::loader::{volume_loader, VolumeLoader};
use pore_berry::dataset::LoadError;
use std::env;
use std::path::{Path, PathBuf};

/// 样本文件名: `sample-{idx}.npy`.
pub fn sample_name(idx: u32) -> String {
    format!("sample-{idx}.npy")
}

/// 获取孔隙样本基本路径.
///
/// 1. 若环境变量 `$PORE_BERRY_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/pores`.
pub fn sample_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var("PORE_BERRY_DIR") {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => pore_berry::dataset::home_dataset_dir_with(["pores"]),
    }
}

/// 获取 `path` 下前 `n` 个样本的加载器.
pub fn sample_loader<P: AsRef<Path>>(path: P, n: u32) -> Result<VolumeLoader, LoadError> {
    volume_loader(0..n, path, sample_name)
}

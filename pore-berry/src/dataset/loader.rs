//! 通用二值体加载器.
//!
//! 提供迭代器风格的批量读取模式.

use std::io;
use std::path::{Path, PathBuf};

use super::io::read_npy;
use super::LoadError;
use crate::volume::PoreVolume;

/// 文件名构造器. 接受数据集索引数, 获得文件名.
pub type FilenameBuilder = fn(u32) -> String;

/// 从指定索引、路径、文件名构造器来创建二值体加载器.
///
/// `path` 不是目录时返回 `Err`. 文件格式由扩展名决定: `.nii` / `.nii.gz` 按 nifti 读取,
/// `.npy` 按 npy 读取. 文件缺失或格式不对时, 加载器在迭代时返回 `Err`.
pub fn volume_loader<I: IntoIterator<Item = u32>, P: AsRef<Path>>(
    data: I,
    path: P,
    builder: FilenameBuilder,
) -> Result<VolumeLoader, LoadError> {
    let path = path.as_ref().to_owned();
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} 不是目录", path.display()),
        )
        .into());
    }

    let mut data: Vec<u32> = data.into_iter().collect();
    data.reverse();

    Ok(VolumeLoader {
        path,
        data_rev: data,
        builder,
    })
}

/// 按扩展名读取单个二值体.
pub fn open_volume<P: AsRef<Path>>(path: P) -> Result<PoreVolume, LoadError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".nii") || name.ends_with(".nii.gz") {
        PoreVolume::open_nifti(path)
    } else if name.ends_with(".npy") {
        read_npy(path)
    } else {
        Err(LoadError::Format(format!("无法识别的文件类型: {}", path.display())))
    }
}

/// 3D 二值体加载器, 并在内部自动转换文件名.
#[derive(Debug)]
pub struct VolumeLoader {
    path: PathBuf,
    data_rev: Vec<u32>,
    builder: FilenameBuilder,
}

impl Iterator for VolumeLoader {
    type Item = (u32, Result<PoreVolume, LoadError>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.data_rev.pop()?;

        self.path.push((self.builder)(idx));
        let data = open_volume(self.path.as_path());
        self.path.pop();

        Some((idx, data))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.data_rev.len(), Some(self.data_rev.len()))
    }
}

impl ExactSizeIterator for VolumeLoader {
    #[inline]
    fn len(&self) -> usize {
        self.data_rev.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::io::write_volume_npy;
    use crate::volume::Mask;
    use std::fs;

    fn sample_name(idx: u32) -> String {
        format!("sample-{idx}.npy")
    }

    #[test]
    fn test_loader() {
        let dir = std::env::temp_dir().join(format!("pore-berry-loader-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let mut mask = Mask::from_elem((2, 3, 4), false);
        mask[(1, 1, 1)] = true;
        let v = PoreVolume::from_mask(mask.view()).unwrap();
        write_volume_npy(dir.join(sample_name(0)), &v).unwrap();
        write_volume_npy(dir.join(sample_name(2)), &v).unwrap();

        let mut loader = volume_loader([2, 0, 1], &dir, sample_name).unwrap();
        assert_eq!(loader.len(), 3);
        let (idx, first) = loader.next().unwrap();
        assert_eq!(idx, 2);
        assert_eq!(first.unwrap().pore_count(), 1);
        assert_eq!(loader.len(), 2);
        assert!(loader.next().unwrap().1.is_ok());
        assert!(matches!(loader.next(), Some((1, Err(LoadError::ReadNpy(_))))));
        assert!(loader.next().is_none());

        assert!(volume_loader([0], dir.join(sample_name(0)), sample_name).is_err());
        assert!(matches!(
            open_volume(dir.join("a.txt")),
            Err(LoadError::Format(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}

//! 文件格式: 裸字节, npy, 图像切片序列, VTK, 以及数据集的压缩存档.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array3, ArrayView3, Axis};

use super::LoadError;
use crate::consts::gray::PORE;
use crate::error::ConfigError;
use crate::volume::{ImgWriteVis, LengthSlice, PoreVolume, VolumeAttr};

/// 读取按 `(z, y, x)` 行优先存储、每体素一字节的裸文件.
pub fn read_raw<P: AsRef<Path>>(path: P, shape: (usize, usize, usize)) -> Result<PoreVolume, LoadError> {
    let buf = fs::read(path)?;
    let (z, y, x) = shape;
    if buf.len() != z * y * x {
        return Err(LoadError::Format(format!(
            "裸文件大小为 {} 字节, 与形状 {shape:?} 不符",
            buf.len()
        )));
    }
    let data = Array3::from_shape_vec(shape, buf)?;
    Ok(PoreVolume::new(data)?)
}

/// 按 `(z, y, x)` 行优先顺序写出裸字节.
pub fn write_raw<P: AsRef<Path>>(path: P, data: ArrayView3<'_, u8>) -> Result<(), LoadError> {
    let std = data.as_standard_layout();
    let mut file = BufWriter::new(File::create(path)?);
    match std.as_slice() {
        Some(bytes) => file.write_all(bytes)?,
        None => {
            let bytes: Vec<u8> = std.iter().copied().collect();
            file.write_all(&bytes)?;
        }
    }
    file.flush()?;
    Ok(())
}

/// 读取 `u8` 类型的三维 npy 文件.
pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<PoreVolume, LoadError> {
    let data: Array3<u8> = ndarray_npy::read_npy(path)?;
    Ok(PoreVolume::new(data)?)
}

/// 将二值体写为 npy 文件.
pub fn write_volume_npy<P: AsRef<Path>>(path: P, volume: &PoreVolume) -> Result<(), LoadError> {
    ndarray_npy::write_npy(path, &volume.data())?;
    Ok(())
}

/// 将特征长度图写为 npy 文件.
pub fn write_length_npy<P: AsRef<Path>>(path: P, map: ArrayView3<'_, f32>) -> Result<(), LoadError> {
    ndarray_npy::write_npy(path, &map)?;
    Ok(())
}

/// 按顺序读取一组二维图像 (如 tif 序列) 作为水平切片. 任何非零灰度都视为孔隙.
///
/// 所有图像尺寸必须一致.
pub fn read_image_stack<I, P>(paths: I) -> Result<PoreVolume, LoadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut dims = None;
    let mut buf = Vec::new();
    let mut z = 0;
    for path in paths {
        let img = image::open(path)?.into_luma8();
        let (w, h) = (img.width() as usize, img.height() as usize);
        match dims {
            None => dims = Some((h, w)),
            Some((h0, w0)) if (h0, w0) != (h, w) => {
                return Err(ConfigError::ShapeMismatch {
                    expected: (z + 1, h0, w0),
                    found: (z + 1, h, w),
                }
                .into());
            }
            _ => {}
        }
        buf.extend(img.pixels().map(|p| if p.0[0] != 0 { PORE } else { 0 }));
        z += 1;
    }
    let (h, w) = dims.ok_or(ConfigError::EmptyVolume)?;
    let data = Array3::from_shape_vec((z, h, w), buf)?;
    Ok(PoreVolume::new(data)?)
}

/// 将二值体的每个水平切片保存为 `dir/{z:04}.png`, 孔隙为白色. 返回写出的文件数.
pub fn write_volume_slices<P: AsRef<Path>>(dir: P, volume: &PoreVolume) -> Result<usize, LoadError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    for (z, slice) in volume.slice_iter().enumerate() {
        slice.save(dir.join(format!("{z:04}.png")))?;
    }
    Ok(volume.len_z())
}

/// 将特征长度图的每个水平切片保存为 `dir/{z:04}.png`.
/// 灰度按整张图的最大半径线性拉伸. 返回写出的文件数.
pub fn write_length_slices<P: AsRef<Path>>(dir: P, map: ArrayView3<'_, f32>) -> Result<usize, LoadError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let max_radius = map
        .iter()
        .copied()
        .filter(|r| r.is_finite())
        .fold(0.0f32, f32::max);
    for (z, slice) in map.axis_iter(Axis(0)).enumerate() {
        LengthSlice::new(slice, max_radius).save(dir.join(format!("{z:04}.png")))?;
    }
    Ok(map.len_of(Axis(0)))
}

/// 以 VTK legacy ASCII `STRUCTURED_POINTS` 格式写出特征长度图.
///
/// `spacing` 按 `[z, y, x]` 给出; VTK 中 x 变化最快, 与 `(z, y, x)` 行优先顺序一致.
pub fn write_vtk<P: AsRef<Path>>(path: P, map: ArrayView3<'_, f32>, spacing: [f64; 3]) -> Result<(), LoadError> {
    let (z, y, x) = map.dim();
    let [sz, sy, sx] = spacing;
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "# vtk DataFile Version 3.0")?;
    writeln!(file, "pore-berry characteristic length")?;
    writeln!(file, "ASCII")?;
    writeln!(file, "DATASET STRUCTURED_POINTS")?;
    writeln!(file, "DIMENSIONS {x} {y} {z}")?;
    writeln!(file, "ORIGIN 0 0 0")?;
    writeln!(file, "SPACING {sx} {sy} {sz}")?;
    writeln!(file, "POINT_DATA {}", x * y * z)?;
    writeln!(file, "SCALARS length float 1")?;
    writeln!(file, "LOOKUP_TABLE default")?;
    for row in map.lanes(Axis(2)) {
        let line: Vec<String> = row.iter().map(f32::to_string).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    file.flush()?;
    Ok(())
}

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use std::io::BufReader;
        use flate2::read::ZlibDecoder;
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use super::PoreDataset;

        /// 压缩存档.
        impl PoreDataset {
            /// 以 `bincode` 编码并用 zlib 压缩后保存到 `path`.
            pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
                let file = BufWriter::new(File::create(path)?);
                let mut e = ZlibEncoder::new(file, Compression::best());
                bincode::serialize_into(&mut e, self)?;
                e.finish()?.flush()?;
                Ok(())
            }

            /// 读取 [`Self::save`] 保存的存档.
            pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
                let d = ZlibDecoder::new(BufReader::new(File::open(path)?));
                Ok(bincode::deserialize_from(d)?)
            }
        }
    }
}

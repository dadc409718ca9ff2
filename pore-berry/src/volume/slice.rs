//! 水平切片视图及其图像持久化存储.

use crate::consts::gray::*;
use image::ImageResult;
use ndarray::ArrayView2;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的切片对象.
///
/// 图像不会按原样保存: 二值切片的 0/1 会映射为黑/白,
/// 特征长度切片会按给定的最大半径线性拉伸到 `[0, 255]`.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将切片保存到 `path` 路径. 图片格式由扩展名决定.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 不可变、借用的二维水平二值切片.
#[derive(Debug, Clone, Copy)]
pub struct PoreSlice<'a> {
    data: ArrayView2<'a, u8>,
}

impl<'a> PoreSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayView2<'a, u8>) -> Self {
        Self { data }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'a, u8> {
        self.data
    }

    /// 切片的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// 切片上孔隙体素的个数.
    #[inline]
    pub fn pore_count(&self) -> usize {
        self.data.iter().filter(|p| is_pore(**p)).count()
    }
}

/// 不可变、借用的二维特征长度切片.
///
/// `max_radius` 决定灰度拉伸的上限; 所有切片应当共用同一个值, 使图像之间可比.
#[derive(Debug, Clone, Copy)]
pub struct LengthSlice<'a> {
    data: ArrayView2<'a, f32>,
    max_radius: f32,
}

impl<'a> LengthSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub fn new(data: ArrayView2<'a, f32>, max_radius: f32) -> Self {
        Self { data, max_radius }
    }

    /// 切片的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// 将半径映射为灰度. 非正数与非有限值视为黑色.
    #[inline]
    fn gray(&self, radius: f32) -> u8 {
        if !(radius.is_finite() && radius > 0.0 && self.max_radius > 0.0) {
            return BLACK;
        }
        // 255, not 256.
        ((radius / self.max_radius).min(1.0) * 255.0) as u8
    }
}

/// 孔隙为白色, 固体为黑色.
impl ImgWriteVis for PoreSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width) = self.shape();
        let mut buf = image::GrayImage::new(width as u32, height as u32);
        for ((h, w), &pix) in self.data.indexed_iter() {
            let gray = if is_pore(pix) { WHITE } else { BLACK };
            buf.put_pixel(w as u32, h as u32, image::Luma([gray]));
        }
        buf.save(path)
    }
}

/// 半径越大越亮.
impl ImgWriteVis for LengthSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width) = self.shape();
        let mut buf = image::GrayImage::new(width as u32, height as u32);
        for ((h, w), &r) in self.data.indexed_iter() {
            buf.put_pixel(w as u32, h as u32, image::Luma([self.gray(r)]));
        }
        buf.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::LengthSlice;
    use ndarray::array;

    #[test]
    fn test_length_gray() {
        let data = array![[0.0f32, 1.0], [2.0, f32::NAN]];
        let s = LengthSlice::new(data.view(), 2.0);
        assert_eq!(s.gray(0.0), 0);
        assert_eq!(s.gray(1.0), 127);
        assert_eq!(s.gray(2.0), 255);
        assert_eq!(s.gray(4.0), 255);
        assert_eq!(s.gray(f32::NAN), 0);
        assert_eq!(s.shape(), (2, 2));
    }
}

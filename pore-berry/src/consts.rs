//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 二值体中, 固体 (基质) 的体素值.
    pub const SOLID: u8 = 0;

    /// 二值体中, 孔隙的体素值.
    pub const PORE: u8 = 1;

    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 体素是否是孔隙?
    #[inline]
    pub const fn is_pore(p: u8) -> bool {
        matches!(p, PORE)
    }

    /// 体素是否是固体?
    #[inline]
    pub const fn is_solid(p: u8) -> bool {
        matches!(p, SOLID)
    }

    /// 体素是否是合法的二值?
    #[inline]
    pub const fn is_binary(p: u8) -> bool {
        matches!(p, SOLID | PORE)
    }
}

/// 流体物性.
pub mod fluid {
    /// 汞-空气界面张力 (N/m).
    pub const MERCURY_SURFACE_TENSION: f64 = 0.485;

    /// 汞在岩石表面的接触角 (度).
    pub const MERCURY_CONTACT_ANGLE: f64 = 140.0;

    /// 水-空气界面张力 (N/m).
    pub const WATER_SURFACE_TENSION: f64 = 0.072;

    /// 水在强水湿表面的接触角 (度).
    pub const WATER_CONTACT_ANGLE: f64 = 0.0;
}

/// 默认饱和度分辨率. 相邻饱和度差值超过它时插入新半径.
pub const DEFAULT_SAT_RESOLUTION: f64 = 0.02;

/// 默认半径分辨率 (体素). 相邻半径差值不超过它的两倍时不再二分.
pub const DEFAULT_RAD_RESOLUTION: f64 = 0.25;

/// 压汞 (MICP) 与渗吸 (可压缩) 初始半径列表 `{1, max / k, max}` 中的 `k`.
pub const ENTRY_SEED_DIVISOR: f64 = 4.0;

/// 孔径分布 (PSD) 初始半径列表 `{1, max / k, max}` 中的 `k`.
pub const PSD_SEED_DIVISOR: f64 = 2.0;

/// 不可压缩驱替/渗吸在 `[1, max]` 上均匀播种的半径个数.
pub const INCOMPRESSIBLE_SEED_LEN: usize = 5;

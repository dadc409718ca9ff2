//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::volume::{ImgWriteVis, LengthSlice, Mask, PoreSlice, PoreVolume, VolumeAttr};

pub use crate::consts::gray::{PORE, SOLID};
pub use crate::consts::{DEFAULT_RAD_RESOLUTION, DEFAULT_SAT_RESOLUTION};

pub use crate::edt::{distance_field, BufferedEdt, Device, DistanceTransform, EdgeMode, NaiveEdt};

pub use crate::connectivity::{connected, Connectivity, Direction};

pub use crate::sweep::{
    Curve, CurveKind, FileLog, MemoryLog, NoLog, Phase, Porosimetry, StepLog, SweepConfig,
};

pub use crate::error::{ComputeError, ConfigError, SweepError, SweepResult};

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{self, simulate, LoadError, PoreDataset, Simulated, Variable, VolumeInput};

pub use crate::capillary::Fluid;

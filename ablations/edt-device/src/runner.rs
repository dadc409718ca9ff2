//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AblationResult;
use ndarray::{Array3, ArrayView3, CowArray, Ix3};
use pore_berry::prelude::*;
use std::cell::RefCell;
use std::thread;
use utils::loader;

/// 样本数.
const SAMPLES: u32 = 4;

/// 没有样本目录时生成的合成样本形状.
const SYNTHETIC_SHAPE: Idx3d = (48, 48, 48);

/// 为内部提供者计时的 EDT 提供者.
struct Timed<'p, E> {
    inner: E,
    profile: &'p RefCell<Profile>,
}

impl<E: DistanceTransform> DistanceTransform for Timed<'_, E> {
    fn transform(&mut self, mask: ArrayView3<'_, bool>, edge: EdgeMode) -> CowArray<'_, f32, Ix3> {
        self.profile.borrow_mut().edt_start();
        let out = self.inner.transform(mask, edge);
        self.profile.borrow_mut().edt_elapsed();
        out
    }
}

/// 线性同余生成的随机孔隙体, 孔隙度约 2/3.
fn synthetic(seed: u32) -> PoreVolume {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let data = Array3::from_shape_simple_fn(SYNTHETIC_SHAPE, || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        u8::from((state >> 16) % 3 != 0)
    });
    PoreVolume::new(data).unwrap()
}

/// 从 `$PORE_BERRY_DIR` 或 `$HOME/dataset/pores` 加载样本; 目录不存在时使用合成样本.
fn volumes() -> Vec<PoreVolume> {
    match loader::sample_dir_from_env_or_home().filter(|d| d.is_dir()) {
        Some(dir) => {
            log::info!("Loading samples from {}", dir.display());
            loader::sample_loader(&dir, SAMPLES)
                .unwrap()
                .filter_map(|(idx, r)| match r {
                    Ok(v) => Some(v),
                    Err(e) => {
                        log::warn!("Skipping sample {idx}: {e}");
                        None
                    }
                })
                .collect()
        }
        None => {
            log::warn!("Sample directory not found, using synthetic volumes");
            (0..SAMPLES).map(synthetic).collect()
        }
    }
}

/// 用 `make` 创建的提供者在每个样本上运行全部曲线.
fn sweep_all<E, F>(name: &str, volumes: &[PoreVolume], config: &SweepConfig, make: F) -> (Profile, Vec<Option<Curve>>)
where
    E: DistanceTransform,
    F: Fn() -> E,
{
    let profile = RefCell::new(Profile::new());
    let mut curves = Vec::with_capacity(volumes.len() * CurveKind::ALL.len());

    for (idx, volume) in volumes.iter().enumerate() {
        println!("{name}: sample {idx}...");
        let edt = Timed {
            inner: make(),
            profile: &profile,
        };
        let mut ctx = match Porosimetry::with_provider(volume, config.clone(), edt) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("{name}: sample {idx} skipped: {e}");
                curves.extend(CurveKind::ALL.map(|_| None));
                continue;
            }
        };
        for kind in CurveKind::ALL {
            profile.borrow_mut().sweep_start();
            let curve = ctx.run(kind, &mut NoLog).ok();
            profile.borrow_mut().sweep_elapsed(curve.as_ref().map(Curve::len));
            curves.push(curve);
        }
    }
    (profile.into_inner().finish(), curves)
}

/// 实际运行.
pub fn run() -> AblationResult {
    let volumes = volumes();
    assert!(!volumes.is_empty(), "Loading dataset config error");
    let config = SweepConfig::default();

    println!("Running ablation studies on {} cpus...", utils::cpus());
    let (v, c) = (volumes.as_slice(), &config);
    let outcomes = thread::scope(|s| {
        let handles = [
            s.spawn(move || sweep_all("naive", v, c, || NaiveEdt)),
            s.spawn(move || sweep_all("buffered", v, c, || BufferedEdt::new(Device::Cpu))),
            s.spawn(move || sweep_all("parallel", v, c, || BufferedEdt::new(Device::Parallel))),
        ];
        handles.map(|th| th.join().expect("Thread joining error"))
    });

    let consistent = outcomes.windows(2).all(|w| w[0].1 == w[1].1);
    AblationResult::new(
        ["naive", "buffered", "parallel"]
            .into_iter()
            .zip(outcomes.into_iter().map(|(p, _)| p)),
        consistent,
    )
}

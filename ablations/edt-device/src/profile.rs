//! 算法运行统计.

use std::time::{Duration, Instant};

/// 单个 EDT 提供者的运行统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 成功完成的扫描次数.
    sweeps: u64,

    /// 因退化输入等原因失败的扫描次数.
    failed: u64,

    /// 全部曲线的半径点数之和.
    points: u64,

    /// EDT 调用次数.
    edt_calls: u64,

    /// EDT 累计耗时.
    edt_time: Duration,

    /// 扫描累计耗时.
    sweep_time: Duration,

    /// 整个任务花费的总时间, 在 [`Self::finish`] 时确定.
    real_time: Duration,

    /// 最耗时的一次扫描.
    most: Option<Duration>,

    edt_since: Instant,
    sweep_since: Instant,
    created: Instant,
}

impl Profile {
    /// 初始化, 同时开始总计时.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            sweeps: 0,
            failed: 0,
            points: 0,
            edt_calls: 0,
            edt_time: Duration::ZERO,
            sweep_time: Duration::ZERO,
            real_time: Duration::ZERO,
            most: None,
            edt_since: now,
            sweep_since: now,
            created: now,
        }
    }

    /// 开始一次 EDT 计时.
    #[inline]
    pub fn edt_start(&mut self) {
        self.edt_calls += 1;
        self.edt_since = Instant::now();
    }

    /// 结束一次 EDT 计时.
    #[inline]
    pub fn edt_elapsed(&mut self) {
        self.edt_time += self.edt_since.elapsed();
    }

    /// 开始一次扫描计时.
    #[inline]
    pub fn sweep_start(&mut self) {
        self.sweep_since = Instant::now();
    }

    /// 结束一次扫描计时. `points` 为 `None` 代表扫描失败.
    pub fn sweep_elapsed(&mut self, points: Option<usize>) {
        let d = self.sweep_since.elapsed();
        self.sweep_time += d;
        match points {
            Some(n) => {
                self.sweeps += 1;
                self.points += n as u64;
                self.most = Some(self.most.map_or(d, |m| m.max(d)));
            }
            None => self.failed += 1,
        }
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time = self.created.elapsed();
        self
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn edt_calls(&self) -> u64 {
        self.edt_calls
    }

    pub fn edt_time_us(&self) -> u64 {
        self.edt_time.as_micros() as u64
    }

    pub fn sweep_time_us(&self) -> u64 {
        self.sweep_time.as_micros() as u64
    }

    pub fn real_time_us(&self) -> u64 {
        self.real_time.as_micros() as u64
    }

    /// 单次 EDT 平均耗时 (微秒).
    pub fn avg_edt_time_us(&self) -> Option<f64> {
        match self.edt_calls {
            0 => None,
            n => Some(self.edt_time_us() as f64 / n as f64),
        }
    }

    /// EDT 在扫描耗时中的占比.
    pub fn edt_share(&self) -> Option<f64> {
        match self.sweep_time_us() {
            0 => None,
            t => Some(self.edt_time_us() as f64 / t as f64),
        }
    }

    /// 最耗时的一次扫描. 如果不存在成功的扫描, 则返回 `None`.
    pub fn most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut p = Profile::new();
        assert_eq!(p.avg_edt_time_us(), None);
        assert_eq!(p.edt_share(), None);

        for n in [Some(3), None, Some(5)] {
            p.sweep_start();
            p.edt_start();
            std::thread::sleep(Duration::from_millis(2));
            p.edt_elapsed();
            p.sweep_elapsed(n);
        }
        let p = p.finish();
        assert_eq!((p.sweeps(), p.failed(), p.points(), p.edt_calls()), (2, 1, 8, 3));
        assert!(p.edt_time_us() >= 6_000);
        assert!(p.sweep_time_us() >= p.edt_time_us());
        assert!(p.real_time_us() >= p.sweep_time_us());
        assert!(p.most_time_consuming().is_some_and(|d| d >= Duration::from_millis(2)));
        assert!(p.edt_share().is_some_and(|s| s <= 1.0));
    }
}

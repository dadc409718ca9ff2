//! 每一步 `(半径, 饱和度)` 的记录.
//!
//! 记录器由调用者注入, 每次扫描可以使用各自独立的目的地.
//! 写文件失败只会通过 `log::warn!` 报告, 永远不会影响计算结果.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Phase;

/// 一行记录的文本形式, 如 `Radius: 2, Snw: 0.5`.
pub fn format_step(phase: Phase, radius: f64, saturation: f64) -> String {
    format!("Radius: {radius}, {}: {saturation}", phase.label())
}

/// 扫描步骤记录器.
pub trait StepLog {
    /// 记录一对刚算出的 `(radius, saturation)`.
    fn record(&mut self, phase: Phase, radius: f64, saturation: f64);
}

/// 丢弃所有记录.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoLog;

impl StepLog for NoLog {
    #[inline]
    fn record(&mut self, _phase: Phase, _radius: f64, _saturation: f64) {}
}

/// 保存在内存中的记录, 主要用于测试.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Vec<String>,
}

impl MemoryLog {
    /// 空记录.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的全部行.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl StepLog for MemoryLog {
    fn record(&mut self, phase: Phase, radius: f64, saturation: f64) {
        self.lines.push(format_step(phase, radius, saturation));
    }
}

/// 追加写入的文本文件.
///
/// 打开或写入失败后, 该记录器会报告一次警告并停止写文件.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: Option<File>,
}

impl FileLog {
    /// 以追加模式打开 `path` (不存在则创建).
    pub fn append<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => Some(f),
            Err(e) => {
                log::warn!("无法打开日志文件 {}: {e}", path.display());
                None
            }
        };
        Self { path, file }
    }

    /// 文件路径.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 是否仍在写文件?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.file.is_some()
    }
}

impl StepLog for FileLog {
    fn record(&mut self, phase: Phase, radius: f64, saturation: f64) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = writeln!(file, "{}", format_step(phase, radius, saturation)) {
            log::warn!("写入日志文件 {} 失败, 停止记录: {e}", self.path.display());
            self.file = None;
        }
    }
}

/// 同时写入 `log` facade (debug 级别) 和注入的记录器.
pub(crate) fn emit(log: &mut dyn StepLog, phase: Phase, radius: f64, saturation: f64) {
    log::debug!("{}", format_step(phase, radius, saturation));
    log.record(phase, radius, saturation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_step(Phase::NonWetting, 2.0, 0.5), "Radius: 2, Snw: 0.5");
        assert_eq!(format_step(Phase::Wetting, 1.5, 0.0), "Radius: 1.5, Sw: 0");
    }

    #[test]
    fn test_file_log_append() {
        let path = std::env::temp_dir().join(format!("pore-berry-log-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut log = FileLog::append(&path);
            assert!(log.is_active());
            log.record(Phase::NonWetting, 1.0, 1.0);
        }
        {
            let mut log = FileLog::append(&path);
            log.record(Phase::Wetting, 2.0, 0.25);
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Radius: 1, Snw: 1\nRadius: 2, Sw: 0.25\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_log_fail_soft() {
        // 失败只以 warn 日志报告.
        let _ = simple_logger::init_with_level(::log::Level::Warn);
        let path = std::env::temp_dir()
            .join("pore-berry-missing-dir")
            .join("nested")
            .join("log.txt");
        let mut log = FileLog::append(&path);
        assert!(!log.is_active());
        log.record(Phase::Wetting, 1.0, 0.0);
        assert_eq!(log.path(), path.as_path());
    }
}

//! EDT 设备消融实验: 朴素实现, 单线程缓冲实现与 rayon 并行实现在全部六种曲线上的耗时对比.
//!
//! 三种实现的输出必须逐位一致.

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();
    runner::run().analyze();
}

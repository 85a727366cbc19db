//! # 批次执行模块
//!
//! 为每个批次构造外部工具调用并并行执行。
//!
//! ## 功能
//! - 构造扁平的参数 token 列表（绝不拼接 shell 字符串）
//! - 基于 rayon 的批次级并行，每个批次独占自己的输出目录
//! - 捕获工具 stdout/stderr 到日志文件
//! - 任一批次失败即整体失败
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `rayon` 进行并行执行
//! - 使用 `utils/progress.rs` 创建进度条

pub mod command;
pub mod runner;

pub use command::build_batch_command;
pub use runner::{BatchJob, BatchRunner};

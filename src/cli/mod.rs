//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `split`: 扫描图像目录并写出批次文件清单
//! - `run`: 逐批次调用外部工具（批次间并行）
//! - `merge`: 合并各批次的测量结果
//! - `process`: 依次执行 split、run、merge
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: split, run, merge, process

pub mod merge;
pub mod process;
pub mod run;
pub mod split;

use clap::{Parser, Subcommand};

/// cellbatch - CellProfiler 并行批处理工具
#[derive(Parser)]
#[command(name = "cellbatch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Split microscopy images into aligned batches for CellProfiler and merge the per-batch results",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Split the project's images into aligned batch file lists
    Split(split::SplitArgs),

    /// Run the external tool on every batch file list, batches in parallel
    Run(run::RunArgs),

    /// Merge per-batch result tables into one globally numbered table per entity
    Merge(merge::MergeArgs),

    /// Split, run and merge in one go
    Process(process::ProcessArgs),
}

//! # process 子命令 CLI 定义
//!
//! 依次执行 split、run、merge 的完整流程
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/process.rs`

use clap::Args;
use std::path::PathBuf;

/// process 子命令参数
#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Path to the project directory
    pub project: PathBuf,

    /// Pipeline file for the external tool
    #[arg(long)]
    pub pipeline: PathBuf,

    /// External tool binary to invoke per batch
    #[arg(long, default_value = "cellprofiler")]
    pub tool: String,

    /// Settings file describing how to group images (JSON)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Number of batches to run in parallel (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub jobs: usize,
}

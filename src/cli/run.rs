//! # run 子命令 CLI 定义
//!
//! 逐批次调用外部工具，批次之间并行
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the project directory
    pub project: PathBuf,

    /// Pipeline file for the external tool; looked up relative to the
    /// project directory when not found as given
    #[arg(long)]
    pub pipeline: PathBuf,

    /// External tool binary to invoke per batch
    #[arg(long, default_value = "cellprofiler")]
    pub tool: String,

    /// Settings file describing how batches were grouped (JSON)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Number of batches to run in parallel (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub jobs: usize,
}

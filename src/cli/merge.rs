//! # merge 子命令 CLI 定义
//!
//! 合并各批次的测量结果
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/merge.rs`

use clap::Args;
use std::path::PathBuf;

/// merge 子命令参数
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Path to the project directory containing a 'results/' folder
    pub project: PathBuf,
}

//! # split 子命令 CLI 定义
//!
//! 扫描项目图像目录并写出批次文件清单
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/split.rs`

use clap::Args;
use std::path::PathBuf;

/// split 子命令参数
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Path to the project directory containing an 'images/' folder
    pub project: PathBuf,

    /// Settings file describing how to group images (JSON); looked up
    /// relative to the project directory when not found as given
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

//! # process 命令实现
//!
//! 完整流程：split 切批次，run 逐批执行，merge 合并结果。
//!
//! ## 依赖关系
//! - 使用 `cli/process.rs` 定义的参数
//! - 调用 `commands/split.rs`, `commands/run.rs`, `commands/merge.rs`

use crate::cli::merge::MergeArgs;
use crate::cli::process::ProcessArgs;
use crate::cli::run::RunArgs;
use crate::cli::split::SplitArgs;
use crate::error::Result;

/// 执行 process 命令
pub fn execute(args: ProcessArgs) -> Result<()> {
    super::split::execute(SplitArgs {
        project: args.project.clone(),
        settings: args.settings.clone(),
    })?;

    super::run::execute(RunArgs {
        project: args.project.clone(),
        pipeline: args.pipeline.clone(),
        tool: args.tool.clone(),
        settings: args.settings.clone(),
        jobs: args.jobs,
    })?;

    super::merge::execute(MergeArgs {
        project: args.project,
    })
}

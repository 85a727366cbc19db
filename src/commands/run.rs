//! # run 命令实现
//!
//! 枚举 split 产出的批次文件清单，为每个批次调用一次外部工具。
//! 批次编号直接代入文件名模板从 0 递增枚举，保证数字序且无缺号；
//! 按字典序 glob 会把 image_set_10 排到 image_set_2 前面。
//!
//! ## 功能
//! - 按模板枚举批次文件清单
//! - 并行执行批次（每批次独占 results/<N>/）
//! - 任一批次失败即整体失败
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchJob, BatchRunner};
use crate::cli::run::RunArgs;
use crate::error::{CellbatchError, Result};
use crate::models::Project;
use crate::utils::output;

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    output::print_header("Running Batches");

    let project = Project::new(&args.project);
    let images_path = project.images_path();
    if !images_path.is_dir() {
        return Err(CellbatchError::DirectoryNotFound {
            path: images_path.display().to_string(),
        });
    }

    let pipeline_file = project.resolve_file(&args.pipeline);
    if !pipeline_file.is_file() {
        return Err(CellbatchError::FileNotFound {
            path: pipeline_file.display().to_string(),
        });
    }

    let settings = super::load_settings(&project, &args.settings)?;

    // 从 0 起按模板枚举批次清单，遇到缺号即停
    let lists_path = project.image_groups_path(&settings);
    let mut batches = Vec::new();
    loop {
        let data_file = lists_path.join(settings.csv_filename(batches.len()));
        if !data_file.is_file() {
            break;
        }
        batches.push(BatchJob {
            index: batches.len(),
            data_file,
            output_dir: project.batch_results_path(batches.len()),
        });
    }

    if batches.is_empty() {
        return Err(CellbatchError::NoBatchesFound {
            path: lists_path.display().to_string(),
        });
    }
    output::print_info(&format!("Found {} batch file lists", batches.len()));

    let runner = BatchRunner::new(args.jobs);
    runner.run(&batches, &args.tool, &images_path, &pipeline_file)?;

    output::print_separator();
    output::print_done(&format!("Ran {} batches with '{}'", batches.len(), args.tool));

    Ok(())
}

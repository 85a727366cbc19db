//! # merge 命令实现
//!
//! 把各批次的测量结果按实体合并成单个全局表。
//!
//! ## 功能
//! - 枚举结果目录并校验批次索引连续
//! - 从 0 号批次发现实体名
//! - 逐实体流式合并并打印汇总表
//!
//! ## 依赖关系
//! - 使用 `cli/merge.rs` 定义的参数
//! - 使用 `merge/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::merge::MergeArgs;
use crate::error::Result;
use crate::merge::{discover_entity_names, discover_result_indexes, merge_entity};
use crate::models::Project;
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 实体合并汇总行
#[derive(Debug, Clone, Tabled)]
struct MergeRow {
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Batches")]
    batches: usize,
    #[tabled(rename = "Images")]
    images: u64,
    #[tabled(rename = "Objects")]
    objects: u64,
}

/// 执行 merge 命令
pub fn execute(args: MergeArgs) -> Result<()> {
    output::print_header("Merging Results");

    let project = Project::new(&args.project);
    let results_root = project.results_path();

    let indexes = discover_result_indexes(&results_root)?;
    output::print_info(&format!("Found {} result batches", indexes.len()));

    let entities = discover_entity_names(&results_root)?;

    let pb = progress::create_progress_bar(entities.len() as u64, "Merging entities");
    let mut rows = Vec::new();
    for entity in &entities {
        // Image 的测量没有逐行对象号，需要保序合并策略，这里不做
        if entity.as_str() == "Image" {
            pb.suspend(|| {
                output::print_skip("Image measurements need an order-preserving merge, skipping");
            });
            pb.inc(1);
            continue;
        }

        let stats = merge_entity(&results_root, entity, &indexes)?;
        pb.suspend(|| {
            output::print_success(&format!(
                "Merged {}: {} objects across {} images",
                stats.entity, stats.objects, stats.images
            ));
        });
        rows.push(MergeRow {
            entity: stats.entity,
            batches: stats.batches,
            images: stats.images,
            objects: stats.objects,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    if rows.is_empty() {
        output::print_warning("No object entities found to merge");
        return Ok(());
    }

    println!("{}", Table::new(&rows));
    output::print_done(&format!(
        "Merged {} entities into '{}'",
        rows.len(),
        results_root.display()
    ));

    Ok(())
}

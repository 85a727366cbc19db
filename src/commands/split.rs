//! # split 命令实现
//!
//! 扫描项目的图像目录，按设置解析文件名元数据，把图像分成
//! 对齐的通道组并写出批次文件清单。
//!
//! ## 功能
//! - 解析文件名元数据
//! - 按通道分组并校验对齐
//! - 按批次大小切块写出 CSV 文件清单
//! - 打印通道汇总表
//!
//! ## 依赖关系
//! - 使用 `cli/split.rs` 定义的参数
//! - 使用 `grouping/`
//! - 使用 `utils/output.rs`

use crate::cli::split::SplitArgs;
use crate::error::{CellbatchError, Result};
use crate::grouping::{align_image_sets, group_records, write_batches, MetadataExtractor};
use crate::models::Project;
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 通道汇总行
#[derive(Debug, Clone, Tabled)]
struct ChannelRow {
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Files")]
    files: usize,
}

/// 执行 split 命令
pub fn execute(args: SplitArgs) -> Result<()> {
    output::print_header("Splitting Images into Batches");

    let project = Project::new(&args.project);
    if !project.path().is_dir() {
        return Err(CellbatchError::DirectoryNotFound {
            path: project.path().display().to_string(),
        });
    }

    let settings = super::load_settings(&project, &args.settings)?;

    // 扫描并解析图像文件名
    let extractor = MetadataExtractor::from_settings(&settings)?;
    let records = extractor.scan_directory(&project.images_path())?;
    output::print_info(&format!("Parsed {} image files", records.len()));

    // 按通道分组并校验对齐
    let groups = group_records(records, &settings.group_by_field)?;

    let rows: Vec<ChannelRow> = groups
        .iter()
        .map(|g| ChannelRow {
            channel: g.key.clone(),
            object: settings
                .object_name(&g.key)
                .map(|s| s.to_string())
                .unwrap_or_else(|_| "?".to_string()),
            files: g.len(),
        })
        .collect();
    println!("{}", Table::new(&rows));

    let image_sets = align_image_sets(&groups)?;
    output::print_info(&format!(
        "Aligned {} image sets across {} channels",
        image_sets.len(),
        groups.len()
    ));

    // 写出批次文件清单
    let output_path = project.image_groups_path(&settings);
    fs::create_dir_all(&output_path).map_err(|e| CellbatchError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    let summary = write_batches(&image_sets, &settings, &output_path)?;
    for file in &summary.files {
        output::print_success(&format!("Wrote {}", file.display()));
    }

    output::print_done(&format!(
        "Split {} image sets into {} batch lists in '{}'",
        image_sets.len(),
        summary.set_count,
        output_path.display()
    ));

    Ok(())
}

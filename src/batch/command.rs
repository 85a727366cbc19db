//! # 外部工具命令构造
//!
//! 给定批次的文件清单路径和输出目录，构造 CellProfiler 风格
//! 批处理调用的完整参数向量。参数保持为有序 token 列表，
//! 不拼成单个 shell 字符串，避免引号歧义。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 无外部模块依赖

use std::path::Path;

/// 构造单个批次的外部工具参数向量
///
/// 布局：二进制路径、批处理/无界面模式开关、图像根目录、输出目录、
/// 管线文件、数据文件、日志级别。
pub fn build_batch_command(
    tool: &str,
    images_path: &Path,
    output_path: &Path,
    pipeline_file: &Path,
    data_file: &Path,
) -> Vec<String> {
    vec![
        tool.to_string(),
        "-b".to_string(),
        "-c".to_string(),
        "-i".to_string(),
        images_path.display().to_string(),
        "-o".to_string(),
        output_path.display().to_string(),
        "--do-not-build".to_string(),
        "--do-not-fetch".to_string(),
        format!("--pipeline={}", pipeline_file.display()),
        format!("--data-file={}", data_file.display()),
        "-L".to_string(),
        "INFO".to_string(),
    ]
}

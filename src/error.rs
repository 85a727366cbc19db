//! # 统一错误处理模块
//!
//! 定义 cellbatch 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// cellbatch 统一错误类型
#[derive(Error, Debug)]
pub enum CellbatchError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 设置与模式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse settings file: {path}\nReason: {reason}")]
    SettingsError { path: String, reason: String },

    #[error("Invalid filename pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 图像分组错误
    // ─────────────────────────────────────────────────────────────
    #[error("No image files matching the configured pattern found in: {path}")]
    NoImagesFound { path: String },

    #[error("Channel groups are not aligned, group sizes differ: {sizes}")]
    UnalignedGroups { sizes: String },

    #[error(
        "Image set misaligned at position {position}: \
         '{filename}' reduces to base '{base}', expected '{expected}'"
    )]
    MisalignedImageSet {
        position: usize,
        filename: String,
        base: String,
        expected: String,
    },

    #[error("Image '{filename}' has no metadata field '{field}' to group by")]
    MissingGroupField { filename: String, field: String },

    #[error("Check settings. Failed to map object by group key: {group_key}")]
    UnmappedGroupKey { group_key: String },

    #[error("Row for '{filename}' introduces field '{field}' absent from the batch header")]
    UnknownMetadataField { filename: String, field: String },

    // ─────────────────────────────────────────────────────────────
    // 批次执行错误
    // ─────────────────────────────────────────────────────────────
    #[error("No batch file lists found under: {path}")]
    NoBatchesFound { path: String },

    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("Batch {batch_index} failed with exit code {exit_code}\nCommand: {command:?}")]
    BatchExecution {
        batch_index: usize,
        exit_code: i32,
        command: Vec<String>,
    },

    // ─────────────────────────────────────────────────────────────
    // 结果合并错误
    // ─────────────────────────────────────────────────────────────
    #[error("Result directories are not contiguous from 0: found indexes {found}")]
    MissingResultIndex { found: String },

    #[error("Result header of batch {batch_index} differs from batch 0: {path}")]
    SchemaMismatch { batch_index: usize, path: String },

    #[error("Malformed result row in {path}: {reason}")]
    ResultParse { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CellbatchError>;

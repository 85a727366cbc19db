//! # 文件名元数据提取器
//!
//! 扫描图像目录，按配置的文件名模式解析出图像记录。
//! 模式是 glob 或带命名捕获组的正则，匹配不区分大小写；
//! 不匹配的目录项被静默跳过。
//!
//! ## 依赖关系
//! - 被 `commands/split.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` / `regex` 匹配文件名

use crate::error::{CellbatchError, Result};
use crate::models::{ImageRecord, Settings};

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// 文件名过滤模式
enum FilenameFilter {
    /// glob 模式：只筛选文件，元数据仅含 `filename`
    Glob(glob::Pattern),
    /// 正则模式：命名捕获组成为元数据字段
    Regex(Regex),
}

/// 元数据提取器
pub struct MetadataExtractor {
    filter: FilenameFilter,
}

impl MetadataExtractor {
    /// 按设置构建提取器
    ///
    /// 优先取 glob 设置，其次取正则设置，都缺省时用默认正则。
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if let Some(pattern) = &settings.image_name_filter_fn {
            let glob_pattern = glob::Pattern::new(pattern).map_err(|e| {
                CellbatchError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                }
            })?;
            return Ok(MetadataExtractor {
                filter: FilenameFilter::Glob(glob_pattern),
            });
        }

        let expr = settings
            .image_name_filter_re
            .as_deref()
            .unwrap_or(crate::models::settings::DEFAULT_FILTER_RE);

        let regex = RegexBuilder::new(expr)
            .case_insensitive(true)
            .build()
            .map_err(|e| CellbatchError::InvalidPattern {
                pattern: expr.to_string(),
                reason: e.to_string(),
            })?;

        Ok(MetadataExtractor {
            filter: FilenameFilter::Regex(regex),
        })
    }

    /// 扫描目录，返回所有匹配文件的解析记录
    ///
    /// 结果按文件名排序；没有任何匹配时返回 `NoImagesFound`。
    pub fn scan_directory(&self, images_path: &Path) -> Result<Vec<ImageRecord>> {
        if !images_path.is_dir() {
            return Err(CellbatchError::DirectoryNotFound {
                path: images_path.display().to_string(),
            });
        }

        let mut records: Vec<ImageRecord> = WalkDir::new(images_path)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| self.parse_filename(name))
            })
            .collect();

        if records.is_empty() {
            return Err(CellbatchError::NoImagesFound {
                path: images_path.display().to_string(),
            });
        }

        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(records)
    }

    /// 解析单个文件名，不匹配时返回 None
    fn parse_filename(&self, filename: &str) -> Option<ImageRecord> {
        match &self.filter {
            FilenameFilter::Glob(pattern) => {
                let options = glob::MatchOptions {
                    case_sensitive: false,
                    ..glob::MatchOptions::new()
                };
                if pattern.matches_with(filename, options) {
                    Some(ImageRecord::new(filename, BTreeMap::new()))
                } else {
                    None
                }
            }
            FilenameFilter::Regex(regex) => {
                let captures = regex.captures(filename)?;
                let mut metadata = BTreeMap::new();
                for name in regex.capture_names().flatten() {
                    if let Some(value) = captures.name(name) {
                        metadata.insert(name.to_string(), value.as_str().to_string());
                    }
                }
                Some(ImageRecord::new(filename, metadata))
            }
        }
    }
}

//! # 图像分组模块
//!
//! 把图像目录切分成对齐批次的核心算法。
//!
//! ## 功能
//! - 从文件名解析元数据（glob 或命名捕获组正则）
//! - 按通道分组并校验各组对齐
//! - 把对齐的图像集切成定长批次并写出 CSV 文件清单
//!
//! ## 依赖关系
//! - 被 `commands/split.rs` 调用
//! - 使用 `models/` 的记录类型与设置

pub mod extractor;
pub mod grouper;
pub mod writer;

pub use extractor::MetadataExtractor;
pub use grouper::{align_image_sets, group_records};
pub use writer::{write_batches, BatchSummary};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CellbatchError;
    use crate::models::Settings;
    use std::fs;
    use tempfile::TempDir;

    /// 从图像目录到批次清单的完整流程
    #[test]
    fn test_split_pipeline_end_to_end() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        for field in ["a", "b", "c", "d", "e"] {
            for channel in ["d0", "d1"] {
                fs::write(images.join(format!("site_{}_{}.png", field, channel)), b"").unwrap();
            }
        }

        let settings = Settings {
            image_set_size_per_batch: 2,
            ..Settings::default()
        };

        let extractor = MetadataExtractor::from_settings(&settings).unwrap();
        let records = extractor.scan_directory(&images).unwrap();
        assert_eq!(records.len(), 10);

        let groups = group_records(records, &settings.group_by_field).unwrap();
        let image_sets = align_image_sets(&groups).unwrap();
        assert_eq!(image_sets.len(), 5);

        let lists = dir.path().join("image_groups");
        fs::create_dir(&lists).unwrap();
        let summary = write_batches(&image_sets, &settings, &lists).unwrap();

        // 5 个图像集、批次大小 2 → 3 个批次
        assert_eq!(summary.set_count, 3);
        let last = fs::read_to_string(lists.join("image_set_2.csv")).unwrap();
        // 末批是不满的：表头 + 1 行数据
        assert_eq!(last.lines().count(), 2);
    }

    /// 通道不对齐时整体失败，不写出任何批次文件
    #[test]
    fn test_unaligned_channels_write_nothing() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        for field in ["a", "b", "c", "d", "e"] {
            fs::write(images.join(format!("site_{}_d0.png", field)), b"").unwrap();
        }
        for field in ["a", "b", "c", "d"] {
            fs::write(images.join(format!("site_{}_d1.png", field)), b"").unwrap();
        }

        let settings = Settings::default();
        let extractor = MetadataExtractor::from_settings(&settings).unwrap();
        let records = extractor.scan_directory(&images).unwrap();

        let result = group_records(records, &settings.group_by_field);
        assert!(matches!(result, Err(CellbatchError::UnalignedGroups { .. })));
    }
}

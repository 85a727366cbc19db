//! # 通道分组与图像集对齐
//!
//! 把图像记录按分组字段聚成通道组，再按位置对齐成图像集。
//! 对齐校验是正确性的关键：只有去掉分组值后的文件名逐位一致，
//! 才能保证不同通道的文件确实拍的是同一个视野。
//!
//! ## 依赖关系
//! - 被 `commands/split.rs` 调用
//! - 使用 `models/image.rs` 的记录类型

use crate::error::{CellbatchError, Result};
use crate::models::{ChannelGroup, ImageRecord, ImageSet};

use std::collections::BTreeMap;

/// 按分组字段聚合记录
///
/// 返回的组按分组值排序，组内记录按文件名排序。
/// 校验至少存在一个组且所有组等长，否则返回 `UnalignedGroups`。
pub fn group_records(records: Vec<ImageRecord>, group_by_field: &str) -> Result<Vec<ChannelGroup>> {
    let mut grouped: BTreeMap<String, Vec<ImageRecord>> = BTreeMap::new();

    for record in records {
        let key = record
            .field(group_by_field)
            .ok_or_else(|| CellbatchError::MissingGroupField {
                filename: record.filename.clone(),
                field: group_by_field.to_string(),
            })?
            .to_string();
        grouped.entry(key).or_default().push(record);
    }

    if grouped.is_empty() {
        return Err(CellbatchError::UnalignedGroups {
            sizes: "no groups".to_string(),
        });
    }

    let mut groups: Vec<ChannelGroup> = grouped
        .into_iter()
        .map(|(key, mut records)| {
            records.sort_by(|a, b| a.filename.cmp(&b.filename));
            ChannelGroup { key, records }
        })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    let expected = groups[0].len();
    if groups.iter().any(|g| g.len() != expected) {
        let sizes = groups
            .iter()
            .map(|g| format!("{}: {}", g.key, g.len()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CellbatchError::UnalignedGroups { sizes });
    }

    Ok(groups)
}

/// 把等长的通道组按位置对齐成图像集
///
/// 每个位置取各组一条记录，要求去掉各自分组值（只移除第一次出现）
/// 后的文件名完全一致；不一致返回 `MisalignedImageSet` 并点名文件。
pub fn align_image_sets(groups: &[ChannelGroup]) -> Result<Vec<ImageSet>> {
    let group_size = groups.first().map(|g| g.len()).unwrap_or(0);
    let mut image_sets = Vec::with_capacity(group_size);

    for step in 0..group_size {
        let shared_base = groups[0].records[step].base_name(&groups[0].key);
        let mut members = Vec::with_capacity(groups.len());

        for group in groups {
            let record = &group.records[step];
            let base = record.base_name(&group.key);
            if base != shared_base {
                return Err(CellbatchError::MisalignedImageSet {
                    position: step,
                    filename: record.filename.clone(),
                    base,
                    expected: shared_base,
                });
            }
            members.push(record.clone());
        }

        image_sets.push(ImageSet {
            base_name: shared_base,
            members,
        });
    }

    Ok(image_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(filename: &str, channel: &str) -> ImageRecord {
        let mut metadata = BTreeMap::new();
        metadata.insert("Channel".to_string(), channel.to_string());
        ImageRecord::new(filename, metadata)
    }

    #[test]
    fn test_groups_sorted_and_aligned() {
        let records = vec![
            record("imgB_w2.png", "w2"),
            record("imgA_w1.png", "w1"),
            record("imgB_w1.png", "w1"),
            record("imgA_w2.png", "w2"),
        ];

        let groups = group_records(records, "Channel").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "w1");
        assert_eq!(groups[0].records[0].filename, "imgA_w1.png");

        let sets = align_image_sets(&groups).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].base_name, "imgA_.png");
        assert_eq!(sets[1].base_name, "imgB_.png");
        assert_eq!(sets[0].members.len(), 2);
    }

    #[test]
    fn test_unequal_group_sizes_rejected() {
        // 5 个 w1 对 4 个 w2
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(record(&format!("img{}_w1.png", i), "w1"));
        }
        for i in 0..4 {
            records.push(record(&format!("img{}_w2.png", i), "w2"));
        }

        let result = group_records(records, "Channel");
        assert!(matches!(
            result,
            Err(CellbatchError::UnalignedGroups { .. })
        ));
    }

    #[test]
    fn test_misaligned_position_names_offender() {
        let records = vec![
            record("imgA_w1.png", "w1"),
            record("imgB_w2.png", "w2"),
        ];

        let groups = group_records(records, "Channel").unwrap();
        let result = align_image_sets(&groups);
        match result {
            Err(CellbatchError::MisalignedImageSet {
                position,
                filename,
                expected,
                ..
            }) => {
                assert_eq!(position, 0);
                assert_eq!(filename, "imgB_w2.png");
                assert_eq!(expected, "imgA_.png");
            }
            other => panic!("expected MisalignedImageSet, got {:?}", other),
        }
    }

    #[test]
    fn test_group_value_stripped_once_only() {
        // 分组值在文件名里出现两次，只移除第一次
        let records = vec![
            record("w1_field_w1.png", "w1"),
            record("w2_field_w1.png", "w2"),
        ];

        let groups = group_records(records, "Channel").unwrap();
        let sets = align_image_sets(&groups).unwrap();
        assert_eq!(sets[0].base_name, "_field_w1.png");
    }

    #[test]
    fn test_missing_group_field_rejected() {
        let records = vec![ImageRecord::new("plain.png", BTreeMap::new())];
        let result = group_records(records, "Channel");
        assert!(matches!(
            result,
            Err(CellbatchError::MissingGroupField { .. })
        ));
    }
}

//! # 批次文件清单写出
//!
//! 把对齐的图像集序列切成定长批次，每个批次写成一个
//! LoadData 风格的 CSV 文件清单。
//!
//! ## 列命名
//! - `filename` 字段 → `Image_FileName_<ObjectName>`
//! - 其他字段 F → `Metadata_<TitleCasedF>_<ObjectName>`
//! - `<ObjectName>` 按设置里的有序组键映射解析
//!
//! ## 依赖关系
//! - 被 `commands/split.rs` 调用
//! - 使用 `csv` 库写文件
//! - 使用 `models/` 的图像集与设置

use crate::error::{CellbatchError, Result};
use crate::models::{ImageSet, Settings};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 一次批次写出的汇总
///
/// `set_count` 是写出的批次数，等于下一个可用的批次编号。
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 写出的批次 CSV 路径，按批次编号排列
    pub files: Vec<PathBuf>,
    /// 写出的批次数
    pub set_count: usize,
}

/// 把图像集序列按批次大小切块并写出
///
/// 严格按图像集顺序切块，攒满一个批次立即落盘，最后的不满批次
/// 也写出。批次编号从 0 起单调递增，代入 `csv_template` 得到文件名。
pub fn write_batches(
    image_sets: &[ImageSet],
    settings: &Settings,
    output_path: &Path,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for chunk in image_sets.chunks(settings.image_set_size_per_batch) {
        let csv_path = output_path.join(settings.csv_filename(summary.set_count));
        write_batch_csv(chunk, settings, &csv_path)?;
        summary.files.push(csv_path);
        summary.set_count += 1;
    }

    Ok(summary)
}

/// 写出单个批次
///
/// 表头由第一个图像集决定并对整个批次生效；后续行引入表头之外
/// 的字段是数据错误。先写临时文件，成功后改名落位，避免半截
/// 文件被当成完整批次。
fn write_batch_csv(image_sets: &[ImageSet], settings: &Settings, csv_path: &Path) -> Result<()> {
    let first_set = &image_sets[0];

    // 字段顺序：filename 在前，其余按名称排序
    let mut fieldnames: Vec<&str> = vec!["filename"];
    fieldnames.extend(
        first_set.members[0]
            .metadata
            .keys()
            .map(|k| k.as_str())
            .filter(|k| *k != "filename"),
    );

    // 表头与 (字段, 对象序号) → 列号 的映射
    let mut header: Vec<String> = Vec::new();
    let mut column_map: HashMap<String, usize> = HashMap::new();
    for (object_num, member) in first_set.members.iter().enumerate() {
        let group_value = member.field(&settings.group_by_field).ok_or_else(|| {
            CellbatchError::MissingGroupField {
                filename: member.filename.clone(),
                field: settings.group_by_field.clone(),
            }
        })?;
        let object_name = settings.object_name(group_value)?;

        for fieldname in &fieldnames {
            let column = if *fieldname == "filename" {
                format!("Image_FileName_{}", object_name)
            } else {
                format!("Metadata_{}_{}", title_case(fieldname), object_name)
            };
            column_map.insert(format!("{}_{}", fieldname, object_num), header.len());
            header.push(column);
        }
    }

    let tmp_path = csv_path.with_extension("csv.tmp");
    let mut writer = csv::Writer::from_path(&tmp_path)?;
    writer.write_record(&header)?;

    for image_set in image_sets {
        let mut row = vec![String::new(); header.len()];
        for (object_num, member) in image_set.members.iter().enumerate() {
            for (fieldname, value) in &member.metadata {
                let object_key = format!("{}_{}", fieldname, object_num);
                let column = column_map.get(&object_key).ok_or_else(|| {
                    CellbatchError::UnknownMetadataField {
                        filename: member.filename.clone(),
                        field: fieldname.clone(),
                    }
                })?;
                row[*column] = value.clone();
            }
        }
        writer.write_record(&row)?;
    }

    writer.flush().map_err(|e| CellbatchError::FileWriteError {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    drop(writer);

    fs::rename(&tmp_path, csv_path).map_err(|e| CellbatchError::FileWriteError {
        path: csv_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 标题化字段名：每段字母序列首字母大写，其余小写
///
/// 与 Python `str.title()` 对齐，数字和下划线视作分段边界。
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

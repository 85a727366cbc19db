//! # 结果合并模块
//!
//! 把各批次输出的测量表拼接成单个全局表。批次内的
//! `ImageNumber`/`ObjectNumber` 是批次局部编号，合并时重新编号成
//! 全局严格递增序列；其余列原样透传，不重新解析，避免数值
//! 测量列的精度损失。
//!
//! ## 功能
//! - 枚举结果目录，要求批次索引从 0 连续
//! - 从 0 号批次发现实体名（每个 CSV 一个实体）
//! - 按批次索引递增顺序流式合并，逐行重写前两列
//!
//! ## 依赖关系
//! - 被 `commands/merge.rs` 调用
//! - 使用 `error.rs` 的错误类型

use crate::error::{CellbatchError, Result};

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// 单个实体合并完成后的统计
#[derive(Debug)]
pub struct MergeStats {
    /// 实体名，如 Nuclei
    pub entity: String,
    /// 参与合并的批次数
    pub batches: usize,
    /// 全局图像数
    pub images: u64,
    /// 全局对象数
    pub objects: u64,
}

/// 枚举结果根目录下的批次索引
///
/// 只认纯数字目录名；索引必须构成从 0 开始的连续区间，
/// 缺号说明有批次没有产出，继续合并会得到错误的全局编号。
pub fn discover_result_indexes(results_root: &Path) -> Result<Vec<usize>> {
    if !results_root.is_dir() {
        return Err(CellbatchError::DirectoryNotFound {
            path: results_root.display().to_string(),
        });
    }

    let mut indexes: Vec<usize> = fs::read_dir(results_root)
        .map_err(|e| CellbatchError::FileReadError {
            path: results_root.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().and_then(|n| n.parse::<usize>().ok()))
        .collect();
    indexes.sort_unstable();

    let contiguous = !indexes.is_empty() && indexes.iter().enumerate().all(|(i, &idx)| i == idx);
    if !contiguous {
        let found = if indexes.is_empty() {
            "none".to_string()
        } else {
            indexes
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(CellbatchError::MissingResultIndex { found });
    }

    Ok(indexes)
}

/// 从 0 号批次目录发现实体名
///
/// 每个实体对应一个 `<Entity>.csv`，所有批次产出相同的实体集合。
pub fn discover_entity_names(results_root: &Path) -> Result<Vec<String>> {
    let batch_zero = results_root.join("0");
    let mut entities: Vec<String> = fs::read_dir(&batch_zero)
        .map_err(|e| CellbatchError::FileReadError {
            path: batch_zero.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("csv"))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string()))
        .collect();
    entities.sort();
    Ok(entities)
}

/// 合并一个实体的所有批次结果
///
/// 单遍只追加：按批次索引递增顺序读取 `results/<i>/<E>.csv`，
/// 表头要求与 0 号批次逐字节一致，数据行按前两个逗号切成
/// 局部图像号、局部对象号和剩余部分。两个全局计数器跨批次
/// 持续累加：对象计数每行加一；图像计数只在局部图像号超过
/// 批内高水位时加一（高水位每个批次重置），从而把批次局部
/// 编号折算成全局序列。输出先写临时文件，完成后改名落位。
pub fn merge_entity(results_root: &Path, entity: &str, indexes: &[usize]) -> Result<MergeStats> {
    let merged_path = results_root.join(format!("{}.csv", entity));
    let tmp_path = merged_path.with_extension("csv.tmp");

    let out_file = File::create(&tmp_path).map_err(|e| CellbatchError::FileWriteError {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    let mut merged_csv = BufWriter::new(out_file);

    let mut merged_header: Option<String> = None;
    let mut image_count: u64 = 0;
    let mut object_count: u64 = 0;

    for &index in indexes {
        let csv_path = results_root
            .join(index.to_string())
            .join(format!("{}.csv", entity));
        let file = File::open(&csv_path).map_err(|e| CellbatchError::FileReadError {
            path: csv_path.display().to_string(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => {
                let line = line.map_err(|e| CellbatchError::FileReadError {
                    path: csv_path.display().to_string(),
                    source: e,
                })?;
                line.trim_end_matches('\r').to_string()
            }
            None => {
                return Err(CellbatchError::ResultParse {
                    path: csv_path.display().to_string(),
                    reason: "missing header line".to_string(),
                })
            }
        };

        match &merged_header {
            Some(expected) => {
                if header != *expected {
                    return Err(CellbatchError::SchemaMismatch {
                        batch_index: index,
                        path: csv_path.display().to_string(),
                    });
                }
            }
            None => {
                writeln!(merged_csv, "{}", header).map_err(|e| {
                    CellbatchError::FileWriteError {
                        path: tmp_path.display().to_string(),
                        source: e,
                    }
                })?;
                merged_header = Some(header);
            }
        }

        // 批内高水位，每个批次从 0 重新起算
        let mut prev_img_count: u64 = 0;

        for line in lines {
            let line = line.map_err(|e| CellbatchError::FileReadError {
                path: csv_path.display().to_string(),
                source: e,
            })?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(3, ',');
            let (image_field, object_field, rest) =
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(a), Some(b), Some(c)) => (a, b, c),
                    _ => {
                        return Err(CellbatchError::ResultParse {
                            path: csv_path.display().to_string(),
                            reason: format!("expected at least 3 columns, got: {}", line),
                        })
                    }
                };

            let image_index: u64 =
                image_field
                    .parse()
                    .map_err(|_| CellbatchError::ResultParse {
                        path: csv_path.display().to_string(),
                        reason: format!("non-integer ImageNumber: {}", image_field),
                    })?;
            // 局部对象号只校验格式，值不参与全局编号
            let _object_index: u64 =
                object_field
                    .parse()
                    .map_err(|_| CellbatchError::ResultParse {
                        path: csv_path.display().to_string(),
                        reason: format!("non-integer ObjectNumber: {}", object_field),
                    })?;

            object_count += 1;
            if image_index > prev_img_count {
                prev_img_count = image_index;
                image_count += 1;
            }

            writeln!(merged_csv, "{},{},{}", image_count, object_count, rest).map_err(|e| {
                CellbatchError::FileWriteError {
                    path: tmp_path.display().to_string(),
                    source: e,
                }
            })?;
        }
    }

    merged_csv
        .flush()
        .map_err(|e| CellbatchError::FileWriteError {
            path: tmp_path.display().to_string(),
            source: e,
        })?;
    drop(merged_csv);

    fs::rename(&tmp_path, &merged_path).map_err(|e| CellbatchError::FileWriteError {
        path: merged_path.display().to_string(),
        source: e,
    })?;

    Ok(MergeStats {
        entity: entity.to_string(),
        batches: indexes.len(),
        images: image_count,
        objects: object_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "ImageNumber,ObjectNumber,AreaShape_Area,Intensity_Mean";

    fn write_batch(root: &Path, index: usize, entity: &str, header: &str, rows: &[&str]) {
        let dir = root.join(index.to_string());
        fs::create_dir_all(&dir).unwrap();
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(dir.join(format!("{}.csv", entity)), content).unwrap();
    }

    fn merged_rows(root: &Path, entity: &str) -> Vec<String> {
        let content = fs::read_to_string(root.join(format!("{}.csv", entity))).unwrap();
        content.lines().skip(1).map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_discover_contiguous_indexes() {
        let dir = TempDir::new().unwrap();
        for i in 0..3 {
            write_batch(dir.path(), i, "Cells", HEADER, &[]);
        }
        // 非数字目录项被忽略
        fs::create_dir(dir.path().join("logs")).unwrap();

        let indexes = discover_result_indexes(dir.path()).unwrap();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_gap_in_indexes_rejected() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), 0, "Cells", HEADER, &[]);
        write_batch(dir.path(), 2, "Cells", HEADER, &[]);

        let result = discover_result_indexes(dir.path());
        assert!(matches!(
            result,
            Err(CellbatchError::MissingResultIndex { .. })
        ));
    }

    #[test]
    fn test_empty_results_rejected() {
        let dir = TempDir::new().unwrap();
        let result = discover_result_indexes(dir.path());
        assert!(matches!(
            result,
            Err(CellbatchError::MissingResultIndex { .. })
        ));
    }

    #[test]
    fn test_discover_entities_from_batch_zero() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), 0, "Cells", HEADER, &[]);
        write_batch(dir.path(), 0, "Nuclei", HEADER, &[]);
        fs::write(dir.path().join("0").join("stdout.log"), b"").unwrap();

        let entities = discover_entity_names(dir.path()).unwrap();
        assert_eq!(entities, vec!["Cells", "Nuclei"]);
    }

    #[test]
    fn test_merge_renumbers_across_batches() {
        // 批次 0 局部图像号 1,1,2；批次 1 局部 1,2 →
        // 全局 (1,1),(1,2),(2,3),(3,4),(4,5)
        let dir = TempDir::new().unwrap();
        write_batch(
            dir.path(),
            0,
            "Cells",
            HEADER,
            &["1,1,10.5,0.25", "1,2,11.5,0.50", "2,1,12.5,0.75"],
        );
        write_batch(
            dir.path(),
            1,
            "Cells",
            HEADER,
            &["1,1,13.5,0.10", "2,1,14.5,0.20"],
        );

        let stats = merge_entity(dir.path(), "Cells", &[0, 1]).unwrap();
        assert_eq!(stats.images, 4);
        assert_eq!(stats.objects, 5);

        let rows = merged_rows(dir.path(), "Cells");
        assert_eq!(
            rows,
            vec![
                "1,1,10.5,0.25",
                "1,2,11.5,0.50",
                "2,3,12.5,0.75",
                "3,4,13.5,0.10",
                "4,5,14.5,0.20",
            ]
        );
    }

    #[test]
    fn test_merge_counts_strictly_increasing() {
        // 批次行数 [3,2,4]，最终对象号必须是 9 且无空洞
        let dir = TempDir::new().unwrap();
        write_batch(
            dir.path(),
            0,
            "Cells",
            HEADER,
            &["1,1,1.0,1.0", "2,1,1.0,1.0", "3,1,1.0,1.0"],
        );
        write_batch(dir.path(), 1, "Cells", HEADER, &["1,1,1.0,1.0", "2,1,1.0,1.0"]);
        write_batch(
            dir.path(),
            2,
            "Cells",
            HEADER,
            &["1,1,1.0,1.0", "1,2,1.0,1.0", "2,1,1.0,1.0", "3,1,1.0,1.0"],
        );

        let stats = merge_entity(dir.path(), "Cells", &[0, 1, 2]).unwrap();
        assert_eq!(stats.objects, 9);

        let rows = merged_rows(dir.path(), "Cells");
        let mut prev_image = 0u64;
        for (i, row) in rows.iter().enumerate() {
            let mut parts = row.splitn(3, ',');
            let image: u64 = parts.next().unwrap().parse().unwrap();
            let object: u64 = parts.next().unwrap().parse().unwrap();
            assert_eq!(object, i as u64 + 1);
            assert!(image == prev_image || image == prev_image + 1);
            prev_image = image;
        }
    }

    #[test]
    fn test_schema_drift_rejected_before_output() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), 0, "Cells", HEADER, &["1,1,1.0,1.0"]);
        write_batch(
            dir.path(),
            1,
            "Cells",
            "ImageNumber,ObjectNumber,AreaShape_Area,Intensity_Max",
            &["1,1,1.0,1.0"],
        );

        let result = merge_entity(dir.path(), "Cells", &[0, 1]);
        match result {
            Err(CellbatchError::SchemaMismatch { batch_index, .. }) => {
                assert_eq!(batch_index, 1);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
        // 失败时合并文件不得出现在最终路径
        assert!(!dir.path().join("Cells.csv").exists());
    }

    #[test]
    fn test_rest_passed_through_verbatim() {
        // 剩余列不得重新解析，高精度数值原样透传
        let dir = TempDir::new().unwrap();
        write_batch(
            dir.path(),
            0,
            "Cells",
            HEADER,
            &["1,1,0.123456789012345678,1e-300"],
        );

        merge_entity(dir.path(), "Cells", &[0]).unwrap();
        let rows = merged_rows(dir.path(), "Cells");
        assert_eq!(rows, vec!["1,1,0.123456789012345678,1e-300"]);
    }

    #[test]
    fn test_malformed_row_rejected() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), 0, "Cells", HEADER, &["not_a_number,1,1.0,1.0"]);

        let result = merge_entity(dir.path(), "Cells", &[0]);
        assert!(matches!(result, Err(CellbatchError::ResultParse { .. })));
    }
}

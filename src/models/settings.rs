//! # 分组设置数据模型
//!
//! 描述如何解析图像文件名并把文件划分成批次的设置文档。
//! 设置文件为 JSON 键值文档，一次加载，整个运行期间只读。
//!
//! ## 依赖关系
//! - 被 `grouping/`, `commands/` 使用
//! - 使用 `serde_json` 解析设置文件

use crate::error::{CellbatchError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认的文件名解析正则：按通道号 d0/d1/... 分组的 png/tiff 文件
pub const DEFAULT_FILTER_RE: &str = r".*(?P<Channel>d\d)(\.png|\.tiff?)";

/// 默认的批次 CSV 文件名模板，`{set_num}` 会被替换为批次编号
pub const DEFAULT_CSV_TEMPLATE: &str = "image_set_{set_num}.csv";

/// 组键到对象名的映射项
///
/// 按列表顺序逐项做子串匹配，第一个命中的映射生效。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupKeyMapping {
    /// 组键中包含的子串
    pub key: String,
    /// 对应的 CellProfiler 对象名，如 OrigBlue
    pub object_name: String,
}

/// 图像分组设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 分组字段名，即文件名正则中的命名捕获组（如图像通道）
    pub group_by_field: String,

    /// 每个批次包含的图像集数量
    pub image_set_size_per_batch: usize,

    /// 文件名过滤 glob 模式（与 `image_name_filter_re` 二选一）
    pub image_name_filter_fn: Option<String>,

    /// 文件名过滤正则，命名捕获组成为元数据字段
    pub image_name_filter_re: Option<String>,

    /// 组键到对象名的有序映射表
    pub group_key_map: Vec<GroupKeyMapping>,

    /// 批次 CSV 文件名模板
    pub csv_template: String,

    /// 批次 CSV 输出目录相对输出根的子路径
    pub relative_output_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            group_by_field: "Channel".to_string(),
            image_set_size_per_batch: 10,
            image_name_filter_fn: None,
            image_name_filter_re: None,
            group_key_map: vec![
                GroupKeyMapping {
                    key: "0".to_string(),
                    object_name: "OrigBlue".to_string(),
                },
                GroupKeyMapping {
                    key: "1".to_string(),
                    object_name: "OrigGreen".to_string(),
                },
                GroupKeyMapping {
                    key: "2".to_string(),
                    object_name: "OrigRed".to_string(),
                },
                GroupKeyMapping {
                    key: "3".to_string(),
                    object_name: "OrigFarRed".to_string(),
                },
            ],
            csv_template: DEFAULT_CSV_TEMPLATE.to_string(),
            relative_output_path: None,
        }
    }
}

impl Settings {
    /// 从 JSON 设置文件加载
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CellbatchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Settings =
            serde_json::from_str(&content).map_err(|e| CellbatchError::SettingsError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// 校验设置的取值范围
    pub fn validate(&self) -> Result<()> {
        if self.image_set_size_per_batch == 0 {
            return Err(CellbatchError::InvalidArgument(
                "image_set_size_per_batch must be greater than 0".to_string(),
            ));
        }
        if self.group_by_field.is_empty() {
            return Err(CellbatchError::InvalidArgument(
                "group_by_field must not be empty".to_string(),
            ));
        }
        // 模板缺少占位符会让所有批次共用同一个文件名
        if !self.csv_template.contains("{set_num}") {
            return Err(CellbatchError::InvalidArgument(
                "csv_template must contain the {set_num} placeholder".to_string(),
            ));
        }
        Ok(())
    }

    /// 按有序映射表解析组键对应的对象名
    ///
    /// 子串匹配，第一个命中生效；没有命中返回 `UnmappedGroupKey`。
    pub fn object_name(&self, group_key: &str) -> Result<&str> {
        self.group_key_map
            .iter()
            .find(|m| group_key.contains(&m.key))
            .map(|m| m.object_name.as_str())
            .ok_or_else(|| CellbatchError::UnmappedGroupKey {
                group_key: group_key.to_string(),
            })
    }

    /// 把批次编号代入模板得到 CSV 文件名
    pub fn csv_filename(&self, set_num: usize) -> String {
        self.csv_template.replace("{set_num}", &set_num.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.group_by_field, "Channel");
        assert_eq!(settings.image_set_size_per_batch, 10);
        assert_eq!(settings.group_key_map.len(), 4);
    }

    #[test]
    fn test_object_name_first_match_wins() {
        let mut settings = Settings::default();
        settings.group_key_map = vec![
            GroupKeyMapping {
                key: "d1".to_string(),
                object_name: "First".to_string(),
            },
            GroupKeyMapping {
                key: "1".to_string(),
                object_name: "Second".to_string(),
            },
        ];
        assert_eq!(settings.object_name("d1").unwrap(), "First");
        assert_eq!(settings.object_name("w1").unwrap(), "Second");
    }

    #[test]
    fn test_object_name_unmapped() {
        let settings = Settings::default();
        let result = settings.object_name("w9");
        assert!(matches!(
            result,
            Err(crate::error::CellbatchError::UnmappedGroupKey { .. })
        ));
    }

    #[test]
    fn test_csv_filename_template() {
        let settings = Settings::default();
        assert_eq!(settings.csv_filename(0), "image_set_0.csv");
        assert_eq!(settings.csv_filename(12), "image_set_12.csv");
    }

    #[test]
    fn test_parse_settings_json() {
        let json = r#"{
            "group_by_field": "Site",
            "image_set_size_per_batch": 4,
            "image_name_filter_re": ".*(?P<Site>s\\d)\\.png",
            "group_key_map": [
                {"key": "s1", "object_name": "OrigDapi"},
                {"key": "s2", "object_name": "OrigGfp"}
            ]
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.group_by_field, "Site");
        assert_eq!(settings.image_set_size_per_batch, 4);
        assert_eq!(settings.object_name("s2").unwrap(), "OrigGfp");
        // 未指定的字段取默认值
        assert_eq!(settings.csv_template, DEFAULT_CSV_TEMPLATE);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let settings = Settings {
            image_set_size_per_batch: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let settings = Settings {
            csv_template: "image_set.csv".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}

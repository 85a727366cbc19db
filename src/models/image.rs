//! # 图像记录数据模型
//!
//! 定义从文件名解析出的图像记录，以及按通道分组和按位置对齐的
//! 两级聚合结构。
//!
//! ## 依赖关系
//! - 被 `grouping/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个图像文件的解析记录
///
/// `metadata` 包含文件名正则的所有命名捕获组，外加字面量 `filename` 键。
/// 创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// 文件名（不含目录）
    pub filename: String,

    /// 从文件名解析出的键值元数据
    pub metadata: BTreeMap<String, String>,
}

impl ImageRecord {
    /// 由文件名和捕获组构建记录，自动补充 `filename` 键
    pub fn new(filename: impl Into<String>, mut metadata: BTreeMap<String, String>) -> Self {
        let filename = filename.into();
        metadata.insert("filename".to_string(), filename.clone());
        ImageRecord { filename, metadata }
    }

    /// 读取某个元数据字段
    pub fn field(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(|s| s.as_str())
    }

    /// 去掉分组值后的基准文件名（只移除第一次出现）
    pub fn base_name(&self, group_value: &str) -> String {
        self.filename.replacen(group_value, "", 1)
    }
}

/// 同一分组值下的有序图像记录序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelGroup {
    /// 分组值，如通道标识 d0
    pub key: String,

    /// 按文件名排序的记录
    pub records: Vec<ImageRecord>,
}

impl ChannelGroup {
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// 一个对齐的图像集：每个通道组在同一位置各出一条记录
///
/// 不变量：去掉各自分组值后的文件名完全一致。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    /// 所有成员共享的基准文件名
    pub base_name: String,

    /// 按分组键排序的成员记录
    pub members: Vec<ImageRecord>,
}

//! # 项目目录布局模型
//!
//! 一次运行作用于一个项目目录：原始图像在 `images/`，批次文件清单
//! 写入 `image_groups/`，外部工具逐批输出到 `results/<N>/`。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 无外部模块依赖

use crate::models::Settings;

use std::path::{Path, PathBuf};

/// 项目目录布局
#[derive(Debug, Clone)]
pub struct Project {
    /// 项目根目录
    path: PathBuf,
}

impl Project {
    /// 以项目根目录创建
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Project { path: path.into() }
    }

    /// 项目根目录
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 原始图像目录
    pub fn images_path(&self) -> PathBuf {
        self.path.join("images")
    }

    /// 批次文件清单目录（可被设置中的相对子路径扩展）
    pub fn image_groups_path(&self, settings: &Settings) -> PathBuf {
        let base = self.path.join("image_groups");
        match &settings.relative_output_path {
            Some(rel) => base.join(rel),
            None => base,
        }
    }

    /// 结果根目录
    pub fn results_path(&self) -> PathBuf {
        self.path.join("results")
    }

    /// 某个批次的结果输出目录
    pub fn batch_results_path(&self, batch_index: usize) -> PathBuf {
        self.results_path().join(batch_index.to_string())
    }

    /// 解析项目内文件路径：非绝对路径且就地不存在时，回落到项目目录下
    pub fn resolve_file(&self, file: &Path) -> PathBuf {
        if file.is_absolute() || file.exists() {
            file.to_path_buf()
        } else {
            self.path.join(file)
        }
    }
}

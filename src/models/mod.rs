//! # 数据模型模块
//!
//! 定义项目目录布局、分组设置与图像记录数据模型。
//!
//! ## 依赖关系
//! - 被 `grouping/`, `batch/`, `merge/`, `commands/` 使用
//! - 子模块: image, project, settings

pub mod image;
pub mod project;
pub mod settings;

pub use image::{ChannelGroup, ImageRecord, ImageSet};
pub use project::Project;
pub use settings::Settings;

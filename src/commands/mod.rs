//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `grouping/`, `batch/`, `merge/`, `models/`, `utils/`
//! - 子模块: split, run, merge, process

pub mod merge;
pub mod process;
pub mod run;
pub mod split;

use crate::cli::Commands;
use crate::error::{CellbatchError, Result};
use crate::models::{Project, Settings};
use crate::utils::output;

use std::path::PathBuf;

/// 未显式指定时在项目目录下查找的设置文件名
pub(crate) const DEFAULT_SETTINGS_FILENAME: &str = "image_groups.json";

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Split(args) => split::execute(args),
        Commands::Run(args) => run::execute(args),
        Commands::Merge(args) => merge::execute(args),
        Commands::Process(args) => process::execute(args),
    }
}

/// 加载项目的分组设置
///
/// 显式指定的设置文件必须存在（必要时回落到项目目录下解析）；
/// 未指定时尝试项目下的默认文件名，仍缺失就用内置默认值。
pub(crate) fn load_settings(project: &Project, settings_file: &Option<PathBuf>) -> Result<Settings> {
    match settings_file {
        Some(file) => {
            let resolved = project.resolve_file(file);
            if !resolved.exists() {
                return Err(CellbatchError::FileNotFound {
                    path: resolved.display().to_string(),
                });
            }
            output::print_info(&format!("Parsing grouping settings: {}", resolved.display()));
            Settings::from_file(&resolved)
        }
        None => {
            let default_path = project.path().join(DEFAULT_SETTINGS_FILENAME);
            if default_path.exists() {
                output::print_info(&format!(
                    "Parsing grouping settings: {}",
                    default_path.display()
                ));
                Settings::from_file(&default_path)
            } else {
                output::print_warning("No settings file found, using default grouping settings");
                Ok(Settings::default())
            }
        }
    }
}

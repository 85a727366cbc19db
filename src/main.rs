//! # cellbatch - CellProfiler 并行批处理工具
//!
//! 把显微图像目录切成对齐的批次清单，逐批调用 CellProfiler
//! 风格的外部工具并行处理，再把各批次的测量结果合并成单个
//! 全局编号的结果表。
//!
//! ## 子命令
//! - `split` - 扫描图像并写出批次文件清单
//! - `run` - 逐批次调用外部工具（批次间并行）
//! - `merge` - 合并各批次测量结果
//! - `process` - 依次执行上述三步
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── grouping/  (元数据提取、通道对齐、批次写出)
//!   │     ├── batch/     (外部工具调用)
//!   │     └── merge/     (结果合并)
//!   ├── models/     (项目布局、设置、图像记录)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod grouping;
mod merge;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

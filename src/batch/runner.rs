//! # 批次执行器
//!
//! 并行执行各批次的外部工具调用。批次之间逻辑独立，输出目录
//! 按批次编号预先分好，是整个流程中唯一可以安全并行的环节。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - stdout/stderr 落盘到批次目录
//! - 任一批次非零退出即失败（快速失败）
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `batch/command.rs` 构造参数向量
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行执行

use crate::batch::build_batch_command;
use crate::error::{CellbatchError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 单个批次的执行描述
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// 批次编号，同时是结果目录名
    pub index: usize,
    /// 批次的文件清单 CSV
    pub data_file: PathBuf,
    /// 批次独占的输出目录
    pub output_dir: PathBuf,
}

/// 批次执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批次执行器，0 表示用全部核心
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行执行所有批次
    ///
    /// 全部批次跑完后汇总；只要有批次失败，整次运行以第一个
    /// 失败告终，缺失或残缺的批次输出会破坏合并的全局计数。
    pub fn run(
        &self,
        batches: &[BatchJob],
        tool: &str,
        images_path: &Path,
        pipeline_file: &Path,
    ) -> Result<()> {
        let pb = progress::create_progress_bar(batches.len() as u64, "Running batches");

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let results: Vec<Result<()>> = pool.install(|| {
            batches
                .par_iter()
                .map(|job| {
                    let result = run_batch(job, tool, images_path, pipeline_file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(())
    }
}

/// 执行单个批次并捕获工具输出
fn run_batch(job: &BatchJob, tool: &str, images_path: &Path, pipeline_file: &Path) -> Result<()> {
    fs::create_dir_all(&job.output_dir).map_err(|e| CellbatchError::FileWriteError {
        path: job.output_dir.display().to_string(),
        source: e,
    })?;

    let command =
        build_batch_command(tool, images_path, &job.output_dir, pipeline_file, &job.data_file);

    let stdout_log = File::create(job.output_dir.join("stdout.log")).map_err(|e| {
        CellbatchError::FileWriteError {
            path: job.output_dir.join("stdout.log").display().to_string(),
            source: e,
        }
    })?;
    let stderr_log = File::create(job.output_dir.join("stderr.log")).map_err(|e| {
        CellbatchError::FileWriteError {
            path: job.output_dir.join("stderr.log").display().to_string(),
            source: e,
        }
    })?;

    let status = Command::new(&command[0])
        .args(&command[1..])
        .stdout(Stdio::from(stdout_log))
        .stderr(Stdio::from(stderr_log))
        .status()
        .map_err(|_| CellbatchError::CommandNotFound {
            command: command[0].clone(),
        })?;

    if !status.success() {
        return Err(CellbatchError::BatchExecution {
            batch_index: job.index,
            exit_code: status.code().unwrap_or(-1),
            command,
        });
    }

    Ok(())
}

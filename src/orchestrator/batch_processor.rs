//! 批量任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量任务的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载词频表、创建 LLM 客户端和导出文件
//! 2. **批量加载**：扫描并加载所有待处理的任务（`Vec<CardJob>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将任务分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有任务的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个任务的细节
//! - **只读共享**：词频表和生成流程通过 `Arc` 在任务之间共享
//! - **向下委托**：委托 job_processor 处理单个任务

use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::models::card::BatchSummary;
use crate::models::job::CardJob;
use crate::models::lookup::LookupTable;
use crate::models::{load_all_jobs, load_lookup_table};
use crate::orchestrator::job_processor::{self, JobStats};
use crate::services::card_sink::{CardFileSink, CardSink};
use crate::workflow::CardPipeline;

/// 所有任务共享的导出目标
pub type SharedSink = Arc<Mutex<Box<dyn CardSink + Send>>>;

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: Arc<CardPipeline>,
    sink: SharedSink,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        info!(
            "🚀 卡片生成启动: 模型 {}, 并发上限 {}, 审查 {}",
            config.llm_model_name,
            config.max_concurrent_jobs,
            if config.lint_enabled { "开启" } else { "按任务" }
        );

        // 加载词频表
        let lookup = match &config.lookup_file {
            Some(path) => load_lookup_table(Path::new(path))
                .await
                .with_context(|| format!("无法加载词频表: {}", path))?,
            None => {
                warn!("⚠️ 未配置词频表，所有单词都将请求模型生成");
                LookupTable::new()
            }
        };

        let client = LlmClient::new(&config);
        let pipeline = CardPipeline::new(Arc::new(client), config.model_config(), Arc::new(lookup));
        let sink: SharedSink = Arc::new(Mutex::new(Box::new(CardFileSink::with_path(
            config.export_file.clone(),
        ))));

        Ok(Self::with_parts(config, pipeline, sink))
    }

    /// 使用现成的生成流程和导出目标创建应用
    pub fn with_parts(config: Config, pipeline: CardPipeline, sink: SharedSink) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            sink,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有待处理的任务
        info!("\n📁 正在扫描待处理的任务...");
        let all_jobs = load_all_jobs(&self.config.job_folder).await?;

        if all_jobs.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        let total_jobs = all_jobs.len();
        info!(
            "✓ 共 {} 个任务，每批最多 {} 个",
            total_jobs, self.config.max_concurrent_jobs
        );

        let stats = self.process_all_jobs(all_jobs).await?;

        log_summary(&stats, &self.config.export_file);

        Ok(stats)
    }

    /// 处理所有任务
    async fn process_all_jobs(&self, all_jobs: Vec<CardJob>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_jobs.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_jobs = all_jobs.len();
        let total_batches = total_jobs.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_jobs,
            ..Default::default()
        };

        let mut remaining = all_jobs.into_iter();
        let mut batch_start = 0;
        while batch_start < total_jobs {
            let batch_jobs: Vec<CardJob> = remaining.by_ref().take(batch_size).collect();
            let batch_end = batch_start + batch_jobs.len();
            let batch_num = batch_start / batch_size + 1;

            info!(
                "📦 第 {}/{} 批: 任务 {}-{}",
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end
            );

            let batch_stats = self
                .process_batch(batch_jobs, batch_start, semaphore.clone())
                .await?;

            info!(
                "第 {} 批结束: {}/{} 个任务成功",
                batch_num,
                batch_stats.success,
                batch_stats.success + batch_stats.failed
            );
            stats.merge(batch_stats);

            batch_start = batch_end;
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_jobs: Vec<CardJob>,
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<ProcessingStats> {
        let mut batch_handles = Vec::new();

        for (idx, job) in batch_jobs.into_iter().enumerate() {
            let job_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let pipeline = self.pipeline.clone();
            let sink = self.sink.clone();
            let lint_enabled = self.config.lint_enabled;
            let verbose_logging = self.config.verbose_logging;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                job_processor::process_job(
                    &pipeline,
                    job,
                    job_index,
                    &*sink,
                    lint_enabled,
                    verbose_logging,
                )
                .await
            });
            batch_handles.push((job_index, handle));
        }

        // 等待本批所有任务完成
        let (indices, handles): (Vec<_>, Vec<_>) = batch_handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut batch_stats = ProcessingStats::default();
        for (job_index, result) in indices.into_iter().zip(results) {
            batch_stats.total += 1;
            match result {
                Ok(job_stats) => batch_stats.record(&job_stats),
                Err(e) => {
                    error!("[任务 {}] 任务执行失败: {}", job_index, e);
                    batch_stats.failed += 1;
                }
            }
        }

        Ok(batch_stats)
    }
}

fn log_summary(stats: &ProcessingStats, export_file: &str) {
    let finished_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    if stats.failed == 0 {
        info!("✅ 全部 {} 个任务完成 ({})", stats.total, finished_at);
    } else {
        warn!(
            "⚠️ {} 个任务中 {} 个失败 ({})",
            stats.total, stats.failed, finished_at
        );
    }
    info!(
        "🃏 导出 {} 张 (失败 {}) → {}；审查 {} 张 (失败 {})",
        stats.export.succeeded,
        stats.export.failed,
        export_file,
        stats.lint.succeeded,
        stats.lint.failed
    );
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub export: BatchSummary,
    pub lint: BatchSummary,
}

impl ProcessingStats {
    fn record(&mut self, job_stats: &JobStats) {
        if job_stats.is_success() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.export.merge(job_stats.export);
        self.lint.merge(job_stats.lint);
    }

    fn merge(&mut self, other: ProcessingStats) {
        self.success += other.success;
        self.failed += other.failed;
        self.export.merge(other.export);
        self.lint.merge(other.lint);
    }
}

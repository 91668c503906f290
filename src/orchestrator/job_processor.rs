//! 单个任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个卡片生成任务，是任务级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **收集单词**：任务指定的单词 + 按主题推荐的新词
//! 2. **生成卡片**：委托 `CardPipeline`
//! 3. **审查修正**：任务或配置要求时逐张审查
//! 4. **导出卡片**：写入共享的导出文件
//! 5. **统计输出**：记录卡片 / 导出 / 审查数量

use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::card::{BatchSummary, CardRecord};
use crate::models::job::CardJob;
use crate::services::card_sink::{export_selected, CardSink, FieldMapping};
use crate::utils::logging::truncate_text;
use crate::workflow::CardPipeline;

/// 任务处理统计
#[derive(Debug, Default)]
pub struct JobStats {
    /// 请求的单词数量
    pub requested: usize,
    /// 得到的卡片数量
    pub cards: usize,
    /// 生成阶段是否失败（失败时仍会导出已得到的卡片）
    pub generation_failed: bool,
    pub lint: BatchSummary,
    pub export: BatchSummary,
}

impl JobStats {
    /// 生成成功并且没有导出失败
    pub fn is_success(&self) -> bool {
        !self.generation_failed && self.export.failed == 0
    }
}

/// 处理单个任务
///
/// # 参数
/// - `pipeline`: 卡片生成流程
/// - `job`: 任务数据
/// - `job_index`: 任务索引（用于日志）
/// - `sink`: 导出目标
/// - `lint_enabled`: 配置中是否开启审查（任务自身的 `lint` 也会开启）
/// - `verbose_logging`: 是否输出每张卡片
pub async fn process_job<K: CardSink + ?Sized>(
    pipeline: &CardPipeline,
    job: CardJob,
    job_index: usize,
    sink: &Mutex<Box<K>>,
    lint_enabled: bool,
    verbose_logging: bool,
) -> JobStats {
    log_job_start(job_index, &job);

    let mut stats = JobStats::default();

    // ========== 收集单词 ==========
    let words = collect_words(pipeline, &job, job_index).await;
    stats.requested = words.len();

    if words.is_empty() {
        warn!("[任务 {}] ⚠️ 没有需要生成的单词", job_index);
        return stats;
    }

    // ========== 生成卡片 ==========
    let mut cards = match pipeline
        .generate_for_word_list(&words, &job.language, &job.native_language)
        .await
    {
        Ok(cards) => cards,
        Err(e) => {
            error!("[任务 {}] ❌ {}", job_index, e);
            stats.generation_failed = true;
            e.recovered
        }
    };
    stats.cards = cards.len();

    // ========== 审查 ==========
    if (lint_enabled || job.lint) && !cards.is_empty() {
        info!("[任务 {}] 🔎 开始审查 {} 张卡片", job_index, cards.len());
        stats.lint = pipeline.lint_and_repair(&mut cards, &job.language).await;
    }

    if verbose_logging {
        log_cards(job_index, &cards);
    }

    // ========== 导出 ==========
    stats.export = export_cards(sink, &cards, job_index);

    log_job_complete(job_index, &stats);
    stats
}

/// 任务指定的单词在前，推荐的新词在后，去掉重复
async fn collect_words(pipeline: &CardPipeline, job: &CardJob, job_index: usize) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in &job.words {
        let word = word.trim();
        if !word.is_empty() && !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
    }

    let Some(topic) = job.topic.as_deref() else {
        return words;
    };

    // 已经指定的单词也视为已知，避免重复推荐
    let known: BTreeSet<String> = job
        .known_terms
        .iter()
        .chain(words.iter())
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect();

    info!("[任务 {}] 💡 按主题 {} 推荐新词...", job_index, topic);
    match pipeline
        .suggester()
        .suggest(topic, &known, job.suggestion_count(), &job.language)
        .await
    {
        Ok(suggestions) => {
            for word in suggestions {
                if !words.contains(&word) {
                    words.push(word);
                }
            }
        }
        Err(e) => {
            error!("[任务 {}] 新词推荐失败: {}", job_index, e);
        }
    }

    words
}

fn export_cards<K: CardSink + ?Sized>(
    sink: &Mutex<Box<K>>,
    cards: &[CardRecord],
    job_index: usize,
) -> BatchSummary {
    if cards.is_empty() {
        return BatchSummary::default();
    }

    match sink.lock() {
        Ok(mut guard) => export_selected(&mut **guard, cards, &FieldMapping::default()),
        Err(e) => {
            error!("[任务 {}] 导出目标不可用: {}", job_index, e);
            BatchSummary {
                succeeded: 0,
                failed: cards.iter().filter(|card| card.selected).count(),
            }
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_job_start(job_index: usize, job: &CardJob) {
    info!("[任务 {}] 开始处理", job_index);
    info!("[任务 {}] 名称: {}", job_index, job.name);
    info!(
        "[任务 {}] 语言: {} → {}",
        job_index, job.language, job.native_language
    );
    if let Some(path) = &job.file_path {
        info!("[任务 {}] 文件: {}", job_index, path);
    }
}

fn log_cards(job_index: usize, cards: &[CardRecord]) {
    for (i, card) in cards.iter().enumerate() {
        info!(
            "[任务 {}]   {}. {} | {}",
            job_index,
            i + 1,
            card,
            truncate_text(&card.note, 40)
        );
    }
}

fn log_job_complete(job_index: usize, stats: &JobStats) {
    info!(
        "[任务 {}] 卡片统计: 请求 {}, 得到 {}, 导出 {}/{}",
        job_index,
        stats.requested,
        stats.cards,
        stats.export.succeeded,
        stats.export.total()
    );
    if stats.is_success() {
        info!("\n[任务 {}] ✅ 任务处理完成\n", job_index);
    } else {
        warn!("\n[任务 {}] ⚠️ 任务部分完成\n", job_index);
    }
}

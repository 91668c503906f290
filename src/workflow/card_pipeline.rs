//! 卡片生成流程 - 流程层
//!
//! 核心职责：定义"一组单词"变成卡片的完整流程
//!
//! 流程顺序：
//! 1. （可选）按主题推荐新词
//! 2. 词频表对照：已有完整信息的单词直接成卡
//! 3. 其余单词一次性请求模型生成
//! 4. 合并结果
//! 5. （可选）逐张审查并应用修正
//!
//! 第 3 步失败时，第 2 步得到的卡片通过 `PipelineError::recovered` 交还，不回滚。

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::PromptSender;
use crate::config::ModelConfig;
use crate::error::{AppError, PipelineError};
use crate::models::card::{BatchSummary, CardRecord};
use crate::models::lookup::LookupTable;
use crate::services::{lookup_reconciler, prompts, record_parser, VocabSuggester};
use crate::workflow::lint_cycle::LintCycle;

/// 共享的模型调用能力
pub type SharedSender = Arc<dyn PromptSender>;

/// 卡片生成流程
///
/// - 不持有可变状态，可以在多个任务中并发使用
/// - 词频表只读共享
pub struct CardPipeline {
    sender: SharedSender,
    model_config: ModelConfig,
    lookup: Arc<LookupTable>,
}

impl CardPipeline {
    pub fn new(sender: SharedSender, model_config: ModelConfig, lookup: Arc<LookupTable>) -> Self {
        Self {
            sender,
            model_config,
            lookup,
        }
    }

    pub fn suggester(&self) -> VocabSuggester<SharedSender> {
        VocabSuggester::new(self.sender.clone(), self.model_config.clone())
    }

    pub fn lint_cycle(&self) -> LintCycle<SharedSender> {
        LintCycle::new(self.sender.clone(), self.model_config.clone())
    }

    /// 为单词列表生成卡片
    ///
    /// 结果 = 词频表中的完整卡片（保持原顺序）+ 模型新生成的卡片。
    /// 模型可能漏掉某些单词，返回数量不保证与输入一致。
    pub async fn generate_for_word_list(
        &self,
        words: &[String],
        language: &str,
        native_language: &str,
    ) -> Result<Vec<CardRecord>, PipelineError> {
        let words: Vec<&str> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        // ========== 步骤 1: 词频表对照 ==========
        let records = lookup_reconciler::reconcile(&words, &self.lookup);
        let (mut complete, missing) = lookup_reconciler::split_complete(records);
        info!(
            "📖 词频表命中 {} 个，需要生成 {} 个",
            complete.len(),
            missing.len()
        );

        if missing.is_empty() {
            return Ok(complete);
        }

        // ========== 步骤 2: 请求模型生成 ==========
        let terms: Vec<String> = missing.into_iter().map(|record| record.term).collect();
        let prompt = prompts::generation_prompt(&terms, language, native_language);

        let response = match self.sender.send(&prompt, &self.model_config).await {
            Ok(response) => response,
            Err(e) => return Err(PipelineError::new(complete, e)),
        };

        let mut generated = record_parser::parse(&response);
        if generated.is_empty() {
            warn!("⚠️ 无法从模型响应中解析出卡片");
            return Err(PipelineError::new(
                complete,
                AppError::no_records("卡片生成", &response),
            ));
        }

        if generated.len() != terms.len() {
            warn!(
                "⚠️ 请求生成 {} 个单词，实际解析出 {} 张卡片",
                terms.len(),
                generated.len()
            );
        }

        // 词频表中只有部分信息的单词保留排名
        for record in generated.iter_mut() {
            if record.rank_hint.is_none() {
                record.rank_hint = self.lookup.get(&record.term).map(|entry| entry.rank);
            }
        }

        // ========== 步骤 3: 合并 ==========
        complete.append(&mut generated);
        info!("✓ 共得到 {} 张卡片", complete.len());

        Ok(complete)
    }

    /// 按主题推荐新词并生成卡片
    pub async fn generate_for_topic(
        &self,
        topic: &str,
        known_terms: &BTreeSet<String>,
        count: usize,
        language: &str,
        native_language: &str,
    ) -> Result<Vec<CardRecord>, PipelineError> {
        let words = self
            .suggester()
            .suggest(topic, known_terms, count, language)
            .await?;

        if words.is_empty() {
            warn!("⚠️ 主题 {} 没有推荐出新词", topic);
            return Ok(Vec::new());
        }

        self.generate_for_word_list(&words, language, native_language)
            .await
    }

    /// 逐张审查并直接应用修正
    ///
    /// 每张卡片在审查期间只由这里修改；单张审查失败不影响其他卡片
    pub async fn lint_and_repair(&self, cards: &mut [CardRecord], language: &str) -> BatchSummary {
        let lint_cycle = self.lint_cycle();
        let mut summary = BatchSummary::default();
        let mut repaired = 0;

        for card in cards.iter_mut() {
            match lint_cycle.review(card, language).await {
                Ok(outcome) => {
                    summary.succeeded += 1;
                    if outcome.errors_found {
                        if let Some(corrected) = &outcome.corrected_fields {
                            card.apply_fields_from(corrected);
                            repaired += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("⚠️ 卡片审查失败 {}: {}", card, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "🔎 审查完成: 成功 {}/{}，修正 {} 张",
            summary.succeeded,
            summary.total(),
            repaired
        );
        summary
    }
}

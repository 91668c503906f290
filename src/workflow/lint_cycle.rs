//! 卡片审查流程
//!
//! 把一张已完成的卡片交给模型审查，模型要么回答 `NO ERRORS`，
//! 要么只返回需要修正的字段。审查结果仅供参考，是否应用由调用方决定。

use tracing::{debug, info, warn};

use crate::clients::PromptSender;
use crate::config::ModelConfig;
use crate::error::{AppResult, ParseError};
use crate::models::card::{BatchSummary, CardRecord, LintOutcome};
use crate::services::{prompts, record_parser};

/// 批量审查结果
#[derive(Debug, Default)]
pub struct LintReport {
    /// 与输入一一对应，审查失败的位置为 `None`
    pub outcomes: Vec<Option<LintOutcome>>,
    pub summary: BatchSummary,
}

/// 卡片审查流程
pub struct LintCycle<S> {
    sender: S,
    model_config: ModelConfig,
}

impl<S: PromptSender> LintCycle<S> {
    pub fn new(sender: S, model_config: ModelConfig) -> Self {
        Self {
            sender,
            model_config,
        }
    }

    /// 审查单张卡片
    ///
    /// - 响应为 `NO ERRORS`：没有错误，修正结果就是原卡片
    /// - 其他响应按部分字段解析，叠加到原卡片上
    /// - 一个字段都识别不到时视为响应格式错误
    pub async fn review(&self, record: &CardRecord, language: &str) -> AppResult<LintOutcome> {
        let prompt = prompts::lint_prompt(record, language);
        let response = self.sender.send(&prompt, &self.model_config).await?;

        if is_no_errors(&response) {
            debug!("审查通过: {}", record);
            return Ok(LintOutcome {
                completed: true,
                errors_found: false,
                raw_response: Some(response),
                corrected_fields: Some(record.clone()),
            });
        }

        let fields = record_parser::parse_fields(&response);
        if fields.is_empty() {
            return Err(ParseError::MalformedLintResponse { response }.into());
        }

        let mut corrected = record.clone();
        corrected.apply_correction(&fields);
        info!(
            "审查发现问题: {} → {} (修正 {} 个字段)",
            record,
            corrected,
            fields.recognized_count()
        );

        Ok(LintOutcome {
            completed: true,
            errors_found: true,
            raw_response: Some(response),
            corrected_fields: Some(corrected),
        })
    }

    /// 逐张审查，单张失败只计数
    pub async fn review_batch(&self, records: &[CardRecord], language: &str) -> LintReport {
        let mut report = LintReport::default();

        for record in records {
            match self.review(record, language).await {
                Ok(outcome) => {
                    report.summary.succeeded += 1;
                    report.outcomes.push(Some(outcome));
                }
                Err(e) => {
                    warn!("⚠️ 卡片审查失败 {}: {}", record, e);
                    report.summary.failed += 1;
                    report.outcomes.push(None);
                }
            }
        }

        report
    }
}

/// 去掉首尾空白和引号后，是否正好是 `NO ERRORS`（区分大小写）
fn is_no_errors(response: &str) -> bool {
    let normalized = response
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '“' | '”'))
        .trim();
    normalized == prompts::NO_ERRORS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::{transport_error, ScriptedSender};
    use crate::error::AppError;

    fn card() -> CardRecord {
        CardRecord {
            term: "far".to_string(),
            meaning: "near".to_string(),
            pronunciation: "fɑː".to_string(),
            note: "The shop is far.".to_string(),
            selected: false,
            reversed: true,
            rank_hint: Some(120),
        }
    }

    fn lint(reply: &str) -> LintCycle<ScriptedSender> {
        LintCycle::new(ScriptedSender::replying(reply), ModelConfig::new("test-model"))
    }

    #[tokio::test]
    async fn test_no_errors_passes_record_through() {
        let outcome = lint("NO ERRORS").review(&card(), "English").await.unwrap();

        assert!(outcome.completed);
        assert!(!outcome.errors_found);
        assert_eq!(outcome.corrected_fields, Some(card()));
        assert_eq!(outcome.raw_response.as_deref(), Some("NO ERRORS"));
    }

    #[test]
    fn test_no_errors_normalization() {
        assert!(is_no_errors("  \"NO ERRORS\"\n"));
        assert!(is_no_errors("'NO ERRORS'"));
        assert!(!is_no_errors("No errors"));
        assert!(!is_no_errors("NO ERRORS."));
    }

    #[tokio::test]
    async fn test_correction_overlays_only_named_fields() {
        let outcome = lint("MEANING: at a great distance")
            .review(&card(), "English")
            .await
            .unwrap();

        assert!(outcome.errors_found);
        let corrected = outcome.corrected_fields.unwrap();
        assert_eq!(corrected.meaning, "at a great distance");
        assert_eq!(corrected.term, "far");
        assert_eq!(corrected.note, "The shop is far.");
        assert_eq!(corrected.rank_hint, Some(120));
        assert!(corrected.reversed);
    }

    #[tokio::test]
    async fn test_lowercase_no_errors_is_malformed() {
        let result = lint("no errors").review(&card(), "English").await;
        assert!(matches!(
            result,
            Err(AppError::Parse(ParseError::MalformedLintResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_review_batch_counts_failures() {
        let sender = ScriptedSender::new(vec![
            Ok("NO ERRORS".to_string()),
            Err(transport_error()),
            Ok("IPA: fɑːr".to_string()),
        ]);
        let cycle = LintCycle::new(sender, ModelConfig::new("test-model"));
        let records = vec![card(), card(), card()];

        let report = cycle.review_batch(&records, "English").await;

        assert_eq!(report.summary, BatchSummary { succeeded: 2, failed: 1 });
        assert!(report.outcomes[1].is_none());
        let third = report.outcomes[2].as_ref().unwrap();
        assert_eq!(
            third.corrected_fields.as_ref().unwrap().pronunciation,
            "fɑːr"
        );
    }
}

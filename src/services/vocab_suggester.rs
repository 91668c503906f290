//! 新词推荐 - 业务能力层
//!
//! 只负责"推荐学习者还没学过的单词"，一次推荐对应一次模型调用

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::clients::PromptSender;
use crate::config::ModelConfig;
use crate::error::{AppResult, ValidationError};
use crate::services::prompts;

/// 单次推荐的最大数量
pub const MAX_SUGGESTIONS: usize = 50;

/// 新词推荐服务
pub struct VocabSuggester<S> {
    sender: S,
    model_config: ModelConfig,
}

impl<S: PromptSender> VocabSuggester<S> {
    pub fn new(sender: S, model_config: ModelConfig) -> Self {
        Self {
            sender,
            model_config,
        }
    }

    /// 推荐最多 `count` 个新词
    ///
    /// 返回数量可能少于 `count`，调用方需要能处理
    pub async fn suggest(
        &self,
        topic: &str,
        known_terms: &BTreeSet<String>,
        count: usize,
        language: &str,
    ) -> AppResult<Vec<String>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic.into());
        }
        if count == 0 || count > MAX_SUGGESTIONS {
            return Err(ValidationError::InvalidSuggestionCount {
                count,
                max: MAX_SUGGESTIONS,
            }
            .into());
        }

        let flattened = flatten_known_terms(known_terms);
        let prompt = prompts::suggestion_prompt(topic, count, language, &flattened);
        debug!("推荐新词: 主题 {}, 已知单词 {} 个", topic, known_terms.len());

        let response = self.sender.send(&prompt, &self.model_config).await?;
        let suggestions = filter_suggestions(&response, &flattened, count);

        info!("✓ 推荐新词 {} 个 (请求 {} 个)", suggestions.len(), count);
        Ok(suggestions)
    }
}

/// 已知单词拼接为一个字符串
pub fn flatten_known_terms(known_terms: &BTreeSet<String>) -> String {
    known_terms
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 过滤模型返回的行
///
/// 丢弃空行和包含在已知单词拼接串中的行（子串匹配，会把近似重复也过滤掉）
pub fn filter_suggestions(response: &str, flattened_known: &str, count: usize) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !flattened_known.contains(line))
        .take(count)
        .map(str::to_string)
        .collect()
}

//! 卡片修改 - 业务能力层
//!
//! 按学习者的一句话指令修改单张卡片

use tracing::{debug, info};

use crate::clients::PromptSender;
use crate::config::ModelConfig;
use crate::error::{AppResult, ParseError, ValidationError};
use crate::models::card::CardRecord;
use crate::services::{prompts, record_parser};

/// 修改指令的最大长度（字符）
pub const MAX_INSTRUCTION_CHARS: usize = 300;

/// 卡片修改服务
pub struct CardEditor<S> {
    sender: S,
    model_config: ModelConfig,
}

impl<S: PromptSender> CardEditor<S> {
    pub fn new(sender: S, model_config: ModelConfig) -> Self {
        Self {
            sender,
            model_config,
        }
    }

    /// 返回修改后的卡片，原卡片不变
    ///
    /// 指令为空或过长时直接拒绝，不调用模型
    pub async fn edit(
        &self,
        record: &CardRecord,
        instruction: &str,
        language: &str,
    ) -> AppResult<CardRecord> {
        let instruction = validate_instruction(instruction)?;

        let prompt = prompts::edit_prompt(record, instruction, language);
        let response = self.sender.send(&prompt, &self.model_config).await?;

        let fields = record_parser::parse_fields(&response);
        if fields.is_empty() {
            return Err(ParseError::MalformedEditResponse { response }.into());
        }
        debug!("修改响应识别到 {} 个字段", fields.recognized_count());

        let mut edited = record.clone();
        edited.apply_correction(&fields);
        info!("✓ 卡片已修改: {} → {}", record, edited);

        Ok(edited)
    }
}

/// 校验修改指令，返回去掉首尾空白后的指令
pub fn validate_instruction(instruction: &str) -> Result<&str, ValidationError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(ValidationError::EmptyInstruction);
    }

    let len = instruction.chars().count();
    if len > MAX_INSTRUCTION_CHARS {
        return Err(ValidationError::InstructionTooLong {
            len,
            max: MAX_INSTRUCTION_CHARS,
        });
    }

    Ok(instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::ScriptedSender;
    use crate::error::AppError;

    fn card() -> CardRecord {
        CardRecord {
            term: "ไป".to_string(),
            meaning: "to go".to_string(),
            pronunciation: "paj".to_string(),
            note: String::new(),
            rank_hint: Some(3),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_edit_overlays_changed_fields() {
        let sender = ScriptedSender::replying("USAGE: ไปไหน - where are you going?");
        let editor = CardEditor::new(sender, ModelConfig::new("test-model"));

        let edited = editor
            .edit(&card(), "add a common greeting as usage", "Thai")
            .await
            .unwrap();

        assert_eq!(edited.note, "ไปไหน - where are you going?");
        assert_eq!(edited.meaning, "to go");
        assert_eq!(edited.rank_hint, Some(3));
    }

    #[tokio::test]
    async fn test_too_long_instruction_rejected_without_call() {
        let editor = CardEditor::new(ScriptedSender::replying("unused"), ModelConfig::new("test-model"));
        let instruction = "x".repeat(MAX_INSTRUCTION_CHARS + 1);

        let result = editor.edit(&card(), &instruction, "Thai").await;

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::InstructionTooLong { len, .. })) if len == MAX_INSTRUCTION_CHARS + 1
        ));
        assert_eq!(editor.sender.call_count(), 0);
    }

    #[test]
    fn test_instruction_length_counts_chars_not_bytes() {
        // 每个泰文字符占 3 个字节
        let instruction = "ก".repeat(MAX_INSTRUCTION_CHARS);
        assert!(validate_instruction(&instruction).is_ok());
        assert!(matches!(
            validate_instruction("   "),
            Err(ValidationError::EmptyInstruction)
        ));
    }

    #[tokio::test]
    async fn test_unrecognized_response_is_parse_error() {
        let editor = CardEditor::new(
            ScriptedSender::replying("Sure! I changed it."),
            ModelConfig::new("test-model"),
        );

        let result = editor.edit(&card(), "shorter meaning", "Thai").await;
        assert!(matches!(
            result,
            Err(AppError::Parse(ParseError::MalformedEditResponse { .. }))
        ));
    }
}

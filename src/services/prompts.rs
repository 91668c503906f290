//! 提示词模板
//!
//! 提示词只由操作参数决定，不读取任何外部状态

use crate::models::card::CardRecord;

/// 审查通过时模型应返回的文本
pub const NO_ERRORS: &str = "NO ERRORS";

const CARD_FORMAT: &str = "WORD: <the word exactly as given>\n\
                           IPA: <pronunciation in IPA>\n\
                           MEANING: <short meaning>\n\
                           USAGE: <one short example sentence or mnemonic>";

/// 新词推荐
pub fn suggestion_prompt(topic: &str, count: usize, language: &str, known_terms: &str) -> String {
    let known = if known_terms.is_empty() {
        "(none)"
    } else {
        known_terms
    };

    format!(
        "Suggest {count} useful {language} vocabulary words about the topic \"{topic}\".\n\
         The learner already knows these words, do not repeat any of them: {known}\n\
         Reply with exactly one {language} word per line. No numbering, no translations, \
         no extra text."
    )
}

/// 为缺失信息的单词生成卡片
pub fn generation_prompt(terms: &[String], language: &str, native_language: &str) -> String {
    let word_list = terms
        .iter()
        .map(|term| format!("- {}", term))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create one flashcard for each of the following {language} words.\n\
         Write MEANING and USAGE explanations in {native_language}.\n\
         Words:\n{word_list}\n\n\
         Use exactly this block format for every card, separated by a blank line:\n\
         {CARD_FORMAT}"
    )
}

/// 审查单张卡片
pub fn lint_prompt(record: &CardRecord, language: &str) -> String {
    format!(
        "Review this {language} vocabulary flashcard for mistakes.\n\
         Check that IPA is the correct pronunciation of WORD, that MEANING is accurate, \
         and that USAGE is natural and uses WORD correctly.\n\n\
         {card}\n\
         If everything is correct, reply with exactly: {NO_ERRORS}\n\
         Otherwise reply only with the corrected fields, one per line, using the same labels \
         (WORD, IPA, MEANING, USAGE). Leave out fields that are already correct.",
        card = record.render()
    )
}

/// 按用户指令修改单张卡片
pub fn edit_prompt(record: &CardRecord, instruction: &str, language: &str) -> String {
    format!(
        "Here is a {language} vocabulary flashcard:\n\n\
         {card}\n\
         Apply this change requested by the learner: {instruction}\n\n\
         Reply only with the changed fields, one per line, using the same labels \
         (WORD, IPA, MEANING, USAGE).",
        card = record.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_prompt_lists_every_term() {
        let terms = vec!["รถ".to_string(), "เรือ".to_string()];
        let prompt = generation_prompt(&terms, "Thai", "English");

        assert!(prompt.contains("- รถ\n- เรือ"));
        assert!(prompt.contains("WORD:"));
        assert!(prompt.contains("in English"));
    }

    #[test]
    fn test_lint_prompt_embeds_rendered_card() {
        let card = CardRecord {
            term: "ไป".to_string(),
            meaning: "to go".to_string(),
            pronunciation: "paj".to_string(),
            ..Default::default()
        };
        let prompt = lint_prompt(&card, "Thai");

        assert!(prompt.contains(&card.render()));
        assert!(prompt.contains(NO_ERRORS));
    }

    #[test]
    fn test_suggestion_prompt_without_known_terms() {
        let prompt = suggestion_prompt("food", 5, "Thai", "");
        assert!(prompt.contains("Suggest 5 useful Thai"));
        assert!(prompt.contains("(none)"));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 单张单词卡片
///
/// 由生成流程的某一阶段独占持有，在阶段之间按值传递
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// 单词
    pub term: String,
    /// 释义
    pub meaning: String,
    /// 发音（IPA）
    pub pronunciation: String,
    /// 用法 / 助记
    #[serde(default)]
    pub note: String,
    /// 是否选中导出
    #[serde(default = "default_selected")]
    pub selected: bool,
    /// 是否同时生成反向卡片
    #[serde(default)]
    pub reversed: bool,
    /// 词频排名（来自词频表）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_hint: Option<u32>,
}

fn default_selected() -> bool {
    true
}

impl Default for CardRecord {
    fn default() -> Self {
        Self {
            term: String::new(),
            meaning: String::new(),
            pronunciation: String::new(),
            note: String::new(),
            selected: true,
            reversed: false,
            rank_hint: None,
        }
    }
}

impl CardRecord {
    /// 只有单词的占位卡片
    pub fn stub(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// 单词、释义、发音都不为空时卡片完整，用法可以为空
    pub fn is_complete(&self) -> bool {
        !self.term.is_empty() && !self.meaning.is_empty() && !self.pronunciation.is_empty()
    }

    /// 渲染为模型使用的字段块格式
    pub fn render(&self) -> String {
        format!(
            "WORD: {}\nIPA: {}\nMEANING: {}\nUSAGE: {}\n",
            self.term, self.pronunciation, self.meaning, self.note
        )
    }

    /// 把部分解析出的字段覆盖到当前卡片上
    ///
    /// 只覆盖实际识别到的字段，选中状态和词频排名保持不变
    pub fn apply_correction(&mut self, fields: &PartialCard) {
        if let Some(term) = &fields.term {
            self.term = term.clone();
        }
        if let Some(meaning) = &fields.meaning {
            self.meaning = meaning.clone();
        }
        if let Some(pronunciation) = &fields.pronunciation {
            self.pronunciation = pronunciation.clone();
        }
        if let Some(note) = &fields.note {
            self.note = note.clone();
        }
    }

    /// 用另一张卡片的内容字段替换当前卡片
    pub fn apply_fields_from(&mut self, other: &CardRecord) {
        self.term = other.term.clone();
        self.meaning = other.meaning.clone();
        self.pronunciation = other.pronunciation.clone();
        self.note = other.note.clone();
    }
}

impl Display for CardRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} /{}/ {}]", self.term, self.pronunciation, self.meaning)
    }
}

/// 部分解析结果
///
/// `None` 表示响应中没有出现该字段，`Some("")` 表示字段出现但值为空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCard {
    pub term: Option<String>,
    pub meaning: Option<String>,
    pub pronunciation: Option<String>,
    pub note: Option<String>,
}

impl PartialCard {
    /// 识别到的字段数量
    pub fn recognized_count(&self) -> usize {
        [
            self.term.is_some(),
            self.meaning.is_some(),
            self.pronunciation.is_some(),
            self.note.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.recognized_count() == 0
    }

    /// 转换为卡片，缺失字段为空字符串
    pub fn into_record(self) -> CardRecord {
        CardRecord {
            term: self.term.unwrap_or_default(),
            meaning: self.meaning.unwrap_or_default(),
            pronunciation: self.pronunciation.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// 审查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutcome {
    /// 审查是否完成
    pub completed: bool,
    /// 是否发现错误
    pub errors_found: bool,
    /// 模型原始响应
    pub raw_response: Option<String>,
    /// 修正后的卡片（仅供参考，由调用方决定是否应用）
    pub corrected_fields: Option<CardRecord>,
}

/// 批量操作的成功 / 失败计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn merge(&mut self, other: BatchSummary) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

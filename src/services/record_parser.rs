//! 卡片解析 - 业务能力层
//!
//! 把模型返回的字段块文本解析为卡片：
//!
//! ```text
//! CARD 1:
//! WORD: ไป
//! IPA: paj
//! MEANING: to go
//! USAGE: ไปไหน - where are you going?
//! ```
//!
//! 标签不区分大小写，只匹配行首；其他行（包括 `CARD 1:` 编号）忽略。
//! `USAGE` / `MNEMONIC` 在卡片已完整时关闭并输出它，否则卡片继续累积；
//! 新的 `WORD` 或输入结束时再决定去留。不完整的卡片直接丢弃，不报错。

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::card::{CardRecord, PartialCard};

lazy_static! {
    // 行首的字段标签，值为冒号之后的全部内容
    static ref LABEL_LINE: Regex =
        Regex::new(r"(?i)^\s*(WORD|MEANING|IPA|PRONUNCIATION|USAGE|MNEMONIC)\s*:(.*)$")
            .expect("label pattern is valid");
}

/// 可识别的字段标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Word,
    Meaning,
    Pronunciation,
    /// `USAGE` / `MNEMONIC`，卡片的最后一个字段
    Usage,
}

/// 识别一行中的标签和值，值去掉首尾空白
pub fn classify_line(line: &str) -> Option<(Label, &str)> {
    let captures = LABEL_LINE.captures(line)?;
    let label = match captures.get(1)?.as_str().to_ascii_uppercase().as_str() {
        "WORD" => Label::Word,
        "MEANING" => Label::Meaning,
        "IPA" | "PRONUNCIATION" => Label::Pronunciation,
        _ => Label::Usage,
    };
    let value = captures.get(2).map_or("", |m| m.as_str().trim());
    Some((label, value))
}

/// 解析状态
#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Accumulating(CardRecord),
}

/// 逐行驱动的解析状态机
#[derive(Debug, Default)]
pub struct RecordParser {
    state: State,
    emitted: Vec<CardRecord>,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一行文本
    pub fn feed_line(&mut self, line: &str) {
        if let Some((label, value)) = classify_line(line) {
            self.on_label(label, value);
        }
    }

    /// 每个标签对应一次状态转移
    pub fn on_label(&mut self, label: Label, value: &str) {
        match label {
            Label::Word => {
                // 新单词开始：完整的上一张卡片输出，不完整的丢弃
                if let State::Accumulating(pending) = std::mem::take(&mut self.state) {
                    self.emit_if_complete(pending);
                }
                self.state = State::Accumulating(CardRecord::stub(value));
            }
            Label::Meaning => self.pending_mut().meaning = value.to_string(),
            Label::Pronunciation => self.pending_mut().pronunciation = value.to_string(),
            Label::Usage => {
                // 最后一个字段：卡片已完整则关闭并输出，否则继续累积
                let pending = self.pending_mut();
                pending.note = value.to_string();
                if pending.is_complete() {
                    if let State::Accumulating(done) = std::mem::take(&mut self.state) {
                        self.emitted.push(done);
                    }
                }
            }
        }
    }

    /// 是否有正在累积的卡片
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating(_))
    }

    /// 已输出的卡片数量
    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }

    /// 输入结束：完整的未输出卡片也要输出
    pub fn finish(mut self) -> Vec<CardRecord> {
        if let State::Accumulating(pending) = std::mem::take(&mut self.state) {
            self.emit_if_complete(pending);
        }
        self.emitted
    }

    fn pending_mut(&mut self) -> &mut CardRecord {
        if let State::Idle = self.state {
            self.state = State::Accumulating(CardRecord::default());
        }
        match &mut self.state {
            State::Accumulating(pending) => pending,
            State::Idle => unreachable!("state was just set to accumulating"),
        }
    }

    fn emit_if_complete(&mut self, pending: CardRecord) {
        if pending.is_complete() {
            self.emitted.push(pending);
        } else {
            tracing::debug!("丢弃不完整的卡片: {}", pending);
        }
    }
}

/// 解析多张卡片，解析不到时返回空列表
pub fn parse(text: &str) -> Vec<CardRecord> {
    let mut parser = RecordParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// 收集所有识别到的字段（不检查完整性）
///
/// 同一字段出现多次时以最后一次为准
pub fn parse_fields(text: &str) -> PartialCard {
    let mut fields = PartialCard::default();
    for (label, value) in text.lines().filter_map(classify_line) {
        let slot = match label {
            Label::Word => &mut fields.term,
            Label::Meaning => &mut fields.meaning,
            Label::Pronunciation => &mut fields.pronunciation,
            Label::Usage => &mut fields.note,
        };
        *slot = Some(value.to_string());
    }
    fields
}

/// 解析单张卡片，缺失的字段为空字符串
pub fn parse_partial(text: &str) -> CardRecord {
    parse_fields(text).into_record()
}

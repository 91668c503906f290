//! 卡片导出 - 业务能力层
//!
//! 只负责"把选中的卡片写出去"，不关心卡片从哪里来

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, FileError};
use crate::models::card::{BatchSummary, CardRecord};

/// 导出时使用的目标字段名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub term: String,
    pub meaning: String,
    pub pronunciation: String,
    pub note: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            term: "Word".to_string(),
            meaning: "Meaning".to_string(),
            pronunciation: "IPA".to_string(),
            note: "Usage".to_string(),
        }
    }
}

impl FieldMapping {
    /// 按映射把卡片字段转换为 字段名 → 值
    pub fn map_fields(&self, card: &CardRecord) -> BTreeMap<String, String> {
        BTreeMap::from([
            (self.term.clone(), card.term.clone()),
            (self.meaning.clone(), card.meaning.clone()),
            (self.pronunciation.clone(), card.pronunciation.clone()),
            (self.note.clone(), card.note.clone()),
        ])
    }
}

/// 卡片持久化接口
pub trait CardSink {
    fn save(&mut self, card: &CardRecord, mapping: &FieldMapping) -> AppResult<()>;
}

/// 导出所有选中的卡片
///
/// 单张失败只计数，不中断整个批次；未选中的卡片不计入统计
pub fn export_selected<K: CardSink + ?Sized>(
    sink: &mut K,
    cards: &[CardRecord],
    mapping: &FieldMapping,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for card in cards.iter().filter(|card| card.selected) {
        match sink.save(card, mapping) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                warn!("⚠️ 卡片导出失败 {}: {}", card, e);
                summary.failed += 1;
            }
        }
    }

    summary
}

/// 导出文件中的一条笔记
#[derive(Debug, Serialize)]
struct ExportedNote {
    reversed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank: Option<u32>,
    exported_at: String,
    fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct NoteChunk<'a> {
    notes: &'a [ExportedNote],
}

/// 追加写入 TOML 文件的导出实现，每张卡片一个 `[[notes]]` 表
pub struct CardFileSink {
    file_path: String,
}

impl CardFileSink {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }
}

impl CardSink for CardFileSink {
    fn save(&mut self, card: &CardRecord, mapping: &FieldMapping) -> AppResult<()> {
        debug!("导出卡片: {} → {}", card, self.file_path);

        let note = ExportedNote {
            reversed: card.reversed,
            rank: card.rank_hint,
            exported_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            fields: mapping.map_fields(card),
        };
        let chunk = toml::to_string(&NoteChunk {
            notes: std::slice::from_ref(&note),
        })
        .map_err(FileError::from)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|e| AppError::file_write_failed(&self.file_path, e))?;

        writeln!(file, "{}", chunk).map_err(|e| AppError::file_write_failed(&self.file_path, e))?;

        Ok(())
    }
}

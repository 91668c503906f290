//! 词频表对照 - 业务能力层
//!
//! 纯数据查找，不调用模型：词频表里已经有完整信息的单词不需要再请求生成

use crate::models::card::CardRecord;
use crate::models::lookup::{LookupEntry, LookupTable};

/// 按输入顺序为每个单词生成卡片
///
/// 命中词频表的单词预先填好释义、发音、用法和排名；未命中的只有单词本身
pub fn reconcile<S: AsRef<str>>(terms: &[S], table: &LookupTable) -> Vec<CardRecord> {
    terms
        .iter()
        .map(|term| {
            let term = term.as_ref();
            match table.get(term) {
                Some(entry) => from_entry(term, entry),
                None => CardRecord::stub(term),
            }
        })
        .collect()
}

/// 分为完整卡片和需要生成的卡片，两部分都保持原有相对顺序
pub fn split_complete(records: Vec<CardRecord>) -> (Vec<CardRecord>, Vec<CardRecord>) {
    records.into_iter().partition(CardRecord::is_complete)
}

fn from_entry(term: &str, entry: &LookupEntry) -> CardRecord {
    CardRecord {
        term: term.to_string(),
        meaning: entry.meaning.clone().unwrap_or_default(),
        pronunciation: entry.pronunciation.clone().unwrap_or_default(),
        note: entry.note.clone().unwrap_or_default(),
        rank_hint: Some(entry.rank),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_entry() -> LookupEntry {
        LookupEntry {
            rank: 7,
            term: "far".to_string(),
            pronunciation: Some("fɑː".to_string()),
            meaning: Some("at a great distance".to_string()),
            note: Some("far from home".to_string()),
        }
    }

    #[test]
    fn test_hit_copies_entry_fields() {
        let table = LookupTable::from_entries([far_entry()]);
        let records = reconcile(&["far"], &table);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meaning, "at a great distance");
        assert_eq!(records[0].pronunciation, "fɑː");
        assert_eq!(records[0].note, "far from home");
        assert_eq!(records[0].rank_hint, Some(7));
        assert!(records[0].is_complete());
    }

    #[test]
    fn test_miss_is_stub() {
        let records = reconcile(&["zzz"], &LookupTable::new());

        assert_eq!(records, vec![CardRecord::stub("zzz")]);
        assert!(records[0].meaning.is_empty());
        assert!(records[0].pronunciation.is_empty());
        assert_eq!(records[0].rank_hint, None);
    }

    #[test]
    fn test_partial_entry_needs_generation() {
        let entry = LookupEntry {
            meaning: None,
            ..far_entry()
        };
        let table = LookupTable::from_entries([entry]);
        let records = reconcile(&["far".to_string()], &table);

        assert!(!records[0].is_complete());
        assert_eq!(records[0].rank_hint, Some(7));
    }

    #[test]
    fn test_split_preserves_order() {
        let table = LookupTable::from_tsv("a\tə\tone\t\nc\tsiː\tsee\t\n");
        let records = reconcile(&["a", "b", "c", "d"], &table);
        let (complete, missing) = split_complete(records);

        let names = |cards: &[CardRecord]| cards.iter().map(|c| c.term.clone()).collect::<Vec<_>>();
        assert_eq!(names(&complete), vec!["a", "c"]);
        assert_eq!(names(&missing), vec!["b", "d"]);
    }
}

use std::collections::HashMap;
use tracing::warn;

/// 词频表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    /// 排名（从 1 开始，对应文件行号）
    pub rank: u32,
    pub term: String,
    pub pronunciation: Option<String>,
    pub meaning: Option<String>,
    pub note: Option<String>,
}

/// 词频表
///
/// 加载后只读，可以在并发任务之间通过 `Arc` 共享
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, LookupEntry>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从条目构建；同一个单词出现多次时，后出现的覆盖先出现的
    pub fn from_entries(entries: impl IntoIterator<Item = LookupEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// 解析 TSV 文本：`word \t ipa \t meaning \t example`
    ///
    /// 行号即排名；空白的可选字段记为 `None`；单词为空的行跳过，但排名照常递增
    pub fn from_tsv(content: &str) -> Self {
        let mut table = Self::new();

        for (idx, line) in content.lines().enumerate() {
            let mut columns = line.split('\t');
            let term = columns.next().unwrap_or_default().trim();
            if term.is_empty() {
                continue;
            }

            let Some(rank) = rank_for_line(idx) else {
                warn!("⚠️ 第 {} 行超出排名范围，已跳过: {}", idx + 1, term);
                continue;
            };

            table.insert(LookupEntry {
                rank,
                term: term.to_string(),
                pronunciation: optional_column(columns.next()),
                meaning: optional_column(columns.next()),
                note: optional_column(columns.next()),
            });
        }

        table
    }

    pub fn insert(&mut self, entry: LookupEntry) {
        self.entries.insert(entry.term.clone(), entry);
    }

    pub fn get(&self, term: &str) -> Option<&LookupEntry> {
        self.entries.get(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 行索引（从 0 开始）转换为排名，超出 `u32` 范围时为 `None`
fn rank_for_line(idx: usize) -> Option<u32> {
    idx.checked_add(1).and_then(|line| u32::try_from(line).ok())
}

fn optional_column(column: Option<&str>) -> Option<String> {
    column
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tsv_ranks_follow_line_order() {
        let content = "the\tðə\tdefinite article\tthe cat\nbe\tbiː\tto exist\t\n";
        let table = LookupTable::from_tsv(content);

        assert_eq!(table.len(), 2);
        let be = table.get("be").unwrap();
        assert_eq!(be.rank, 2);
        assert_eq!(be.pronunciation.as_deref(), Some("biː"));
        assert_eq!(be.meaning.as_deref(), Some("to exist"));
        assert_eq!(be.note, None);
    }

    #[test]
    fn test_from_tsv_blank_fields_are_none() {
        let table = LookupTable::from_tsv("far\t \t\t\n");
        let far = table.get("far").unwrap();

        assert_eq!(far.pronunciation, None);
        assert_eq!(far.meaning, None);
        assert_eq!(far.note, None);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let content = "far\tfɑː\tdistant\t\nnear\tnɪə\tclose\t\nfar\tfɑːr\tat a distance\t\n";
        let table = LookupTable::from_tsv(content);

        assert_eq!(table.len(), 2);
        let far = table.get("far").unwrap();
        assert_eq!(far.rank, 3);
        assert_eq!(far.meaning.as_deref(), Some("at a distance"));
    }

    #[test]
    fn test_blank_lines_still_advance_rank() {
        let table = LookupTable::from_tsv("one\tw\ta\t\n\nthree\tθ\tc\t\n");
        assert_eq!(table.get("three").unwrap().rank, 3);
    }

    #[test]
    fn test_rank_out_of_range_is_rejected() {
        assert_eq!(rank_for_line(0), Some(1));
        assert_eq!(rank_for_line(u32::MAX as usize - 1), Some(u32::MAX));
        assert_eq!(rank_for_line(u32::MAX as usize), None);
        assert_eq!(rank_for_line(usize::MAX), None);
    }
}

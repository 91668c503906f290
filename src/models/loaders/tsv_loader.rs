use crate::error::{AppError, AppResult};
use crate::models::lookup::LookupTable;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// 从 TSV 文件加载词频表
pub async fn load_lookup_table(path: &Path) -> AppResult<LookupTable> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let table = LookupTable::from_tsv(&content);
    info!("词频表加载完成: {} 个单词 ({})", table.len(), path.display());

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;

    #[tokio::test]
    async fn test_load_lookup_table_from_file() {
        let path = std::env::temp_dir().join(format!("card_generator_freq_{}.tsv", std::process::id()));
        std::fs::write(&path, "ไป\tpaj\tto go\tไปไหน\nมา\tmaa\tto come\t\n").unwrap();

        let table = load_lookup_table(&path).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("มา").unwrap().rank, 2);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_file_is_file_error() {
        let result = load_lookup_table(Path::new("/no/such/frequency.tsv")).await;
        assert!(matches!(
            result,
            Err(AppError::File(FileError::ReadFailed { .. }))
        ));
    }
}

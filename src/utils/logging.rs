//! 日志辅助函数

/// 截断长文本用于日志显示（按字符计数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("สวัสดีครับ", 3), "สวั...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}

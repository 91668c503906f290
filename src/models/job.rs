use serde::{Deserialize, Serialize};

/// 一个卡片生成任务（对应一个 TOML 文件）
///
/// ```toml
/// name = "泰语 - 出行"
/// language = "Thai"
/// native_language = "English"
/// topic = "travel"
/// count = 10
/// known_terms = ["ไป", "มา"]
/// words = ["รถ", "เรือ"]
/// lint = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardJob {
    pub name: String,
    /// 学习的语言
    pub language: String,
    /// 母语（释义使用的语言）
    #[serde(default = "default_native_language")]
    pub native_language: String,
    /// 按主题推荐新词
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// 推荐数量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// 已经学过的单词
    #[serde(default)]
    pub known_terms: Vec<String>,
    /// 直接指定的单词
    #[serde(default)]
    pub words: Vec<String>,
    /// 是否对生成结果进行审查
    #[serde(default)]
    pub lint: bool,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

fn default_native_language() -> String {
    "English".to_string()
}

impl CardJob {
    /// 推荐数量的默认值
    pub const DEFAULT_SUGGESTION_COUNT: usize = 10;

    pub fn suggestion_count(&self) -> usize {
        self.count.unwrap_or(Self::DEFAULT_SUGGESTION_COUNT)
    }
}

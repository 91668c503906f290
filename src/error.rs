use thiserror::Error;

use crate::models::card::CardRecord;

/// 应用程序错误类型
///
/// 所有错误在调用处都可以恢复，不应该导致进程退出
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 调用错误（传输层失败，原样上报，不重试）
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 解析错误（响应格式正确，但没有识别出任何记录）
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 参数校验错误（在调用模型之前拒绝）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败 (模型: {model}): {source}")]
    RequestBuildFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 没有解析出任何完整卡片
    #[error("无法从 {stage} 的响应中解析出卡片 (响应长度: {response_len})")]
    NoCompleteRecords { stage: String, response_len: usize },
    /// 审查响应中没有任何可识别字段
    #[error("审查响应格式错误，未识别到任何字段: {response}")]
    MalformedLintResponse { response: String },
    /// 修改响应中没有任何可识别字段
    #[error("修改响应格式错误，未识别到任何字段: {response}")]
    MalformedEditResponse { response: String },
}

/// 参数校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 修改指令为空
    #[error("修改指令不能为空")]
    EmptyInstruction,
    /// 修改指令过长
    #[error("修改指令过长: {len} 个字符 (最多 {max} 个)")]
    InstructionTooLong { len: usize, max: usize },
    /// 请求的单词数量无效
    #[error("单词数量 {count} 无效 (范围 1-{max})")]
    InvalidSuggestionCount { count: usize, max: usize },
    /// 主题为空
    #[error("主题不能为空")]
    EmptyTopic,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("TOML 序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建"无法解析"错误
    pub fn no_records(stage: impl Into<String>, response: &str) -> Self {
        AppError::Parse(ParseError::NoCompleteRecords {
            stage: stage.into(),
            response_len: response.chars().count(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为传输层错误
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Llm(_))
    }
}

/// 卡片生成流程错误
///
/// 后续阶段失败时，已经从词频表得到的完整卡片不会被丢弃，
/// 通过 `recovered` 交还给调用方
#[derive(Debug, Error)]
#[error("卡片生成失败 (已保留 {} 张完整卡片): {source}", .recovered.len())]
pub struct PipelineError {
    pub recovered: Vec<CardRecord>,
    #[source]
    pub source: AppError,
}

impl PipelineError {
    pub fn new(recovered: Vec<CardRecord>, source: AppError) -> Self {
        Self { recovered, source }
    }
}

impl From<AppError> for PipelineError {
    fn from(source: AppError) -> Self {
        Self::new(Vec::new(), source)
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

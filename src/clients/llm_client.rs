//! LLM API 客户端
//!
//! 封装所有与 LLM API 相关的调用逻辑
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（自定义 API 端点和模型）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{Config, ModelConfig};
use crate::error::{AppError, AppResult, LlmError};

/// 模型调用能力
///
/// 一次调用对应一次请求 / 响应，不重试，超时由实现自行负责
#[async_trait]
pub trait PromptSender: Send + Sync {
    async fn send(&self, prompt: &str, config: &ModelConfig) -> AppResult<String>;
}

#[async_trait]
impl<T: PromptSender + ?Sized> PromptSender for std::sync::Arc<T> {
    async fn send(&self, prompt: &str, config: &ModelConfig) -> AppResult<String> {
        (**self).send(prompt, config).await
    }
}

/// 系统消息
const SYSTEM_MESSAGE: &str = "You are a meticulous bilingual lexicographer who writes \
    vocabulary flashcards. Always answer in the exact plain-text format requested, \
    without markdown.";

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
        }
    }

    /// 发送聊天请求
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `model_config`: 模型、推理强度、服务等级
    ///
    /// # 返回
    /// 返回 LLM 的响应内容
    pub async fn chat(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        model_config: &ModelConfig,
    ) -> AppResult<String> {
        let model = &model_config.model;
        debug!(
            "调用 LLM API，模型: {}, 强度: {:?}, 等级: {}",
            model,
            model_config.effort,
            model_config.tier.as_str()
        );
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let build_failed = |e: async_openai::error::OpenAIError| {
            AppError::Llm(LlmError::RequestBuildFailed {
                model: model.clone(),
                source: Box::new(e),
            })
        };

        // 构建消息列表
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(model_config.effort.temperature())
            .max_completion_tokens(model_config.effort.max_tokens())
            .build()
            .map_err(build_failed)?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(model.clone(), e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: model.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl PromptSender for LlmClient {
    async fn send(&self, prompt: &str, config: &ModelConfig) -> AppResult<String> {
        self.chat(prompt, Some(SYSTEM_MESSAGE), config).await
    }
}

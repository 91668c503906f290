pub mod llm_client;

pub use llm_client::{LlmClient, PromptSender};

#[cfg(test)]
pub(crate) mod scripted {
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::PromptSender;
    use crate::config::ModelConfig;
    use crate::error::{AppError, AppResult};

    /// 按顺序返回预设响应的测试替身，同时记录收到的提示词
    pub(crate) struct ScriptedSender {
        replies: Mutex<VecDeque<AppResult<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedSender {
        pub(crate) fn new(replies: Vec<AppResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn replying(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }

        pub(crate) fn failing() -> Self {
            Self::new(vec![Err(transport_error())])
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    pub(crate) fn transport_error() -> AppError {
        AppError::llm_api_failed(
            "test-model",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        )
    }

    #[async_trait]
    impl PromptSender for ScriptedSender {
        async fn send(&self, prompt: &str, _config: &ModelConfig) -> AppResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}

//! # Card Generator
//!
//! 借助大语言模型批量生成语言学习卡片的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有模型连接，只暴露"发送提示词、取回文本"的能力
//! - `PromptSender` - 模型调用接口，测试中可以替换
//! - `LlmClient` - 基于 OpenAI 兼容接口的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，彼此独立
//! - `record_parser` - 把模型的自由文本解析成卡片
//! - `lookup_reconciler` - 用本地词频表补全卡片
//! - `VocabSuggester` - 按主题推荐新词
//! - `CardEditor` - 按用户指令修改单张卡片
//! - `CardSink` - 导出选中的卡片
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一组单词"变成卡片的完整流程
//! - `CardPipeline` - 对照词频表 → 请求生成 → 合并
//! - `LintCycle` - 逐张审查并给出修正
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量任务处理器，管理资源和并发
//! - `orchestrator/job_processor` - 单个任务处理器
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmClient, PromptSender};
pub use config::{Config, Effort, ModelConfig, Tier};
pub use error::{AppError, AppResult, PipelineError};
pub use models::{CardJob, CardRecord, LookupTable};
pub use orchestrator::{App, ProcessingStats};
pub use workflow::{CardPipeline, LintCycle};

//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量任务处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载任务（Vec<CardJob>）
//! - 控制并发数量（Semaphore）
//! - 持有共享资源（CardPipeline、导出目标）
//! - 输出全局统计信息
//!
//! ### `job_processor` - 单个任务处理器
//! - 收集单词（指定 + 推荐）
//! - 生成、审查、导出卡片
//! - 输出单个任务的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<CardJob>)
//!     ↓
//! job_processor (处理单个 CardJob)
//!     ↓
//! workflow::CardPipeline / LintCycle (处理一组单词 / 单张卡片)
//!     ↓
//! services (能力层：parse / reconcile / suggest / edit / export)
//!     ↓
//! clients (基础设施：PromptSender)
//! ```

pub mod batch_processor;
pub mod job_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats, SharedSink};
pub use job_processor::{process_job, JobStats};

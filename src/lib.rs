//! # CyberOps Console
//!
//! 安全扫描文件上传 / 分析流程控制台
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有报告字节，只对外暴露引用
//! - `ArtifactStore` - 发布 / 解析 / 释放报告引用
//!
//! ### ② 业务能力层（Services + Clients）
//! - `services/` - 描述"我能做什么"，不持有状态
//! - `AcceptancePolicy` - 文件接受规则（扩展名 + 数量上限）
//! - `field_rules` - 表单字段校验
//! - `report_renderer` / `ReportSaver` - 生成并保存 PDF 报告
//! - `clients/` - `AnalysisTransport` 的模拟实现和 HTTP 实现
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次"选择 → 提交 → 下载 → 重置"的完整流程
//! - `WorkflowController` - 状态机与输入门控
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，加载输入并驱动控制器
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{AnalysisRequest, AnalysisTransport, HttpAnalysisClient, MockAnalysisClient};
pub use config::{Config, TransportKind, WorkflowMode};
pub use error::{AppError, AppResult, SubmissionBlocker, TransportError, WorkflowError, WorkflowResult};
pub use infrastructure::{ArtifactHandle, ArtifactStore};
pub use models::{Artifact, CandidateFile, FieldId, FormFields};
pub use orchestrator::App;
pub use services::{AcceptancePolicy, ReportSaver, RuleSet};
pub use workflow::{AddOutcome, PendingSubmission, WorkflowController, WorkflowPhase, WorkflowState};

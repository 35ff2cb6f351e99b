//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 负责一次完整运行的调度：初始化、加载输入、提交、下载、收尾。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! workflow::WorkflowController (状态机 idle → submitting → completed)
//!     ↓
//! clients (传输：mock / direct / session)  +  services (接受规则 / 字段校验 / 渲染 / 保存)
//!     ↓
//! infrastructure (ArtifactStore，持有报告字节)
//! ```

pub mod app;

pub use app::App;

//! 分析服务传输接口
//!
//! 控制器只依赖这个抽象，一步式 / 两步式 / 模拟实现都可以替换

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::{Artifact, CandidateFile, FormSubmission};

/// 提交给分析服务的内容（提交时的快照）
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    Files(Vec<CandidateFile>),
    Form(FormSubmission),
}

impl AnalysisRequest {
    /// 日志用的简短描述
    pub fn summary(&self) -> String {
        match self {
            AnalysisRequest::Files(files) => format!("{} 个文件", files.len()),
            AnalysisRequest::Form(form) => format!("表单 ({})", form.company_name),
        }
    }
}

/// 分析服务传输层
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// 提交并等待分析结果
    ///
    /// 每次调用只会返回一次：成功时返回报告，失败时返回原因
    async fn submit_for_analysis(&self, request: &AnalysisRequest) -> Result<Artifact, TransportError>;

    /// 传输方式名称（仅用于日志）
    fn name(&self) -> &'static str;
}

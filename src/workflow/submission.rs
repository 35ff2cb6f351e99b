//! 提交票据与添加结果

use crate::clients::AnalysisRequest;
use crate::error::WorkflowError;

/// 进行中的提交
///
/// 由 `begin_submit` 发出，只能被 `complete_submission` 消费一次，
/// 保证每次提交恰好有一个结果
#[derive(Debug)]
pub struct PendingSubmission {
    pub(crate) generation: u64,
    request: AnalysisRequest,
}

impl PendingSubmission {
    pub(crate) fn new(generation: u64, request: AnalysisRequest) -> Self {
        Self { generation, request }
    }

    /// 提交时刻的输入快照
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }
}

/// `add_files` 的结果
#[derive(Debug, Default)]
pub struct AddOutcome {
    /// 新加入的文件数
    pub added: usize,
    /// 因 (name, size) 重复而跳过的文件数
    pub duplicates: usize,
    /// 需要提示用户的警告（不支持的类型、数量超限）
    pub warnings: Vec<WorkflowError>,
}

impl AddOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

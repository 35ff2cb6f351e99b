//! 工作流状态

use std::fmt::Display;

use crate::infrastructure::ArtifactHandle;

/// 工作流阶段（不带数据，用于展示和错误信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Submitting,
    Completed,
}

impl Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::Submitting => "submitting",
            WorkflowPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// 工作流状态
///
/// 只有 `Idle` 时允许修改文件和字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    /// 等待输入
    #[default]
    Idle,
    /// 正在提交，`generation` 对应当前有效的提交票据
    Submitting { generation: u64 },
    /// 分析完成，报告可通过引用读取
    Completed { report: ArtifactHandle },
}

impl WorkflowState {
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            WorkflowState::Idle => WorkflowPhase::Idle,
            WorkflowState::Submitting { .. } => WorkflowPhase::Submitting,
            WorkflowState::Completed { .. } => WorkflowPhase::Completed,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }
}

//! 报告存储 - 基础设施层
//!
//! 持有分析产出的报告字节，只对外暴露临时引用（类似 object URL）

use std::collections::HashMap;
use std::fmt::Display;

use tracing::debug;
use uuid::Uuid;

use crate::models::Artifact;

/// 报告的临时引用
///
/// 形如 `blob:cyberops/<uuid>`，释放后即失效
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(String);

impl ArtifactHandle {
    fn generate() -> Self {
        Self(format!("blob:cyberops/{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ArtifactHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 报告存储
///
/// 职责：
/// - 唯一持有报告字节
/// - 发布 / 解析 / 释放引用
/// - 不关心工作流状态
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: HashMap<ArtifactHandle, Artifact>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存报告并返回新的引用
    pub fn publish(&mut self, artifact: Artifact) -> ArtifactHandle {
        let handle = ArtifactHandle::generate();
        debug!("发布报告引用: {} ({} 字节)", handle, artifact.len());
        self.artifacts.insert(handle.clone(), artifact);
        handle
    }

    /// 通过引用读取报告，不消耗引用
    pub fn resolve(&self, handle: &ArtifactHandle) -> Option<&Artifact> {
        self.artifacts.get(handle)
    }

    /// 释放引用
    ///
    /// # 返回
    /// 引用存在时返回 true
    pub fn revoke(&mut self, handle: &ArtifactHandle) -> bool {
        let removed = self.artifacts.remove(handle).is_some();
        if removed {
            debug!("释放报告引用: {}", handle);
        }
        removed
    }

    /// 当前仍然有效的引用数
    pub fn live_count(&self) -> usize {
        self.artifacts.len()
    }
}

//! 报告保存服务 - 业务能力层
//!
//! 只负责"把报告写到磁盘"能力，不关心流程

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::config::Config;
use crate::models::Artifact;

/// 报告保存服务
///
/// 职责：
/// - 以固定文件名保存报告
/// - 重复保存时覆盖同一文件
/// - 不持有报告内容
pub struct ReportSaver {
    output_dir: PathBuf,
    file_name: String,
}

impl ReportSaver {
    /// 创建新的报告保存服务
    pub fn new(config: &Config) -> Self {
        Self::with_path(&config.output_dir, &config.report_file_name)
    }

    /// 使用自定义目录和文件名创建
    pub fn with_path(output_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// 报告的目标路径
    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    /// 保存报告
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("无法创建目录: {}", self.output_dir.display()))?;

        let path = self.target_path();
        debug!("保存报告: {} ({} 字节)", path.display(), artifact.len());

        fs::write(&path, &artifact.bytes)
            .await
            .with_context(|| format!("无法写入报告: {}", path.display()))?;

        Ok(path)
    }
}

//! 模拟分析客户端
//!
//! 固定延时后在本地生成占位 PDF，不发起任何网络请求
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::clients::transport::{AnalysisRequest, AnalysisTransport};
use crate::config::Config;
use crate::error::TransportError;
use crate::models::Artifact;
use crate::services::report_renderer;

/// 模拟分析客户端
pub struct MockAnalysisClient {
    delay: Duration,
    report_file_name: String,
}

impl MockAnalysisClient {
    /// 创建新的模拟客户端
    pub fn new(config: &Config) -> Self {
        Self::with_delay(config.mock_delay(), &config.report_file_name)
    }

    /// 使用自定义延时创建
    pub fn with_delay(delay: Duration, report_file_name: impl Into<String>) -> Self {
        Self {
            delay,
            report_file_name: report_file_name.into(),
        }
    }
}

#[async_trait]
impl AnalysisTransport for MockAnalysisClient {
    async fn submit_for_analysis(&self, request: &AnalysisRequest) -> Result<Artifact, TransportError> {
        info!(
            "⏳ 模拟上传与分析 ({})，预计 {} 秒...",
            request.summary(),
            self.delay.as_secs()
        );
        sleep(self.delay).await;

        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let bytes = match request {
            AnalysisRequest::Files(files) => report_renderer::placeholder_for_files(files, &generated_at),
            AnalysisRequest::Form(form) => report_renderer::placeholder_for_form(form, &generated_at),
        };

        info!("✓ 模拟分析完成，报告已生成");
        Ok(Artifact::pdf(bytes, self.report_file_name.clone()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

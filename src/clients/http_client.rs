/// 分析服务 HTTP 客户端
///
/// 封装所有与分析服务端点的交互
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::transport::{AnalysisRequest, AnalysisTransport};
use crate::config::{Config, TransportKind};
use crate::error::TransportError;
use crate::models::{
    AnalyzeReply, Artifact, CandidateFile, FormSubmission, Report, ScanStatus, SessionState, SessionStatus,
    StatusResponse, SubmissionResponse, UploadReply,
};
use crate::services::report_renderer;

/// 文件上传协议
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProtocol {
    /// `POST /api/v1/analyze-files`，响应体即报告
    Direct,
    /// `POST /upload` → `POST /analyze/{id}` → 轮询 `/status/{id}` → `GET /download/{id}`
    Session,
}

/// 服务端错误响应体（会话接口用 `error`，表单接口用 `detail`）
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        self.error.or(self.detail)
    }
}

/// 分析服务 HTTP 客户端
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    protocol: UploadProtocol,
    poll_interval: Duration,
    timeout: Duration,
    report_file_name: String,
}

impl HttpAnalysisClient {
    /// 创建新的 HTTP 客户端
    pub fn new(config: &Config) -> Self {
        let protocol = match config.transport {
            TransportKind::Session => UploadProtocol::Session,
            _ => UploadProtocol::Direct,
        };
        Self::with_options(
            &config.api_base_url,
            protocol,
            config.poll_interval(),
            config.analysis_timeout(),
            &config.report_file_name,
        )
    }

    pub fn with_options(
        base_url: &str,
        protocol: UploadProtocol,
        poll_interval: Duration,
        timeout: Duration,
        report_file_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            protocol,
            poll_interval,
            timeout,
            report_file_name: report_file_name.into(),
        }
    }

    pub fn protocol(&self) -> UploadProtocol {
        self.protocol
    }

    /// 拼接端点地址
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ========== 一步式 ==========

    async fn submit_direct(&self, files: &[CandidateFile]) -> Result<Artifact, TransportError> {
        let url = self.endpoint("api/v1/analyze-files");
        let form = build_multipart(files, "files").await?;

        info!("📤 正在提交 {} 个文件到分析服务...", files.len());
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| request_error(&url, source))?;

        let bytes = read_bytes_reply(&url, response).await?;
        info!("✓ 分析完成，收到报告 ({} 字节)", bytes.len());
        Ok(Artifact::pdf(bytes, self.report_file_name.clone()))
    }

    // ========== 两步式 ==========

    async fn submit_session(&self, files: &[CandidateFile]) -> Result<Artifact, TransportError> {
        let upload_url = self.endpoint("upload");
        let form = build_multipart(files, "files[]").await?;

        info!("📤 正在上传 {} 个文件...", files.len());
        let response = self
            .client
            .post(&upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| request_error(&upload_url, source))?;
        let reply: UploadReply = read_json_reply(&upload_url, response).await?;
        let session_id = interpret_upload_reply(&upload_url, reply)?;
        info!("✓ 文件上传成功，会话ID: {}", session_id);

        let analyze_url = self.endpoint(&format!("analyze/{}", session_id));
        let response = self
            .client
            .post(&analyze_url)
            .send()
            .await
            .map_err(|source| request_error(&analyze_url, source))?;
        let reply: AnalyzeReply = read_json_reply(&analyze_url, response).await?;
        interpret_analyze_reply(&analyze_url, reply)?;
        info!("🔍 分析已启动，等待结果...");

        let id = session_id.as_str();
        self.poll_until(id, move || self.check_session(id)).await?;

        let download_url = self.endpoint(&format!("download/{}", session_id));
        let response = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(|source| request_error(&download_url, source))?;
        let bytes = read_bytes_reply(&download_url, response).await?;
        info!("✓ 报告下载完成 ({} 字节)", bytes.len());
        Ok(Artifact::pdf(bytes, self.report_file_name.clone()))
    }

    async fn check_session(&self, session_id: &str) -> Result<bool, TransportError> {
        let url = self.endpoint(&format!("status/{}", session_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| request_error(&url, source))?;
        let status: SessionStatus = read_json_reply(&url, response).await?;
        if let Some(progress) = status.progress {
            debug!("会话 {} 进度: {}%", session_id, progress);
        }
        interpret_session_status(session_id, &status)
    }

    // ========== 表单 ==========

    async fn submit_form(&self, form: &FormSubmission) -> Result<Artifact, TransportError> {
        let url = self.endpoint("api/v1/submit-form");
        info!("📤 正在提交表单 ({})...", form.company_name);
        let response = self
            .client
            .post(&url)
            .json(form)
            .send()
            .await
            .map_err(|source| request_error(&url, source))?;
        let reply: SubmissionResponse = read_json_reply(&url, response).await?;
        if reply.scan_id.is_empty() {
            return Err(TransportError::MissingSession { endpoint: url });
        }
        let scan_id = reply.scan_id;
        info!("✓ 表单已提交，分析ID: {}", scan_id);

        let id = scan_id.as_str();
        self.poll_until(id, move || self.check_scan(id)).await?;

        let report_url = self.endpoint(&format!("api/v1/report/{}", scan_id));
        let response = self
            .client
            .get(&report_url)
            .send()
            .await
            .map_err(|source| request_error(&report_url, source))?;
        let report: Report = read_json_reply(&report_url, response).await?;
        info!(
            "✓ 报告已生成，发现 {} 个漏洞",
            report.vulnerabilities.len()
        );

        let bytes = report_renderer::render_pdf("Relatório de Segurança", &report.to_lines());
        Ok(Artifact::pdf(bytes, self.report_file_name.clone()))
    }

    async fn check_scan(&self, scan_id: &str) -> Result<bool, TransportError> {
        let url = self.endpoint(&format!("api/v1/status/{}", scan_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| request_error(&url, source))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TransportError::ScanNotFound {
                scan_id: scan_id.to_string(),
            });
        }
        let status: StatusResponse = read_json_reply(&url, response).await?;
        interpret_scan_status(scan_id, status.status)
    }

    // ========== 辅助方法 ==========

    /// 按固定间隔轮询，直到 `check` 返回 true、出错或超时
    async fn poll_until<F, Fut>(&self, session_id: &str, mut check: F) -> Result<(), TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, TransportError>>,
    {
        let started = Instant::now();
        loop {
            if check().await? {
                return Ok(());
            }
            if started.elapsed() >= self.timeout {
                warn!("⚠️ 等待分析结果超时: {}", session_id);
                return Err(TransportError::Timeout {
                    session_id: session_id.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisClient {
    async fn submit_for_analysis(&self, request: &AnalysisRequest) -> Result<Artifact, TransportError> {
        match (request, self.protocol) {
            (AnalysisRequest::Files(files), UploadProtocol::Direct) => self.submit_direct(files).await,
            (AnalysisRequest::Files(files), UploadProtocol::Session) => self.submit_session(files).await,
            (AnalysisRequest::Form(form), _) => self.submit_form(form).await,
        }
    }

    fn name(&self) -> &'static str {
        match self.protocol {
            UploadProtocol::Direct => "http-direct",
            UploadProtocol::Session => "http-session",
        }
    }
}

/// 构建 multipart 表单，每个文件一个同名字段
async fn build_multipart(files: &[CandidateFile], field: &'static str) -> Result<Form, TransportError> {
    let contents = futures::future::try_join_all(files.iter().map(|f| f.read_bytes())).await?;

    let form = files
        .iter()
        .zip(contents)
        .fold(Form::new(), |form, (file, bytes)| {
            form.part(field, Part::bytes(bytes).file_name(file.name().to_string()))
        });
    Ok(form)
}

fn request_error(endpoint: &str, source: reqwest::Error) -> TransportError {
    TransportError::Request {
        endpoint: endpoint.to_string(),
        source,
    }
}

/// 读取 JSON 响应；非 2xx 且响应体带 error/detail 时视为服务端拒绝
async fn read_json_reply<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, TransportError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| request_error(endpoint, source))?;
    parse_json_reply(endpoint, status, &body)
}

fn parse_json_reply<T: DeserializeOwned>(endpoint: &str, status: StatusCode, body: &str) -> Result<T, TransportError> {
    if !status.is_success() {
        return Err(rejection(endpoint, status, body.as_bytes()));
    }
    serde_json::from_str(body).map_err(|source| TransportError::Json {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// 读取二进制响应（报告）
async fn read_bytes_reply(endpoint: &str, response: Response) -> Result<Vec<u8>, TransportError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| request_error(endpoint, source))?;
    if status.is_success() {
        Ok(bytes.to_vec())
    } else {
        Err(rejection(endpoint, status, &bytes))
    }
}

fn rejection(endpoint: &str, status: StatusCode, body: &[u8]) -> TransportError {
    match serde_json::from_slice::<ErrorBody>(body).ok().and_then(ErrorBody::message) {
        Some(message) => TransportError::Rejected {
            endpoint: endpoint.to_string(),
            message,
        },
        None => TransportError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        },
    }
}

/// 从上传响应中取出会话ID（原样透传）
fn interpret_upload_reply(endpoint: &str, reply: UploadReply) -> Result<String, TransportError> {
    if let Some(message) = reply.error {
        return Err(TransportError::Rejected {
            endpoint: endpoint.to_string(),
            message,
        });
    }
    debug!("服务端已接收文件: {:?}", reply.uploaded_files);
    match reply.session_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(TransportError::MissingSession {
            endpoint: endpoint.to_string(),
        }),
    }
}

fn interpret_analyze_reply(endpoint: &str, reply: AnalyzeReply) -> Result<(), TransportError> {
    if let Some(message) = reply.error {
        return Err(TransportError::Rejected {
            endpoint: endpoint.to_string(),
            message,
        });
    }
    if let Some(message) = reply.message {
        debug!("服务端: {}", message);
    }
    Ok(())
}

/// 会话状态：完成 → true，进行中 → false，其他 → 错误
fn interpret_session_status(session_id: &str, status: &SessionStatus) -> Result<bool, TransportError> {
    match status.status {
        SessionState::Completed => Ok(true),
        SessionState::Starting | SessionState::Running => Ok(false),
        SessionState::Error => Err(TransportError::AnalysisFailed {
            session_id: session_id.to_string(),
            message: status
                .error
                .clone()
                .unwrap_or_else(|| "未知错误".to_string()),
        }),
        SessionState::NotFound => Err(TransportError::ScanNotFound {
            scan_id: session_id.to_string(),
        }),
    }
}

fn interpret_scan_status(scan_id: &str, status: ScanStatus) -> Result<bool, TransportError> {
    match status {
        ScanStatus::Completed => Ok(true),
        ScanStatus::Pending | ScanStatus::InProgress => Ok(false),
        ScanStatus::NotFound => Err(TransportError::ScanNotFound {
            scan_id: scan_id.to_string(),
        }),
    }
}

//! 分析服务的响应结构
//!
//! 与后端 JSON 一一对应，只做反序列化，不包含业务逻辑

use serde::{Deserialize, Serialize};

/// 表单提交响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub scan_id: String,
    #[serde(default)]
    pub message: String,
}

/// 表单分析的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Concluído")]
    Completed,
    #[serde(rename = "Não Encontrado")]
    NotFound,
}

/// 状态查询响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub scan_id: String,
    pub status: ScanStatus,
}

/// 漏洞严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "Crítica")]
    Critical,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Baixa")]
    Low,
    #[serde(rename = "Informativa")]
    Informational,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Crítica",
            Severity::High => "Alta",
            Severity::Medium => "Média",
            Severity::Low => "Baixa",
            Severity::Informational => "Informativa",
        }
    }
}

/// 单个漏洞
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub scan_type: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

/// 最终报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub scan_id: String,
    pub company_name: String,
    pub target_ip: String,
    pub target_url: String,
    #[serde(default = "default_report_status")]
    pub status: String,
    pub summary: String,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

fn default_report_status() -> String {
    "Concluído".to_string()
}

impl Report {
    /// 渲染为报告正文行
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Análise: {}", self.scan_id),
            format!("Empresa: {}", self.company_name),
            format!("IP alvo: {}", self.target_ip),
            format!("URL alvo: {}", self.target_url),
            format!("Status: {}", self.status),
            String::new(),
            format!("Resumo: {}", self.summary),
            String::new(),
            format!("Vulnerabilidades encontradas: {}", self.vulnerabilities.len()),
        ];
        for (i, vuln) in self.vulnerabilities.iter().enumerate() {
            lines.push(format!(
                "{}. [{}] {}: {}",
                i + 1,
                vuln.severity.label(),
                vuln.scan_type,
                vuln.description
            ));
            lines.push(format!("   Recomendação: {}", vuln.recommendation));
        }
        lines
    }
}

/// 两步式上传的响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReply {
    pub session_id: Option<String>,
    #[serde(default)]
    pub uploaded_files: Vec<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// 触发两步式分析的响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeReply {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub error: Option<String>,
}

/// 两步式会话的分析状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Starting,
    Running,
    Completed,
    Error,
    NotFound,
}

/// 会话状态查询响应
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub status: SessionState,
    pub progress: Option<u8>,
    pub error: Option<String>,
}

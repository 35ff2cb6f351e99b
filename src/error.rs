use thiserror::Error;

use crate::models::FieldId;
use crate::workflow::WorkflowPhase;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 工作流错误
    #[error("工作流错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 传输层错误
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 工作流控制器错误
///
/// 所有条件都在边界处转换为用户可见的提示，不会导致进程退出
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 文件类型不在允许列表中
    #[error("不支持的文件类型 .{extension} ({name})，请使用: {allowed}")]
    UnsupportedFileType {
        name: String,
        extension: String,
        allowed: String,
    },
    /// 超过最大文件数量，多余文件已丢弃
    #[error("最多只能提交 {max} 个文件，已丢弃 {dropped} 个")]
    TooManyFiles { max: usize, dropped: usize },
    /// 提交前置条件不满足
    #[error("无法提交: {0}")]
    InvalidSubmission(SubmissionBlocker),
    /// 传输失败，已回到 idle
    #[error("提交失败: {0}")]
    SubmissionFailed(#[source] TransportError),
    /// 索引超出范围
    #[error("索引 {index} 超出范围 (共 {len} 个文件)")]
    IndexOutOfRange { index: usize, len: usize },
    /// 已有提交正在进行
    #[error("已有分析正在进行，请等待完成")]
    SubmissionInProgress,
    /// 当前状态不允许修改输入
    #[error("当前状态 ({phase}) 不允许修改输入")]
    InputsLocked { phase: WorkflowPhase },
    /// 提交票据已过期（提交期间执行了 reset）
    #[error("提交已被重置，结果已丢弃")]
    StaleSubmission,
}

/// 阻止提交的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionBlocker {
    /// 没有候选文件
    NoFiles,
    /// 字段为空
    EmptyField(FieldId),
    /// 字段校验未通过
    InvalidField(FieldId),
}

impl std::fmt::Display for SubmissionBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionBlocker::NoFiles => write!(f, "请至少选择一个文件进行分析"),
            SubmissionBlocker::EmptyField(field) => write!(f, "字段 {} 不能为空", field),
            SubmissionBlocker::InvalidField(field) => write!(f, "字段 {} 格式不正确", field),
        }
    }
}

/// 分析服务传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态码
    #[error("服务端返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 服务端在响应体中报告错误
    #[error("服务端拒绝请求 ({endpoint}): {message}")]
    Rejected { endpoint: String, message: String },
    /// 响应中缺少会话标识
    #[error("响应中缺少会话ID ({endpoint})")]
    MissingSession { endpoint: String },
    /// 分析过程失败
    #[error("分析失败 (会话 {session_id}): {message}")]
    AnalysisFailed { session_id: String, message: String },
    /// 服务端找不到该分析
    #[error("找不到分析记录: {scan_id}")]
    ScanNotFound { scan_id: String },
    /// 等待分析结果超时
    #[error("等待分析结果超时 (会话 {session_id}, 已等待 {waited_secs} 秒)")]
    Timeout { session_id: String, waited_secs: u64 },
    /// 候选文件内容读取失败
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    Json {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// API 地址无法解析
    #[error("API_BASE_URL 无法解析: '{value}'")]
    InvalidBaseUrl { value: String },
    /// 报告文件名为空
    #[error("REPORT_FILE_NAME 不能为空")]
    EmptyReportFileName,
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 工作流结果类型
pub type WorkflowResult<T> = Result<T, WorkflowError>;

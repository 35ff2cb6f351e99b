use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::services::RuleSet;

/// 工作流输入形态
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowMode {
    /// 上传扫描/日志文件
    Files,
    /// 填写结构化表单
    Form,
}

impl FromStr for WorkflowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" | "file" | "upload" => Ok(WorkflowMode::Files),
            "form" => Ok(WorkflowMode::Form),
            other => Err(format!("未知的工作流模式: {}", other)),
        }
    }
}

/// 分析服务传输方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// 本地模拟：固定延时后生成占位报告
    Mock,
    /// 一步式：提交文件并直接返回报告
    Direct,
    /// 两步式：先上传获得会话ID，再触发分析
    Session,
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(TransportKind::Mock),
            "direct" | "one-step" => Ok(TransportKind::Direct),
            "session" | "two-step" => Ok(TransportKind::Session),
            other => Err(format!("未知的传输方式: {}", other)),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 工作流模式（文件 / 表单）
    pub workflow_mode: WorkflowMode,
    /// 文件接受规则
    pub file_rules: RuleSet,
    /// 最大文件数量，0 表示不限制
    pub max_files: usize,
    /// 传输方式
    pub transport: TransportKind,
    /// 分析服务地址
    pub api_base_url: String,
    /// 模拟分析的延时（秒）
    pub mock_delay_secs: u64,
    /// 轮询分析状态的间隔（秒）
    pub poll_interval_secs: u64,
    /// 等待分析完成的最长时间（秒）
    pub analysis_timeout_secs: u64,
    /// 待上传文件所在目录
    pub input_folder: String,
    /// 表单数据文件
    pub form_toml: String,
    /// 报告保存目录
    pub output_dir: String,
    /// 报告文件名
    pub report_file_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflow_mode: WorkflowMode::Files,
            file_rules: RuleSet::Scan,
            max_files: 10,
            transport: TransportKind::Mock,
            api_base_url: "http://localhost:5000".to_string(),
            mock_delay_secs: 5,
            poll_interval_secs: 2,
            analysis_timeout_secs: 600,
            input_folder: "input_files".to_string(),
            form_toml: "form.toml".to_string(),
            output_dir: "reports".to_string(),
            report_file_name: "relatorio-de-seguranca.pdf".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，无法解析的值回退到默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            workflow_mode: lookup("WORKFLOW_MODE").and_then(|v| v.parse().ok()).unwrap_or(default.workflow_mode),
            file_rules: lookup("FILE_RULES").and_then(|v| v.parse().ok()).unwrap_or(default.file_rules),
            max_files: lookup("MAX_FILES").and_then(|v| v.parse().ok()).unwrap_or(default.max_files),
            transport: lookup("ANALYSIS_TRANSPORT").and_then(|v| v.parse().ok()).unwrap_or(default.transport),
            api_base_url: lookup("API_BASE_URL").unwrap_or(default.api_base_url),
            mock_delay_secs: lookup("MOCK_DELAY_SECS").and_then(|v| v.parse().ok()).unwrap_or(default.mock_delay_secs),
            poll_interval_secs: lookup("POLL_INTERVAL_SECS").and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_secs),
            analysis_timeout_secs: lookup("ANALYSIS_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(default.analysis_timeout_secs),
            input_folder: lookup("INPUT_FOLDER").unwrap_or(default.input_folder),
            form_toml: lookup("FORM_TOML").unwrap_or(default.form_toml),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(default.output_dir),
            report_file_name: lookup("REPORT_FILE_NAME").unwrap_or(default.report_file_name),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if reqwest::Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.api_base_url.clone(),
            });
        }
        if self.report_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyReportFileName);
        }
        Ok(())
    }

    /// 最大文件数量（`None` 表示不限制）
    pub fn max_files_limit(&self) -> Option<usize> {
        (self.max_files > 0).then_some(self.max_files)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_secs(self.mock_delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、写日志文件头、选择传输方式
//! 2. **加载输入**：按工作流模式加载候选文件或表单草稿
//! 3. **提交与下载**：委托 `WorkflowController` 完成一次提交并保存报告
//! 4. **收尾**：重置工作流，输出统计信息
//!
//! 本模块不做任何接受规则或状态判断，全部交给流程层

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::clients::{AnalysisTransport, HttpAnalysisClient, MockAnalysisClient};
use crate::config::{Config, TransportKind, WorkflowMode};
use crate::models::{self, CandidateFile};
use crate::services::ReportSaver;
use crate::utils::logging::{append_log_line, init_log_file, log_file_list, log_startup, print_final_stats};
use crate::utils::truncate_text;
use crate::workflow::WorkflowController;

/// 应用主结构
pub struct App {
    config: Config,
    transport: Box<dyn AnalysisTransport>,
    controller: WorkflowController,
    saver: ReportSaver,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        let transport = build_transport(&config);
        let controller = WorkflowController::from_config(&config);
        let saver = ReportSaver::new(&config);

        Ok(Self {
            config,
            transport,
            controller,
            saver,
        })
    }

    /// 运行一次完整的分析流程
    ///
    /// # 参数
    /// - `extra_paths`: 命令行给出的路径。文件模式下为候选文件，表单模式下第一个为表单 TOML
    ///
    /// # 返回
    /// 返回保存的报告路径，分析未完成时返回 `None`
    pub async fn run(&mut self, extra_paths: &[PathBuf]) -> Result<Option<PathBuf>> {
        let ready = match self.config.workflow_mode {
            WorkflowMode::Files => self.load_files(extra_paths).await?,
            WorkflowMode::Form => self.load_form(extra_paths).await?,
        };

        if !ready {
            warn!("⚠️ 输入不完整，程序结束");
            self.finish(None);
            return Ok(None);
        }

        let report_path = match self.controller.submit(self.transport.as_ref()).await {
            Ok(handle) => {
                info!("🔗 报告引用: {}", handle);
                self.controller.download(&self.saver).await?
            }
            Err(e) => {
                error!("❌ 分析失败: {}", e);
                self.log_line(&format!("分析失败: {}", e));
                None
            }
        };

        self.controller.reset();
        self.finish(report_path.as_deref());

        Ok(report_path)
    }

    pub fn controller(&self) -> &WorkflowController {
        &self.controller
    }

    // ========== 辅助函数 ==========

    /// 加载候选文件，返回是否可以提交
    async fn load_files(&mut self, extra_paths: &[PathBuf]) -> Result<bool> {
        let candidates = if extra_paths.is_empty() {
            info!("\n📁 正在扫描输入文件夹: {}", self.config.input_folder);
            models::load_candidates_from_folder(&self.config.input_folder).await?
        } else {
            load_paths(extra_paths).await?
        };

        let outcome = self.controller.add_files(candidates)?;
        for warning in &outcome.warnings {
            self.log_line(&warning.to_string());
        }

        log_file_list(
            self.controller.files().iter().map(|f| (f.name(), f.size())),
            self.controller.policy().max_files,
        );

        Ok(self.controller.can_submit())
    }

    /// 加载表单草稿，返回是否可以提交
    async fn load_form(&mut self, extra_paths: &[PathBuf]) -> Result<bool> {
        let toml_path = extra_paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(&self.config.form_toml));
        info!("\n📝 正在读取表单: {}", toml_path.display());

        let draft = models::load_form_from_toml(&toml_path).await?;
        for (field, value) in draft.entries() {
            if !self.controller.set_field(field, value)? {
                let shown = truncate_text(value, 40);
                warn!("⚠️ 字段无效: {} = {:?}", field, shown);
                self.log_line(&format!("字段无效: {} = {:?}", field, shown));
            }
        }

        Ok(self.controller.can_submit())
    }

    fn finish(&self, report_path: Option<&Path>) {
        let display = report_path.map(|p| p.display().to_string());
        print_final_stats(
            report_path.is_some(),
            display.as_deref(),
            &self.config.output_log_file,
        );
        let line = match &display {
            Some(path) => format!("报告已保存: {}", path),
            None => "分析未完成".to_string(),
        };
        self.log_line(&line);
    }

    fn log_line(&self, line: &str) {
        if let Err(e) = append_log_line(&self.config.output_log_file, line) {
            warn!("⚠️ 写入日志文件失败: {}", e);
        }
    }
}

/// 根据配置选择传输方式
fn build_transport(config: &Config) -> Box<dyn AnalysisTransport> {
    match config.transport {
        TransportKind::Mock => Box::new(MockAnalysisClient::new(config)),
        TransportKind::Direct | TransportKind::Session => Box::new(HttpAnalysisClient::new(config)),
    }
}

/// 逐个加载命令行给出的文件，读取失败的路径只记录警告
async fn load_paths(paths: &[PathBuf]) -> Result<Vec<CandidateFile>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        match models::load_candidate_file(path).await {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("⚠️ 跳过文件: {:#}", e),
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path, mode: WorkflowMode) -> Config {
        let mut config = Config::default();
        config.workflow_mode = mode;
        config.mock_delay_secs = 0;
        config.output_dir = dir.join("reports").display().to_string();
        config.output_log_file = dir.join("output.txt").display().to_string();
        config.input_folder = dir.join("input_files").display().to_string();
        config
    }

    #[tokio::test]
    async fn test_run_files_mode_saves_report() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan1.nmap");
        tokio::fs::write(&scan, b"PORT 22/tcp open ssh").await.unwrap();

        let mut app = App::initialize(test_config(dir.path(), WorkflowMode::Files))
            .await
            .unwrap();
        let saved = app.run(&[scan]).await.unwrap().unwrap();

        assert!(saved.ends_with("relatorio-de-seguranca.pdf"));
        assert!(tokio::fs::read(&saved).await.unwrap().starts_with(b"%PDF"));
        assert_eq!(app.controller().live_artifacts(), 0);
        assert_eq!(app.controller().file_count(), 0);
    }

    #[tokio::test]
    async fn test_run_skips_submit_when_nothing_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tool.exe");
        tokio::fs::write(&exe, b"MZ").await.unwrap();

        let mut app = App::initialize(test_config(dir.path(), WorkflowMode::Files))
            .await
            .unwrap();

        assert_eq!(app.run(&[exe]).await.unwrap(), None);
        let log = tokio::fs::read_to_string(dir.path().join("output.txt")).await.unwrap();
        assert!(log.contains("tool.exe"));
    }

    #[tokio::test]
    async fn test_run_form_mode_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let form = dir.path().join("form.toml");
        tokio::fs::write(
            &form,
            r#"
employeeName = "Ana Souza"
companyName = "Acme"
cnpj = "12.345.678/0001-99"
targetIP = "192.168.1.1"
systemURL = "https://acme.example.com"
"#,
        )
        .await
        .unwrap();

        let mut app = App::initialize(test_config(dir.path(), WorkflowMode::Form))
            .await
            .unwrap();

        assert!(app.run(&[form]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_run_form_mode_logs_truncated_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let form = dir.path().join("form.toml");
        let long_url = "x".repeat(200);
        tokio::fs::write(&form, format!("systemURL = \"{}\"\n", long_url))
            .await
            .unwrap();

        let mut app = App::initialize(test_config(dir.path(), WorkflowMode::Form))
            .await
            .unwrap();
        assert_eq!(app.run(&[form]).await.unwrap(), None);

        let log = tokio::fs::read_to_string(dir.path().join("output.txt")).await.unwrap();
        assert!(log.contains(&format!("字段无效: systemURL = \"{}...\"", "x".repeat(40))));
        assert!(!log.contains(&long_url));
    }
}

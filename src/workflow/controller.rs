//! 上传 / 分析工作流控制器 - 流程层
//!
//! 核心职责：持有候选文件、表单字段和工作流状态，
//! 所有修改都经过状态门控（只有 idle 时允许）
//!
//! 状态流转：
//! 1. idle → submitting（`begin_submit`）
//! 2. submitting → completed（传输成功）/ idle（传输失败，保留输入）
//! 3. 任意状态 → idle（`reset`，释放报告引用）

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::clients::{AnalysisRequest, AnalysisTransport};
use crate::config::{Config, WorkflowMode};
use crate::error::{SubmissionBlocker, TransportError, WorkflowError, WorkflowResult};
use crate::infrastructure::{ArtifactHandle, ArtifactStore};
use crate::models::{Artifact, CandidateFile, FieldId, FormFields};
use crate::services::{AcceptancePolicy, ReportSaver};
use crate::workflow::state::{WorkflowPhase, WorkflowState};
use crate::workflow::submission::{AddOutcome, PendingSubmission};

/// 工作流控制器
///
/// - `mode` 决定提交时检查和发送的是文件还是表单
/// - 报告字节只存在于内部的 `ArtifactStore` 中
pub struct WorkflowController {
    mode: WorkflowMode,
    policy: AcceptancePolicy,
    files: Vec<CandidateFile>,
    form: FormFields,
    state: WorkflowState,
    store: ArtifactStore,
    generation: u64,
}

impl WorkflowController {
    pub fn new(mode: WorkflowMode, policy: AcceptancePolicy) -> Self {
        Self {
            mode,
            policy,
            files: Vec::new(),
            form: FormFields::new(),
            state: WorkflowState::Idle,
            store: ArtifactStore::new(),
            generation: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.workflow_mode,
            AcceptancePolicy::new(config.file_rules, config.max_files_limit()),
        )
    }

    // ========== 读取 ==========

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    pub fn policy(&self) -> &AcceptancePolicy {
        &self.policy
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    /// 当前是否可以提交
    pub fn can_submit(&self) -> bool {
        self.state.is_idle() && self.blocker().is_none()
    }

    /// 当前报告的引用（仅 completed）
    pub fn report_handle(&self) -> Option<&ArtifactHandle> {
        match &self.state {
            WorkflowState::Completed { report } => Some(report),
            _ => None,
        }
    }

    /// 当前报告内容（仅 completed）
    pub fn report(&self) -> Option<&Artifact> {
        self.report_handle().and_then(|handle| self.store.resolve(handle))
    }

    /// 仍然有效的报告引用数
    pub fn live_artifacts(&self) -> usize {
        self.store.live_count()
    }

    // ========== 输入 ==========

    /// 添加候选文件
    ///
    /// 不支持的类型和超出数量的文件只产生警告，重复文件静默跳过
    pub fn add_files<I>(&mut self, candidates: I) -> WorkflowResult<AddOutcome>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        self.ensure_idle()?;

        let mut outcome = AddOutcome::default();
        let mut dropped = 0;

        for candidate in candidates {
            if let Err(warning) = self.policy.check(&candidate) {
                warn!("⚠️ {}", warning);
                outcome.warnings.push(warning);
                continue;
            }

            if self.files.iter().any(|f| f.same_identity(&candidate)) {
                debug!("跳过重复文件: {} ({} 字节)", candidate.name(), candidate.size());
                outcome.duplicates += 1;
                continue;
            }

            if !self.policy.has_room(self.files.len()) {
                dropped += 1;
                continue;
            }

            self.files.push(candidate);
            outcome.added += 1;
        }

        if let (true, Some(max)) = (dropped > 0, self.policy.max_files) {
            let warning = WorkflowError::TooManyFiles { max, dropped };
            warn!("⚠️ {}", warning);
            outcome.warnings.push(warning);
        }

        Ok(outcome)
    }

    /// 按索引移除一个文件，其余文件保持原有顺序
    ///
    /// 越界时返回 `IndexOutOfRange`，列表不变
    pub fn remove_file(&mut self, index: usize) -> WorkflowResult<CandidateFile> {
        self.ensure_idle()?;

        if index >= self.files.len() {
            return Err(WorkflowError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    /// 清空所有候选文件
    pub fn clear_all(&mut self) -> WorkflowResult<()> {
        self.ensure_idle()?;
        self.files.clear();
        Ok(())
    }

    /// 更新表单字段
    ///
    /// # 返回
    /// 返回该字段新的有效性
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) -> WorkflowResult<bool> {
        self.ensure_idle()?;
        Ok(self.form.set(field, value))
    }

    // ========== 提交 ==========

    /// 开始提交：idle → submitting
    ///
    /// 返回的票据携带输入快照，必须交给 `complete_submission`
    pub fn begin_submit(&mut self) -> WorkflowResult<PendingSubmission> {
        match &self.state {
            WorkflowState::Submitting { .. } => return Err(WorkflowError::SubmissionInProgress),
            WorkflowState::Completed { .. } => {
                return Err(WorkflowError::InputsLocked {
                    phase: WorkflowPhase::Completed,
                })
            }
            WorkflowState::Idle => {}
        }

        if let Some(blocker) = self.blocker() {
            warn!("⚠️ 无法提交: {}", blocker);
            return Err(WorkflowError::InvalidSubmission(blocker));
        }

        self.generation += 1;
        self.state = WorkflowState::Submitting {
            generation: self.generation,
        };

        let request = match self.mode {
            WorkflowMode::Files => AnalysisRequest::Files(self.files.clone()),
            WorkflowMode::Form => AnalysisRequest::Form(self.form.to_submission()),
        };
        info!("📤 开始提交分析: {}", request.summary());

        Ok(PendingSubmission::new(self.generation, request))
    }

    /// 结束提交：submitting → completed / idle
    ///
    /// 票据在提交期间被 reset 作废时返回 `StaleSubmission`，结果直接丢弃
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<Artifact, TransportError>,
    ) -> WorkflowResult<ArtifactHandle> {
        let current = WorkflowState::Submitting {
            generation: pending.generation,
        };
        if self.state != current {
            warn!("⚠️ 提交已被重置，丢弃结果 (票据 #{})", pending.generation);
            return Err(WorkflowError::StaleSubmission);
        }

        match result {
            Ok(artifact) => {
                let handle = self.store.publish(artifact);
                info!("✓ 分析完成，报告已就绪: {}", handle);
                self.state = WorkflowState::Completed {
                    report: handle.clone(),
                };
                Ok(handle)
            }
            Err(e) => {
                error!("❌ 提交失败，已恢复到 idle: {}", e);
                self.state = WorkflowState::Idle;
                Err(WorkflowError::SubmissionFailed(e))
            }
        }
    }

    /// 完整提交流程：begin → 传输 → complete
    pub async fn submit(&mut self, transport: &dyn AnalysisTransport) -> WorkflowResult<ArtifactHandle> {
        let pending = self.begin_submit()?;
        debug!("使用传输方式: {}", transport.name());
        let result = transport.submit_for_analysis(pending.request()).await;
        self.complete_submission(pending, result)
    }

    // ========== 结果 ==========

    /// 保存报告（可重复调用，不消耗引用）
    ///
    /// 非 completed 状态下不执行任何操作，返回 `None`
    pub async fn download(&self, saver: &ReportSaver) -> Result<Option<PathBuf>> {
        let Some(artifact) = self.report() else {
            debug!("当前没有可下载的报告 ({})", self.phase());
            return Ok(None);
        };

        let path = saver.save(artifact).await?;
        info!("📥 报告已保存: {}", path.display());
        Ok(Some(path))
    }

    /// 重置：清空输入，释放报告引用，回到 idle
    pub fn reset(&mut self) {
        match &self.state {
            WorkflowState::Completed { report } => {
                self.store.revoke(report);
            }
            // 作废进行中的票据
            WorkflowState::Submitting { .. } => self.generation += 1,
            WorkflowState::Idle => {}
        }
        self.files.clear();
        self.form.clear();
        self.state = WorkflowState::Idle;
        info!("🔄 工作流已重置");
    }

    // ========== 辅助方法 ==========

    fn ensure_idle(&self) -> WorkflowResult<()> {
        if self.state.is_idle() {
            Ok(())
        } else {
            Err(WorkflowError::InputsLocked {
                phase: self.phase(),
            })
        }
    }

    fn blocker(&self) -> Option<SubmissionBlocker> {
        match self.mode {
            WorkflowMode::Files if self.files.is_empty() => Some(SubmissionBlocker::NoFiles),
            WorkflowMode::Files => None,
            WorkflowMode::Form => self.form.first_blocker(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockAnalysisClient;
    use crate::services::RuleSet;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingTransport;

    #[async_trait]
    impl AnalysisTransport for FailingTransport {
        async fn submit_for_analysis(&self, _request: &AnalysisRequest) -> Result<Artifact, TransportError> {
            Err(TransportError::AnalysisFailed {
                session_id: "s1".into(),
                message: "Analysis failed".into(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn mock() -> MockAnalysisClient {
        MockAnalysisClient::with_delay(Duration::ZERO, "relatorio-de-seguranca.pdf")
    }

    fn files_controller() -> WorkflowController {
        WorkflowController::new(WorkflowMode::Files, AcceptancePolicy::default())
    }

    fn file(name: &str, size: usize) -> CandidateFile {
        CandidateFile::from_bytes(name, vec![0u8; size])
    }

    fn fill_valid_form(controller: &mut WorkflowController) {
        controller.set_field(FieldId::EmployeeName, "Ana Souza").unwrap();
        controller.set_field(FieldId::CompanyName, "Acme").unwrap();
        controller.set_field(FieldId::Cnpj, "12.345.678/0001-99").unwrap();
        controller.set_field(FieldId::TargetIp, "192.168.1.1").unwrap();
        controller.set_field(FieldId::SystemUrl, "https://acme.example.com").unwrap();
    }

    #[test]
    fn test_add_files_rejects_unsupported_and_dedupes() {
        let mut controller = files_controller();

        let outcome = controller.add_files(vec![file("report.exe", 10)]).unwrap();
        assert_eq!(controller.file_count(), 0);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [WorkflowError::UnsupportedFileType { .. }]
        ));

        controller.add_files(vec![file("scan1.nmap", 500)]).unwrap();
        let outcome = controller.add_files(vec![file("scan1.nmap", 500)]).unwrap();
        assert_eq!(outcome.duplicates, 1);
        assert!(!outcome.has_warnings());
        assert_eq!(controller.file_count(), 1);

        // 同名不同大小视为不同文件
        controller.add_files(vec![file("scan1.nmap", 501)]).unwrap();
        assert_eq!(controller.file_count(), 2);
    }

    #[test]
    fn test_add_files_truncates_to_max_preserving_order() {
        let mut controller = files_controller();
        let first: Vec<_> = (0..10).map(|i| file(&format!("f{i}.log"), i)).collect();
        controller.add_files(first).unwrap();

        let outcome = controller
            .add_files(vec![file("extra.log", 1), file("extra2.log", 1)])
            .unwrap();

        assert_eq!(controller.file_count(), 10);
        assert_eq!(outcome.added, 0);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [WorkflowError::TooManyFiles { max: 10, dropped: 2 }]
        ));
        let names: Vec<_> = controller.files().iter().map(|f| f.name().to_string()).collect();
        let expected: Vec<_> = (0..10).map(|i| format!("f{i}.log")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_no_duplicates_across_many_adds() {
        let mut controller =
            WorkflowController::new(WorkflowMode::Files, AcceptancePolicy::new(RuleSet::Scan, None));
        for round in 0..5 {
            let batch: Vec<_> = (0..8).map(|i| file(&format!("s{}.scan", i % 4), (i + round) % 3)).collect();
            controller.add_files(batch).unwrap();
        }
        let files = controller.files();
        for (i, a) in files.iter().enumerate() {
            for b in &files[i + 1..] {
                assert!(!a.same_identity(b), "{} duplicated", a.name());
            }
        }
    }

    #[test]
    fn test_remove_file_out_of_range_keeps_entries() {
        let mut controller = files_controller();
        controller
            .add_files(vec![file("a.txt", 1), file("b.txt", 2), file("c.txt", 3)])
            .unwrap();

        assert_eq!(controller.remove_file(2).unwrap().name(), "c.txt");
        assert!(matches!(
            controller.remove_file(2),
            Err(WorkflowError::IndexOutOfRange { index: 2, len: 2 })
        ));
        let names: Vec<_> = controller.files().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        controller.remove_file(0).unwrap();
        assert_eq!(controller.files()[0].name(), "b.txt");
    }

    #[test]
    fn test_submit_without_files_is_rejected() {
        let mut controller = files_controller();
        assert!(matches!(
            controller.begin_submit(),
            Err(WorkflowError::InvalidSubmission(SubmissionBlocker::NoFiles))
        ));
        assert_eq!(controller.phase(), WorkflowPhase::Idle);
    }

    #[test]
    fn test_form_submit_requires_all_fields_valid() {
        let mut controller = WorkflowController::new(WorkflowMode::Form, AcceptancePolicy::default());
        fill_valid_form(&mut controller);
        assert!(!controller.set_field(FieldId::TargetIp, "999.1.1.1").unwrap());
        assert!(matches!(
            controller.begin_submit(),
            Err(WorkflowError::InvalidSubmission(SubmissionBlocker::InvalidField(FieldId::TargetIp)))
        ));
        assert!(controller.set_field(FieldId::TargetIp, "10.0.0.7").unwrap());
        assert!(controller.can_submit());
    }

    #[test]
    fn test_second_submit_while_submitting_has_no_effect() {
        let mut controller = files_controller();
        controller.add_files(vec![file("a.log", 3)]).unwrap();

        let pending = controller.begin_submit().unwrap();
        assert_eq!(controller.phase(), WorkflowPhase::Submitting);
        assert!(matches!(
            controller.begin_submit(),
            Err(WorkflowError::SubmissionInProgress)
        ));
        assert_eq!(controller.state(), &WorkflowState::Submitting { generation: 1 });

        // 提交期间输入只读，读取仍可用
        assert!(matches!(
            controller.add_files(vec![file("b.log", 1)]),
            Err(WorkflowError::InputsLocked { phase: WorkflowPhase::Submitting })
        ));
        assert!(controller.clear_all().is_err());
        assert_eq!(controller.file_count(), 1);

        controller
            .complete_submission(pending, Ok(Artifact::pdf(b"%PDF".to_vec(), "r.pdf")))
            .unwrap();
        assert_eq!(controller.phase(), WorkflowPhase::Completed);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_to_idle_and_keeps_inputs() {
        let mut controller = files_controller();
        controller.add_files(vec![file("a.log", 3), file("b.csv", 4)]).unwrap();

        let err = controller.submit(&FailingTransport).await.unwrap_err();

        assert!(matches!(err, WorkflowError::SubmissionFailed(TransportError::AnalysisFailed { .. })));
        assert_eq!(controller.phase(), WorkflowPhase::Idle);
        assert_eq!(controller.file_count(), 2);
        assert_eq!(controller.live_artifacts(), 0);
    }

    #[tokio::test]
    async fn test_download_is_repeatable_and_reset_releases_report() {
        let dir = tempfile::tempdir().unwrap();
        let saver = ReportSaver::with_path(dir.path(), "relatorio-de-seguranca.pdf");
        let mut controller = files_controller();

        // 未完成时下载不执行任何操作
        assert_eq!(controller.download(&saver).await.unwrap(), None);

        controller.add_files(vec![file("scan1.nmap", 500)]).unwrap();
        let handle = controller.submit(&mock()).await.unwrap();
        assert_eq!(controller.report_handle(), Some(&handle));

        let first = controller.download(&saver).await.unwrap().unwrap();
        let second = controller.download(&saver).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            tokio::fs::read(&first).await.unwrap(),
            controller.report().unwrap().bytes
        );
        assert_eq!(controller.live_artifacts(), 1);

        controller.reset();
        assert_eq!(controller.phase(), WorkflowPhase::Idle);
        assert_eq!(controller.file_count(), 0);
        assert_eq!(controller.live_artifacts(), 0);
        assert!(controller.report().is_none());
        assert!(matches!(
            controller.begin_submit(),
            Err(WorkflowError::InvalidSubmission(SubmissionBlocker::NoFiles))
        ));
    }

    #[test]
    fn test_completed_state_locks_inputs_until_reset() {
        let mut controller = files_controller();
        controller.add_files(vec![file("a.log", 1)]).unwrap();
        let pending = controller.begin_submit().unwrap();
        controller
            .complete_submission(pending, Ok(Artifact::pdf(vec![1], "r.pdf")))
            .unwrap();

        assert!(matches!(
            controller.begin_submit(),
            Err(WorkflowError::InputsLocked { phase: WorkflowPhase::Completed })
        ));
        assert!(controller.remove_file(0).is_err());
        assert!(controller.set_field(FieldId::Cnpj, "123").is_err());
    }

    #[test]
    fn test_reset_during_submit_makes_ticket_stale() {
        let mut controller = files_controller();
        controller.add_files(vec![file("a.log", 1)]).unwrap();
        let stale = controller.begin_submit().unwrap();

        controller.reset();
        controller.add_files(vec![file("b.log", 2)]).unwrap();
        let fresh = controller.begin_submit().unwrap();

        assert!(matches!(
            controller.complete_submission(stale, Ok(Artifact::pdf(vec![1], "r.pdf"))),
            Err(WorkflowError::StaleSubmission)
        ));
        assert_eq!(controller.live_artifacts(), 0);
        assert_eq!(controller.phase(), WorkflowPhase::Submitting);

        controller
            .complete_submission(fresh, Ok(Artifact::pdf(vec![2], "r.pdf")))
            .unwrap();
        assert_eq!(controller.report().unwrap().bytes, vec![2]);
    }

    #[test]
    fn test_request_snapshot_matches_mode() {
        let mut controller = WorkflowController::new(WorkflowMode::Form, AcceptancePolicy::default());
        fill_valid_form(&mut controller);
        let pending = controller.begin_submit().unwrap();
        match pending.request() {
            AnalysisRequest::Form(form) => assert_eq!(form.company_name, "Acme"),
            other => panic!("unexpected request: {other:?}"),
        }
    }
}

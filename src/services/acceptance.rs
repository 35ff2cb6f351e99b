//! 文件接受规则 - 业务能力层
//!
//! 只负责判断"这个文件能不能进入候选列表"，不持有列表本身

use std::str::FromStr;

use phf::phf_ordered_set;

use crate::error::WorkflowError;
use crate::models::CandidateFile;

/// 扫描结果 / 日志类文件
static SCAN_EXTENSIONS: phf::OrderedSet<&'static str> =
    phf_ordered_set! { "txt", "log", "xml", "json", "csv", "nmap", "scan" };

/// 纯文本文件
static TEXT_EXTENSIONS: phf::OrderedSet<&'static str> = phf_ordered_set! { "txt" };

/// 预置的扩展名规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// txt, log, xml, json, csv, nmap, scan
    Scan,
    /// 仅 txt
    Text,
}

impl RuleSet {
    fn extensions(&self) -> &'static phf::OrderedSet<&'static str> {
        match self {
            RuleSet::Scan => &SCAN_EXTENSIONS,
            RuleSet::Text => &TEXT_EXTENSIONS,
        }
    }

    pub fn allows(&self, extension: &str) -> bool {
        self.extensions().contains(extension)
    }

    /// 用于提示信息的扩展名列表
    pub fn describe(&self) -> String {
        self.extensions()
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for RuleSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(RuleSet::Scan),
            "text" | "txt" => Ok(RuleSet::Text),
            other => Err(format!("未知的文件规则: {}", other)),
        }
    }
}

/// 文件接受策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptancePolicy {
    pub rule_set: RuleSet,
    /// 最大文件数量，`None` 表示不限制
    pub max_files: Option<usize>,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            rule_set: RuleSet::Scan,
            max_files: Some(10),
        }
    }
}

impl AcceptancePolicy {
    pub fn new(rule_set: RuleSet, max_files: Option<usize>) -> Self {
        Self { rule_set, max_files }
    }

    /// 检查文件类型
    pub fn check(&self, file: &CandidateFile) -> Result<(), WorkflowError> {
        if self.rule_set.allows(file.extension()) {
            Ok(())
        } else {
            Err(WorkflowError::UnsupportedFileType {
                name: file.name().to_string(),
                extension: file.extension().to_string(),
                allowed: self.rule_set.describe(),
            })
        }
    }

    /// 当前列表是否还能继续添加
    pub fn has_room(&self, current: usize) -> bool {
        self.max_files.map_or(true, |max| current < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_rules() {
        let policy = AcceptancePolicy::default();
        assert!(policy.check(&CandidateFile::from_bytes("scan1.nmap", vec![])).is_ok());
        assert!(policy.check(&CandidateFile::from_bytes("OUT.JSON", vec![])).is_ok());
        let err = policy
            .check(&CandidateFile::from_bytes("report.exe", vec![]))
            .unwrap_err();
        match err {
            WorkflowError::UnsupportedFileType { extension, allowed, .. } => {
                assert_eq!(extension, "exe");
                assert_eq!(allowed, "txt, log, xml, json, csv, nmap, scan");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_text_rules_and_no_extension() {
        let policy = AcceptancePolicy::new(RuleSet::Text, Some(10));
        assert!(policy.check(&CandidateFile::from_bytes("notes.txt", vec![])).is_ok());
        assert!(policy.check(&CandidateFile::from_bytes("scan.log", vec![])).is_err());
        assert!(policy.check(&CandidateFile::from_bytes("txt", vec![])).is_err());
    }

    #[test]
    fn test_has_room() {
        let limited = AcceptancePolicy::default();
        assert!(limited.has_room(9));
        assert!(!limited.has_room(10));
        let unlimited = AcceptancePolicy::new(RuleSet::Scan, None);
        assert!(unlimited.has_room(10_000));
    }
}

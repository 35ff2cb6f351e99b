//! 表单模型（表单变体）

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SubmissionBlocker;
use crate::services::field_rules;

/// 表单字段标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    EmployeeName,
    CompanyName,
    Cnpj,
    TargetIp,
    SystemUrl,
}

impl FieldId {
    /// 所有字段，按表单顺序
    pub const ALL: [FieldId; 5] = [
        FieldId::EmployeeName,
        FieldId::CompanyName,
        FieldId::Cnpj,
        FieldId::TargetIp,
        FieldId::SystemUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::EmployeeName => "employeeName",
            FieldId::CompanyName => "companyName",
            FieldId::Cnpj => "cnpj",
            FieldId::TargetIp => "targetIP",
            FieldId::SystemUrl => "systemURL",
        }
    }

    fn index(&self) -> usize {
        match self {
            FieldId::EmployeeName => 0,
            FieldId::CompanyName => 1,
            FieldId::Cnpj => 2,
            FieldId::TargetIp => 3,
            FieldId::SystemUrl => 4,
        }
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("未知字段: {}", s))
    }
}

/// 单个字段的当前值与校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    pub valid: bool,
}

/// 表单字段集合
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    entries: [FieldValue; 5],
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新字段值并只重新计算该字段的有效性
    pub fn set(&mut self, field: FieldId, value: impl Into<String>) -> bool {
        let value = value.into();
        let valid = field_rules::validate(field, &value);
        self.entries[field.index()] = FieldValue { value, valid };
        valid
    }

    pub fn get(&self, field: FieldId) -> &FieldValue {
        &self.entries[field.index()]
    }

    pub fn value(&self, field: FieldId) -> &str {
        &self.entries[field.index()].value
    }

    pub fn is_valid(&self, field: FieldId) -> bool {
        self.entries[field.index()].valid
    }

    /// 第一个阻止提交的字段（空值优先于格式错误，按表单顺序）
    pub fn first_blocker(&self) -> Option<SubmissionBlocker> {
        FieldId::ALL.into_iter().find_map(|field| {
            let entry = self.get(field);
            if entry.value.is_empty() {
                Some(SubmissionBlocker::EmptyField(field))
            } else if !entry.valid {
                Some(SubmissionBlocker::InvalidField(field))
            } else {
                None
            }
        })
    }

    pub fn is_complete(&self) -> bool {
        self.first_blocker().is_none()
    }

    pub fn clear(&mut self) {
        self.entries = Default::default();
    }

    /// 生成提交给后端的数据
    pub fn to_submission(&self) -> FormSubmission {
        FormSubmission {
            employee_name: self.value(FieldId::EmployeeName).to_string(),
            company_name: self.value(FieldId::CompanyName).to_string(),
            cnpj: self.value(FieldId::Cnpj).to_string(),
            target_ip: self.value(FieldId::TargetIp).to_string(),
            system_url: self.value(FieldId::SystemUrl).to_string(),
        }
    }
}

/// 表单提交数据（后端字段名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub employee_name: String,
    pub company_name: String,
    pub cnpj: String,
    #[serde(rename = "targetIP")]
    pub target_ip: String,
    #[serde(rename = "systemURL")]
    pub system_url: String,
}

/// 从 TOML 文件读取的表单草稿，所有字段可缺省
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    pub employee_name: Option<String>,
    pub company_name: Option<String>,
    pub cnpj: Option<String>,
    #[serde(rename = "targetIP")]
    pub target_ip: Option<String>,
    #[serde(rename = "systemURL")]
    pub system_url: Option<String>,
}

impl FormDraft {
    /// 已填写的字段
    pub fn entries(&self) -> Vec<(FieldId, &str)> {
        [
            (FieldId::EmployeeName, &self.employee_name),
            (FieldId::CompanyName, &self.company_name),
            (FieldId::Cnpj, &self.cnpj),
            (FieldId::TargetIp, &self.target_ip),
            (FieldId::SystemUrl, &self.system_url),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_id_round_trip_names() {
        for field in FieldId::ALL {
            assert_eq!(field.as_str().parse::<FieldId>().unwrap(), field);
        }
        assert!("targetIp".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_set_only_touches_one_field() {
        let mut form = FormFields::new();
        assert!(form.set(FieldId::Cnpj, "12.345.678/0001-99"));
        assert!(!form.set(FieldId::TargetIp, "999.1.1.1"));
        assert!(form.is_valid(FieldId::Cnpj));
        assert!(!form.is_valid(FieldId::TargetIp));
        assert_eq!(form.value(FieldId::EmployeeName), "");
    }

    #[test]
    fn test_first_blocker_order() {
        let mut form = FormFields::new();
        assert_eq!(
            form.first_blocker(),
            Some(SubmissionBlocker::EmptyField(FieldId::EmployeeName))
        );
        form.set(FieldId::EmployeeName, "A");
        assert_eq!(
            form.first_blocker(),
            Some(SubmissionBlocker::InvalidField(FieldId::EmployeeName))
        );
        form.set(FieldId::EmployeeName, "Ana");
        form.set(FieldId::CompanyName, "Acme");
        form.set(FieldId::Cnpj, "12345678000199");
        form.set(FieldId::TargetIp, "192.168.1.1");
        form.set(FieldId::SystemUrl, "https://acme.example.com");
        assert!(form.is_complete());
    }

    #[test]
    fn test_submission_uses_backend_names() {
        let mut form = FormFields::new();
        form.set(FieldId::TargetIp, "10.0.0.1");
        form.set(FieldId::SystemUrl, "http://x.test");
        let json = serde_json::to_value(form.to_submission()).unwrap();
        assert_eq!(json["targetIP"], "10.0.0.1");
        assert_eq!(json["systemURL"], "http://x.test");
        assert!(json.get("employee_name").is_some());
    }

    #[test]
    fn test_draft_entries_skip_missing() {
        let draft: FormDraft = toml::from_str(
            r#"
            employeeName = "Ana"
            targetIP = "192.168.0.10"
            "#,
        )
        .unwrap();
        assert_eq!(
            draft.entries(),
            vec![(FieldId::EmployeeName, "Ana"), (FieldId::TargetIp, "192.168.0.10")]
        );
    }
}

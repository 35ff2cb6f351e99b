//! 表单字段校验规则
//!
//! 每个字段对应一个纯函数，有效性只取决于当前值

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FieldId;

// `\d` 在 regex 中匹配所有 Unicode 数字，这里只接受 ASCII
static CNPJ_FORMATTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{3}\.[0-9]{3}/[0-9]{4}-[0-9]{2}$").expect("CNPJ pattern"));

static IPV4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$").expect("IPv4 pattern"));

/// 字段校验函数表
pub static FIELD_RULES: [(FieldId, fn(&str) -> bool); 5] = [
    (FieldId::EmployeeName, is_valid_name),
    (FieldId::CompanyName, is_valid_name),
    (FieldId::Cnpj, is_valid_cnpj),
    (FieldId::TargetIp, is_valid_ipv4),
    (FieldId::SystemUrl, is_valid_url),
];

/// 按字段查表校验
pub fn validate(field: FieldId, value: &str) -> bool {
    FIELD_RULES
        .iter()
        .find(|(id, _)| *id == field)
        .map_or(false, |(_, rule)| rule(value))
}

/// 去掉首尾空白后至少 2 个字符
pub fn is_valid_name(value: &str) -> bool {
    value.trim().chars().count() >= 2
}

/// `DD.DDD.DDD/DDDD-DD` 或 14 位纯数字
pub fn is_valid_cnpj(value: &str) -> bool {
    CNPJ_FORMATTED.is_match(value)
        || (value.len() == 14 && value.bytes().all(|b| b.is_ascii_digit()))
}

/// 点分十进制 IPv4，每段 0-255
pub fn is_valid_ipv4(value: &str) -> bool {
    let Some(caps) = IPV4.captures(value) else {
        return false;
    };
    caps.iter()
        .skip(1)
        .flatten()
        .all(|octet| octet.as_str().parse::<u16>().map_or(false, |n| n <= 255))
}

/// 可解析的绝对 URL
pub fn is_valid_url(value: &str) -> bool {
    reqwest::Url::parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_covers_every_field() {
        for field in FieldId::ALL {
            assert_eq!(
                FIELD_RULES.iter().filter(|(id, _)| *id == field).count(),
                1,
                "{field}"
            );
        }
    }

    #[test]
    fn test_patterns_compile() {
        assert!(CNPJ_FORMATTED.is_match("00.000.000/0000-00"));
        assert!(IPV4.is_match("1.2.3.4"));
    }

    #[test]
    fn test_field_cases() {
        let cases: &[(FieldId, &str, bool)] = &[
            (FieldId::EmployeeName, "Jo", true),
            (FieldId::EmployeeName, " J ", false),
            (FieldId::EmployeeName, "", false),
            (FieldId::CompanyName, "Ação", true),
            (FieldId::CompanyName, "   ", false),
            (FieldId::Cnpj, "12.345.678/0001-99", true),
            (FieldId::Cnpj, "12345678000199", true),
            (FieldId::Cnpj, "123", false),
            (FieldId::Cnpj, "12.345.678/0001-9", false),
            (FieldId::Cnpj, "1234567800019a", false),
            (FieldId::Cnpj, "١٢.٣٤٥.٦٧٨/٠٠٠١-٩٩", false),
            (FieldId::Cnpj, "１２.３４５.６７８/０００１-９９", false),
            (FieldId::Cnpj, "١٢٣٤٥٦٧٨٠٠٠١٩٩", false),
            (FieldId::TargetIp, "192.168.1.1", true),
            (FieldId::TargetIp, "0.0.0.0", true),
            (FieldId::TargetIp, "255.255.255.255", true),
            (FieldId::TargetIp, "999.1.1.1", false),
            (FieldId::TargetIp, "256.1.1.1", false),
            (FieldId::TargetIp, "1.1.1", false),
            (FieldId::TargetIp, "1.1.1.1.1", false),
            (FieldId::TargetIp, "a.b.c.d", false),
            (FieldId::TargetIp, "١.١.١.١", false),
            (FieldId::SystemUrl, "https://acme.example.com/login", true),
            (FieldId::SystemUrl, "http://10.0.0.1:8080", true),
            (FieldId::SystemUrl, "acme.example.com", false),
            (FieldId::SystemUrl, "/relative/path", false),
        ];

        for (field, value, expected) in cases {
            assert_eq!(validate(*field, value), *expected, "{field} = {value:?}");
        }
    }
}

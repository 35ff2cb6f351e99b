/// 分析产出的报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// 报告内容
    pub bytes: Vec<u8>,
    /// MIME 类型
    pub content_type: String,
    /// 建议的下载文件名
    pub file_name: String,
}

impl Artifact {
    pub const PDF: &'static str = "application/pdf";

    pub fn pdf(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: Self::PDF.to_string(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//! 候选文件模型
//!
//! 用户选择后、尚未提交的文件

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::TransportError;

/// 候选文件内容来源
#[derive(Debug, Clone)]
enum FileSource {
    /// 磁盘上的文件，提交时再读取
    Disk(PathBuf),
    /// 内存中的内容
    Memory(Arc<[u8]>),
}

/// 候选文件
///
/// 去重依据为 (name, size)，内容不参与比较
#[derive(Debug, Clone)]
pub struct CandidateFile {
    name: String,
    size: u64,
    extension: String,
    source: FileSource,
}

impl CandidateFile {
    /// 从磁盘路径创建（大小由调用方给出）
    pub fn from_disk(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            extension: extension_of(&name),
            name,
            size,
            source: FileSource::Disk(path.into()),
        }
    }

    /// 从内存内容创建
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let bytes: Vec<u8> = bytes.into();
        Self {
            extension: extension_of(&name),
            size: bytes.len() as u64,
            name,
            source: FileSource::Memory(Arc::from(bytes)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// 小写扩展名，文件名中没有 `.` 时为空
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 是否与另一个文件的 (name, size) 相同
    pub fn same_identity(&self, other: &CandidateFile) -> bool {
        self.name == other.name && self.size == other.size
    }

    /// 读取文件内容（用于上传）
    pub async fn read_bytes(&self) -> Result<Vec<u8>, TransportError> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Disk(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| TransportError::FileRead {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

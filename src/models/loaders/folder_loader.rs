use crate::models::candidate::CandidateFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从单个路径创建候选文件
pub async fn load_candidate_file(path: &Path) -> Result<CandidateFile> {
    let metadata = fs::metadata(path)
        .await
        .with_context(|| format!("无法读取文件信息: {}", path.display()))?;

    if !metadata.is_file() {
        anyhow::bail!("不是普通文件: {}", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("无法获取文件名: {}", path.display()))?;

    Ok(CandidateFile::from_disk(name, metadata.len(), path))
}

/// 从文件夹中加载所有普通文件作为候选文件（按文件名排序）
///
/// 这里不做类型过滤，接受规则由工作流控制器统一执行
pub async fn load_candidates_from_folder(folder_path: &str) -> Result<Vec<CandidateFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        match load_candidate_file(&path).await {
            Ok(candidate) => {
                tracing::debug!("发现文件: {} ({} 字节)", candidate.name(), candidate.size());
                candidates.push(candidate);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_candidates_sorted_and_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.log"), b"bb").await.unwrap();
        fs::write(dir.path().join("a.nmap"), b"a").await.unwrap();
        fs::create_dir(dir.path().join("nested")).await.unwrap();

        let folder = dir.path().to_string_lossy().to_string();
        let candidates = load_candidates_from_folder(&folder).await.unwrap();

        let names: Vec<_> = candidates.iter().map(|c| (c.name(), c.size())).collect();
        assert_eq!(names, vec![("a.nmap", 1), ("b.log", 2)]);
    }

    #[tokio::test]
    async fn test_missing_folder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").to_string_lossy().to_string();
        assert!(load_candidates_from_folder(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_load_candidate_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_candidate_file(dir.path()).await.is_err());
    }
}

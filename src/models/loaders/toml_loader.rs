use crate::error::{AppError, AppResult};
use crate::models::form::FormDraft;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载表单草稿
pub async fn load_form_from_toml(toml_file_path: &Path) -> AppResult<FormDraft> {
    let path = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| AppError::File {
            path: path.clone(),
            source,
        })?;

    let draft: FormDraft =
        toml::from_str(&content).map_err(|source| AppError::TomlParse { path, source })?;

    tracing::info!(
        "成功加载表单草稿，已填写 {} 个字段",
        draft.entries().len()
    );

    Ok(draft)
}

use crate::models::profile::PlayerProfile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载球员档案
pub async fn load_profile(toml_file_path: &Path) -> Result<PlayerProfile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut profile: PlayerProfile = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    profile.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(profile)
}

/// 加载文件夹中所有 TOML 档案，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其余档案。
pub async fn load_all_profiles(folder_path: &str) -> Result<Vec<PlayerProfile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut profiles = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_profile(&path).await {
            Ok(profile) => {
                let missing = profile.missing_fields();
                if !missing.is_empty() {
                    tracing::warn!("档案 {} 缺少字段: {:?}", profile.name, missing);
                }
                let unknown = profile.unknown_keys();
                if !unknown.is_empty() {
                    tracing::warn!("档案 {} 含有未知字段，将被忽略: {:?}", profile.name, unknown);
                }
                profiles.push(profile);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(profiles)
}

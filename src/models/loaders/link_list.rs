use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult};

/// 解析换行分隔的 URL 列表，忽略空行与首尾空白
pub fn parse_link_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从文件加载 URL 列表（如 guides.txt）
pub async fn load_link_list(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    let links = parse_link_list(&content);
    info!("📁 从 {} 加载 {} 个链接", path.display(), links.len());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_whitespace_are_ignored() {
        let links = parse_link_list("  https://a/guide/x \n\n\r\nhttps://a/guide/y\n   \n");
        assert_eq!(links, vec!["https://a/guide/x", "https://a/guide/y"]);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_link_list(&dir.path().join("guides.txt")).await.unwrap_err();
        assert!(err.to_string().contains("guides.txt"));
    }

    #[test]
    fn loads_written_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guides.txt");
        std::fs::write(&path, "https://a/guide/x\nhttps://a/guide/y\n").unwrap();

        let links = tokio_test::block_on(load_link_list(&path)).unwrap();
        assert_eq!(links.len(), 2);
    }
}

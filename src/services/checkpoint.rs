//! 检查点写入 - 服务层
//!
//! 每次都把目前为止的全部结果整体覆盖写入，先写临时文件再重命名，
//! 中途崩溃也不会留下半个 JSON。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// 检查点接收方
///
/// 只由协调任务调用（单写者）。
#[async_trait]
pub trait CheckpointSink<T: Serialize + Sync>: Send + Sync {
    /// 覆盖部分检查点
    async fn save_partial(&self, records: &[T]) -> AppResult<()>;

    /// 写入最终结果
    async fn save_final(&self, records: &[T]) -> AppResult<()>;
}

/// JSON 检查点：`{prefix}_partial.json` 与 `{prefix}.json`
#[derive(Debug, Clone)]
pub struct JsonCheckpointWriter {
    partial_path: PathBuf,
    final_path: PathBuf,
}

impl JsonCheckpointWriter {
    /// # 参数
    /// - `directory`: 输出目录
    /// - `prefix`: 文件名前缀，如 `items_data`
    pub fn new(directory: impl AsRef<Path>, prefix: &str) -> Self {
        let directory = directory.as_ref();
        Self {
            partial_path: directory.join(format!("{}_partial.json", prefix)),
            final_path: directory.join(format!("{}.json", prefix)),
        }
    }

    pub fn partial_path(&self) -> &Path {
        &self.partial_path
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }
}

#[async_trait]
impl<T: Serialize + Sync> CheckpointSink<T> for JsonCheckpointWriter {
    async fn save_partial(&self, records: &[T]) -> AppResult<()> {
        write_json_atomic(&self.partial_path, &records).await?;
        info!("💾 进度已保存: {} 条 -> {}", records.len(), self.partial_path.display());
        Ok(())
    }

    async fn save_final(&self, records: &[T]) -> AppResult<()> {
        write_json_atomic(&self.final_path, &records).await?;
        info!("✅ 结果已写入: {} 条 -> {}", records.len(), self.final_path.display());
        Ok(())
    }
}

/// 以缩进 JSON 整体覆盖写入
pub async fn write_json_atomic<V: Serialize + ?Sized>(path: &Path, value: &V) -> AppResult<()> {
    let content = serde_json::to_string_pretty(value)?;
    write_text_atomic(path, &content).await
}

/// 先写 `<path>.tmp` 再重命名
pub async fn write_text_atomic(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content)
        .await
        .map_err(|e| AppError::file_write_failed(tmp.display().to_string(), e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    debug!("写入 {} ({} 字节)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as JsonValue};

    #[tokio::test]
    async fn partial_and_final_files_use_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonCheckpointWriter::new(dir.path(), "items_data");
        let records = vec![json!({ "name": "Trinity Force" })];

        writer.save_partial(records.as_slice()).await.unwrap();
        writer.save_final(records.as_slice()).await.unwrap();

        assert!(dir.path().join("items_data_partial.json").exists());
        let content = std::fs::read_to_string(dir.path().join("items_data.json")).unwrap();
        let parsed: JsonValue = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, json!([{ "name": "Trinity Force" }]));
        assert!(content.contains('\n'), "should be pretty printed");
    }

    #[tokio::test]
    async fn overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonCheckpointWriter::new(dir.path(), "runes_data");

        let three: Vec<JsonValue> = vec![json!(1), json!(2), json!(3)];
        let one: Vec<JsonValue> = vec![json!(1)];
        writer.save_partial(three.as_slice()).await.unwrap();
        writer.save_partial(one.as_slice()).await.unwrap();

        let parsed: JsonValue =
            serde_json::from_str(&std::fs::read_to_string(writer.partial_path()).unwrap()).unwrap();
        assert_eq!(parsed, json!([1]));
        assert!(!dir.path().join("runes_data_partial.json.tmp").exists());
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("guides.txt");
        write_text_atomic(&path, "a\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\n");
    }
}

//! JSON 文档管理器
//!
//! 旧版等级数据是一份完整的 JSON 文档，迁移时整份读入内存。
//! 与配置类管理器不同，这里不做缓存，也不回写源文件。

use crate::data::{DataError, Result};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// JSON 文档管理器
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonManager;

impl JsonManager {
    pub fn new() -> Self {
        Self
    }

    /// 读取整个 JSON 文件
    ///
    /// # 返回
    ///
    /// - `Ok(Value)`: 解析后的 JSON 值
    /// - `Err(DataError::NotFound)`: 路径不存在、不是文件或不可读
    /// - `Err(DataError::JsonSerialization)`: 内容不是合法 JSON
    pub fn read(&self, path: &Path) -> Result<Value> {
        let bytes = self.read_bytes(path)?;
        self.parse(&bytes)
    }

    /// 读取文件原始字节（错误映射与 `read` 相同）
    pub fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(DataError::NotFound(path.display().to_string()));
        }

        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                DataError::NotFound(path.display().to_string())
            }
            _ => DataError::io(path.to_path_buf(), e),
        })
    }

    /// 解析已读入的字节
    pub fn parse(&self, bytes: &[u8]) -> Result<Value> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(value)
    }
}

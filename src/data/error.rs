//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义数据层的所有错误类型，服务层通过 `anyhow` 自动兼容。

use std::path::PathBuf;
use thiserror::Error;

/// 数据层的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// 资源未找到（输入文件不存在或不可读）
    #[error("未找到资源: {0}")]
    NotFound(String),

    /// 文档结构无效（例如顶层不是对象）
    #[error("无效的文档结构: {0}")]
    InvalidDocument(String),

    /// 无法转换为整数的公会/用户 ID
    #[error("无法转换为整数 ID: {0}")]
    InvalidKey(String),
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, DataError>;

/// 便捷的 I/O 错误构造器
impl DataError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为“输入不存在”类错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

//! 数据管理器实现
//!
//! - `json`: JSON 文档读取（整份载入内存）
//! - `sqlite`: SQLite 连接管理（单连接 + 单事务）

pub mod json;
pub mod sqlite;

pub use json::JsonManager;
pub use sqlite::{QueryRow, SqliteManager};

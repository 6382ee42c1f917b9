//! 数据访问层
//!
//! 负责旧版 JSON 文档的读取与 SQLite 连接的管理，不包含任何迁移业务逻辑。
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `managers`: 各格式管理器（JSON / SQLite）

pub mod error;
pub mod managers;

pub use error::{DataError, Result};
pub use managers::{JsonManager, QueryRow, SqliteManager};

//! SQLite 数据库管理器
//!
//! 迁移过程只持有一个连接：
//! - 打开时自动创建父目录
//! - 所有写入通过 `transaction` 在同一个事务中完成，结束时只提交一次
//! - 管理器被 drop 时连接随之关闭；未提交的事务自动回滚
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use crate::data::managers::SqliteManager;
//!
//! let mut manager = SqliteManager::open(Path::new("data/leveling.db"))?;
//! manager.transaction(|tx| {
//!     tx.execute("INSERT OR REPLACE INTO daily_goals (guild_id, date, target, progress) VALUES (?1, ?2, ?3, ?4)",
//!         rusqlite::params![10, "2024-01-01", 500, 120])?;
//!     Ok::<_, DataError>(())
//! })?;
//! ```

use crate::data::{DataError, Result};
use rusqlite::{Connection, Params, Row, Transaction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// SQLite 管理器
pub struct SqliteManager {
    /// 数据库连接
    conn: Connection,
    /// 数据库路径（用于错误报告）
    db_path: PathBuf,
}

/// 查询结果行（通用 JSON 格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub columns: Vec<String>,
    pub values: Vec<serde_json::Value>,
}

impl SqliteManager {
    /// 打开（或创建）数据库文件
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Self::open_connection(path)?;
        Ok(Self {
            conn,
            db_path: path.to_path_buf(),
        })
    }

    /// 创建内存数据库（用于测试）
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// 打开数据库连接
    fn open_connection(path: &Path) -> Result<Connection> {
        // 创建父目录
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DataError::io(parent.to_path_buf(), e))?;
        }

        Connection::open(path).map_err(DataError::Database)
    }

    /// 底层连接（只读查询使用）
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// 执行查询（返回通用行格式）
    ///
    /// ```rust
    /// let rows = manager.query("SELECT * FROM user_profiles WHERE guild_id = ?1", [10])?;
    /// ```
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<Vec<QueryRow>> {
        let mut stmt = self.conn.prepare(sql)?;

        let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let column_count = column_names.len();

        let rows = stmt
            .query_map(params, |row| {
                Self::row_to_query_row(row, &column_names, column_count)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 将 rusqlite::Row 转换为 QueryRow
    fn row_to_query_row(
        row: &Row,
        column_names: &[String],
        column_count: usize,
    ) -> rusqlite::Result<QueryRow> {
        let mut values = Vec::with_capacity(column_count);

        for i in 0..column_count {
            values.push(Self::get_value_as_json(row, i)?);
        }

        Ok(QueryRow {
            columns: column_names.to_vec(),
            values,
        })
    }

    /// 从 Row 中获取 JSON 值
    fn get_value_as_json(row: &Row, idx: usize) -> rusqlite::Result<serde_json::Value> {
        use rusqlite::types::ValueRef;

        match row.get_ref(idx)? {
            ValueRef::Null => Ok(serde_json::Value::Null),
            ValueRef::Integer(i) => Ok(serde_json::Value::Number(i.into())),
            ValueRef::Real(f) => Ok(serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)),
            ValueRef::Text(s) => {
                let text = std::str::from_utf8(s).unwrap_or("");
                Ok(serde_json::Value::String(text.to_string()))
            }
            ValueRef::Blob(b) => Ok(serde_json::Value::String(format!(
                "<blob {} bytes>",
                b.len()
            ))),
        }
    }

    /// 执行事务
    ///
    /// 闭包成功返回后提交；闭包返回错误时事务在 drop 时回滚。
    /// 错误类型只要求能从 `DataError` 转换，服务层可直接使用 `anyhow::Error`。
    pub fn transaction<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction) -> std::result::Result<T, E>,
        E: From<DataError>,
    {
        let tx = self.conn.transaction().map_err(DataError::Database)?;
        let result = f(&tx)?;
        tx.commit().map_err(DataError::Database)?;
        Ok(result)
    }

    /// 检查表是否存在
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// 执行原始 SQL（用于 DDL 等操作）
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// 获取数据库路径
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

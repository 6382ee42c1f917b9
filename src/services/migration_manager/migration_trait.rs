// Migration - 单张目标表的迁移接口
//
// 每个迁移消费已分区的旧版文档，把其中一部分写入一张目标表

use crate::models::LegacyDocument;
use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 迁移接口
pub trait Migration {
    /// 迁移唯一标识（如 "user_profiles_v1"）
    fn id(&self) -> &str;

    /// 迁移名称（用于日志）
    fn name(&self) -> &str;

    /// 写入的目标表
    fn target_table(&self) -> &str;

    /// 执行迁移
    ///
    /// `conn` 是整个运行共享的事务连接，迁移内部不得提交。
    /// 单条记录无效时跳过并记入结果；数据库错误直接返回，整个运行随之中止。
    fn execute(&self, conn: &Connection, document: &LegacyDocument) -> Result<MigrationResult>;
}

/// 被跳过的键所在的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipScope {
    /// 进度分区中的公会
    Guild,
    /// 进度分区中某公会下的用户
    User,
    /// 元数据分区中的公会
    MetadataGuild,
}

/// 被跳过的键（不计为错误，仅向操作者报告）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedKey {
    pub scope: SkipScope,
    pub key: String,
    /// 用户键所属的公会键
    pub guild: Option<String>,
    pub reason: String,
}

impl SkippedKey {
    pub fn new(
        scope: SkipScope,
        key: impl Into<String>,
        guild: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            key: key.into(),
            guild: guild.map(str::to_string),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SkippedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.scope, &self.guild) {
            (SkipScope::User, Some(guild)) => write!(
                f,
                "公会 {:?} 中的用户 {:?}：{}",
                guild, self.key, self.reason
            ),
            (SkipScope::MetadataGuild, _) => {
                write!(f, "元数据公会 {:?}：{}", self.key, self.reason)
            }
            _ => write!(f, "公会 {:?}：{}", self.key, self.reason),
        }
    }
}

/// 迁移结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// 迁移 ID
    pub migration_id: String,
    /// 结果消息
    pub message: String,
    /// 迁移的记录数
    pub records_migrated: usize,
    /// 被跳过的键
    pub skipped: Vec<SkippedKey>,
    /// 执行时间（秒）
    pub duration_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_key_display() {
        let guild = SkippedKey::new(SkipScope::Guild, "abc", None, "无法转换为整数 ID");
        assert_eq!(guild.to_string(), "公会 \"abc\"：无法转换为整数 ID");

        let user = SkippedKey::new(SkipScope::User, "x1", Some("10"), "无法转换为整数 ID");
        assert_eq!(user.to_string(), "公会 \"10\" 中的用户 \"x1\"：无法转换为整数 ID");

        let meta = SkippedKey::new(SkipScope::MetadataGuild, "g", None, "无法转换为整数 ID");
        assert!(meta.to_string().starts_with("元数据公会"));
    }

    #[test]
    fn test_skip_scope_serialization() {
        let json = serde_json::to_string(&SkipScope::MetadataGuild).unwrap();
        assert_eq!(json, "\"metadata_guild\"");
    }
}

// Leveling Store - 迁移结果的只读视图
//
// 按线上等级服务的读取方式解码两张目标表，供迁移后的核对与统计使用

use crate::data::{Result, SqliteManager};
use crate::models::{DailyGoal, UserProfile};
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;

/// 等级数据只读存储
pub struct LevelingStore {
    sqlite: SqliteManager,
}

impl LevelingStore {
    /// 打开已迁移的数据库
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            sqlite: SqliteManager::open(path)?,
        })
    }

    pub fn from_manager(sqlite: SqliteManager) -> Self {
        Self { sqlite }
    }

    /// 底层管理器（用于原始查询）
    pub fn manager(&self) -> &SqliteManager {
        &self.sqlite
    }

    /// 获取单个用户档案
    pub fn get_user_profile(&self, user_id: i64, guild_id: i64) -> Result<Option<UserProfile>> {
        let profile = self
            .sqlite
            .connection()
            .query_row(
                "SELECT * FROM user_profiles WHERE user_id = ?1 AND guild_id = ?2",
                params![user_id, guild_id],
                row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    /// 获取公会内的全部用户档案（按用户 ID 排序）
    pub fn get_all_profiles(&self, guild_id: i64) -> Result<Vec<UserProfile>> {
        let mut stmt = self
            .sqlite
            .connection()
            .prepare("SELECT * FROM user_profiles WHERE guild_id = ?1 ORDER BY user_id")?;
        let profiles = stmt
            .query_map([guild_id], row_to_profile)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// 获取公会的每日目标
    pub fn get_daily_goal(&self, guild_id: i64) -> Result<Option<DailyGoal>> {
        let goal = self
            .sqlite
            .connection()
            .query_row(
                "SELECT * FROM daily_goals WHERE guild_id = ?1",
                [guild_id],
                row_to_daily_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// 用户档案总数
    pub fn count_profiles(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM user_profiles")
    }

    /// 每日目标总数
    pub fn count_daily_goals(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM daily_goals")
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let count: i64 = self.sqlite.connection().query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// 列表列解码；内容损坏时按空列表处理
fn decode_list(text: &str) -> Vec<Value> {
    serde_json::from_str(text).unwrap_or_default()
}

fn row_to_profile(row: &Row) -> rusqlite::Result<UserProfile> {
    let achievements_json: String = row.get("achievements")?;
    let xp_history_json: String = row.get("xp_history")?;

    Ok(UserProfile {
        user_id: row.get("user_id")?,
        guild_id: row.get("guild_id")?,
        level: row.get("level")?,
        total_xp: row.get("total_xp")?,
        xp_to_next_level: row.get("xp_to_next_level")?,
        total_commands_used: row.get("total_commands_used")?,
        total_messages: row.get("total_messages")?,
        last_daily: row.get("last_daily")?,
        daily_streak: row.get("daily_streak")?,
        last_message_timestamp: row.get("last_message_timestamp")?,
        achievements: decode_list(&achievements_json),
        best_rank: row.get("best_rank")?,
        previous_rank: row.get("previous_rank")?,
        rank_improvement: row.get("rank_improvement")?,
        images_shared: row.get("images_shared")?,
        long_messages: row.get("long_messages")?,
        links_shared: row.get("links_shared")?,
        goals_completed: row.get("goals_completed")?,
        boost_days: row.get("boost_days")?,
        first_boost_date: row.get("first_boost_date")?,
        xp_history: decode_list(&xp_history_json),
    })
}

fn row_to_daily_goal(row: &Row) -> rusqlite::Result<DailyGoal> {
    let claimers_json: String = row.get("claimers")?;
    let bonus_json: String = row.get("bonus_awarded_to")?;

    Ok(DailyGoal {
        guild_id: row.get("guild_id")?,
        date: row.get("date")?,
        target: row.get("target")?,
        progress: row.get("progress")?,
        claimers: decode_list(&claimers_json),
        completed: row.get("completed")?,
        bonus_awarded_to: decode_list(&bonus_json),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::schema::ensure_schema;
    use serde_json::json;

    fn create_store() -> LevelingStore {
        let sqlite = SqliteManager::in_memory().unwrap();
        ensure_schema(sqlite.connection()).unwrap();
        sqlite
            .execute_raw(
                "INSERT INTO user_profiles (user_id, guild_id, level, achievements)
                     VALUES (2, 10, 3, '[\"first_message\"]');
                 INSERT INTO user_profiles (user_id, guild_id) VALUES (1, 10);
                 INSERT INTO user_profiles (user_id, guild_id) VALUES (1, 20);
                 INSERT INTO daily_goals (guild_id, date, target, progress, claimers, completed)
                     VALUES (10, '2024-01-01', 500, 120, 'not json', 1);",
            )
            .unwrap();
        LevelingStore::from_manager(sqlite)
    }

    #[test]
    fn test_get_user_profile() {
        let store = create_store();

        let profile = store.get_user_profile(2, 10).unwrap().unwrap();
        assert_eq!(profile.level, 3);
        assert_eq!(profile.achievements, vec![json!("first_message")]);
        assert_eq!(profile.best_rank, 999);

        assert!(store.get_user_profile(2, 20).unwrap().is_none());
    }

    #[test]
    fn test_get_all_profiles_is_scoped_to_guild() {
        let store = create_store();

        let profiles = store.get_all_profiles(10).unwrap();
        let ids: Vec<i64> = profiles.iter().map(|p| p.user_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.get_all_profiles(30).unwrap().len(), 0);
    }

    #[test]
    fn test_get_daily_goal_tolerates_bad_list() {
        let store = create_store();

        let goal = store.get_daily_goal(10).unwrap().unwrap();
        assert_eq!(goal.target, 500);
        assert!(goal.completed);
        assert!(goal.claimers.is_empty());
        assert!(store.get_daily_goal(20).unwrap().is_none());
    }

    #[test]
    fn test_counts() {
        let store = create_store();
        assert_eq!(store.count_profiles().unwrap(), 3);
        assert_eq!(store.count_daily_goals().unwrap(), 1);
    }
}

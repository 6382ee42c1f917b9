// 用户档案迁移
//
// 进度分区：公会 ID → 用户 ID → 用户记录 → user_profiles 表

use super::{parse_key_or_skip, record_skip};
use crate::models::leveling::{
    DEFAULT_COUNTER, DEFAULT_LEVEL, DEFAULT_RANK, DEFAULT_TOTAL_XP, DEFAULT_XP_TO_NEXT_LEVEL,
};
use crate::models::{LegacyDocument, LegacyUserRecord, UserProfile};
use crate::services::migration_manager::migration_trait::{
    Migration, MigrationResult, SkipScope, SkippedKey,
};
use crate::services::schema::USER_PROFILES_TABLE;
use crate::utils::coerce::{int_or, list_or_empty, text_opt};
use anyhow::Result;
use rusqlite::{params, Connection};

pub const USER_PROFILE_MIGRATION_ID: &str = "user_profiles_v1";

// INSERT OR REPLACE：整行替换，不与已有行合并
const UPSERT_USER_PROFILE: &str = r#"
INSERT OR REPLACE INTO user_profiles (
    user_id, guild_id, level, total_xp, xp_to_next_level,
    total_commands_used, total_messages, last_daily, daily_streak,
    last_message_timestamp, achievements, best_rank, previous_rank,
    rank_improvement, images_shared, long_messages, links_shared,
    goals_completed, boost_days, first_boost_date, xp_history
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
"#;

/// 用户档案迁移
#[derive(Debug, Default)]
pub struct UserProfileMigration;

impl UserProfileMigration {
    pub fn new() -> Self {
        Self
    }
}

impl Migration for UserProfileMigration {
    fn id(&self) -> &str {
        USER_PROFILE_MIGRATION_ID
    }

    fn name(&self) -> &str {
        "用户档案迁移"
    }

    fn target_table(&self) -> &str {
        USER_PROFILES_TABLE
    }

    fn execute(&self, conn: &Connection, document: &LegacyDocument) -> Result<MigrationResult> {
        tracing::info!("开始迁移用户档案");

        let mut migrated = 0usize;
        let mut skipped = Vec::new();

        for (guild_key, users) in &document.progression {
            let Some(guild_id) = parse_key_or_skip(guild_key, SkipScope::Guild, None, &mut skipped)
            else {
                continue;
            };

            let Some(users) = users.as_object() else {
                record_skip(
                    &mut skipped,
                    SkippedKey::new(SkipScope::Guild, guild_key, None, "公会条目不是对象"),
                );
                continue;
            };

            let mut guild_migrated = 0usize;
            for (user_key, raw_record) in users {
                let Some(user_id) =
                    parse_key_or_skip(user_key, SkipScope::User, Some(guild_key.as_str()), &mut skipped)
                else {
                    continue;
                };

                let Some(record) = LegacyUserRecord::from_value(raw_record) else {
                    record_skip(
                        &mut skipped,
                        SkippedKey::new(
                            SkipScope::User,
                            user_key,
                            Some(guild_key.as_str()),
                            "用户记录不是对象",
                        ),
                    );
                    continue;
                };

                let profile = map_user_record(user_id, guild_id, &record);
                upsert_user_profile(conn, &profile)?;
                guild_migrated += 1;
            }

            tracing::debug!(guild_id, users = guild_migrated, "公会用户迁移完成");
            migrated += guild_migrated;
        }

        tracing::info!(
            migrated,
            skipped = skipped.len(),
            "用户档案迁移完成"
        );

        Ok(MigrationResult {
            migration_id: self.id().to_string(),
            message: format!("已迁移 {} 个用户档案", migrated),
            records_migrated: migrated,
            skipped,
            duration_secs: 0.0, // 由 MigrationManager 填充
        })
    }
}

/// 将旧版用户记录映射为档案行，缺失字段使用表的默认值
pub fn map_user_record(user_id: i64, guild_id: i64, record: &LegacyUserRecord) -> UserProfile {
    UserProfile {
        user_id,
        guild_id,
        level: int_or("level", record.level.as_ref(), DEFAULT_LEVEL),
        total_xp: int_or("total_xp", record.total_xp.as_ref(), DEFAULT_TOTAL_XP),
        xp_to_next_level: int_or(
            "xp_to_next_level",
            record.xp_to_next_level.as_ref(),
            DEFAULT_XP_TO_NEXT_LEVEL,
        ),
        total_commands_used: int_or(
            "total_commands_used",
            record.total_commands_used.as_ref(),
            DEFAULT_COUNTER,
        ),
        total_messages: int_or("total_messages", record.total_messages.as_ref(), DEFAULT_COUNTER),
        last_daily: text_opt("last_daily", record.last_daily.as_ref()),
        daily_streak: int_or("daily_streak", record.daily_streak.as_ref(), DEFAULT_COUNTER),
        last_message_timestamp: text_opt(
            "last_message_timestamp",
            record.last_message_timestamp.as_ref(),
        ),
        achievements: list_or_empty("achievements", record.achievements.as_ref()),
        best_rank: int_or("best_rank", record.best_rank.as_ref(), DEFAULT_RANK),
        previous_rank: int_or("previous_rank", record.previous_rank.as_ref(), DEFAULT_RANK),
        rank_improvement: int_or(
            "rank_improvement",
            record.rank_improvement.as_ref(),
            DEFAULT_COUNTER,
        ),
        images_shared: int_or("images_shared", record.images_shared.as_ref(), DEFAULT_COUNTER),
        long_messages: int_or("long_messages", record.long_messages.as_ref(), DEFAULT_COUNTER),
        links_shared: int_or("links_shared", record.links_shared.as_ref(), DEFAULT_COUNTER),
        goals_completed: int_or(
            "goals_completed",
            record.goals_completed.as_ref(),
            DEFAULT_COUNTER,
        ),
        boost_days: int_or("boost_days", record.boost_days.as_ref(), DEFAULT_COUNTER),
        first_boost_date: text_opt("first_boost_date", record.first_boost_date.as_ref()),
        xp_history: list_or_empty("xp_history", record.xp_history.as_ref()),
    }
}

/// 按 (user_id, guild_id) 写入档案行（整行替换）
pub fn upsert_user_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    let achievements_json = serde_json::to_string(&profile.achievements)?;
    let xp_history_json = serde_json::to_string(&profile.xp_history)?;

    let mut stmt = conn.prepare_cached(UPSERT_USER_PROFILE)?;
    stmt.execute(params![
        profile.user_id,
        profile.guild_id,
        profile.level,
        profile.total_xp,
        profile.xp_to_next_level,
        profile.total_commands_used,
        profile.total_messages,
        profile.last_daily,
        profile.daily_streak,
        profile.last_message_timestamp,
        achievements_json,
        profile.best_rank,
        profile.previous_rank,
        profile.rank_improvement,
        profile.images_shared,
        profile.long_messages,
        profile.links_shared,
        profile.goals_completed,
        profile.boost_days,
        profile.first_boost_date,
        xp_history_json,
    ])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SqliteManager;
    use crate::services::schema::ensure_schema;
    use crate::services::store::LevelingStore;
    use serde_json::json;

    fn run(source: serde_json::Value) -> (LevelingStore, MigrationResult) {
        let sqlite = SqliteManager::in_memory().unwrap();
        ensure_schema(sqlite.connection()).unwrap();
        let document = LegacyDocument::from_value(source).unwrap();
        let result = UserProfileMigration::new()
            .execute(sqlite.connection(), &document)
            .unwrap();
        (LevelingStore::from_manager(sqlite), result)
    }

    #[test]
    fn test_map_full_record() {
        let record = LegacyUserRecord::from_value(&json!({
            "level": 7,
            "total_xp": 3400,
            "xp_to_next_level": 250,
            "total_commands_used": 12,
            "total_messages": 410,
            "last_daily": "2024-01-02T08:00:00Z",
            "daily_streak": 4,
            "last_message_timestamp": "2024-01-03T10:00:00Z",
            "achievements": ["first_message", "chatterbox"],
            "best_rank": 2,
            "previous_rank": 5,
            "rank_improvement": 3,
            "images_shared": 9,
            "long_messages": 6,
            "links_shared": 1,
            "goals_completed": 2,
            "boost_days": 30,
            "first_boost_date": "2023-12-01T00:00:00Z",
            "xp_history": [{"amount": 15, "source": "message"}]
        }))
        .unwrap();

        let profile = map_user_record(1, 10, &record);
        assert_eq!(profile.level, 7);
        assert_eq!(profile.total_xp, 3400);
        assert_eq!(profile.xp_to_next_level, 250);
        assert_eq!(profile.daily_streak, 4);
        assert_eq!(profile.last_daily.as_deref(), Some("2024-01-02T08:00:00Z"));
        assert_eq!(profile.achievements.len(), 2);
        assert_eq!(profile.best_rank, 2);
        assert_eq!(profile.boost_days, 30);
        assert_eq!(profile.xp_history, vec![json!({"amount": 15, "source": "message"})]);
    }

    #[test]
    fn test_map_empty_record_uses_defaults() {
        let record = LegacyUserRecord::from_value(&json!({})).unwrap();
        assert_eq!(map_user_record(1, 10, &record), UserProfile::new(1, 10));
    }

    #[test]
    fn test_map_coerces_loose_types() {
        let record = LegacyUserRecord::from_value(&json!({
            "level": "4",
            "total_xp": 150.0,
            "best_rank": "first",
            "achievements": "not-a-list",
            "last_daily": 1700000000
        }))
        .unwrap();

        let profile = map_user_record(1, 10, &record);
        assert_eq!(profile.level, 4);
        assert_eq!(profile.total_xp, 150);
        assert_eq!(profile.best_rank, 999);
        assert!(profile.achievements.is_empty());
        assert_eq!(profile.last_daily.as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_invalid_guild_key_skips_whole_guild() {
        let (store, result) = run(json!({
            "abc": {"1": {"level": 2}},
            "10": {"1": {"level": 5}}
        }));

        assert_eq!(result.records_migrated, 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].scope, SkipScope::Guild);
        assert_eq!(result.skipped[0].key, "abc");
        assert_eq!(store.count_profiles().unwrap(), 1);
        assert_eq!(store.get_user_profile(1, 10).unwrap().unwrap().level, 5);
    }

    #[test]
    fn test_invalid_user_key_keeps_siblings() {
        let (store, result) = run(json!({
            "10": {
                "1": {"level": 2},
                "not-a-user": {"level": 9},
                "3": {"level": 4}
            }
        }));

        assert_eq!(result.records_migrated, 2);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].scope, SkipScope::User);
        assert_eq!(result.skipped[0].guild.as_deref(), Some("10"));
        let ids: Vec<i64> = store
            .get_all_profiles(10)
            .unwrap()
            .iter()
            .map(|p| p.user_id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let (store, result) = run(json!({
            "10": [1, 2, 3],
            "20": {"1": 42, "2": {}}
        }));

        assert_eq!(result.records_migrated, 1);
        assert_eq!(result.skipped.len(), 2);
        assert!(store.get_user_profile(2, 20).unwrap().is_some());
        assert!(store.get_user_profile(1, 20).unwrap().is_none());
    }

    #[test]
    fn test_list_columns_are_serialized_arrays() {
        let (store, _) = run(json!({"10": {"1": {}, "2": {"achievements": ["a", "b"]}}}));

        let rows = store
            .manager()
            .query(
                "SELECT achievements, xp_history FROM user_profiles ORDER BY user_id",
                [],
            )
            .unwrap();
        assert_eq!(rows[0].values, vec![json!("[]"), json!("[]")]);
        assert_eq!(rows[1].values, vec![json!("[\"a\",\"b\"]"), json!("[]")]);
    }
}

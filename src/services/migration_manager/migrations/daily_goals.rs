// 每日目标迁移
//
// 元数据分区：公会 ID → { daily_goal } → daily_goals 表（每个公会一行）

use super::{parse_key_or_skip, record_skip};
use crate::models::{DailyGoal, LegacyDailyGoal, LegacyDocument, LegacyGuildMeta};
use crate::services::migration_manager::migration_trait::{
    Migration, MigrationResult, SkipScope, SkippedKey,
};
use crate::services::schema::DAILY_GOALS_TABLE;
use crate::utils::coerce::{bool_or, int_or, list_or_empty};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde_json::Value;

pub const DAILY_GOAL_MIGRATION_ID: &str = "daily_goals_v1";

const UPSERT_DAILY_GOAL: &str = r#"
INSERT OR REPLACE INTO daily_goals (
    guild_id, date, target, progress, claimers, completed, bonus_awarded_to
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// 每日目标迁移
#[derive(Debug, Default)]
pub struct DailyGoalMigration;

impl DailyGoalMigration {
    pub fn new() -> Self {
        Self
    }
}

impl Migration for DailyGoalMigration {
    fn id(&self) -> &str {
        DAILY_GOAL_MIGRATION_ID
    }

    fn name(&self) -> &str {
        "每日目标迁移"
    }

    fn target_table(&self) -> &str {
        DAILY_GOALS_TABLE
    }

    fn execute(&self, conn: &Connection, document: &LegacyDocument) -> Result<MigrationResult> {
        tracing::info!("开始迁移每日目标");

        let mut migrated = 0usize;
        let mut skipped = Vec::new();

        for (guild_key, raw_meta) in &document.metadata {
            let Some(guild_id) =
                parse_key_or_skip(guild_key, SkipScope::MetadataGuild, None, &mut skipped)
            else {
                continue;
            };

            let Some(meta) = LegacyGuildMeta::from_value(raw_meta) else {
                record_skip(
                    &mut skipped,
                    SkippedKey::new(SkipScope::MetadataGuild, guild_key, None, "公会元数据不是对象"),
                );
                continue;
            };

            // 没有每日目标的公会不写入、不计数
            let Some(raw_goal) = meta.active_daily_goal() else {
                tracing::debug!(guild_id, "公会没有每日目标");
                continue;
            };

            let Some(legacy_goal) = LegacyDailyGoal::from_value(raw_goal) else {
                record_skip(
                    &mut skipped,
                    SkippedKey::new(SkipScope::MetadataGuild, guild_key, None, "daily_goal 不是对象"),
                );
                continue;
            };

            let goal = map_daily_goal(guild_id, &legacy_goal);
            upsert_daily_goal(conn, &goal)?;
            migrated += 1;
        }

        tracing::info!(
            migrated,
            skipped = skipped.len(),
            "每日目标迁移完成"
        );

        Ok(MigrationResult {
            migration_id: self.id().to_string(),
            message: format!("已迁移 {} 个每日目标", migrated),
            records_migrated: migrated,
            skipped,
            duration_secs: 0.0, // 由 MigrationManager 填充
        })
    }
}

/// 将旧版每日目标映射为目标行
pub fn map_daily_goal(guild_id: i64, goal: &LegacyDailyGoal) -> DailyGoal {
    let date = match goal.date.as_ref() {
        None => String::new(),
        Some(Value::String(date)) => date.clone(),
        Some(other) => {
            tracing::warn!(guild_id, value = %other, "date 不是字符串，使用空字符串");
            String::new()
        }
    };

    DailyGoal {
        guild_id,
        date,
        target: int_or("target", goal.target.as_ref(), 0),
        progress: int_or("progress", goal.progress.as_ref(), 0),
        claimers: list_or_empty("claimers", goal.claimers.as_ref()),
        completed: bool_or("completed", goal.completed.as_ref(), false),
        bonus_awarded_to: list_or_empty("bonus_awarded_to", goal.bonus_awarded_to.as_ref()),
    }
}

/// 按 guild_id 写入每日目标（整行替换）
pub fn upsert_daily_goal(conn: &Connection, goal: &DailyGoal) -> Result<()> {
    let claimers_json = serde_json::to_string(&goal.claimers)?;
    let bonus_json = serde_json::to_string(&goal.bonus_awarded_to)?;

    let mut stmt = conn.prepare_cached(UPSERT_DAILY_GOAL)?;
    stmt.execute(params![
        goal.guild_id,
        goal.date,
        goal.target,
        goal.progress,
        claimers_json,
        goal.completed,
        bonus_json,
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

    fn run(source: Value) -> (LevelingStore, MigrationResult) {
        let sqlite = SqliteManager::in_memory().unwrap();
        ensure_schema(sqlite.connection()).unwrap();
        let document = LegacyDocument::from_value(source).unwrap();
        let result = DailyGoalMigration::new()
            .execute(sqlite.connection(), &document)
            .unwrap();
        (LevelingStore::from_manager(sqlite), result)
    }

    #[test]
    fn test_migrate_daily_goal() {
        let (store, result) = run(json!({
            "__meta__": {
                "10": {"daily_goal": {
                    "date": "2024-01-01",
                    "target": 500,
                    "progress": 120,
                    "claimers": ["1"],
                    "completed": false,
                    "bonus_awarded_to": []
                }}
            }
        }));

        assert_eq!(result.records_migrated, 1);
        let goal = store.get_daily_goal(10).unwrap().unwrap();
        assert_eq!(goal.date, "2024-01-01");
        assert_eq!(goal.target, 500);
        assert_eq!(goal.progress, 120);
        assert_eq!(goal.claimers, vec![json!("1")]);
        assert!(!goal.completed);
        assert!(goal.bonus_awarded_to.is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let goal = map_daily_goal(
            10,
            &LegacyDailyGoal::from_value(&json!({"target": 50})).unwrap(),
        );
        assert_eq!(
            goal,
            DailyGoal {
                target: 50,
                ..DailyGoal::new(10)
            }
        );
    }

    #[test]
    fn test_absent_or_falsy_goal_writes_nothing() {
        let (store, result) = run(json!({
            "__meta__": {
                "10": {},
                "20": {"daily_goal": null},
                "30": {"daily_goal": {}},
                "40": {"daily_goal": false}
            }
        }));

        assert_eq!(result.records_migrated, 0);
        assert!(result.skipped.is_empty());
        assert_eq!(store.count_daily_goals().unwrap(), 0);
    }

    #[test]
    fn test_invalid_meta_entries_are_skipped() {
        let (store, result) = run(json!({
            "__meta__": {
                "general": {"daily_goal": {"target": 1}},
                "10": "oops",
                "20": {"daily_goal": true},
                "30": {"daily_goal": {"target": 3}}
            }
        }));

        assert_eq!(result.records_migrated, 1);
        assert_eq!(result.skipped.len(), 3);
        assert!(result
            .skipped
            .iter()
            .all(|s| s.scope == SkipScope::MetadataGuild));
        assert_eq!(store.get_daily_goal(30).unwrap().unwrap().target, 3);
    }

    #[test]
    fn test_later_duplicate_guild_overwrites_earlier() {
        let (store, result) = run(json!({
            "__meta__": {
                "10": {"daily_goal": {"target": 1}},
                "010": {"daily_goal": {"target": 2}}
            }
        }));

        assert_eq!(result.records_migrated, 2);
        assert_eq!(store.count_daily_goals().unwrap(), 1);
        assert_eq!(store.get_daily_goal(10).unwrap().unwrap().target, 2);
    }
}

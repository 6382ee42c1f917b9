// Migrations - 各目标表的迁移实现
//
// 按注册顺序执行：先用户档案，后每日目标

mod daily_goals;
mod user_profiles;

pub use daily_goals::{map_daily_goal, upsert_daily_goal, DailyGoalMigration, DAILY_GOAL_MIGRATION_ID};
pub use user_profiles::{
    map_user_record, upsert_user_profile, UserProfileMigration, USER_PROFILE_MIGRATION_ID,
};

use super::migration_trait::{SkipScope, SkippedKey};
use crate::utils::coerce::parse_id;

/// 记录一个被跳过的键并输出警告
pub(crate) fn record_skip(skipped: &mut Vec<SkippedKey>, entry: SkippedKey) {
    tracing::warn!(
        scope = ?entry.scope,
        key = %entry.key,
        guild = ?entry.guild,
        reason = %entry.reason,
        "跳过无效条目"
    );
    skipped.push(entry);
}

/// 将 ID 键转换为整数；失败时记录跳过并返回 `None`
pub(crate) fn parse_key_or_skip(
    raw: &str,
    scope: SkipScope,
    guild: Option<&str>,
    skipped: &mut Vec<SkippedKey>,
) -> Option<i64> {
    match parse_id(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            record_skip(skipped, SkippedKey::new(scope, raw, guild, e.to_string()));
            None
        }
    }
}

// Schema Ensurer - 目标表结构
//
// 只做 CREATE TABLE IF NOT EXISTS，不修改、不删除已有表中的数据。
// 列定义与线上等级服务使用的表保持一致。

use crate::data::Result;
use rusqlite::Connection;

pub const USER_PROFILES_TABLE: &str = "user_profiles";
pub const DAILY_GOALS_TABLE: &str = "daily_goals";

const CREATE_USER_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    user_id INTEGER NOT NULL,
    guild_id INTEGER NOT NULL,
    level INTEGER NOT NULL DEFAULT 1,
    total_xp INTEGER NOT NULL DEFAULT 0,
    xp_to_next_level INTEGER NOT NULL DEFAULT 100,
    total_commands_used INTEGER NOT NULL DEFAULT 0,
    total_messages INTEGER NOT NULL DEFAULT 0,
    last_daily TEXT,
    daily_streak INTEGER NOT NULL DEFAULT 0,
    last_message_timestamp TEXT,
    achievements TEXT NOT NULL DEFAULT '[]',
    best_rank INTEGER NOT NULL DEFAULT 999,
    previous_rank INTEGER NOT NULL DEFAULT 999,
    rank_improvement INTEGER NOT NULL DEFAULT 0,
    images_shared INTEGER NOT NULL DEFAULT 0,
    long_messages INTEGER NOT NULL DEFAULT 0,
    links_shared INTEGER NOT NULL DEFAULT 0,
    goals_completed INTEGER NOT NULL DEFAULT 0,
    boost_days INTEGER NOT NULL DEFAULT 0,
    first_boost_date TEXT,
    xp_history TEXT NOT NULL DEFAULT '[]',
    PRIMARY KEY (user_id, guild_id)
);
"#;

const CREATE_DAILY_GOALS: &str = r#"
CREATE TABLE IF NOT EXISTS daily_goals (
    guild_id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    target INTEGER NOT NULL,
    progress INTEGER NOT NULL,
    claimers TEXT NOT NULL DEFAULT '[]',
    completed BOOLEAN NOT NULL DEFAULT 0,
    bonus_awarded_to TEXT NOT NULL DEFAULT '[]'
);
"#;

/// 确保两张目标表存在（每次运行都可以安全调用）
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_USER_PROFILES)?;
    conn.execute_batch(CREATE_DAILY_GOALS)?;
    tracing::debug!("目标表结构已就绪: {}, {}", USER_PROFILES_TABLE, DAILY_GOALS_TABLE);
    Ok(())
}

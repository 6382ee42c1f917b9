//! 目标表的行模型
//!
//! 字段与 `user_profiles` / `daily_goals` 两张表一一对应。
//! 列表字段以 JSON 数组形式保存，写库时序列化为文本。

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LEVEL: i64 = 1;
pub const DEFAULT_TOTAL_XP: i64 = 0;
pub const DEFAULT_XP_TO_NEXT_LEVEL: i64 = 100;
pub const DEFAULT_RANK: i64 = 999;
pub const DEFAULT_COUNTER: i64 = 0;

/// `user_profiles` 表中的一行，主键 (user_id, guild_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub guild_id: i64,
    pub level: i64,
    pub total_xp: i64,
    pub xp_to_next_level: i64,
    pub total_commands_used: i64,
    pub total_messages: i64,
    pub last_daily: Option<String>,
    pub daily_streak: i64,
    pub last_message_timestamp: Option<String>,
    pub achievements: Vec<Value>,
    pub best_rank: i64,
    pub previous_rank: i64,
    pub rank_improvement: i64,
    pub images_shared: i64,
    pub long_messages: i64,
    pub links_shared: i64,
    pub goals_completed: i64,
    pub boost_days: i64,
    pub first_boost_date: Option<String>,
    pub xp_history: Vec<Value>,
}

impl UserProfile {
    /// 创建带默认值的档案
    pub fn new(user_id: i64, guild_id: i64) -> Self {
        Self {
            user_id,
            guild_id,
            level: DEFAULT_LEVEL,
            total_xp: DEFAULT_TOTAL_XP,
            xp_to_next_level: DEFAULT_XP_TO_NEXT_LEVEL,
            total_commands_used: DEFAULT_COUNTER,
            total_messages: DEFAULT_COUNTER,
            last_daily: None,
            daily_streak: DEFAULT_COUNTER,
            last_message_timestamp: None,
            achievements: Vec::new(),
            best_rank: DEFAULT_RANK,
            previous_rank: DEFAULT_RANK,
            rank_improvement: DEFAULT_COUNTER,
            images_shared: DEFAULT_COUNTER,
            long_messages: DEFAULT_COUNTER,
            links_shared: DEFAULT_COUNTER,
            goals_completed: DEFAULT_COUNTER,
            boost_days: DEFAULT_COUNTER,
            first_boost_date: None,
            xp_history: Vec::new(),
        }
    }
}

/// `daily_goals` 表中的一行，每个公会至多一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub guild_id: i64,
    pub date: String,
    pub target: i64,
    pub progress: i64,
    pub claimers: Vec<Value>,
    pub completed: bool,
    pub bonus_awarded_to: Vec<Value>,
}

impl DailyGoal {
    pub fn new(guild_id: i64) -> Self {
        Self {
            guild_id,
            date: String::new(),
            target: 0,
            progress: 0,
            claimers: Vec::new(),
            completed: false,
            bonus_awarded_to: Vec::new(),
        }
    }
}

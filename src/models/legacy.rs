//! 旧版等级文档模型
//!
//! 旧版 `levels.json` 的顶层是一个对象，混合了三类键：
//! - `__meta__`：按公会存放的辅助状态（当前的每日目标）
//! - `__legacy__`：早已弃用的旧格式，迁移时直接丢弃
//! - 其余所有键：公会 ID → 用户 ID → 用户进度记录
//!
//! 文档不带任何 schema，字段类型也不可靠，因此这里只做分区，
//! 嵌套内容保持原样，留给迁移阶段逐条转换。

use crate::data::{DataError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// 元数据分区的保留键
pub const META_KEY: &str = "__meta__";
/// 弃用分区的保留键
pub const LEGACY_KEY: &str = "__legacy__";

/// 分区后的旧版文档（整份位于内存中，运行结束即丢弃）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyDocument {
    /// 公会 ID 字符串 → 该公会的用户记录（未校验）
    pub progression: Map<String, Value>,
    /// 公会 ID 字符串 → 公会元数据（未校验）
    pub metadata: Map<String, Value>,
}

impl LegacyDocument {
    /// 按顶层键对文档分区
    ///
    /// 只要求顶层是对象；元数据分区不是对象时按空处理。
    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(DataError::InvalidDocument(format!(
                    "顶层应为对象，实际为 {}",
                    json_type_name(&other)
                )));
            }
        };

        let metadata = match root.shift_remove(META_KEY) {
            Some(Value::Object(meta)) => meta,
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                tracing::warn!(
                    kind = json_type_name(&other),
                    "{} 分区不是对象，已忽略",
                    META_KEY
                );
                Map::new()
            }
        };

        if root.shift_remove(LEGACY_KEY).is_some() {
            tracing::debug!("已丢弃弃用分区 {}", LEGACY_KEY);
        }

        Ok(Self {
            progression: root,
            metadata,
        })
    }

    /// 进度分区中的公会数（含无效键）
    pub fn guild_count(&self) -> usize {
        self.progression.len()
    }
}

/// 单个用户的旧版进度记录
///
/// 所有字段都可能缺失；`null` 与缺失等价。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyUserRecord {
    pub level: Option<Value>,
    pub total_xp: Option<Value>,
    pub xp_to_next_level: Option<Value>,
    pub total_commands_used: Option<Value>,
    pub total_messages: Option<Value>,
    pub last_daily: Option<Value>,
    pub daily_streak: Option<Value>,
    pub last_message_timestamp: Option<Value>,
    pub achievements: Option<Value>,
    pub best_rank: Option<Value>,
    pub previous_rank: Option<Value>,
    pub rank_improvement: Option<Value>,
    pub images_shared: Option<Value>,
    pub long_messages: Option<Value>,
    pub links_shared: Option<Value>,
    pub goals_completed: Option<Value>,
    pub boost_days: Option<Value>,
    pub first_boost_date: Option<Value>,
    pub xp_history: Option<Value>,
}

impl LegacyUserRecord {
    /// 从原始 JSON 值解析；非对象返回 `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }
}

/// 公会元数据
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyGuildMeta {
    pub daily_goal: Option<Value>,
}

impl LegacyGuildMeta {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }

    /// 有效的每日目标：缺失或为“假值”（null/false/0/""/{}/[]）时返回 `None`
    pub fn active_daily_goal(&self) -> Option<&Value> {
        self.daily_goal
            .as_ref()
            .filter(|goal| crate::utils::coerce::is_truthy(goal))
    }
}

/// 旧版每日目标
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyDailyGoal {
    pub date: Option<Value>,
    pub target: Option<Value>,
    pub progress: Option<Value>,
    pub claimers: Option<Value>,
    pub completed: Option<Value>,
    pub bonus_awarded_to: Option<Value>,
}

impl LegacyDailyGoal {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }
}

/// JSON 值的类型名（日志使用）
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

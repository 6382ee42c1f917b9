//! 宽松类型转换
//!
//! 旧版文档没有 schema：数字可能写成字符串，字段可能为 null。
//! 这里的函数只做最基本的类型转换，失败时由调用方决定跳过还是回落到默认值。

use crate::data::{DataError, Result};
use serde_json::Value;

/// 将公会/用户 ID 键解析为整数
///
/// 允许首尾空白、正负号，以及数字之间的单个下划线（`"1_000"`）。
pub fn parse_id(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    let grouping_ok = !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__");

    if grouping_ok {
        if let Ok(id) = trimmed.replace('_', "").parse::<i64>() {
            return Ok(id);
        }
    }
    Err(DataError::InvalidKey(raw.to_string()))
}

/// 按“真值”语义判断：null、false、0、空字符串、空数组、空对象为假
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 整数转换：整数、整值浮点数、数字字符串、布尔值
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_id(s).ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// 布尔转换：布尔值或整数（非 0 为真）
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

/// 读取整数字段，缺失时使用默认值，类型不符时记录警告并使用默认值
pub fn int_or(field: &str, value: Option<&Value>, default: i64) -> i64 {
    match value {
        None => default,
        Some(v) => as_integer(v).unwrap_or_else(|| {
            tracing::warn!(field, value = %v, default, "字段无法转换为整数，使用默认值");
            default
        }),
    }
}

/// 读取布尔字段
pub fn bool_or(field: &str, value: Option<&Value>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => as_bool(v).unwrap_or_else(|| {
            tracing::warn!(field, value = %v, default, "字段无法转换为布尔值，使用默认值");
            default
        }),
    }
}

/// 读取可空文本字段（时间戳等）
///
/// 数字与布尔值按 TEXT 列的存储结果转成文本（`1700000000` → `"1700000000"`，`true` → `"1"`），
/// 数组和对象视为缺失。
pub fn text_opt(field: &str, value: Option<&Value>) -> Option<String> {
    match value {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(i64::from(*b).to_string()),
        Some(v) => {
            tracing::warn!(field, value = %v, "字段不是字符串，按缺失处理");
            None
        }
    }
}

/// 读取列表字段，缺失或非数组时返回空列表
pub fn list_or_empty(field: &str, value: Option<&Value>) -> Vec<Value> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(v) => {
            tracing::warn!(field, value = %v, "字段不是数组，使用空列表");
            Vec::new()
        }
    }
}

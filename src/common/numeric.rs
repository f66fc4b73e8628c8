// ==========================================
// SIMONTOK 油站监控系统 - 数值清洗工具
// ==========================================
// 职责: 上游数值字段（库存/消耗/天数）的统一清洗入口
// 红线: 全系统只允许这一处实现清洗规则，调用方不得自行内联判断
// ==========================================
// 规则:
// - 有限数值 → 原值
// - 字符串 → 去空白后解析，解析结果有限才采用
// - 其他（null / 缺失 / 非数字字符串 / NaN / ±Infinity）→ 无效
// ==========================================

use rusqlite::types::ValueRef;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 待清洗的原始数值
///
/// 覆盖上游可能出现的所有形态：数值、字符串、缺失。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl From<f64> for NumericInput<'_> {
    fn from(v: f64) -> Self {
        NumericInput::Number(v)
    }
}

impl From<i64> for NumericInput<'_> {
    fn from(v: i64) -> Self {
        NumericInput::Number(v as f64)
    }
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(v: &'a str) -> Self {
        NumericInput::Text(v)
    }
}

impl<'a, T> From<Option<T>> for NumericInput<'a>
where
    T: Into<NumericInput<'a>>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => NumericInput::Missing,
        }
    }
}

impl<'a> From<&'a Value> for NumericInput<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Number(n) => n.as_f64().map(NumericInput::Number).unwrap_or(NumericInput::Missing),
            Value::String(s) => NumericInput::Text(s.as_str()),
            // bool / array / object / null 一律视为缺失
            _ => NumericInput::Missing,
        }
    }
}

impl<'a> From<ValueRef<'a>> for NumericInput<'a> {
    fn from(v: ValueRef<'a>) -> Self {
        match v {
            ValueRef::Integer(i) => NumericInput::Number(i as f64),
            ValueRef::Real(r) => NumericInput::Number(r),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => NumericInput::Text(s),
                Err(_) => NumericInput::Missing,
            },
            ValueRef::Null | ValueRef::Blob(_) => NumericInput::Missing,
        }
    }
}

/// 清洗为有限数值
///
/// # 返回
/// - Some(f64): 有限数值
/// - None: 无法得到有限数值
pub fn coerce_finite<'a>(input: impl Into<NumericInput<'a>>) -> Option<f64> {
    let value = match input.into() {
        NumericInput::Number(n) => n,
        NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        NumericInput::Missing => return None,
    };

    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// 清洗为有限数值，无效时取 0
///
/// 库存、消耗、销量等字段统一使用此规则。
pub fn coerce_or_zero<'a>(input: impl Into<NumericInput<'a>>) -> f64 {
    coerce_finite(input).unwrap_or(0.0)
}

/// 清洗为非负有限数值，无效或负数时取 0
pub fn coerce_non_negative<'a>(input: impl Into<NumericInput<'a>>) -> f64 {
    coerce_or_zero(input).max(0.0)
}

// ==========================================
// serde 反序列化适配
// ==========================================
// 外部 JSON（缓存/推送回放）中的数值字段可能是字符串或 null，
// 反序列化阶段直接经过同一清洗规则。
// 注意: 字段需同时标注 #[serde(default)]，缺失字段才会落到默认值。

/// 反序列化为 f64，无效时取 0
pub fn deserialize_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_or_zero(&raw))
}

/// 反序列化为 Option<f64>，无效时为 None
pub fn deserialize_finite_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_finite(&raw))
}

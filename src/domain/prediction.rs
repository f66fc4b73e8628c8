// ==========================================
// SIMONTOK 油站监控系统 - 断油预测领域模型
// ==========================================
// 职责: 消耗画像 (ConsumptionProfile) 与断油预测 (StockoutPrediction)
// 生命周期: 仅存在于单次预测请求内，不落库
// 红线: 对外字段名 (camelCase) 是驾驶舱/实时推送的契约，改动需升版本
// ==========================================

use crate::common::numeric::{coerce_finite, deserialize_or_zero};
use crate::domain::types::{ConfidenceLevel, ConsumptionTrend, StockoutSeverity, UnavailableReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ==========================================
// ConsumptionProfile - 消耗画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionProfile {
    // ===== 主键 =====
    pub station_id: i64,
    pub fuel_type: String,

    // ===== 消耗指标 =====
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub avg_daily_consumption: f64,   // 日均消耗 (升/天)
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub avg_transactions_per_day: f64, // 日均交易笔数
    pub consumption_trend: ConsumptionTrend,
    pub confidence_level: ConfidenceLevel,

    // ===== 样本信息 (可解释性) =====
    #[serde(default)]
    pub window_days: u32,   // 窗口天数
    #[serde(default)]
    pub sale_count: usize,  // 窗口内交易笔数
    #[serde(default)]
    pub active_days: u32,   // 窗口内有销售的天数
}

impl ConsumptionProfile {
    /// 无数据画像: 零消耗 + 低置信度
    pub fn empty(station_id: i64, fuel_type: &str, window_days: u32) -> Self {
        Self {
            station_id,
            fuel_type: fuel_type.to_string(),
            avg_daily_consumption: 0.0,
            avg_transactions_per_day: 0.0,
            consumption_trend: ConsumptionTrend::Stable,
            confidence_level: ConfidenceLevel::Low,
            window_days,
            sale_count: 0,
            active_days: 0,
        }
    }
}

// ==========================================
// DaysUntilStockout - 距断油天数
// ==========================================
// Unbounded: 消耗为 0，不存在可预见的断油
// 序列化: Finite → 数值, Unbounded → null (前端对 null 有专门处理，NaN 会导致渲染崩溃)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DaysUntilStockout {
    Finite(f64),
    #[default]
    Unbounded,
}

impl DaysUntilStockout {
    /// 构造有限天数，非有限值落入 Unbounded，负数截为 0
    pub fn from_days(days: f64) -> Self {
        if days.is_finite() {
            DaysUntilStockout::Finite(days.max(0.0))
        } else {
            DaysUntilStockout::Unbounded
        }
    }

    /// 有限天数
    pub fn finite(&self) -> Option<f64> {
        match self {
            DaysUntilStockout::Finite(d) => Some(*d),
            DaysUntilStockout::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, DaysUntilStockout::Unbounded)
    }

    /// 是否在给定天数内断油（Unbounded 永远为 false）
    pub fn within(&self, threshold_days: f64) -> bool {
        self.finite().map(|d| d <= threshold_days).unwrap_or(false)
    }
}

impl Serialize for DaysUntilStockout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DaysUntilStockout::Finite(d) => serializer.serialize_f64(*d),
            DaysUntilStockout::Unbounded => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DaysUntilStockout {
    /// 外部回放的天数同样经过统一清洗；无效值视为 Unbounded 而非 0
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match coerce_finite(&raw) {
            Some(days) => DaysUntilStockout::from_days(days),
            None => DaysUntilStockout::Unbounded,
        })
    }
}

// ==========================================
// StockoutPrediction - 断油预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockoutPrediction {
    pub fuel_type: String,

    // ===== 油罐状态 =====
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub current_stock: f64,
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub tank_capacity: f64,

    // ===== 消耗画像 (来自 ConsumptionProfile) =====
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub avg_daily_consumption: f64,
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub avg_transactions_per_day: f64,
    pub consumption_trend: ConsumptionTrend,
    pub confidence_level: ConfidenceLevel,

    // ===== 预测结果 =====
    #[serde(default)]
    pub days_until_stockout: DaysUntilStockout,
    #[serde(default)]
    pub predicted_stockout_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub recommended_order_volume: f64,
    #[serde(default = "default_severity")]
    pub severity: StockoutSeverity,
}

fn default_severity() -> StockoutSeverity {
    StockoutSeverity::None
}

// ==========================================
// PredictionOutcome - 单个 (油站, 油品) 的预测结果
// ==========================================
// 缺油罐/读取失败不是异常，而是显式的"无预测"结果，
// 保证遍历多个油品时不会因单个缺失而中断
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionOutcome {
    Available(StockoutPrediction),
    #[serde(rename_all = "camelCase")]
    Unavailable {
        fuel_type: String,
        reason: UnavailableReason,
    },
}

impl PredictionOutcome {
    pub fn fuel_type(&self) -> &str {
        match self {
            PredictionOutcome::Available(p) => &p.fuel_type,
            PredictionOutcome::Unavailable { fuel_type, .. } => fuel_type,
        }
    }

    pub fn prediction(&self) -> Option<&StockoutPrediction> {
        match self {
            PredictionOutcome::Available(p) => Some(p),
            PredictionOutcome::Unavailable { .. } => None,
        }
    }

    /// 排序用严重等级（无预测视为 None）
    pub fn severity(&self) -> StockoutSeverity {
        self.prediction()
            .map(|p| p.severity)
            .unwrap_or(StockoutSeverity::None)
    }
}

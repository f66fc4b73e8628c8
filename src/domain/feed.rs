// ==========================================
// SIMONTOK 油站监控系统 - 驾驶舱推送数据结构
// ==========================================
// 用途: 实时推送通道 / 告警横幅 / 进油下单提示 的统一载荷
// 说明: 引擎只产出数据结构，推送传输由外部负责
// ==========================================

use crate::domain::prediction::{DaysUntilStockout, PredictionOutcome, StockoutPrediction};
use crate::domain::types::StockoutSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ReorderPrompt - 进油下单提示
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPrompt {
    pub fuel_type: String,
    pub severity: StockoutSeverity,
    pub recommended_order_volume: f64,
    pub days_until_stockout: DaysUntilStockout,
    pub predicted_stockout_date: Option<DateTime<Utc>>,
}

impl ReorderPrompt {
    /// 由预测生成下单提示；建议进油量为 0（满罐）时不提示
    pub fn from_prediction(prediction: &StockoutPrediction) -> Option<Self> {
        if prediction.recommended_order_volume <= 0.0 {
            return None;
        }

        Some(Self {
            fuel_type: prediction.fuel_type.clone(),
            severity: prediction.severity,
            recommended_order_volume: prediction.recommended_order_volume,
            days_until_stockout: prediction.days_until_stockout,
            predicted_stockout_date: prediction.predicted_stockout_date,
        })
    }
}

// ==========================================
// SeverityCounts - 分级统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub none: usize,
    pub unavailable: usize,
}

impl SeverityCounts {
    pub fn from_outcomes(outcomes: &[PredictionOutcome]) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            match outcome.prediction().map(|p| p.severity) {
                Some(StockoutSeverity::Critical) => counts.critical += 1,
                Some(StockoutSeverity::High) => counts.high += 1,
                Some(StockoutSeverity::Medium) => counts.medium += 1,
                Some(StockoutSeverity::None) => counts.none += 1,
                None => counts.unavailable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.none + self.unavailable
    }
}

// ==========================================
// StockoutFeed - 单油站推送载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockoutFeed {
    pub feed_id: String,
    pub station_id: i64,
    pub generated_at: DateTime<Utc>,
    pub predictions: Vec<PredictionOutcome>,
    pub critical_stocks: Vec<StockoutPrediction>,
    pub reorder_prompts: Vec<ReorderPrompt>,
    pub severity_counts: SeverityCounts,
}

impl StockoutFeed {
    /// 是否需要前端弹出告警横幅
    pub fn has_alerts(&self) -> bool {
        !self.critical_stocks.is_empty()
    }
}

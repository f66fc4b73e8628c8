// ==========================================
// SIMONTOK 油站监控系统 - 断油判定引擎
// ==========================================
// 职责: 由消耗画像 + 油罐库存计算断油天数 / 预计断油时间 / 建议进油量 / 严重等级
// 红线: 任意非法数值输入都不得 panic，降级为 severity=none
// 红线: 严重等级只由 days_until_stockout 决定，Unbounded 永远不是 critical
// ==========================================

use crate::common::numeric::{coerce_finite, coerce_non_negative, coerce_or_zero, NumericInput};
use crate::config::{PredictionConfig, SeverityThresholds};
use crate::domain::prediction::{ConsumptionProfile, DaysUntilStockout, StockoutPrediction};
use crate::domain::tank::TankRecord;
use crate::domain::types::{ConfidenceLevel, ConsumptionTrend, DaysRounding, StockoutSeverity};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

/// 预计断油时间的最大推算范围（天），超出则不给出日期
pub const MAX_PREDICTION_HORIZON_DAYS: f64 = 36_500.0;

// ==========================================
// StockoutInput - 判定输入（清洗前）
// ==========================================
// 数值字段保留原始形态，统一在 classify_input 中清洗
#[derive(Debug, Clone, Copy)]
pub struct StockoutInput<'a> {
    pub fuel_type: &'a str,
    pub current_stock: NumericInput<'a>,
    pub tank_capacity: NumericInput<'a>,
    pub avg_daily_consumption: NumericInput<'a>,
    pub avg_transactions_per_day: NumericInput<'a>,
    pub consumption_trend: ConsumptionTrend,
    pub confidence_level: ConfidenceLevel,
}

impl<'a> StockoutInput<'a> {
    /// 由油罐与消耗画像组装输入
    pub fn from_records(tank: &'a TankRecord, profile: &'a ConsumptionProfile) -> Self {
        Self {
            fuel_type: &tank.fuel_type,
            current_stock: tank.current_stock.into(),
            tank_capacity: tank.capacity.into(),
            avg_daily_consumption: profile.avg_daily_consumption.into(),
            avg_transactions_per_day: profile.avg_transactions_per_day.into(),
            consumption_trend: profile.consumption_trend,
            confidence_level: profile.confidence_level,
        }
    }
}

// ==========================================
// StockoutClassifier - 断油判定引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct StockoutClassifier {
    thresholds: SeverityThresholds,
    rounding: DaysRounding,
}

impl StockoutClassifier {
    pub fn new(thresholds: SeverityThresholds, rounding: DaysRounding) -> Self {
        Self {
            thresholds,
            rounding,
        }
    }

    pub fn from_config(config: &PredictionConfig) -> Self {
        Self::new(config.severity, config.days_rounding)
    }

    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定单个油罐
    ///
    /// # 参数
    /// - `tank`: 油罐（库存/罐容）
    /// - `profile`: 消耗画像
    /// - `now`: 当前时间（由调用方注入，保证幂等）
    pub fn classify(
        &self,
        tank: &TankRecord,
        profile: &ConsumptionProfile,
        now: DateTime<Utc>,
    ) -> StockoutPrediction {
        self.classify_input(&StockoutInput::from_records(tank, profile), now)
    }

    /// 批量判定
    #[instrument(skip_all, fields(count = pairs.len()))]
    pub fn classify_batch(
        &self,
        pairs: &[(TankRecord, ConsumptionProfile)],
        now: DateTime<Utc>,
    ) -> Vec<StockoutPrediction> {
        pairs
            .iter()
            .map(|(tank, profile)| self.classify(tank, profile, now))
            .collect()
    }

    /// 判定（原始输入）
    ///
    /// 顺序:
    /// 1) 数值清洗: 库存/罐容/消耗/交易笔数，无效值按 0
    /// 2) 消耗 ≤ 0 → Unbounded, 无日期, none
    /// 3) 天数 = max(0, 库存) / 消耗，按配置取整
    /// 4) 日期 = now + 天数（仅有限分支）
    /// 5) 建议进油量 = max(0, 罐容 - 库存)
    /// 6) 严重等级
    pub fn classify_input(&self, input: &StockoutInput<'_>, now: DateTime<Utc>) -> StockoutPrediction {
        if coerce_finite(input.avg_daily_consumption).is_none()
            || coerce_finite(input.current_stock).is_none()
        {
            debug!(
                fuel_type = input.fuel_type,
                "库存或消耗数值非法，按 0 处理: stock={:?}, consumption={:?}",
                input.current_stock,
                input.avg_daily_consumption
            );
        }

        let current_stock = coerce_non_negative(input.current_stock);
        let tank_capacity = coerce_or_zero(input.tank_capacity);
        let avg_daily_consumption = coerce_non_negative(input.avg_daily_consumption);
        let avg_transactions_per_day = coerce_non_negative(input.avg_transactions_per_day);

        let days_until_stockout = self.days_until_stockout(current_stock, avg_daily_consumption);
        let predicted_stockout_date = days_until_stockout
            .finite()
            .and_then(|days| Self::predicted_date(now, days));
        let recommended_order_volume = (tank_capacity - current_stock).max(0.0);
        let severity = self.severity_for(days_until_stockout);

        StockoutPrediction {
            fuel_type: input.fuel_type.to_string(),
            current_stock,
            tank_capacity,
            avg_daily_consumption,
            avg_transactions_per_day,
            consumption_trend: input.consumption_trend,
            confidence_level: input.confidence_level,
            days_until_stockout,
            predicted_stockout_date,
            recommended_order_volume,
            severity,
        }
    }

    // ==========================================
    // 计算规则
    // ==========================================

    /// 计算距断油天数
    ///
    /// 入参须为已清洗数值；消耗 ≤ 0 或除法溢出时为 Unbounded
    pub fn days_until_stockout(&self, current_stock: f64, avg_daily_consumption: f64) -> DaysUntilStockout {
        if avg_daily_consumption.is_nan() || avg_daily_consumption <= 0.0 {
            return DaysUntilStockout::Unbounded;
        }

        let raw = current_stock.max(0.0) / avg_daily_consumption;
        DaysUntilStockout::from_days(self.rounding.apply(raw))
    }

    /// 严重等级判定
    ///
    /// 阈值为闭区间上界，升序检查；边界值归入更紧急的等级
    pub fn severity_for(&self, days: DaysUntilStockout) -> StockoutSeverity {
        let days = match days.finite() {
            Some(d) if !d.is_nan() => d,
            _ => return StockoutSeverity::None,
        };

        if days <= self.thresholds.critical_days {
            StockoutSeverity::Critical
        } else if days <= self.thresholds.high_days {
            StockoutSeverity::High
        } else if days <= self.thresholds.medium_days {
            StockoutSeverity::Medium
        } else {
            StockoutSeverity::None
        }
    }

    /// 预计断油时间 = now + days
    fn predicted_date(now: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
        if !days.is_finite() || days < 0.0 || days > MAX_PREDICTION_HORIZON_DAYS {
            return None;
        }

        let seconds = (days * 86_400.0).round() as i64;
        now.checked_add_signed(Duration::seconds(seconds))
    }
}

impl Default for StockoutClassifier {
    fn default() -> Self {
        Self::new(SeverityThresholds::default(), DaysRounding::default())
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 告警库存过滤
// ==========================================
// 职责: 从预测列表中筛出需要告警的油品（告警横幅 / 下单提示的数据源）
// 规则: severity ∈ {critical, high}  或  有限天数 ≤ 全局阈值
// 红线: Unbounded 预测永远不进入告警集合
// ==========================================

use crate::config::PredictionConfig;
use crate::domain::prediction::StockoutPrediction;

#[derive(Debug, Clone, Copy)]
pub struct CriticalStockFilter {
    threshold_days: f64,
}

impl CriticalStockFilter {
    pub fn new(threshold_days: f64) -> Self {
        Self { threshold_days }
    }

    pub fn from_config(config: &PredictionConfig) -> Self {
        Self::new(config.critical_filter_days)
    }

    pub fn threshold_days(&self) -> f64 {
        self.threshold_days
    }

    /// 单条判定
    ///
    /// 天数已在构造/反序列化时清洗；非有限天数视为 Unbounded
    pub fn is_critical(&self, prediction: &StockoutPrediction) -> bool {
        match prediction.days_until_stockout.finite() {
            Some(days) if days.is_finite() => {
                prediction.severity.is_alerting() || days <= self.threshold_days
            }
            _ => false,
        }
    }

    /// 过滤告警集合（保持输入顺序）
    pub fn filter<'a, I>(&self, predictions: I) -> Vec<StockoutPrediction>
    where
        I: IntoIterator<Item = &'a StockoutPrediction>,
    {
        predictions
            .into_iter()
            .filter(|p| self.is_critical(p))
            .cloned()
            .collect()
    }
}

impl Default for CriticalStockFilter {
    fn default() -> Self {
        Self::from_config(&PredictionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::DaysUntilStockout;
    use crate::domain::types::{ConfidenceLevel, ConsumptionTrend, StockoutSeverity};

    fn prediction(days: DaysUntilStockout, severity: StockoutSeverity) -> StockoutPrediction {
        StockoutPrediction {
            fuel_type: "Solar".to_string(),
            current_stock: 100.0,
            tank_capacity: 1_000.0,
            avg_daily_consumption: 10.0,
            avg_transactions_per_day: 2.0,
            consumption_trend: ConsumptionTrend::Stable,
            confidence_level: ConfidenceLevel::Medium,
            days_until_stockout: days,
            predicted_stockout_date: None,
            recommended_order_volume: 900.0,
            severity,
        }
    }

    #[test]
    fn test_numeric_threshold_inclusive() {
        let filter = CriticalStockFilter::default();
        assert!(filter.is_critical(&prediction(DaysUntilStockout::Finite(5.0), StockoutSeverity::None)));
        assert!(!filter.is_critical(&prediction(DaysUntilStockout::Finite(5.01), StockoutSeverity::None)));
    }

    #[test]
    fn test_severity_clause() {
        let filter = CriticalStockFilter::new(2.0);
        assert!(filter.is_critical(&prediction(DaysUntilStockout::Finite(3.0), StockoutSeverity::High)));
        assert!(!filter.is_critical(&prediction(DaysUntilStockout::Finite(4.0), StockoutSeverity::Medium)));
    }

    #[test]
    fn test_unbounded_never_critical() {
        let filter = CriticalStockFilter::default();
        // 外部回放数据可能出现等级与天数不一致
        assert!(!filter.is_critical(&prediction(DaysUntilStockout::Unbounded, StockoutSeverity::Critical)));
        assert!(!filter.is_critical(&prediction(DaysUntilStockout::Finite(f64::NAN), StockoutSeverity::High)));
    }

    #[test]
    fn test_filter_keeps_order() {
        let filter = CriticalStockFilter::default();
        let list = vec![
            prediction(DaysUntilStockout::Finite(4.0), StockoutSeverity::Medium),
            prediction(DaysUntilStockout::Finite(40.0), StockoutSeverity::None),
            prediction(DaysUntilStockout::Finite(0.5), StockoutSeverity::Critical),
        ];
        let critical = filter.filter(&list);
        assert_eq!(critical.len(), 2);
        assert_eq!(critical[0].days_until_stockout, DaysUntilStockout::Finite(4.0));
        assert_eq!(critical[1].days_until_stockout, DaysUntilStockout::Finite(0.5));
    }
}

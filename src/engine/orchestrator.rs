// ==========================================
// SIMONTOK 油站监控系统 - 预测引擎编排
// ==========================================
// 职责: 串联 消耗估算 → 断油判定 → 告警过滤
// 说明: 纯同步、无共享可变状态，可被多个任务并发调用
// ==========================================

use crate::config::PredictionConfig;
use crate::domain::prediction::{ConsumptionProfile, StockoutPrediction};
use crate::domain::sale::SaleRecord;
use crate::domain::tank::TankRecord;
use crate::engine::consumption::{ConsumptionEstimator, SalesWindow};
use crate::engine::critical_filter::CriticalStockFilter;
use crate::engine::stockout::StockoutClassifier;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

// ==========================================
// PredictionEngine
// ==========================================
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    estimator: ConsumptionEstimator,
    classifier: StockoutClassifier,
    filter: CriticalStockFilter,
    station_offset: FixedOffset,
}

impl PredictionEngine {
    /// 由已校验配置构造
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            estimator: ConsumptionEstimator::new(config),
            classifier: StockoutClassifier::from_config(config),
            filter: CriticalStockFilter::from_config(config),
            station_offset: config.station_offset().unwrap_or_else(|| Utc.fix()),
        }
    }

    pub fn estimator(&self) -> &ConsumptionEstimator {
        &self.estimator
    }

    pub fn classifier(&self) -> &StockoutClassifier {
        &self.classifier
    }

    pub fn filter(&self) -> &CriticalStockFilter {
        &self.filter
    }

    /// 窗口结束日: now 在油站本地时区下的日期
    pub fn window_end(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.station_offset).date_naive()
    }

    /// 窗口内销售的查询起点（窗口首日 00:00）
    pub fn sales_since(&self, window_end: NaiveDate) -> NaiveDateTime {
        self.estimator
            .window_start(window_end)
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
    }

    /// 估算消耗画像
    pub fn profile(
        &self,
        station_id: i64,
        fuel_type: &str,
        sales: &[SaleRecord],
        history_start: Option<NaiveDate>,
        window_end: NaiveDate,
    ) -> ConsumptionProfile {
        let window = SalesWindow {
            end_date: window_end,
            sales,
            history_start,
        };
        self.estimator.estimate(station_id, fuel_type, &window)
    }

    /// 单油罐完整预测
    pub fn predict(
        &self,
        tank: &TankRecord,
        sales: &[SaleRecord],
        history_start: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> StockoutPrediction {
        let window_end = self.window_end(now);
        let profile = self.profile(tank.station_id, &tank.fuel_type, sales, history_start, window_end);
        self.classifier.classify(tank, &profile, now)
    }

    /// 告警集合
    pub fn critical_stocks<'a, I>(&self, predictions: I) -> Vec<StockoutPrediction>
    where
        I: IntoIterator<Item = &'a StockoutPrediction>,
    {
        self.filter.filter(predictions)
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(&PredictionConfig::default())
    }
}

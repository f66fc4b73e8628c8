// ==========================================
// SIMONTOK 油站监控系统 - 消耗估算引擎
// ==========================================
// 职责: 将历史销售聚合为 (油站, 油品) 的消耗画像
// 输入: 窗口内销售记录 + 历史起点
// 输出: ConsumptionProfile (日均消耗 / 日均交易 / 趋势 / 置信度)
// 红线: 空数据不是错误，返回"零消耗 + 低置信度"
// ==========================================

use crate::common::numeric::{coerce_non_negative, coerce_or_zero};
use crate::config::prediction_config::MAX_WINDOW_DAYS;
use crate::config::PredictionConfig;
use crate::domain::prediction::ConsumptionProfile;
use crate::domain::sale::SaleRecord;
use crate::domain::types::{ConfidenceLevel, ConsumptionTrend};
use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument};

// ==========================================
// SalesWindow - 估算输入窗口
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SalesWindow<'a> {
    /// 窗口结束日（含）
    pub end_date: NaiveDate,
    /// 候选销售记录（可包含窗口外/其他油品记录，估算时过滤）
    pub sales: &'a [SaleRecord],
    /// 该 (油站, 油品) 的历史起点；None 表示无油罐历史
    pub history_start: Option<NaiveDate>,
}

// ==========================================
// ConsumptionEstimator - 消耗估算引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct ConsumptionEstimator {
    window_days: u32,
    trend_threshold: f64,
    min_sale_records: usize,
    min_active_day_ratio: f64,
}

impl ConsumptionEstimator {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            window_days: config.window_days.clamp(1, MAX_WINDOW_DAYS),
            trend_threshold: config.trend_threshold,
            min_sale_records: config.min_sale_records,
            min_active_day_ratio: config.min_active_day_ratio,
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// 窗口起始日（含），日期下溢时取 NaiveDate::MIN
    pub fn window_start(&self, end_date: NaiveDate) -> NaiveDate {
        end_date
            .checked_sub_signed(Duration::days(i64::from(self.window_days) - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// 估算消耗画像
    ///
    /// 规则:
    /// 1) 按自然日分桶
    /// 2) 日均消耗 = 窗口总升数 / 窗口天数（无销售日按 0 计入）
    /// 3) 日均交易 = 窗口交易笔数 / 窗口天数
    /// 4) 趋势 = 近三分之一 vs 早三分之一的日均消耗
    /// 5) 置信度 = 样本量 + 有销售天数占比 + 窗口是否被截断
    #[instrument(skip(self, window), fields(window_days = self.window_days))]
    pub fn estimate(
        &self,
        station_id: i64,
        fuel_type: &str,
        window: &SalesWindow<'_>,
    ) -> ConsumptionProfile {
        let history_start = match window.history_start {
            Some(d) => d,
            None => {
                debug!("无油罐历史，返回零消耗低置信度画像");
                return ConsumptionProfile::empty(station_id, fuel_type, self.window_days);
            }
        };

        let days = self.window_days as usize;
        let start = self.window_start(window.end_date);

        let mut daily_liters = vec![0.0_f64; days];
        let mut daily_count = vec![0_u32; days];
        let mut sale_count = 0_usize;

        for sale in window.sales.iter().filter(|s| s.matches(station_id, fuel_type)) {
            let date = sale.sale_date();
            if date < start || date > window.end_date {
                continue;
            }
            let idx = (date - start).num_days() as usize;
            let (Some(liters), Some(count)) = (daily_liters.get_mut(idx), daily_count.get_mut(idx))
            else {
                continue;
            };
            *liters += coerce_or_zero(sale.liters);
            *count += 1;
            sale_count += 1;
        }

        let total_liters: f64 = daily_liters.iter().sum();
        let active_days = daily_count.iter().filter(|c| **c > 0).count() as u32;

        let avg_daily_consumption = coerce_non_negative(total_liters / days as f64);
        let avg_transactions_per_day = sale_count as f64 / days as f64;
        let consumption_trend = self.classify_trend(&daily_liters);
        let truncated = history_start > start;
        let confidence_level = self.classify_confidence(sale_count, active_days, truncated);

        debug!(
            sale_count,
            active_days,
            total_liters,
            truncated,
            "消耗画像估算完成"
        );

        ConsumptionProfile {
            station_id,
            fuel_type: fuel_type.to_string(),
            avg_daily_consumption,
            avg_transactions_per_day,
            consumption_trend,
            confidence_level,
            window_days: self.window_days,
            sale_count,
            active_days,
        }
    }

    /// 趋势判定
    ///
    /// 三分之一长度 = max(1, N / 3)，早段与近段各取该长度
    /// - 早段日均 ≤ 0: 近段 > 0 → 上升，否则平稳
    /// - (近段 - 早段) / 早段 > 阈值 → 上升; < -阈值 → 下降; 否则平稳
    pub fn classify_trend(&self, daily_liters: &[f64]) -> ConsumptionTrend {
        if daily_liters.is_empty() {
            return ConsumptionTrend::Stable;
        }

        let third = (daily_liters.len() / 3).max(1);
        let mean = |slice: &[f64]| slice.iter().sum::<f64>() / slice.len() as f64;

        let earliest = mean(&daily_liters[..third]);
        let recent = mean(&daily_liters[daily_liters.len() - third..]);

        if !earliest.is_finite() || !recent.is_finite() {
            return ConsumptionTrend::Stable;
        }

        if earliest <= 0.0 {
            return if recent > 0.0 {
                ConsumptionTrend::Increasing
            } else {
                ConsumptionTrend::Stable
            };
        }

        let change = (recent - earliest) / earliest;
        if change > self.trend_threshold {
            ConsumptionTrend::Increasing
        } else if change < -self.trend_threshold {
            ConsumptionTrend::Decreasing
        } else {
            ConsumptionTrend::Stable
        }
    }

    /// 置信度判定
    fn classify_confidence(
        &self,
        sale_count: usize,
        active_days: u32,
        truncated: bool,
    ) -> ConfidenceLevel {
        if sale_count < self.min_sale_records {
            return ConfidenceLevel::Low;
        }

        let active_ratio = active_days as f64 / self.window_days as f64;
        if active_ratio >= self.min_active_day_ratio && !truncated {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    }
}

impl Default for ConsumptionEstimator {
    fn default() -> Self {
        Self::new(&PredictionConfig::default())
    }
}

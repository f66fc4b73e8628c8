// ==========================================
// SIMONTOK 油站监控系统 - 断油预测配置
// ==========================================
// 职责: 窗口天数 / 趋势阈值 / 置信度门槛 / 严重等级阈值 / 告警过滤阈值
// 红线: 配置错误在加载时立即失败，不允许带病运行到请求阶段
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::DaysRounding;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// 默认窗口天数
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// 窗口天数上限（十年）
pub const MAX_WINDOW_DAYS: u32 = 3650;
/// 默认油站时区偏移（分钟，WIB = UTC+7）
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 420;
/// 默认趋势判定相对阈值 (10%)
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.10;
/// 默认最少交易笔数（低于此值置信度为 low）
pub const DEFAULT_MIN_SALE_RECORDS: usize = 3;
/// 默认高置信度所需的有销售天数占比
pub const DEFAULT_MIN_ACTIVE_DAY_RATIO: f64 = 0.5;
/// 默认告警过滤阈值（天）
pub const DEFAULT_CRITICAL_FILTER_DAYS: f64 = 5.0;

// ==========================================
// SeverityThresholds - 严重等级阈值
// ==========================================
// 阈值为闭区间上界，按升序检查: ≤critical → ≤high → ≤medium → none
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub critical_days: f64,
    pub high_days: f64,
    pub medium_days: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_days: 1.0,
            high_days: 3.0,
            medium_days: 5.0,
        }
    }
}

impl SeverityThresholds {
    pub fn new(critical_days: f64, high_days: f64, medium_days: f64) -> Self {
        Self {
            critical_days,
            high_days,
            medium_days,
        }
    }

    /// 校验: 非负、有限、升序
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("critical_days", self.critical_days),
            ("high_days", self.high_days),
            ("medium_days", self.medium_days),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }

        if self.critical_days > self.high_days || self.high_days > self.medium_days {
            return Err(ConfigError::UnorderedThresholds {
                critical: self.critical_days,
                high: self.high_days,
                medium: self.medium_days,
            });
        }

        Ok(())
    }
}

// ==========================================
// PredictionConfig - 预测引擎配置全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// 历史窗口天数
    pub window_days: u32,
    /// 趋势判定相对阈值（近三分之一 vs 早三分之一）
    pub trend_threshold: f64,
    /// 最少交易笔数
    pub min_sale_records: usize,
    /// 高置信度所需有销售天数占比 (0~1)
    pub min_active_day_ratio: f64,
    /// 严重等级阈值
    pub severity: SeverityThresholds,
    /// 告警过滤阈值（天），独立于严重等级
    pub critical_filter_days: f64,
    /// 断油天数取整策略
    pub days_rounding: DaysRounding,
    /// 油站本地时区相对 UTC 的偏移（分钟），决定窗口末日
    pub utc_offset_minutes: i32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            min_sale_records: DEFAULT_MIN_SALE_RECORDS,
            min_active_day_ratio: DEFAULT_MIN_ACTIVE_DAY_RATIO,
            severity: SeverityThresholds::default(),
            critical_filter_days: DEFAULT_CRITICAL_FILTER_DAYS,
            days_rounding: DaysRounding::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl PredictionConfig {
    /// 校验配置并返回自身（便于链式构造）
    pub fn validated(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// 校验全部配置项
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidWindow(self.window_days));
        }

        if self.station_offset().is_none() {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_minutes));
        }

        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "trend_threshold".to_string(),
                value: self.trend_threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.min_active_day_ratio) {
            return Err(ConfigError::InvalidThreshold {
                name: "min_active_day_ratio".to_string(),
                value: self.min_active_day_ratio,
            });
        }

        if !self.critical_filter_days.is_finite() || self.critical_filter_days < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "critical_filter_days".to_string(),
                value: self.critical_filter_days,
            });
        }

        self.severity.validate()
    }

    /// 油站本地时区（偏移超出 ±24h 时为 None）
    pub fn station_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

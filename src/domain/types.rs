// ==========================================
// SIMONTOK 油站监控系统 - 领域类型定义
// ==========================================
// 职责: 趋势 / 置信度 / 严重等级等枚举
// 序列化格式: lowercase (与前端驾驶舱、实时推送通道约定一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 消耗趋势 (Consumption Trend)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionTrend {
    Increasing, // 上升
    Decreasing, // 下降
    Stable,     // 平稳
}

impl fmt::Display for ConsumptionTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionTrend::Increasing => write!(f, "increasing"),
            ConsumptionTrend::Decreasing => write!(f, "decreasing"),
            ConsumptionTrend::Stable => write!(f, "stable"),
        }
    }
}

// ==========================================
// 置信度 (Confidence Level)
// ==========================================
// 依据样本量与数据时效判定，与趋势无关
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,    // 数据不足
    Medium, // 数据稀疏或历史不满窗口
    High,   // 数据充分
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 断油严重等级 (Stockout Severity)
// ==========================================
// 红线: 等级只由 days_until_stockout 决定
// 顺序: None < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockoutSeverity {
    None,     // 无风险
    Medium,   // 关注
    High,     // 紧张
    Critical, // 危险
}

impl StockoutSeverity {
    /// 从字符串解析严重等级（未知值视为 None）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => StockoutSeverity::Critical,
            "high" => StockoutSeverity::High,
            "medium" => StockoutSeverity::Medium,
            _ => StockoutSeverity::None,
        }
    }

    /// 是否属于告警等级（critical / high）
    pub fn is_alerting(&self) -> bool {
        matches!(self, StockoutSeverity::Critical | StockoutSeverity::High)
    }
}

impl fmt::Display for StockoutSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockoutSeverity::None => write!(f, "none"),
            StockoutSeverity::Medium => write!(f, "medium"),
            StockoutSeverity::High => write!(f, "high"),
            StockoutSeverity::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 断油天数取整策略 (Days Rounding)
// ==========================================
// 取整发生在等级判定之前，输出天数与等级始终一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaysRounding {
    #[default]
    Exact, // 不取整
    Floor, // 向下取整
    Round, // 四舍五入
}

impl DaysRounding {
    /// 从字符串解析取整策略
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Some(DaysRounding::Exact),
            "floor" => Some(DaysRounding::Floor),
            "round" => Some(DaysRounding::Round),
            _ => None,
        }
    }

    /// 应用取整
    pub fn apply(&self, days: f64) -> f64 {
        match self {
            DaysRounding::Exact => days,
            DaysRounding::Floor => days.floor(),
            DaysRounding::Round => days.round(),
        }
    }
}

impl fmt::Display for DaysRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysRounding::Exact => write!(f, "exact"),
            DaysRounding::Floor => write!(f, "floor"),
            DaysRounding::Round => write!(f, "round"),
        }
    }
}

// ==========================================
// 预测不可用原因 (Unavailable Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailableReason {
    NoTank,          // 该油品无油罐记录
    DataSourceError, // 数据读取失败
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NoTank => write!(f, "NO_TANK"),
            UnavailableReason::DataSourceError => write!(f, "DATA_SOURCE_ERROR"),
        }
    }
}

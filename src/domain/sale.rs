// ==========================================
// SIMONTOK 油站监控系统 - 销售记录领域模型
// ==========================================
// 红线: 销售记录是只读历史事实，引擎只做聚合，不做修改
// ==========================================

use crate::common::numeric::deserialize_or_zero;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// SaleRecord - 单笔销售
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub station_id: i64,          // 油站 (SPBU) ID
    pub fuel_type: String,        // 油品
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub liters: f64,              // 销售升数
    pub sold_at: NaiveDateTime,   // 交易时间 (油站本地时间)
}

impl SaleRecord {
    pub fn new(station_id: i64, fuel_type: &str, liters: f64, sold_at: NaiveDateTime) -> Self {
        Self {
            station_id,
            fuel_type: fuel_type.to_string(),
            liters,
            sold_at,
        }
    }

    /// 交易所属自然日
    pub fn sale_date(&self) -> NaiveDate {
        self.sold_at.date()
    }

    /// 是否属于指定油站与油品
    pub fn matches(&self, station_id: i64, fuel_type: &str) -> bool {
        self.station_id == station_id && self.fuel_type == fuel_type
    }
}

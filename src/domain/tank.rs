// ==========================================
// SIMONTOK 油站监控系统 - 油罐领域模型
// ==========================================
// 红线: current_stock 由进油/销售过账在外部维护，引擎只读
// ==========================================

use crate::common::numeric::deserialize_or_zero;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TankRecord - 油罐
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankRecord {
    pub station_id: i64,              // 油站 (SPBU) ID
    pub fuel_type: String,            // 油品
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub capacity: f64,                // 罐容 (升)
    #[serde(default, deserialize_with = "deserialize_or_zero")]
    pub current_stock: f64,           // 当前库存 (升)
    #[serde(default)]
    pub created_at: Option<NaiveDate>, // 油罐建档日期 (历史起点)
}

impl TankRecord {
    pub fn new(station_id: i64, fuel_type: &str, capacity: f64, current_stock: f64) -> Self {
        Self {
            station_id,
            fuel_type: fuel_type.to_string(),
            capacity,
            current_stock,
            created_at: None,
        }
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 油罐数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只读（库存由进油/销售过账维护）
// ==========================================

use crate::common::numeric::coerce_or_zero;
use crate::domain::tank::TankRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// TankRepository - 油罐仓储
// ==========================================
pub struct TankRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TankRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 行映射
    fn map_row(row: &Row<'_>) -> rusqlite::Result<TankRecord> {
        let created_at: Option<String> = row.get(4)?;
        Ok(TankRecord {
            station_id: row.get(0)?,
            fuel_type: row.get(1)?,
            capacity: coerce_or_zero(row.get_ref(2)?),
            current_stock: coerce_or_zero(row.get_ref(3)?),
            created_at: created_at
                .as_deref()
                .and_then(|s| s.get(..10))
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        })
    }

    /// 按油站与油品查询油罐
    ///
    /// 同一油品多罐时合并为一条（罐容/库存求和，建档日期取最早）
    ///
    /// # 返回
    /// - Ok(Some(TankRecord)): 找到油罐
    /// - Ok(None): 未找到（不是错误）
    pub fn find_by_station_and_fuel(
        &self,
        station_id: i64,
        fuel_type: &str,
    ) -> RepositoryResult<Option<TankRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT spbu_id, fuel_type, capacity, current_stock, created_at
            FROM tanks
            WHERE spbu_id = ?1 AND fuel_type = ?2
            ORDER BY id
            "#,
        )?;

        let tanks = stmt
            .query_map(params![station_id, fuel_type], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(merge_by_fuel(tanks).into_iter().next())
    }

    /// 查询油站全部油品的油罐（按油品排序，同油品合并）
    pub fn list_by_station(&self, station_id: i64) -> RepositoryResult<Vec<TankRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT spbu_id, fuel_type, capacity, current_stock, created_at
            FROM tanks
            WHERE spbu_id = ?1
            ORDER BY fuel_type, id
            "#,
        )?;

        let tanks = stmt
            .query_map(params![station_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(merge_by_fuel(tanks))
    }
}

/// 同一 (油站, 油品) 的多条油罐合并
///
/// 输入须已按 (油站, 油品) 排序
fn merge_by_fuel(tanks: Vec<TankRecord>) -> Vec<TankRecord> {
    let mut merged: Vec<TankRecord> = Vec::with_capacity(tanks.len());

    for tank in tanks {
        match merged.last_mut() {
            Some(last) if last.station_id == tank.station_id && last.fuel_type == tank.fuel_type => {
                last.capacity += tank.capacity;
                last.current_stock += tank.current_stock;
                last.created_at = match (last.created_at, tank.created_at) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
            _ => merged.push(tank),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_by_fuel_sums_same_fuel() {
        let mut a = TankRecord::new(1, "Pertalite", 10_000.0, 2_000.0);
        a.created_at = NaiveDate::from_ymd_opt(2025, 6, 1);
        let mut b = TankRecord::new(1, "Pertalite", 5_000.0, 1_000.0);
        b.created_at = NaiveDate::from_ymd_opt(2024, 1, 1);
        let c = TankRecord::new(1, "Solar", 8_000.0, 500.0);

        let merged = merge_by_fuel(vec![a, b, c]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].capacity, 15_000.0);
        assert_eq!(merged[0].current_stock, 3_000.0);
        assert_eq!(merged[0].created_at, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(merged[1].fuel_type, "Solar");
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 销售记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只读
// 说明: liters 列可能混入 TEXT/NULL（历史导入数据），统一经数值清洗
// ==========================================

use crate::common::numeric::coerce_or_zero;
use crate::domain::sale::SaleRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 存储层时间格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 解析存储层时间字符串（兼容 'T' 分隔）
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

// ==========================================
// SaleRepository - 销售记录仓储
// ==========================================
pub struct SaleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SaleRepository {
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

    /// 查询指定时间之后的销售记录
    ///
    /// # 参数
    /// - station_id: 油站 ID
    /// - fuel_type: 油品
    /// - since: 起始时间（含）
    ///
    /// # 返回
    /// - Ok(Vec<SaleRecord>): 按时间升序；时间无法解析的行被跳过
    pub fn find_since(
        &self,
        station_id: i64,
        fuel_type: &str,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<SaleRecord>> {
        let conn = self.get_conn()?;
        let since_str = since.format(DATETIME_FORMAT).to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT spbu_id, fuel_type, liters, sold_at
            FROM fuel_sales
            WHERE spbu_id = ?1 AND fuel_type = ?2 AND sold_at >= ?3
            ORDER BY sold_at
            "#,
        )?;

        let rows = stmt.query_map(params![station_id, fuel_type, since_str], |row| {
            let liters = coerce_or_zero(row.get_ref(2)?);
            let sold_at: String = row.get(3)?;
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, liters, sold_at))
        })?;

        let mut sales = Vec::new();
        for row in rows {
            let (station_id, fuel_type, liters, sold_at) = row?;
            match parse_datetime(&sold_at) {
                Some(sold_at) => sales.push(SaleRecord {
                    station_id,
                    fuel_type,
                    liters,
                    sold_at,
                }),
                None => warn!(station_id, fuel_type = %fuel_type, sold_at = %sold_at, "销售时间无法解析，跳过"),
            }
        }

        Ok(sales)
    }

    /// 查询最早销售日期
    ///
    /// # 返回
    /// - Ok(Some(NaiveDate)): 最早销售日
    /// - Ok(None): 无销售记录
    pub fn earliest_sale_date(
        &self,
        station_id: i64,
        fuel_type: &str,
    ) -> RepositoryResult<Option<NaiveDate>> {
        let conn = self.get_conn()?;

        let earliest: Option<String> = conn
            .query_row(
                "SELECT MIN(sold_at) FROM fuel_sales WHERE spbu_id = ?1 AND fuel_type = ?2",
                params![station_id, fuel_type],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();

        Ok(earliest.and_then(|s| parse_datetime(&s)).map(|dt| dt.date()))
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 库存数据源
// ==========================================
// 职责: 定义预测服务所需的只读数据访问接口
// 实现者: SqliteStockDataSource（rusqlite），测试中可替换为内存实现
// 红线: 数据源不含预测逻辑；"未找到"返回 None，不是错误
// ==========================================

use crate::domain::sale::SaleRecord;
use crate::domain::tank::TankRecord;
use crate::repository::error::RepositoryResult;
use crate::repository::sale_repo::SaleRepository;
use crate::repository::tank_repo::TankRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// StockDataSource Trait
// ==========================================
#[async_trait]
pub trait StockDataSource: Send + Sync {
    /// 查询 since（含）之后的销售记录
    async fn get_sales(
        &self,
        station_id: i64,
        fuel_type: &str,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<SaleRecord>>;

    /// 查询油罐
    async fn get_tank(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<TankRecord>>;

    /// 查询油站全部油罐（每个油品一条）
    async fn list_tanks(&self, station_id: i64) -> RepositoryResult<Vec<TankRecord>>;

    /// 历史起点
    ///
    /// # 返回
    /// - Some(date): 最早销售日与油罐建档日中较早者
    /// - None: 无油罐历史
    async fn history_start(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<NaiveDate>>;
}

/// 合并两个历史起点候选，取较早者
pub fn earliest_of(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

// ==========================================
// SqliteStockDataSource
// ==========================================
pub struct SqliteStockDataSource {
    sales: SaleRepository,
    tanks: TankRepository,
}

impl SqliteStockDataSource {
    /// 两个仓储共享同一连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            sales: SaleRepository::from_connection(conn.clone()),
            tanks: TankRepository::from_connection(conn),
        }
    }

    pub fn sale_repo(&self) -> &SaleRepository {
        &self.sales
    }

    pub fn tank_repo(&self) -> &TankRepository {
        &self.tanks
    }
}

#[async_trait]
impl StockDataSource for SqliteStockDataSource {
    async fn get_sales(
        &self,
        station_id: i64,
        fuel_type: &str,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<SaleRecord>> {
        self.sales.find_since(station_id, fuel_type, since)
    }

    async fn get_tank(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<TankRecord>> {
        self.tanks.find_by_station_and_fuel(station_id, fuel_type)
    }

    async fn list_tanks(&self, station_id: i64) -> RepositoryResult<Vec<TankRecord>> {
        self.tanks.list_by_station(station_id)
    }

    async fn history_start(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<NaiveDate>> {
        let tank = match self.tanks.find_by_station_and_fuel(station_id, fuel_type)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let first_sale = self.sales.earliest_sale_date(station_id, fuel_type)?;
        Ok(earliest_of(first_sale, tank.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_of() {
        let a = NaiveDate::from_ymd_opt(2026, 1, 5);
        let b = NaiveDate::from_ymd_opt(2025, 12, 1);
        assert_eq!(earliest_of(a, b), b);
        assert_eq!(earliest_of(a, None), a);
        assert_eq!(earliest_of(None, None), None);
    }
}

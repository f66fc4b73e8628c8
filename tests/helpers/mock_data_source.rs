// ==========================================
// Mock 数据源 / 推送发布者 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use simontok_stockout::domain::{SaleRecord, StockoutFeed, TankRecord};
use simontok_stockout::engine::StockoutFeedPublisher;
use simontok_stockout::repository::data_source::earliest_of;
use simontok_stockout::repository::{RepositoryError, RepositoryResult, StockDataSource};
use std::error::Error;
use std::sync::Mutex;

/// 内存数据源
///
/// failing_fuels 中的油品读取销售时返回数据库错误
#[derive(Debug, Default)]
pub struct MockDataSource {
    tanks: Vec<TankRecord>,
    sales: Vec<SaleRecord>,
    failing_fuels: Vec<String>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tank(mut self, tank: TankRecord) -> Self {
        self.tanks.push(tank);
        self
    }

    pub fn with_sales(mut self, sales: impl IntoIterator<Item = SaleRecord>) -> Self {
        self.sales.extend(sales);
        self
    }

    pub fn failing_on(mut self, fuel_type: &str) -> Self {
        self.failing_fuels.push(fuel_type.to_string());
        self
    }

    fn check(&self, fuel_type: &str) -> RepositoryResult<()> {
        if self.failing_fuels.iter().any(|f| f == fuel_type) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "模拟读取失败: {}",
                fuel_type
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StockDataSource for MockDataSource {
    async fn get_sales(
        &self,
        station_id: i64,
        fuel_type: &str,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<SaleRecord>> {
        self.check(fuel_type)?;
        let mut sales: Vec<SaleRecord> = self
            .sales
            .iter()
            .filter(|s| s.matches(station_id, fuel_type) && s.sold_at >= since)
            .cloned()
            .collect();
        sales.sort_by_key(|s| s.sold_at);
        Ok(sales)
    }

    async fn get_tank(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<TankRecord>> {
        Ok(self
            .tanks
            .iter()
            .find(|t| t.station_id == station_id && t.fuel_type == fuel_type)
            .cloned())
    }

    async fn list_tanks(&self, station_id: i64) -> RepositoryResult<Vec<TankRecord>> {
        let mut tanks: Vec<TankRecord> = self
            .tanks
            .iter()
            .filter(|t| t.station_id == station_id)
            .cloned()
            .collect();
        tanks.sort_by(|a, b| a.fuel_type.cmp(&b.fuel_type));
        Ok(tanks)
    }

    async fn history_start(&self, station_id: i64, fuel_type: &str) -> RepositoryResult<Option<NaiveDate>> {
        let tank = match self.get_tank(station_id, fuel_type).await? {
            Some(t) => t,
            None => return Ok(None),
        };
        let first_sale = self
            .sales
            .iter()
            .filter(|s| s.matches(station_id, fuel_type))
            .map(|s| s.sale_date())
            .min();
        Ok(earliest_of(first_sale, tank.created_at))
    }
}

/// 记录所有发布载荷的发布者
#[derive(Debug, Default)]
pub struct CollectingPublisher {
    pub published: Mutex<Vec<StockoutFeed>>,
}

impl StockoutFeedPublisher for CollectingPublisher {
    fn publish(&self, feed: &StockoutFeed) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.published.lock().unwrap().push(feed.clone());
        Ok(feed.feed_id.clone())
    }
}

/// 总是失败的发布者
#[derive(Debug, Default)]
pub struct FailingPublisher;

impl StockoutFeedPublisher for FailingPublisher {
    fn publish(&self, _feed: &StockoutFeed) -> Result<String, Box<dyn Error + Send + Sync>> {
        Err("推送通道不可用".into())
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 断油预测 API
// ==========================================
// 职责: 组装数据源与预测引擎，产出预测列表 / 告警集合 / 推送载荷
// 红线:
// - 缺油罐 → Unavailable 结果，不是错误
// - 单个油品读取失败不得中断同站其他油品
// - 请求级上下文（数据源、配置、now）全部显式传入，无全局状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{PredictionConfig, PredictionConfigReader};
use crate::domain::feed::{ReorderPrompt, SeverityCounts, StockoutFeed};
use crate::domain::prediction::{PredictionOutcome, StockoutPrediction};
use crate::domain::types::UnavailableReason;
use crate::engine::events::{OptionalFeedPublisher, StockoutFeedPublisher};
use crate::engine::orchestrator::PredictionEngine;
use crate::repository::data_source::StockDataSource;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// StockoutPredictionApi - 断油预测 API
// ==========================================

/// 断油预测API
///
/// 职责：
/// 1. 单个 (油站, 油品) 预测
/// 2. 油站全油品预测（并发）
/// 3. 告警集合 / 下单提示 / 推送载荷
pub struct StockoutPredictionApi {
    data_source: Arc<dyn StockDataSource>,
    engine: PredictionEngine,
    publisher: OptionalFeedPublisher,
}

impl StockoutPredictionApi {
    /// 创建新的 StockoutPredictionApi 实例
    ///
    /// # 参数
    /// - data_source: 销售/油罐数据源
    /// - config: 预测配置，非法时立即返回 InvalidConfig
    pub fn new(data_source: Arc<dyn StockDataSource>, config: &PredictionConfig) -> ApiResult<Self> {
        config.validate()?;

        Ok(Self {
            data_source,
            engine: PredictionEngine::new(config),
            publisher: OptionalFeedPublisher::none(),
        })
    }

    /// 从配置读取器创建（配置非法时立即失败）
    pub async fn from_config_reader(
        data_source: Arc<dyn StockDataSource>,
        reader: &dyn PredictionConfigReader,
    ) -> ApiResult<Self> {
        let config = reader.load_prediction_config().await?;
        Self::new(data_source, &config)
    }

    /// 替换推送发布者
    pub fn with_publisher(mut self, publisher: Arc<dyn StockoutFeedPublisher>) -> Self {
        self.publisher = OptionalFeedPublisher::with_publisher(publisher);
        self
    }

    /// 是否配置了推送发布者
    pub fn has_publisher(&self) -> bool {
        self.publisher.is_configured()
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    // ==========================================
    // 单油品预测
    // ==========================================

    /// 单个 (油站, 油品) 预测
    ///
    /// # 返回
    /// - Ok(Available): 正常预测
    /// - Ok(Unavailable { NO_TANK }): 油站无该油品油罐
    /// - Err(ApiError): 数据源读取失败
    #[instrument(skip(self, now))]
    pub async fn predict_pair(
        &self,
        station_id: i64,
        fuel_type: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<PredictionOutcome> {
        if fuel_type.trim().is_empty() {
            return Err(ApiError::InvalidInput("油品不能为空".to_string()));
        }

        let tank = match self.data_source.get_tank(station_id, fuel_type).await? {
            Some(t) => t,
            None => {
                warn!(station_id, fuel_type, "油罐不存在，跳过预测");
                return Ok(PredictionOutcome::Unavailable {
                    fuel_type: fuel_type.to_string(),
                    reason: UnavailableReason::NoTank,
                });
            }
        };

        let since = self.engine.sales_since(self.engine.window_end(now));
        let sales = self.data_source.get_sales(station_id, fuel_type, since).await?;
        let history_start = self.data_source.history_start(station_id, fuel_type).await?;

        let prediction = self.engine.predict(&tank, &sales, history_start, now);
        Ok(PredictionOutcome::Available(prediction))
    }

    // ==========================================
    // 油站预测
    // ==========================================

    /// 油站全油品预测
    ///
    /// 每个油品一个 future，全部完成后返回；
    /// 按严重等级降序、可用优先、油品名升序排序
    #[instrument(skip(self, now))]
    pub async fn predict_station(
        &self,
        station_id: i64,
        now: DateTime<Utc>,
    ) -> ApiResult<Vec<PredictionOutcome>> {
        let tanks = self.data_source.list_tanks(station_id).await?;

        let futures = tanks.iter().map(|tank| {
            let fuel_type = tank.fuel_type.as_str();
            async move {
                match self.predict_pair(station_id, fuel_type, now).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(station_id, fuel_type, error = %e, "油品预测失败，标记为不可用");
                        PredictionOutcome::Unavailable {
                            fuel_type: fuel_type.to_string(),
                            reason: UnavailableReason::DataSourceError,
                        }
                    }
                }
            }
        });

        let mut outcomes = join_all(futures).await;
        outcomes.sort_by(compare_outcomes);

        Ok(outcomes)
    }

    /// 油站告警集合（横幅 / 下单提示数据源）
    pub async fn critical_stocks(
        &self,
        station_id: i64,
        now: DateTime<Utc>,
    ) -> ApiResult<Vec<StockoutPrediction>> {
        let outcomes = self.predict_station(station_id, now).await?;
        Ok(self.critical_from_outcomes(&outcomes))
    }

    fn critical_from_outcomes(&self, outcomes: &[PredictionOutcome]) -> Vec<StockoutPrediction> {
        self.engine
            .critical_stocks(outcomes.iter().filter_map(PredictionOutcome::prediction))
    }

    // ==========================================
    // 推送载荷
    // ==========================================

    /// 构建油站推送载荷
    #[instrument(skip(self, now))]
    pub async fn build_feed(&self, station_id: i64, now: DateTime<Utc>) -> ApiResult<StockoutFeed> {
        let predictions = self.predict_station(station_id, now).await?;
        let critical_stocks = self.critical_from_outcomes(&predictions);
        let reorder_prompts: Vec<ReorderPrompt> = critical_stocks
            .iter()
            .filter_map(ReorderPrompt::from_prediction)
            .collect();
        let severity_counts = SeverityCounts::from_outcomes(&predictions);

        info!(
            station_id,
            total = severity_counts.total(),
            critical = severity_counts.critical,
            high = severity_counts.high,
            alerts = critical_stocks.len(),
            "断油预测载荷构建完成"
        );

        Ok(StockoutFeed {
            feed_id: Uuid::new_v4().to_string(),
            station_id,
            generated_at: now,
            predictions,
            critical_stocks,
            reorder_prompts,
            severity_counts,
        })
    }

    /// 构建并发布推送载荷
    pub async fn publish_feed(&self, station_id: i64, now: DateTime<Utc>) -> ApiResult<StockoutFeed> {
        let feed = self.build_feed(station_id, now).await?;

        self.publisher
            .publish(&feed)
            .map_err(|e| ApiError::PublishError(e.to_string()))?;

        Ok(feed)
    }
}

/// 结果排序: 严重等级降序 → 可用优先 → 油品名升序
fn compare_outcomes(a: &PredictionOutcome, b: &PredictionOutcome) -> Ordering {
    b.severity()
        .cmp(&a.severity())
        .then_with(|| a.prediction().is_none().cmp(&b.prediction().is_none()))
        .then_with(|| a.fuel_type().cmp(b.fuel_type()))
}

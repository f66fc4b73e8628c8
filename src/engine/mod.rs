// ==========================================
// SIMONTOK 油站监控系统 - 引擎层
// ==========================================
// 职责: 消耗估算 / 断油判定 / 告警过滤
// 红线: Engine 不拼 SQL，不做 I/O，纯函数式计算（推送传输由 events 中的 trait 外置）
// ==========================================

pub mod consumption;
pub mod critical_filter;
pub mod events;
pub mod orchestrator;
pub mod stockout;

// 重导出核心引擎
pub use consumption::{ConsumptionEstimator, SalesWindow};
pub use critical_filter::CriticalStockFilter;
pub use events::{OptionalFeedPublisher, StockoutFeedPublisher};
pub use orchestrator::PredictionEngine;
pub use stockout::{StockoutClassifier, StockoutInput, MAX_PREDICTION_HORIZON_DAYS};

// ==========================================
// SIMONTOK 油站监控系统 - 领域模型层
// ==========================================
// 职责: 定义销售/油罐输入、消耗画像、断油预测与推送载荷
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod feed;
pub mod prediction;
pub mod sale;
pub mod tank;
pub mod types;

// 重导出核心类型
pub use feed::{ReorderPrompt, SeverityCounts, StockoutFeed};
pub use prediction::{ConsumptionProfile, DaysUntilStockout, PredictionOutcome, StockoutPrediction};
pub use sale::SaleRecord;
pub use tank::TankRecord;
pub use types::{ConfidenceLevel, ConsumptionTrend, DaysRounding, StockoutSeverity, UnavailableReason};

// ==========================================
// SIMONTOK 油站监控系统 - API 层
// ==========================================
// 职责: 对外业务接口（CLI / 实时推送适配器调用）
// ==========================================

pub mod error;
pub mod prediction_api;

pub use error::{ApiError, ApiResult};
pub use prediction_api::StockoutPredictionApi;

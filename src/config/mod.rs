// ==========================================
// SIMONTOK 油站监控系统 - 配置层
// ==========================================
// 职责: 断油预测配置的定义、加载与校验
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod prediction_config;
pub mod prediction_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use prediction_config::{PredictionConfig, SeverityThresholds};
pub use prediction_config_trait::PredictionConfigReader;

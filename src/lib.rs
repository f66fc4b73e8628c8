// ==========================================
// SIMONTOK 油站监控系统 - 断油预测核心库
// ==========================================
// 职责: 由近期销售估算日均消耗，预测各油罐断油时间并分级告警
// 技术栈: Rust + SQLite
// 系统定位: 决策支持（下单由站长人工确认）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 公共工具 - 数值清洗
pub mod common;

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ConfidenceLevel, ConsumptionTrend, DaysRounding, StockoutSeverity, UnavailableReason,
};

// 领域实体
pub use domain::{
    ConsumptionProfile, DaysUntilStockout, PredictionOutcome, ReorderPrompt, SaleRecord,
    SeverityCounts, StockoutFeed, StockoutPrediction, TankRecord,
};

// 引擎
pub use engine::{
    ConsumptionEstimator, CriticalStockFilter, PredictionEngine, StockoutClassifier,
    StockoutFeedPublisher,
};

// 配置
pub use config::{ConfigError, ConfigManager, PredictionConfig, SeverityThresholds};

// API
pub use api::{ApiError, ApiResult, StockoutPredictionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SIMONTOK 断油预测";

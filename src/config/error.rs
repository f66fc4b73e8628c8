// ==========================================
// SIMONTOK 油站监控系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 配置错误是唯一允许中止系统的错误类别（部署缺陷，而非数据问题）
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("窗口天数无效: {0} (必须在 1..=3650 之间)")]
    InvalidWindow(u32),

    #[error("时区偏移无效: {0} 分钟 (必须在 ±24 小时以内)")]
    InvalidUtcOffset(i32),

    #[error("阈值无效: {name}={value} (必须为非负有限数值)")]
    InvalidThreshold { name: String, value: f64 },

    #[error("严重等级阈值未按升序配置: critical={critical}, high={high}, medium={medium}")]
    UnorderedThresholds { critical: f64, high: f64, medium: f64 },

    #[error("配置值无法解析: key={key}, value={value}")]
    InvalidValue { key: String, value: String },

    #[error("配置读取失败: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Storage(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

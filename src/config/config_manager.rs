// ==========================================
// SIMONTOK 油站监控系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载断油预测配置
// 存储: config_kv 表 (key-value + scope)，只读
// 红线: 缺失配置回落默认值；存在但非法的配置直接报错
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::prediction_config::{PredictionConfig, SeverityThresholds};
use crate::config::prediction_config_trait::PredictionConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::DaysRounding;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const WINDOW_DAYS: &str = "stockout/window_days";
    pub const TREND_THRESHOLD: &str = "stockout/trend_threshold";
    pub const MIN_SALE_RECORDS: &str = "stockout/min_sale_records";
    pub const MIN_ACTIVE_DAY_RATIO: &str = "stockout/min_active_day_ratio";
    pub const SEVERITY_CRITICAL_DAYS: &str = "stockout/severity_critical_days";
    pub const SEVERITY_HIGH_DAYS: &str = "stockout/severity_high_days";
    pub const SEVERITY_MEDIUM_DAYS: &str = "stockout/severity_medium_days";
    pub const CRITICAL_FILTER_DAYS: &str = "stockout/critical_filter_days";
    pub const DAYS_ROUNDING: &str = "stockout/days_rounding";
    pub const UTC_OFFSET_MINUTES: &str = "stockout/utc_offset_minutes";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取并解析配置值，缺失时返回默认值
    fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get_config_value(key)? {
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
            None => Ok(default),
        }
    }

    /// 加载断油预测配置（带校验）
    ///
    /// # 返回
    /// - Ok(PredictionConfig): 合法配置
    /// - Err(ConfigError): 配置值无法解析或校验失败
    pub fn load_prediction_config(&self) -> ConfigResult<PredictionConfig> {
        let defaults = PredictionConfig::default();

        let days_rounding = match self.get_config_value(config_keys::DAYS_ROUNDING)? {
            Some(raw) => DaysRounding::from_str(&raw).ok_or(ConfigError::InvalidValue {
                key: config_keys::DAYS_ROUNDING.to_string(),
                value: raw,
            })?,
            None => defaults.days_rounding,
        };

        let config = PredictionConfig {
            window_days: self.get_parsed_or(config_keys::WINDOW_DAYS, defaults.window_days)?,
            trend_threshold: self
                .get_parsed_or(config_keys::TREND_THRESHOLD, defaults.trend_threshold)?,
            min_sale_records: self
                .get_parsed_or(config_keys::MIN_SALE_RECORDS, defaults.min_sale_records)?,
            min_active_day_ratio: self.get_parsed_or(
                config_keys::MIN_ACTIVE_DAY_RATIO,
                defaults.min_active_day_ratio,
            )?,
            severity: SeverityThresholds {
                critical_days: self.get_parsed_or(
                    config_keys::SEVERITY_CRITICAL_DAYS,
                    defaults.severity.critical_days,
                )?,
                high_days: self
                    .get_parsed_or(config_keys::SEVERITY_HIGH_DAYS, defaults.severity.high_days)?,
                medium_days: self.get_parsed_or(
                    config_keys::SEVERITY_MEDIUM_DAYS,
                    defaults.severity.medium_days,
                )?,
            },
            critical_filter_days: self
                .get_parsed_or(config_keys::CRITICAL_FILTER_DAYS, defaults.critical_filter_days)?,
            days_rounding,
            utc_offset_minutes: self
                .get_parsed_or(config_keys::UTC_OFFSET_MINUTES, defaults.utc_offset_minutes)?,
        };

        config.validated()
    }

    /// 获取所有 stockout/ 配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 排查线上告警时核对当时生效的阈值
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' AND key LIKE 'stockout/%' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(json!(config_map).to_string())
    }
}

#[async_trait]
impl PredictionConfigReader for ConfigManager {
    async fn load_prediction_config(&self) -> ConfigResult<PredictionConfig> {
        ConfigManager::load_prediction_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(entries: &[(&str, &str)]) -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )
        .unwrap();
        for (key, value) in entries {
            conn.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )
            .unwrap();
        }
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let manager = manager_with(&[]);
        let config = manager.load_prediction_config().unwrap();
        assert_eq!(config, PredictionConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let manager = manager_with(&[
            (config_keys::WINDOW_DAYS, "14"),
            (config_keys::SEVERITY_MEDIUM_DAYS, "7"),
            (config_keys::DAYS_ROUNDING, "floor"),
        ]);
        let config = manager.load_prediction_config().unwrap();
        assert_eq!(config.window_days, 14);
        assert_eq!(config.severity.medium_days, 7.0);
        assert_eq!(config.days_rounding, DaysRounding::Floor);
    }

    #[test]
    fn test_unparsable_value_fails_fast() {
        let manager = manager_with(&[(config_keys::WINDOW_DAYS, "thirty")]);
        let err = manager.load_prediction_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_negative_threshold_fails_fast() {
        let manager = manager_with(&[(config_keys::SEVERITY_CRITICAL_DAYS, "-1")]);
        let err = manager.load_prediction_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold { .. }));
    }

    #[test]
    fn test_snapshot_only_contains_stockout_keys() {
        let manager = manager_with(&[
            (config_keys::WINDOW_DAYS, "14"),
            ("other/flag", "1"),
        ]);
        let snapshot: HashMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(config_keys::WINDOW_DAYS).map(String::as_str), Some("14"));
    }
}

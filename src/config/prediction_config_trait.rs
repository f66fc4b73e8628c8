// ==========================================
// SIMONTOK 油站监控系统 - 预测配置读取 Trait
// ==========================================
// 职责: 定义预测服务所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）、PredictionConfig（静态配置）
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::prediction_config::PredictionConfig;
use async_trait::async_trait;

#[async_trait]
pub trait PredictionConfigReader: Send + Sync {
    /// 加载并校验断油预测配置
    ///
    /// # 返回
    /// - Ok(PredictionConfig): 校验通过的配置
    /// - Err(ConfigError): 配置非法，调用方应在启动阶段终止
    async fn load_prediction_config(&self) -> ConfigResult<PredictionConfig>;
}

/// 静态配置（测试/嵌入场景）
#[async_trait]
impl PredictionConfigReader for PredictionConfig {
    async fn load_prediction_config(&self) -> ConfigResult<PredictionConfig> {
        self.clone().validated()
    }
}

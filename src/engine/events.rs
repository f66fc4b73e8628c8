// ==========================================
// SIMONTOK 油站监控系统 - 推送载荷发布
// ==========================================
// 职责: 定义驾驶舱推送发布 trait，实现依赖倒置
// 说明: 引擎只产出 StockoutFeed，实时通道/消息队列由外部适配器实现
// ==========================================

use crate::domain::feed::StockoutFeed;
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 发布 Trait
// ==========================================

/// 断油预测推送发布者 Trait
///
/// # 实现说明
/// - 外部实时通道适配器实现此 trait
/// - 发布失败只影响本次推送，不影响预测结果
pub trait StockoutFeedPublisher: Send + Sync {
    /// 发布推送载荷
    ///
    /// # 返回
    /// - `Ok(receipt)`: 传输层回执（如果支持）或空字符串
    /// - `Err`: 发布失败
    fn publish(&self, feed: &StockoutFeed) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 可选的发布者包装
///
/// 未配置发布者时（命令行、单元测试）跳过推送
#[derive(Clone, Default)]
pub struct OptionalFeedPublisher {
    inner: Option<Arc<dyn StockoutFeedPublisher>>,
}

impl OptionalFeedPublisher {
    pub fn with_publisher(publisher: Arc<dyn StockoutFeedPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布（如果有发布者）
    pub fn publish(&self, feed: &StockoutFeed) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(feed),
            None => {
                tracing::debug!(
                    "OptionalFeedPublisher: 未配置发布者，跳过推送 - feed_id={}",
                    feed.feed_id
                );
                Ok(String::new())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

// ==========================================
// SIMONTOK 油站监控系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供销售/油罐只读访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod data_source;
pub mod error;
pub mod sale_repo;
pub mod tank_repo;

// 重导出核心仓储
pub use data_source::{SqliteStockDataSource, StockDataSource};
pub use error::{RepositoryError, RepositoryResult};
pub use sale_repo::SaleRepository;
pub use tank_repo::TankRepository;

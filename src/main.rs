// ==========================================
// SIMONTOK 油站监控系统 - 命令行入口
// ==========================================
// 用法:
//   simontok-stockout [db_path] <station_id>
//
// 输出: 油站推送载荷（pretty JSON，stdout）；日志写 stderr
// ==========================================

use anyhow::{bail, Context};
use chrono::Utc;
use simontok_stockout::config::ConfigManager;
use simontok_stockout::db::{get_default_db_path, open_sqlite_connection};
use simontok_stockout::logging;
use simontok_stockout::repository::SqliteStockDataSource;
use simontok_stockout::StockoutPredictionApi;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, station_arg) = match args.as_slice() {
        [station] => (get_default_db_path(), station.clone()),
        [db_path, station] => (db_path.clone(), station.clone()),
        _ => bail!("用法: simontok-stockout [db_path] <station_id>"),
    };

    let station_id: i64 = station_arg
        .trim()
        .parse()
        .with_context(|| format!("无效的油站 ID: {}", station_arg))?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", simontok_stockout::APP_NAME, simontok_stockout::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let conn = Arc::new(Mutex::new(
        open_sqlite_connection(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?,
    ));

    // 配置非法直接退出，不产出任何预测
    let config = ConfigManager::from_connection(conn.clone())
        .load_prediction_config()
        .context("预测配置加载失败")?;

    let api = StockoutPredictionApi::new(Arc::new(SqliteStockDataSource::from_connection(conn)), &config)?;
    let feed = api.publish_feed(station_id, Utc::now()).await?;

    println!("{}", serde_json::to_string_pretty(&feed)?);

    Ok(())
}

// ==========================================
// 开发工具: 重建演示数据库（单个油站的油罐 + 45 天销售）
// ==========================================
// 用法:
//   cargo run --bin reset_and_seed_demo_db -- [db_path] [station_id]
//
// 已存在的数据库文件会先备份再重置
// ==========================================

use chrono::{Duration, FixedOffset, Local, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use simontok_stockout::config::config_keys;
use simontok_stockout::config::prediction_config::DEFAULT_UTC_OFFSET_MINUTES;
use simontok_stockout::db::{get_default_db_path, open_sqlite_connection};

const DEFAULT_STATION_ID: i64 = 3171;
const HISTORY_DAYS: i64 = 45;

struct TankSeed {
    fuel_type: &'static str,
    capacity: f64,
    current_stock: f64,
    // 每日基础销量（升）；0 表示无销售
    base_daily_liters: f64,
    // 每日增量（升/天），用于制造上升/下降趋势
    daily_drift: f64,
}

const TANK_SEEDS: &[TankSeed] = &[
    TankSeed {
        fuel_type: "Pertalite",
        capacity: 30_000.0,
        current_stock: 4_200.0,
        base_daily_liters: 3_000.0,
        daily_drift: 40.0,
    },
    TankSeed {
        fuel_type: "Pertamax",
        capacity: 20_000.0,
        current_stock: 11_000.0,
        base_daily_liters: 1_200.0,
        daily_drift: 0.0,
    },
    TankSeed {
        fuel_type: "Biosolar",
        capacity: 24_000.0,
        current_stock: 2_000.0,
        base_daily_liters: 2_500.0,
        daily_drift: -30.0,
    },
    TankSeed {
        fuel_type: "Dexlite",
        capacity: 10_000.0,
        current_stock: 9_500.0,
        base_daily_liters: 0.0,
        daily_drift: 0.0,
    },
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    let station_id = std::env::args()
        .nth(2)
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_STATION_ID);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;

    // 建表
    let schema_sql = include_str!("../../scripts/dev_db/schema.sql");
    conn.execute_batch(schema_sql)?;

    seed_demo_station(&conn, station_id)?;
    print_quick_counts(&conn)?;

    eprintln!("已写入油站 {} 演示数据: {}", station_id, db_path);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("已备份 {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo_station(conn: &Connection, station_id: i64) -> Result<(), Box<dyn Error>> {
    // 销售时间按油站本地时间写入
    let station_tz = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
        .ok_or("默认时区偏移无效")?;
    let today = Utc::now().with_timezone(&station_tz).date_naive();
    let now_sql_dt = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let first_day = today - Duration::days(HISTORY_DAYS - 1);

    let tx = conn.unchecked_transaction()?;

    // 默认配置显式落库
    let config_rows = [
        (config_keys::WINDOW_DAYS, "30"),
        (config_keys::TREND_THRESHOLD, "0.10"),
        (config_keys::MIN_SALE_RECORDS, "3"),
        (config_keys::MIN_ACTIVE_DAY_RATIO, "0.5"),
        (config_keys::SEVERITY_CRITICAL_DAYS, "1"),
        (config_keys::SEVERITY_HIGH_DAYS, "3"),
        (config_keys::SEVERITY_MEDIUM_DAYS, "5"),
        (config_keys::CRITICAL_FILTER_DAYS, "5"),
        (config_keys::DAYS_ROUNDING, "exact"),
        (config_keys::UTC_OFFSET_MINUTES, "420"),
    ];
    for (key, value) in config_rows {
        tx.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, ?3)",
            params![key, value, now_sql_dt],
        )?;
    }

    let created_at = first_day.format("%Y-%m-%d").to_string();
    for seed in TANK_SEEDS {
        tx.execute(
            "INSERT INTO tanks (spbu_id, fuel_type, capacity, current_stock, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![station_id, seed.fuel_type, seed.capacity, seed.current_stock, created_at],
        )?;

        if seed.base_daily_liters <= 0.0 {
            continue;
        }

        for day_idx in 0..HISTORY_DAYS {
            let date = first_day + Duration::days(day_idx);
            let daily = (seed.base_daily_liters + seed.daily_drift * day_idx as f64).max(0.0);

            // 每天拆成 4 个班次的交易
            for (shift, hour) in [6u32, 10, 14, 19].into_iter().enumerate() {
                let weight = [0.2, 0.3, 0.3, 0.2][shift];
                let Some(sold_at) = date.and_hms_opt(hour, 15, 0) else {
                    continue;
                };
                insert_sale(&tx, station_id, seed.fuel_type, daily * weight, sold_at)?;
            }
        }
    }

    tx.commit()?;
    Ok(())
}

fn insert_sale(
    conn: &Connection,
    station_id: i64,
    fuel_type: &str,
    liters: f64,
    sold_at: NaiveDateTime,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO fuel_sales (spbu_id, fuel_type, liters, sold_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            station_id,
            fuel_type,
            (liters * 100.0).round() / 100.0,
            sold_at.format("%Y-%m-%d %H:%M:%S").to_string()
        ],
    )?;
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    eprintln!("行数统计:");
    for table in ["config_kv", "tanks", "fuel_sales"] {
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("  {:<12} {}", table, count);
    }
    Ok(())
}

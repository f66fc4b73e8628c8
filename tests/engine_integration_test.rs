// ==========================================
// 引擎层集成测试
// ==========================================
// 测试目标: 估算器 + 判定器 + 告警过滤 的公开接口组合行为
// ==========================================


use chrono::Duration;
use simontok_stockout::common::NumericInput;
use simontok_stockout::config::{PredictionConfig, SeverityThresholds};
use simontok_stockout::domain::{
    ConfidenceLevel, ConsumptionTrend, DaysRounding, DaysUntilStockout, SaleRecord,
    StockoutPrediction, StockoutSeverity, TankRecord,
};
use simontok_stockout::engine::{
    ConsumptionEstimator, CriticalStockFilter, PredictionEngine, SalesWindow, StockoutClassifier,
    StockoutInput,
};
use test_helpers::{fixed_now, today, STATION_ID};

fn input<'a>(stock: NumericInput<'a>, consumption: NumericInput<'a>) -> StockoutInput<'a> {
    StockoutInput {
        fuel_type: "Pertalite",
        current_stock: stock,
        tank_capacity: NumericInput::Number(10_000.0),
        avg_daily_consumption: consumption,
        avg_transactions_per_day: NumericInput::Missing,
        consumption_trend: ConsumptionTrend::Stable,
        confidence_level: ConfidenceLevel::Medium,
    }
}

// ==========================================
// 非法输入降级
// ==========================================

#[test]
fn test_string_zero_consumption_is_unbounded() {
    let classifier = StockoutClassifier::default();
    let p = classifier.classify_input(
        &input(NumericInput::Number(500.0), NumericInput::Text("0")),
        fixed_now(),
    );

    assert_eq!(p.avg_daily_consumption, 0.0);
    assert!(p.days_until_stockout.is_unbounded());
    assert_eq!(p.predicted_stockout_date, None);
    assert_eq!(p.severity, StockoutSeverity::None);
}

#[test]
fn test_missing_consumption_is_unbounded() {
    let classifier = StockoutClassifier::default();
    let p = classifier.classify_input(
        &input(NumericInput::Number(200.0), NumericInput::Missing),
        fixed_now(),
    );

    assert!(p.days_until_stockout.is_unbounded());
    assert_eq!(p.severity, StockoutSeverity::None);
    assert_eq!(p.avg_transactions_per_day, 0.0);
    assert_eq!(p.recommended_order_volume, 9_800.0);
}

#[test]
fn test_garbage_stock_is_treated_as_empty() {
    let classifier = StockoutClassifier::default();
    let p = classifier.classify_input(
        &input(NumericInput::Text("n/a"), NumericInput::Text(" 25 ")),
        fixed_now(),
    );

    assert_eq!(p.current_stock, 0.0);
    assert_eq!(p.days_until_stockout, DaysUntilStockout::Finite(0.0));
    assert_eq!(p.severity, StockoutSeverity::Critical);
}

#[test]
fn test_non_finite_inputs_never_panic() {
    let classifier = StockoutClassifier::default();
    for (stock, consumption) in [
        (f64::NAN, 10.0),
        (100.0, f64::NAN),
        (f64::INFINITY, 10.0),
        (100.0, f64::INFINITY),
        (-50.0, 10.0),
        (100.0, -3.0),
    ] {
        let p = classifier.classify_input(
            &input(NumericInput::Number(stock), NumericInput::Number(consumption)),
            fixed_now(),
        );
        assert!(p.current_stock.is_finite());
        assert!(p.avg_daily_consumption.is_finite());
        if let Some(days) = p.days_until_stockout.finite() {
            assert!(days.is_finite() && days >= 0.0);
        }
    }
}

// ==========================================
// 等级边界与告警过滤一致性
// ==========================================

#[test]
fn test_severity_boundaries_and_filter() {
    let classifier = StockoutClassifier::default();
    let filter = CriticalStockFilter::default();

    let cases = [
        (1.0, StockoutSeverity::Critical, true),
        (3.0, StockoutSeverity::High, true),
        (5.0, StockoutSeverity::Medium, true),
        (5.01, StockoutSeverity::None, false),
    ];

    for (stock, severity, critical) in cases {
        let p = classifier.classify_input(
            &input(NumericInput::Number(stock), NumericInput::Number(1.0)),
            fixed_now(),
        );
        assert_eq!(p.severity, severity, "stock={}", stock);
        assert_eq!(filter.is_critical(&p), critical, "stock={}", stock);
    }
}

#[test]
fn test_rounding_policies_change_bucketing() {
    let thresholds = SeverityThresholds::default();
    let floor = StockoutClassifier::new(thresholds, DaysRounding::Floor);
    let round = StockoutClassifier::new(thresholds, DaysRounding::Round);
    let exact = StockoutClassifier::new(thresholds, DaysRounding::Exact);

    let raw = input(NumericInput::Number(5.4), NumericInput::Number(1.0));
    assert_eq!(exact.classify_input(&raw, fixed_now()).severity, StockoutSeverity::None);
    assert_eq!(floor.classify_input(&raw, fixed_now()).severity, StockoutSeverity::Medium);
    assert_eq!(round.classify_input(&raw, fixed_now()).severity, StockoutSeverity::Medium);

    let raw = input(NumericInput::Number(5.6), NumericInput::Number(1.0));
    assert_eq!(floor.classify_input(&raw, fixed_now()).severity, StockoutSeverity::Medium);
    assert_eq!(round.classify_input(&raw, fixed_now()).severity, StockoutSeverity::None);
}

#[test]
fn test_replayed_predictions_are_filtered_safely() {
    let filter = CriticalStockFilter::default();
    let replay = serde_json::json!([
        { "fuelType": "A", "consumptionTrend": "stable", "confidenceLevel": "low",
          "daysUntilStockout": null, "severity": "critical" },
        { "fuelType": "B", "consumptionTrend": "stable", "confidenceLevel": "low",
          "daysUntilStockout": "abc", "severity": "high" },
        { "fuelType": "C", "consumptionTrend": "stable", "confidenceLevel": "low",
          "daysUntilStockout": "4.5" },
        { "fuelType": "D", "consumptionTrend": "stable", "confidenceLevel": "low",
          "daysUntilStockout": -2 },
        { "fuelType": "E", "consumptionTrend": "stable", "confidenceLevel": "low",
          "daysUntilStockout": 12 }
    ]);

    let predictions: Vec<StockoutPrediction> = serde_json::from_value(replay).unwrap();
    let critical: Vec<String> = filter
        .filter(&predictions)
        .into_iter()
        .map(|p| p.fuel_type)
        .collect();

    assert_eq!(critical, vec!["C".to_string(), "D".to_string()]);
    assert_eq!(predictions[3].days_until_stockout, DaysUntilStockout::Finite(0.0));
}

// ==========================================
// 估算 + 判定
// ==========================================

#[test]
fn test_estimator_ignores_other_fuels_and_old_sales() {
    let estimator = ConsumptionEstimator::new(&PredictionConfig {
        window_days: 7,
        ..Default::default()
    });
    let at = |days_ago: i64| (today() - Duration::days(days_ago)).and_hms_opt(9, 0, 0).unwrap();

    let sales = vec![
        SaleRecord::new(STATION_ID, "Solar", 70.0, at(0)),
        SaleRecord::new(STATION_ID, "Solar", 70.0, at(6)),
        SaleRecord::new(STATION_ID, "Solar", 700.0, at(7)),
        SaleRecord::new(STATION_ID, "Pertalite", 700.0, at(1)),
        SaleRecord::new(1, "Solar", 700.0, at(1)),
    ];
    let window = SalesWindow {
        end_date: today(),
        sales: &sales,
        history_start: Some(today() - Duration::days(400)),
    };

    let profile = estimator.estimate(STATION_ID, "Solar", &window);
    assert_eq!(profile.avg_daily_consumption, 20.0);
    assert_eq!(profile.sale_count, 2);
    assert_eq!(profile.active_days, 2);
    assert_eq!(profile.confidence_level, ConfidenceLevel::Low);
}

#[test]
fn test_classify_batch_matches_single() {
    let engine = PredictionEngine::default();
    let at = |days_ago: i64| (today() - Duration::days(days_ago)).and_hms_opt(9, 0, 0).unwrap();
    let sales: Vec<SaleRecord> = (0..30)
        .map(|n| SaleRecord::new(STATION_ID, "Pertamax", 60.0, at(n)))
        .collect();

    let tank = TankRecord::new(STATION_ID, "Pertamax", 5_000.0, 120.0);
    let profile = engine.profile(
        STATION_ID,
        "Pertamax",
        &sales,
        Some(today() - Duration::days(90)),
        today(),
    );

    let batch = engine
        .classifier()
        .classify_batch(&[(tank.clone(), profile.clone())], fixed_now());
    let single = engine.classifier().classify(&tank, &profile, fixed_now());

    assert_eq!(batch, vec![single.clone()]);
    assert_eq!(single.days_until_stockout, DaysUntilStockout::Finite(2.0));
    assert_eq!(single.severity, StockoutSeverity::High);
    assert_eq!(single.confidence_level, ConfidenceLevel::High);
}

// ==========================================
// SIMONTOK 油站监控系统 - 公共工具层
// ==========================================
// 职责: 各层共用的无状态工具函数
// ==========================================

pub mod numeric;

pub use numeric::{coerce_finite, coerce_non_negative, coerce_or_zero, NumericInput};

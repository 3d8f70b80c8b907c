// crates/wm_foundation/src/tolerance.rs

//! 数值容差与物理常数

/// 重力加速度 [m/s²]
pub const GRAVITY: f64 = 9.81;

/// 单位向量长度容差
pub const UNIT_VECTOR_EPS: f64 = 1e-6;

/// 带相对容差的浮点比较
///
/// `|a - b| <= eps * max(1, |a|, |b|)`
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= eps * scale
}

// crates/wm_physics/src/reduce.rs

//! 跨子域归约接口
//!
//! 区域分解并行时，一个造波板边界可能被切到多个子域。每个子域只看到
//! 部分面和部分点，但所有子域必须用同一组全局量（带内湿面积之和、
//! 边界横向/竖向范围）算出完全相同的修正量。宿主通过实现 [`PatchReduce`]
//! 接入自己的通信层；串行运行使用 [`SerialReduce`]。

/// 全局归约
pub trait PatchReduce {
    /// 逐元素求和，结果写回 `values`
    fn sum_in_place(&self, values: &mut [f64]);

    /// 全局最小值
    fn min(&self, local: f64) -> f64;

    /// 全局最大值
    fn max(&self, local: f64) -> f64;
}

/// 单进程归约（恒等）
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialReduce;

impl PatchReduce for SerialReduce {
    #[inline]
    fn sum_in_place(&self, _values: &mut [f64]) {}

    #[inline]
    fn min(&self, local: f64) -> f64 {
        local
    }

    #[inline]
    fn max(&self, local: f64) -> f64 {
        local
    }
}

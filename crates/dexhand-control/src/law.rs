//! TorqueLaw trait - 力矩计算策略接口
//!
//! 控制循环不规定力矩怎么算：重力补偿、PID、阻抗控制都由集成方
//! 注入一个实现了 [`TorqueLaw`] 的策略对象。核心只约定签名：
//! 读滤波后状态 + 信箱里的最新期望状态，返回全关节期望力矩。
//!
//! # 设计理念
//!
//! - **Tick 模式**: 循环驱动策略，策略只负责计算
//! - **时间感知**: 显式传入 `dt`（保证为正），便于单元测试
//! - **错误处理**: 关联类型 `Error` 允许自定义错误，经
//!   `ControlError: From<L::Error>` 约束透明上抛
//!
//! # 示例
//!
//! ```rust
//! use dexhand_control::{ObservedState, TorqueLaw};
//! use dexhand_types::{JointState, JointVector};
//! use std::convert::Infallible;
//!
//! /// 朝期望位置的简单比例策略
//! struct Proportional {
//!     gain: f64,
//! }
//!
//! impl TorqueLaw for Proportional {
//!     type Error = Infallible;
//!
//!     fn compute(
//!         &mut self,
//!         observed: &ObservedState<'_>,
//!         desired: &JointState,
//!         _dt: f64,
//!     ) -> Result<JointVector, Self::Error> {
//!         Ok(desired
//!             .position
//!             .zip_map(observed.position, |d, c| self.gain * (d - c)))
//!     }
//! }
//! ```

use dexhand_types::{JointState, JointVector};
use std::convert::Infallible;
use std::fmt;

/// 策略可见的滤波后状态（借用控制循环的缓冲，零拷贝）
#[derive(Debug, Clone, Copy)]
pub struct ObservedState<'a> {
    /// 滤波位置
    pub position: &'a JointVector,
    /// 滤波速度
    pub velocity: &'a JointVector,
}

/// 力矩计算策略
///
/// 每个有效 tick 被调用一次。`desired` 是调用时刻信箱中最新的
/// 期望状态快照（整值拷贝，策略内读取无并发问题）。
pub trait TorqueLaw {
    /// 策略自定义错误类型
    type Error: fmt::Display;

    /// 计算全关节期望力矩
    ///
    /// `dt` 为本 tick 实测间隔（秒），保证严格为正。
    fn compute(
        &mut self,
        observed: &ObservedState<'_>,
        desired: &JointState,
        dt: f64,
    ) -> Result<JointVector, Self::Error>;
}

/// 零力矩策略
///
/// 始终输出全零力矩。用于 sim 运行、接线验证和测试基线。
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTorque;

impl TorqueLaw for ZeroTorque {
    type Error = Infallible;

    fn compute(
        &mut self,
        _observed: &ObservedState<'_>,
        _desired: &JointState,
        _dt: f64,
    ) -> Result<JointVector, Self::Error> {
        Ok(JointVector::splat(0.0))
    }
}

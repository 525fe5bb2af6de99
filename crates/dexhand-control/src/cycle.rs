//! 控制循环状态机
//!
//! 每个 tick 走一遍固定状态序列：
//!
//! ```text
//! Idle → TimingCheck → (Abort | Proceed) → BusExchange
//!      → Filtering → TorqueCompute → Publish → Idle
//! ```
//!
//! - **TimingCheck**: `dt = now - last_tick`（秒）。`dt <= 0`（调度器
//!   重入、时钟异常）转 Abort：本 tick 仍然服务总线，但归档/滤波/
//!   力矩/发布全部跳过，时间戳**不**前移，下一个有效 tick 的 dt
//!   累积完整间隔。诊断限速记录，不升级为错误。
//! - **Proceed**: 在总线读回覆盖之前归档上一代缓冲。
//! - **BusExchange**: 力矩下发 → 交换 → 位置读回，顺序固定（§总线契约）。
//!   每个 tick 无条件执行，退化 tick 也要服务硬件。
//! - **TorqueCompute**: 调用注入的力矩策略，读信箱最新期望状态快照。
//! - **Publish**: 滤波位置/速度 + 期望力矩拷入对外状态，打本 tick
//!   时间戳，调用发布端口，tick 计数 +1。
//!
//! # 故障旗标
//!
//! 交换返回的负状态码被记录（[`ControlCycle::last_status`]）并在
//! 进入故障沿时告警，但**不**升级为停机：参考实现把 fail-stop 留作
//! 注释，升级策略交给集成方。丢一个 tick 好过循环崩掉。
//!
//! # 非重入
//!
//! [`ControlCycle::tick`] 取 `&mut self`，唯一调用方是 runner 的
//! 单个定时线程，两个 tick 不可能并发。

use crate::error::ControlError;
use crate::filter::FilterHistory;
use crate::inbox::CommandInbox;
use crate::law::{ObservedState, TorqueLaw};
use crate::publish::StatePublisher;
use dexhand_bus::{BusStatus, BusTransport};
use dexhand_types::{JointState, JointVector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// 退化 tick 告警的最小间隔
const DEGENERATE_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// 单个 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 完整走完状态机，已发布
    Completed,
    /// `dt <= 0`，仅服务了总线，计算与发布跳过
    SkippedDegenerateDt,
}

/// 控制循环
///
/// 独占持有全部每 tick 缓冲：滤波历史、期望力矩、对外状态、
/// 计时状态。启动时一次分配，热路径零堆内存。
pub struct ControlCycle<B, L, P> {
    bus: B,
    law: L,
    publisher: P,
    inbox: Arc<CommandInbox>,
    history: FilterHistory,
    desired_torque: JointVector,
    joint_state: JointState,
    last_tick: Instant,
    frame: u64,
    last_status: BusStatus,
    last_degenerate_log: Option<Instant>,
}

impl<B, L, P> ControlCycle<B, L, P>
where
    B: BusTransport,
    L: TorqueLaw,
    P: StatePublisher,
    ControlError: From<L::Error>,
{
    /// 创建控制循环并执行一次预热交换
    ///
    /// 预热交换（零力矩下发 + 位置读回）让第一个有效 tick 对着真实
    /// 位置快照做差分，而不是对着全零缓冲。同时初始化计时基准。
    pub fn new(
        bus: B,
        law: L,
        publisher: P,
        inbox: Arc<CommandInbox>,
    ) -> Result<Self, ControlError> {
        let mut cycle = ControlCycle {
            bus,
            law,
            publisher,
            inbox,
            history: FilterHistory::new(),
            desired_torque: JointVector::splat(0.0),
            joint_state: JointState::zeroed(),
            last_tick: Instant::now(),
            frame: 0,
            last_status: BusStatus::OK,
            last_degenerate_log: None,
        };
        cycle.exchange_bus()?;
        cycle.last_tick = Instant::now();
        Ok(cycle)
    }

    /// 执行一个 tick
    ///
    /// `now` 为调度器提供的本 tick 单调时钟读数。
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, ControlError> {
        // TimingCheck：now 早于 last_tick 时 checked_duration_since 为 None
        let dt = match now.checked_duration_since(self.last_tick) {
            Some(elapsed) => elapsed.as_secs_f64(),
            None => -1.0,
        };

        if dt <= 0.0 {
            // Abort：硬件照常服务，计算跳过，时间戳不前移
            self.exchange_bus()?;
            self.note_degenerate_tick(now);
            return Ok(TickOutcome::SkippedDegenerateDt);
        }

        self.last_tick = now;

        // Proceed：总线读回覆盖之前归档上一代
        self.history.archive();

        // BusExchange
        self.exchange_bus()?;

        // Filtering
        self.history.apply(dt);

        // TorqueCompute：信箱整值快照 + 滤波状态借用
        let desired = self.inbox.desired()?;
        let observed = ObservedState {
            position: &self.history.filtered_position,
            velocity: &self.history.filtered_velocity,
        };
        self.desired_torque = self.law.compute(&observed, &desired, dt)?;

        // Publish
        self.joint_state.position = self.history.filtered_position;
        self.joint_state.velocity = self.history.filtered_velocity;
        self.joint_state.effort = self.desired_torque;
        self.joint_state.stamp = Some(now);
        self.publisher.publish(&self.joint_state)?;

        self.frame += 1;
        trace!(frame = self.frame, dt, "control tick completed");
        Ok(TickOutcome::Completed)
    }

    /// 已完成的 tick 数（退化 tick 不计）
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// 最近一次总线交换的状态码（故障旗标）
    pub fn last_status(&self) -> BusStatus {
        self.last_status
    }

    /// 最近发布的对外状态
    pub fn state(&self) -> &JointState {
        &self.joint_state
    }

    /// 总线交换：力矩出 → 交换 → 位置入，顺序固定
    fn exchange_bus(&mut self) -> Result<(), ControlError> {
        self.bus.send_torque(&self.desired_torque)?;
        let status = self.bus.exchange()?;
        if status.is_fault() && !self.last_status.is_fault() {
            // 记录但不升级：升级策略由集成方决定
            warn!(code = status.code(), "bus reported fault status");
        }
        self.last_status = status;
        self.bus.read_positions(&mut self.history.raw_position)?;
        Ok(())
    }

    /// 退化 tick 诊断（限速，最多每秒一条）
    fn note_degenerate_tick(&mut self, now: Instant) {
        let due = match self.last_degenerate_log {
            Some(at) => now
                .checked_duration_since(at)
                .is_some_and(|since| since >= DEGENERATE_LOG_INTERVAL),
            None => true,
        };
        if due {
            debug!("control tick skipped: non-positive dt");
            self.last_degenerate_log = Some(now);
        }
    }
}

//! Loop Runner - 固定频率调度包装
//!
//! 在专用线程上以固定标称频率驱动 [`ControlCycle::tick`]。
//! 使用 `spin_sleep` 获得低抖动延时（相比 `std::thread::sleep`
//! 的 1-2ms 粒度）。
//!
//! 循环严格串行：一次 tick 返回之前不会发起下一次，重入由构造排除。
//! 停止途径：
//! - `shutdown` 旗标置位（Ctrl-C 处理器等）
//! - 达到 `max_ticks`（测试/定时运行）
//! - tick 返回错误（透明上抛）

use crate::cycle::{ControlCycle, TickOutcome};
use crate::error::ControlError;
use crate::law::TorqueLaw;
use crate::publish::StatePublisher;
use dexhand_bus::BusTransport;
use spin_sleep::SpinSleeper;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 控制循环配置
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// 控制频率（Hz），标称 1 kHz
    pub frequency_hz: f64,

    /// 最大 tick 次数（按调度次数计，含退化 tick；None 表示无限循环）
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 1000.0,
            max_ticks: None,
        }
    }
}

/// 运行控制循环（阻塞当前线程）
///
/// 每个周期读一次单调时钟并调用 `cycle.tick(now)`，随后睡到下一个
/// 周期。退出条件见模块文档。
///
/// # 错误
/// - `ControlError::Config`: 配置非法（`frequency_hz <= 0`）
/// - 其余错误来自 tick 内部，原样上抛
pub fn run<B, L, P>(
    cycle: &mut ControlCycle<B, L, P>,
    config: &LoopConfig,
    shutdown: &AtomicBool,
) -> Result<(), ControlError>
where
    B: BusTransport,
    L: TorqueLaw,
    P: StatePublisher,
    ControlError: From<L::Error>,
{
    if config.frequency_hz <= 0.0 {
        return Err(ControlError::Config(format!(
            "Invalid frequency_hz: {} (must be > 0)",
            config.frequency_hz
        )));
    }
    if config.frequency_hz > 10_000.0 {
        warn!(
            "Very high control frequency: {} Hz. This may cause performance issues.",
            config.frequency_hz
        );
    }

    let nominal_period = Duration::from_secs_f64(1.0 / config.frequency_hz);
    let sleeper = SpinSleeper::default();

    info!(
        frequency_hz = config.frequency_hz,
        "control loop starting"
    );

    let mut ticks: u64 = 0;
    let mut skipped: u64 = 0;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!(ticks, skipped, "control loop stopped by shutdown flag");
            return Ok(());
        }
        if let Some(max) = config.max_ticks
            && ticks >= max
        {
            info!(ticks, skipped, "control loop reached tick budget");
            return Ok(());
        }

        if cycle.tick(Instant::now())? == TickOutcome::SkippedDegenerateDt {
            skipped += 1;
        }
        ticks += 1;

        sleeper.sleep(nominal_period);
    }
}

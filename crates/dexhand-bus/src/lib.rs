//! # Dexhand Bus - 现场总线抽象层
//!
//! 定义控制循环对硬件总线的最小契约。具体设备驱动（SocketCAN、
//! 厂商 USB 适配器等）由集成方实现 [`BusTransport`] 提供，
//! 本 crate 不包含任何真实设备代码。
//!
//! # 每 tick 调用顺序
//!
//! 总线在一个 tick 内是半双工的：命令先出，状态随同一个交换窗口回传。
//! 因此三个操作的顺序固定，不可调换：
//!
//! 1. [`BusTransport::send_torque`] - 下发全部关节的期望力矩
//! 2. [`BusTransport::exchange`] - 驱动一次总线请求/响应交换，回传状态码
//! 3. [`BusTransport::read_positions`] - 读回全部关节的原始位置
//!
//! 状态码符号约定：负值表示硬件故障（如急停上报）。控制循环记录该值，
//! 是否升级为停机由集成方决定。
//!
//! # Mock 模式
//!
//! 启用 `mock` feature 后提供 [`MockBus`]，用于核心测试和 sim 运行，
//! 可脚本化位置回放和状态码注入。

use dexhand_types::JointVector;
use thiserror::Error;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::{BusCall, MockBus};

/// 总线抽象层统一错误类型
#[derive(Error, Debug)]
pub enum BusError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(String),
    #[error("Exchange timeout")]
    Timeout,
    #[error("Device not started")]
    NotStarted,
}

/// 总线交换状态码
///
/// 符号约定：负值 = 硬件故障（参照急停上报）。非负值语义由设备自定，
/// 控制循环只关心符号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusStatus(i32);

impl BusStatus {
    /// 正常状态码
    pub const OK: BusStatus = BusStatus(0);

    /// 从原始状态码创建
    #[inline]
    pub const fn new(code: i32) -> Self {
        BusStatus(code)
    }

    /// 原始状态码
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// 是否为故障（负状态码）
    #[inline]
    pub const fn is_fault(self) -> bool {
        self.0 < 0
    }
}

impl Default for BusStatus {
    fn default() -> Self {
        BusStatus::OK
    }
}

/// 现场总线传输契约
///
/// 控制循环每个 tick 按固定顺序调用一遍全部三个操作，
/// 即使该 tick 的时间间隔为退化值也照常服务硬件。
///
/// 实现方假定单次交换是快速有界的；契约内不含超时/取消，
/// 一次卡死的交换会卡住整个控制循环（已知限制，由实现方保证延迟）。
pub trait BusTransport {
    /// 下发全部关节的期望力矩
    fn send_torque(&mut self, torque: &JointVector) -> Result<(), BusError>;

    /// 驱动一次总线通信交换，返回设备状态码
    fn exchange(&mut self) -> Result<BusStatus, BusError>;

    /// 读回全部关节的原始位置
    fn read_positions(&mut self, out: &mut JointVector) -> Result<(), BusError>;
}

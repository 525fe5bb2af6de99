//! 控制层错误类型定义

use dexhand_bus::BusError;
use dexhand_types::StateError;
use std::convert::Infallible;
use thiserror::Error;

/// 控制层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 总线传输错误
    #[error("Bus transport error: {0}")]
    Bus(#[from] BusError),

    /// 状态消息错误（入站转换边界的长度校验等）
    #[error("State message error: {0}")]
    State(#[from] StateError),

    /// 力矩策略错误
    #[error("Torque law error: {0}")]
    Law(String),

    /// 锁被毒化（线程 panic）
    #[error("Poisoned lock (thread panic)")]
    PoisonedLock,

    /// 发布通道已关闭（消费端退出）
    #[error("Publish channel closed")]
    ChannelClosed,

    /// 无效配置
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// 无错策略（如 ZeroTorque）的错误类型是 Infallible
impl From<Infallible> for ControlError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试 ControlError 的 Display 实现
    #[test]
    fn test_control_error_display() {
        let err = ControlError::Bus(BusError::Timeout);
        assert!(format!("{}", err).contains("Exchange timeout"));

        let err = ControlError::PoisonedLock;
        assert_eq!(format!("{}", err), "Poisoned lock (thread panic)");

        let err = ControlError::Config("frequency_hz must be > 0".to_string());
        assert!(format!("{}", err).contains("frequency_hz"));
    }

    /// 测试 From<BusError> 转换
    #[test]
    fn test_from_bus_error() {
        let err: ControlError = BusError::NotStarted.into();
        assert!(matches!(err, ControlError::Bus(BusError::NotStarted)));
    }

    /// 测试 From<StateError> 转换
    #[test]
    fn test_from_state_error() {
        let state_err = StateError::LengthMismatch {
            field: "position",
            expected: 16,
            actual: 4,
        };
        let err: ControlError = state_err.into();
        assert!(matches!(err, ControlError::State(_)));
    }
}

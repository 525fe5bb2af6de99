//! Mock 总线
//!
//! 用于测试和 sim 运行的内存总线实现：
//! - 记录每次契约调用及其顺序（验证"力矩先出、位置后读"）
//! - 位置可脚本化回放，脚本耗尽后保持最后一个值
//! - 状态码可注入，用于故障路径测试
//!
//! 调用/力矩记录是有界的（[`MockBus::RECORD_CAPACITY`]）：超限丢弃
//! 最旧的一半，只保留最近的记录。sim 节点以 1 kHz 长时间运行时
//! 内存保持常量，不随 tick 数增长。

use crate::{BusError, BusStatus, BusTransport};
use dexhand_types::JointVector;
use std::collections::VecDeque;
use tracing::trace;

/// 契约调用记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCall {
    SendTorque,
    Exchange,
    ReadPositions,
}

/// 模拟总线
///
/// 默认行为：位置保持全零，状态码 OK，永不出错。
pub struct MockBus {
    calls: Vec<BusCall>,
    sent_torques: Vec<JointVector>,
    position_script: VecDeque<JointVector>,
    held_position: JointVector,
    status_script: VecDeque<BusStatus>,
}

impl MockBus {
    /// 调用记录和力矩记录各自的容量上限
    pub const RECORD_CAPACITY: usize = 1024;

    /// 创建新的模拟总线
    pub fn new() -> Self {
        MockBus {
            calls: Vec::new(),
            sent_torques: Vec::new(),
            position_script: VecDeque::new(),
            held_position: JointVector::splat(0.0),
            status_script: VecDeque::new(),
        }
    }

    /// 追加一帧脚本位置（按入队顺序回放）
    pub fn push_positions(&mut self, positions: JointVector) {
        self.position_script.push_back(positions);
    }

    /// 注入一次交换状态码（按入队顺序消费，耗尽后回退 OK）
    pub fn push_status(&mut self, status: BusStatus) {
        self.status_script.push_back(status);
    }

    /// 全部契约调用记录（按发生顺序）
    pub fn calls(&self) -> &[BusCall] {
        &self.calls
    }

    /// 已下发的力矩记录
    pub fn sent_torques(&self) -> &[JointVector] {
        &self.sent_torques
    }

    /// 最后一次下发的力矩
    pub fn last_torque(&self) -> Option<&JointVector> {
        self.sent_torques.last()
    }

    /// 有界追加：到达容量上限时丢弃最旧的一半
    fn push_bounded<T>(buffer: &mut Vec<T>, value: T) {
        if buffer.len() >= Self::RECORD_CAPACITY {
            buffer.drain(..Self::RECORD_CAPACITY / 2);
        }
        buffer.push(value);
    }
}

impl Default for MockBus {
    fn default() -> Self {
        MockBus::new()
    }
}

impl BusTransport for MockBus {
    fn send_torque(&mut self, torque: &JointVector) -> Result<(), BusError> {
        Self::push_bounded(&mut self.calls, BusCall::SendTorque);
        Self::push_bounded(&mut self.sent_torques, *torque);
        Ok(())
    }

    fn exchange(&mut self) -> Result<BusStatus, BusError> {
        Self::push_bounded(&mut self.calls, BusCall::Exchange);
        let status = self.status_script.pop_front().unwrap_or(BusStatus::OK);
        if status.is_fault() {
            trace!(code = status.code(), "mock bus returning scripted fault");
        }
        Ok(status)
    }

    fn read_positions(&mut self, out: &mut JointVector) -> Result<(), BusError> {
        Self::push_bounded(&mut self.calls, BusCall::ReadPositions);
        if let Some(next) = self.position_script.pop_front() {
            self.held_position = next;
        }
        *out = self.held_position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_bus_records_call_order() {
        let mut bus = MockBus::new();
        let torque = JointVector::splat(0.5);
        let mut positions = JointVector::splat(0.0);

        bus.send_torque(&torque).unwrap();
        bus.exchange().unwrap();
        bus.read_positions(&mut positions).unwrap();

        assert_eq!(
            bus.calls(),
            &[BusCall::SendTorque, BusCall::Exchange, BusCall::ReadPositions]
        );
        assert_eq!(bus.last_torque(), Some(&torque));
    }

    #[test]
    fn test_mock_bus_position_playback_holds_last() {
        let mut bus = MockBus::new();
        bus.push_positions(JointVector::splat(1.0));

        let mut out = JointVector::splat(0.0);
        bus.read_positions(&mut out).unwrap();
        assert_eq!(out, JointVector::splat(1.0));

        // 脚本耗尽后保持最后一个值
        bus.read_positions(&mut out).unwrap();
        assert_eq!(out, JointVector::splat(1.0));
    }

    /// 长时间运行下记录保持有界，且最新的记录不丢
    #[test]
    fn test_mock_bus_recording_is_bounded() {
        let mut bus = MockBus::new();
        let mut positions = JointVector::splat(0.0);

        // 远超容量的完整契约周期
        for i in 0..2000u64 {
            bus.send_torque(&JointVector::splat(i as f64)).unwrap();
            bus.exchange().unwrap();
            bus.read_positions(&mut positions).unwrap();
        }

        assert!(bus.calls().len() <= MockBus::RECORD_CAPACITY);
        assert!(bus.sent_torques().len() <= MockBus::RECORD_CAPACITY);
        // 最近一次下发仍可见
        assert_eq!(bus.last_torque(), Some(&JointVector::splat(1999.0)));
    }

    #[test]
    fn test_mock_bus_status_injection() {
        let mut bus = MockBus::new();
        bus.push_status(BusStatus::new(-1));

        assert!(bus.exchange().unwrap().is_fault());
        // 注入耗尽后回退 OK
        assert_eq!(bus.exchange().unwrap(), BusStatus::OK);
    }
}

//! 状态发布端口
//!
//! 控制循环每个有效 tick 把滤波位置、滤波速度和当前期望力矩
//! 打成一份 [`JointState`] 对外发布。对外传输（网络、IPC）是
//! 黑盒端口，核心只依赖 [`StatePublisher`] 契约。
//!
//! 提供两个实现：
//!
//! - [`LatestState`] - ArcSwap 单槽观察者：进程内消费者无锁读取
//!   最新快照，发布端从不被消费端拖慢
//! - [`ChannelPublisher`] - 有界 crossbeam channel：跨线程流式消费，
//!   满了丢新帧而不是阻塞控制线程

use crate::error::ControlError;
use arc_swap::ArcSwap;
use dexhand_types::JointState;
use std::sync::Arc;
use tracing::trace;

/// 状态发布契约（出站端口）
pub trait StatePublisher {
    /// 发布一份当前状态
    ///
    /// 实现必须快速有界，绝不阻塞控制线程。
    fn publish(&mut self, state: &JointState) -> Result<(), ControlError>;
}

/// ArcSwap 最新状态槽（发布端）
///
/// 发布是一次 `Arc` 原子替换；任意数量的 [`StateObserver`]
/// 可以并发无锁读取最新快照。
#[derive(Debug)]
pub struct LatestState {
    slot: Arc<ArcSwap<JointState>>,
}

impl LatestState {
    /// 创建新的最新状态槽（初始为零状态）
    pub fn new() -> Self {
        LatestState {
            slot: Arc::new(ArcSwap::from_pointee(JointState::zeroed())),
        }
    }

    /// 派生一个观察者句柄（可跨线程克隆传递）
    pub fn observer(&self) -> StateObserver {
        StateObserver {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl Default for LatestState {
    fn default() -> Self {
        LatestState::new()
    }
}

impl StatePublisher for LatestState {
    fn publish(&mut self, state: &JointState) -> Result<(), ControlError> {
        self.slot.store(Arc::new(*state));
        Ok(())
    }
}

/// 最新状态观察者（消费端）
#[derive(Debug, Clone)]
pub struct StateObserver {
    slot: Arc<ArcSwap<JointState>>,
}

impl StateObserver {
    /// 无锁读取最新状态快照
    pub fn latest(&self) -> Arc<JointState> {
        self.slot.load_full()
    }
}

/// 有界 channel 发布端
///
/// 缓冲满时丢弃新帧（记录丢帧数），消费者掉线报
/// `ControlError::ChannelClosed`。控制线程永不因消费端阻塞。
#[derive(Debug)]
pub struct ChannelPublisher {
    tx: crossbeam_channel::Sender<JointState>,
    dropped: u64,
}

impl ChannelPublisher {
    /// 创建有界发布端，返回（发布端，接收端）
    pub fn bounded(capacity: usize) -> (Self, crossbeam_channel::Receiver<JointState>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (ChannelPublisher { tx, dropped: 0 }, rx)
    }

    /// 因缓冲满被丢弃的帧数
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl StatePublisher for ChannelPublisher {
    fn publish(&mut self, state: &JointState) -> Result<(), ControlError> {
        match self.tx.try_send(*state) {
            Ok(()) => Ok(()),
            Err(crossbeam_channel::TrySendError::Full(_)) => {
                self.dropped += 1;
                trace!(dropped = self.dropped, "state frame dropped: channel full");
                Ok(())
            }
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => {
                Err(ControlError::ChannelClosed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexhand_types::JointVector;

    #[test]
    fn test_latest_state_observer_sees_newest() {
        let mut publisher = LatestState::new();
        let observer = publisher.observer();

        let mut state = JointState::zeroed();
        state.position = JointVector::splat(1.0);
        publisher.publish(&state).unwrap();
        state.position = JointVector::splat(2.0);
        publisher.publish(&state).unwrap();

        assert_eq!(observer.latest().position, JointVector::splat(2.0));
    }

    #[test]
    fn test_channel_publisher_drops_on_full() {
        let (mut publisher, rx) = ChannelPublisher::bounded(1);
        let state = JointState::zeroed();

        publisher.publish(&state).unwrap();
        publisher.publish(&state).unwrap();
        assert_eq!(publisher.dropped(), 1);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_channel_publisher_disconnected() {
        let (mut publisher, rx) = ChannelPublisher::bounded(1);
        drop(rx);

        let state = JointState::zeroed();
        let err = publisher.publish(&state).unwrap_err();
        assert!(matches!(err, ControlError::ChannelClosed));
    }
}

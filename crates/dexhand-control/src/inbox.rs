//! 命令信箱 - Last-Write-Wins 单槽邮箱
//!
//! 异步生产者（规划器、遥操作端）以任意速率写入期望关节状态，
//! 控制循环每个 tick 读取最新值。信箱只保留最后一次写入，
//! 旧值被静默覆盖：控制循环远快于人类/规划输入，只需要最新目标，
//! 不需要排队，也没有背压。
//!
//! # 实现细节
//!
//! - 获取 Mutex 锁并整值覆盖/拷出（Last Write Wins）
//! - 锁持有时间仅为一次 `JointState` 内存拷贝，从不跨越总线 IO 或滤波
//! - 写读互斥，不可能观察到"半新半旧"的撕裂值
//! - 永不阻塞生产者：无论控制循环是否消费，都能立即写入

use crate::error::ControlError;
use dexhand_types::JointState;
use std::sync::Mutex;

/// 命令信箱
///
/// 通过 `Arc<CommandInbox>` 在生产者线程与控制线程间共享。
/// 初始值为零状态（期望力矩全零），与控制循环的启动缓冲一致。
#[derive(Debug)]
pub struct CommandInbox {
    slot: Mutex<JointState>,
}

impl CommandInbox {
    /// 创建新的命令信箱（零初始化）
    pub fn new() -> Self {
        CommandInbox {
            slot: Mutex::new(JointState::zeroed()),
        }
    }

    /// 写入最新期望状态（覆盖旧值）
    ///
    /// # 错误
    /// - `ControlError::PoisonedLock`: 锁中毒（持锁线程 panic，极少见）
    pub fn set_desired(&self, state: &JointState) -> Result<(), ControlError> {
        let mut guard = self.slot.lock().map_err(|_| ControlError::PoisonedLock)?;
        *guard = *state;
        Ok(())
    }

    /// 读取最新期望状态（整值拷出）
    pub fn desired(&self) -> Result<JointState, ControlError> {
        let guard = self.slot.lock().map_err(|_| ControlError::PoisonedLock)?;
        Ok(*guard)
    }
}

impl Default for CommandInbox {
    fn default() -> Self {
        CommandInbox::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexhand_types::{JOINT_COUNT, JointVector};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    /// Last-Write-Wins：未读先写 A 再写 B，读到的必须是 B，A 无痕迹
    #[test]
    fn test_last_write_wins() {
        let inbox = CommandInbox::new();

        let mut a = JointState::zeroed();
        a.position = JointVector::splat(1.0);
        let mut b = JointState::zeroed();
        b.position = JointVector::splat(2.0);

        inbox.set_desired(&a).unwrap();
        inbox.set_desired(&b).unwrap();

        let got = inbox.desired().unwrap();
        assert_eq!(got.position, JointVector::splat(2.0));
    }

    #[test]
    fn test_initial_value_is_zeroed() {
        let inbox = CommandInbox::new();
        let got = inbox.desired().unwrap();
        assert_eq!(got.effort, JointVector::splat(0.0));
        assert_eq!(got.name[7], "joint_7");
    }

    /// 无撕裂读：并发写自洽状态（position == velocity == effort == splat(k)），
    /// 读端任何时刻读到的三个向量必须来自同一次写入
    #[test]
    fn test_no_torn_reads_under_concurrent_writers() {
        let inbox = Arc::new(CommandInbox::new());
        let stop = Arc::new(AtomicBool::new(false));

        let mut writers = Vec::new();
        for w in 0..4u64 {
            let inbox = Arc::clone(&inbox);
            let stop = Arc::clone(&stop);
            writers.push(thread::spawn(move || {
                let mut k = w as f64;
                while !stop.load(Ordering::Relaxed) {
                    let mut state = JointState::zeroed();
                    state.position = JointVector::splat(k);
                    state.velocity = JointVector::splat(k);
                    state.effort = JointVector::splat(k);
                    inbox.set_desired(&state).unwrap();
                    k += 4.0;
                }
            }));
        }

        for _ in 0..10_000 {
            let got = inbox.desired().unwrap();
            let k = got.position[0];
            for i in 0..JOINT_COUNT {
                assert_eq!(got.position[i], k, "torn position at joint {}", i);
                assert_eq!(got.velocity[i], k, "torn velocity at joint {}", i);
                assert_eq!(got.effort[i], k, "torn effort at joint {}", i);
            }
        }

        stop.store(true, Ordering::Relaxed);
        for handle in writers {
            handle.join().unwrap();
        }
    }
}

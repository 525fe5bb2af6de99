//! # Dexhand Control - 固定频率控制循环核心
//!
//! 本 crate 实现灵巧手控制器的核心：以固定频率驱动 16 关节执行器的
//! 控制循环。每个 tick 依次完成：
//!
//! 1. 计算本次 tick 的时间间隔 `dt`（退化间隔整 tick 跳过计算）
//! 2. 归档上一代位置/速度缓冲
//! 3. 总线交换：力矩下发 → 一次请求/响应 → 位置读回
//! 4. 低通滤波位置并派生平滑速度
//! 5. 调用注入的力矩计算策略（读取命令信箱中最新期望状态）
//! 6. 发布滤波后状态，tick 计数 +1
//!
//! # 并发模型
//!
//! 只有两个并发主体：
//! - 定时线程串行执行 [`ControlCycle::tick`]，tick 之间绝不重叠
//! - 异步生产者以任意速率写 [`CommandInbox`]（唯一跨线程共享可变资源）
//!
//! 信箱锁只包住整值拷贝，从不跨越总线 IO 或滤波持有。
//! 热路径上所有缓冲区启动时一次分配，之后零堆内存。
//!
//! # 模块
//!
//! - [`inbox`] - Last-Write-Wins 命令信箱
//! - [`filter`] - 定系数递归低通滤波级
//! - [`law`] - 力矩计算策略接口（可插拔）
//! - [`publish`] - 状态发布端口（ArcSwap 观察者 / channel）
//! - [`cycle`] - 控制循环状态机
//! - [`runner`] - 固定频率调度包装

pub mod cycle;
mod error;
pub mod filter;
pub mod inbox;
pub mod law;
pub mod publish;
pub mod runner;

pub use cycle::{ControlCycle, TickOutcome};
pub use error::ControlError;
pub use filter::{FILTER_FEEDBACK, FILTER_TAP, FilterHistory};
pub use inbox::CommandInbox;
pub use law::{ObservedState, TorqueLaw, ZeroTorque};
pub use publish::{ChannelPublisher, LatestState, StateObserver, StatePublisher};
pub use runner::{LoopConfig, run};

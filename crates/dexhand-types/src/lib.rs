//! # Dexhand Types - 关节数据类型层
//!
//! 提供 16 关节灵巧手控制器的基础数据类型：
//! - 关节索引（编译期安全的 [`Joint`] 枚举）
//! - 固定长度关节数组（[`JointArray`] / [`JointVector`]）
//! - 关节状态消息（[`JointState`]，对外发布和期望状态共用同一形状）
//!
//! **依赖原则**: 本 crate 是最底层，不依赖任何上层 crate。
//!
//! # 关节命名
//!
//! 16 个关节的线上名称固定为 `joint_0` … `joint_15`，序号与数组下标
//! 一一对应，进程生命周期内永不改变。下游消费者按数组位置或名称索引，
//! 因此序号稳定性是对外契约的一部分。

mod joint;
mod state;

pub use joint::{JOINT_COUNT, Joint, JointArray, JointVector};
pub use state::{JointState, StateError};

//! 低通滤波级
//!
//! 抑制位置读数上的传感器/量化噪声，并派生平滑速度。
//!
//! # 算法
//!
//! 每个 tick、每个关节独立应用定系数三抽头递归（IIR）低通：
//!
//! ```text
//! pf' = 0.6 * pf + 0.198 * prev_raw + 0.198 * raw
//! v   = (pf' - prev_pf) / dt
//! vf' = 0.6 * vf + 0.198 * prev_v + 0.198 * v
//! ```
//!
//! 速度由滤波位置的有限差分除以实测 `dt` 得到，再经同一低通二次平滑：
//! 原始位置直接差分会放大噪声，必须双重平滑。
//!
//! 系数和为 0.996，直流增益不是 1：对恒定输入 1.0，稳态收敛到
//! `(0.198 + 0.198) / (1 - 0.6) = 0.99`。这是沿用的轻微衰减设计，
//! 用微小稳态偏差换取亚毫秒 tick 下廉价、确定性、零分配的平滑，
//! 行为保真要求精确保留，不得"修正"为单位增益。
//!
//! 滤波之后，缓冲中的原始速度被原始位置差分 `(raw - prev_raw) / dt`
//! 覆盖，下一个 tick 的 `prev_v` 项看到的是原始差分。同样是沿用行为，
//! 保持不变。
//!
//! # 前置条件
//!
//! 调用方必须保证 `dt > 0`（控制循环在 TimingCheck 阶段把关），
//! 否则有限差分会除零。

use dexhand_types::{JOINT_COUNT, JointVector};

/// 滤波反馈系数（历史输出权重）
pub const FILTER_FEEDBACK: f64 = 0.6;

/// 滤波抽头系数（当前/上一次输入各占的权重）
pub const FILTER_TAP: f64 = 0.198;

/// 滤波历史缓冲
///
/// 每代（tick）一组：当前/上一次的原始位置、滤波位置、原始速度，
/// 加当前滤波速度。全部在启动时零初始化，进程生命周期内不再分配，
/// 由控制循环独占持有和改写。
#[derive(Debug, Clone)]
pub struct FilterHistory {
    /// 当前原始位置（总线读回）
    pub raw_position: JointVector,
    /// 上一 tick 的原始位置
    pub previous_raw_position: JointVector,
    /// 当前滤波位置
    pub filtered_position: JointVector,
    /// 上一 tick 的滤波位置
    pub previous_filtered_position: JointVector,
    /// 当前原始速度（tick 末被原始差分覆盖）
    pub velocity: JointVector,
    /// 上一 tick 的原始速度
    pub previous_velocity: JointVector,
    /// 当前滤波速度
    pub filtered_velocity: JointVector,
}

impl FilterHistory {
    /// 创建零初始化的滤波历史
    pub fn new() -> Self {
        FilterHistory {
            raw_position: JointVector::splat(0.0),
            previous_raw_position: JointVector::splat(0.0),
            filtered_position: JointVector::splat(0.0),
            previous_filtered_position: JointVector::splat(0.0),
            velocity: JointVector::splat(0.0),
            previous_velocity: JointVector::splat(0.0),
            filtered_velocity: JointVector::splat(0.0),
        }
    }

    /// 归档上一代缓冲
    ///
    /// 在总线读回覆盖 `raw_position` 之前快照上一 tick 的
    /// 原始位置、滤波位置和速度。
    pub fn archive(&mut self) {
        self.previous_raw_position = self.raw_position;
        self.previous_filtered_position = self.filtered_position;
        self.previous_velocity = self.velocity;
    }

    /// 应用低通滤波（逐关节）
    ///
    /// 前置条件：`dt > 0`，由调用方（控制循环的 TimingCheck）保证。
    pub fn apply(&mut self, dt: f64) {
        debug_assert!(dt > 0.0, "filter stage requires dt > 0");

        for i in 0..JOINT_COUNT {
            let pf = FILTER_FEEDBACK * self.filtered_position[i]
                + FILTER_TAP * self.previous_raw_position[i]
                + FILTER_TAP * self.raw_position[i];
            let v = (pf - self.previous_filtered_position[i]) / dt;

            self.filtered_position[i] = pf;
            self.filtered_velocity[i] = FILTER_FEEDBACK * self.filtered_velocity[i]
                + FILTER_TAP * self.previous_velocity[i]
                + FILTER_TAP * v;

            // 沿用行为：滤波后原始速度被原始差分覆盖
            self.velocity[i] = (self.raw_position[i] - self.previous_raw_position[i]) / dt;
        }
    }
}

impl Default for FilterHistory {
    fn default() -> Self {
        FilterHistory::new()
    }
}

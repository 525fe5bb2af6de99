//! 关节状态消息
//!
//! 对外发布的当前状态和外部下发的期望状态共用同一形状：
//! 名称标签 + 位置/速度/力矩三个并列向量 + 单调时间戳。
//!
//! 所有向量固定 16 长度，构造时一次性零初始化，之后只做整体拷贝，
//! 不存在部分更新或动态扩容。

use crate::joint::{JOINT_COUNT, Joint, JointVector};
use std::time::Instant;
use thiserror::Error;

/// 状态消息错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// 输入向量长度与关节数不符
    #[error("length mismatch in `{field}`: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// 关节状态
///
/// `name[i]`、`position[i]`、`velocity[i]`、`effort[i]` 描述同一个关节，
/// 下标顺序即 [`Joint::ALL`] 顺序，进程生命周期内不变。
///
/// `stamp` 为发布时刻的单调时钟读数；尚未发布过的状态为 `None`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    /// 关节名称标签（`joint_0` … `joint_15`）
    pub name: [&'static str; JOINT_COUNT],
    /// 位置（弧度）
    pub position: JointVector,
    /// 速度（弧度/秒）
    pub velocity: JointVector,
    /// 力矩（牛·米），对期望状态而言是期望力矩
    pub effort: JointVector,
    /// 时间戳（单调时钟）
    pub stamp: Option<Instant>,
}

impl JointState {
    /// 创建零初始化的关节状态
    ///
    /// 名称按固定顺序填充，数值向量全零，无时间戳。
    pub fn zeroed() -> Self {
        JointState {
            name: Joint::ALL.map(Joint::name),
            position: JointVector::splat(0.0),
            velocity: JointVector::splat(0.0),
            effort: JointVector::splat(0.0),
            stamp: None,
        }
    }

    /// 从切片构造状态（入站消息的转换边界）
    ///
    /// 入站消息进入核心之前在这里做长度校验：长度不符直接拒绝，
    /// 不允许错长向量流进力矩钩子。
    pub fn try_from_slices(
        position: &[f64],
        velocity: &[f64],
        effort: &[f64],
    ) -> Result<Self, StateError> {
        let check = |field: &'static str, slice: &[f64]| -> Result<(), StateError> {
            if slice.len() != JOINT_COUNT {
                return Err(StateError::LengthMismatch {
                    field,
                    expected: JOINT_COUNT,
                    actual: slice.len(),
                });
            }
            Ok(())
        };
        check("position", position)?;
        check("velocity", velocity)?;
        check("effort", effort)?;

        let mut state = JointState::zeroed();
        state
            .position
            .as_array_mut()
            .copy_from_slice(position);
        state
            .velocity
            .as_array_mut()
            .copy_from_slice(velocity);
        state.effort.as_array_mut().copy_from_slice(effort);
        Ok(state)
    }
}

impl Default for JointState {
    fn default() -> Self {
        JointState::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_state() {
        let state = JointState::zeroed();
        assert_eq!(state.name[0], "joint_0");
        assert_eq!(state.name[7], "joint_7");
        assert_eq!(state.name[15], "joint_15");
        assert!(state.position.iter().all(|&x| x == 0.0));
        assert!(state.effort.iter().all(|&x| x == 0.0));
        assert_eq!(state.stamp, None);
    }

    #[test]
    fn test_try_from_slices_ok() {
        let pos: Vec<f64> = (0..JOINT_COUNT).map(|i| i as f64).collect();
        let zeros = vec![0.0; JOINT_COUNT];
        let state = JointState::try_from_slices(&pos, &zeros, &zeros).unwrap();
        assert_eq!(state.position[7], 7.0);
        assert_eq!(state.velocity[7], 0.0);
    }

    /// 错长入站向量必须被拒绝，而不是截断或越界
    #[test]
    fn test_try_from_slices_length_mismatch() {
        let short = vec![0.0; JOINT_COUNT - 1];
        let ok = vec![0.0; JOINT_COUNT];
        let err = JointState::try_from_slices(&short, &ok, &ok).unwrap_err();
        assert_eq!(
            err,
            StateError::LengthMismatch {
                field: "position",
                expected: JOINT_COUNT,
                actual: JOINT_COUNT - 1,
            }
        );

        let long = vec![0.0; JOINT_COUNT + 4];
        let err = JointState::try_from_slices(&ok, &ok, &long).unwrap_err();
        assert!(matches!(
            err,
            StateError::LengthMismatch { field: "effort", .. }
        ));
    }
}

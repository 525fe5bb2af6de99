//! 关节索引和数组
//!
//! 提供编译期安全的关节索引，防止越界和索引错误。
//!
//! # 设计目标
//!
//! - **编译期安全**: 使用枚举防止无效索引
//! - **零开销**: 编译后与直接数组访问性能相同
//! - **序号稳定**: `joint_7` 永远对应下标 7，下游按位置消费
//!
//! # 示例
//!
//! ```rust
//! use dexhand_types::{Joint, JointVector};
//!
//! let positions = JointVector::splat(0.0);
//!
//! // 类型安全的索引访问
//! let j7 = positions[Joint::J7];
//! assert_eq!(j7, 0.0);
//!
//! // 名称映射固定
//! assert_eq!(Joint::J7.name(), "joint_7");
//! assert_eq!(Joint::from_index(7), Some(Joint::J7));
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

/// 关节数量（编译期常量，所有缓冲区按此预分配）
pub const JOINT_COUNT: usize = 16;

/// 关节枚举
///
/// 表示灵巧手的 16 个关节。使用枚举提供编译期类型安全。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    J0 = 0,
    J1 = 1,
    J2 = 2,
    J3 = 3,
    J4 = 4,
    J5 = 5,
    J6 = 6,
    J7 = 7,
    J8 = 8,
    J9 = 9,
    J10 = 10,
    J11 = 11,
    J12 = 12,
    J13 = 13,
    J14 = 14,
    J15 = 15,
}

impl Joint {
    /// 所有关节的数组（顺序即线上顺序）
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::J0,
        Joint::J1,
        Joint::J2,
        Joint::J3,
        Joint::J4,
        Joint::J5,
        Joint::J6,
        Joint::J7,
        Joint::J8,
        Joint::J9,
        Joint::J10,
        Joint::J11,
        Joint::J12,
        Joint::J13,
        Joint::J14,
        Joint::J15,
    ];

    /// 获取关节索引（0-15）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建关节（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        Joint::ALL.get(index).copied()
    }

    /// 获取关节线上名称
    ///
    /// 名称与 URDF 等下游描述保持一致，序号即数组下标。
    pub const fn name(self) -> &'static str {
        match self {
            Joint::J0 => "joint_0",
            Joint::J1 => "joint_1",
            Joint::J2 => "joint_2",
            Joint::J3 => "joint_3",
            Joint::J4 => "joint_4",
            Joint::J5 => "joint_5",
            Joint::J6 => "joint_6",
            Joint::J7 => "joint_7",
            Joint::J8 => "joint_8",
            Joint::J9 => "joint_9",
            Joint::J10 => "joint_10",
            Joint::J11 => "joint_11",
            Joint::J12 => "joint_12",
            Joint::J13 => "joint_13",
            Joint::J14 => "joint_14",
            Joint::J15 => "joint_15",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 关节数组
///
/// 类型安全的 16 关节数组容器，支持索引、迭代和映射操作。
/// 固定长度，栈上分配，控制热路径上零堆内存。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointArray<T> {
    data: [T; JOINT_COUNT],
}

// 如果 T 实现了 Copy，则 JointArray<T> 也实现 Copy
impl<T: Copy> Copy for JointArray<T> {}

/// 每关节一个 f64 标量的向量（位置/速度/力矩通用）
pub type JointVector = JointArray<f64>;

impl<T> JointArray<T> {
    /// 创建新的关节数组
    #[inline]
    pub const fn new(data: [T; JOINT_COUNT]) -> Self {
        JointArray { data }
    }

    /// 获取内部数组的引用
    #[inline]
    pub fn as_array(&self) -> &[T; JOINT_COUNT] {
        &self.data
    }

    /// 获取内部数组的可变引用
    #[inline]
    pub fn as_array_mut(&mut self) -> &mut [T; JOINT_COUNT] {
        &mut self.data
    }

    /// 迭代器
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 可变迭代器
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// 映射转换
    pub fn map<U, F>(self, f: F) -> JointArray<U>
    where
        F: FnMut(T) -> U,
    {
        JointArray::new(self.data.map(f))
    }
}

impl<T: Copy> JointArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        JointArray::new([value; JOINT_COUNT])
    }

    /// 按关节逐元素与另一个数组执行映射
    pub fn zip_map<U, V, F>(&self, other: &JointArray<U>, mut f: F) -> JointArray<V>
    where
        U: Copy,
        F: FnMut(T, U) -> V,
    {
        JointArray::new(std::array::from_fn(|i| f(self.data[i], other.data[i])))
    }
}

impl<T: Default> Default for JointArray<T> {
    fn default() -> Self {
        JointArray::new(std::array::from_fn(|_| T::default()))
    }
}

// 索引访问
impl<T> Index<Joint> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, joint: Joint) -> &T {
        &self.data[joint.index()]
    }
}

impl<T> IndexMut<Joint> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        &mut self.data[joint.index()]
    }
}

impl<T> Index<usize> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T> From<[T; JOINT_COUNT]> for JointArray<T> {
    fn from(data: [T; JOINT_COUNT]) -> Self {
        JointArray::new(data)
    }
}

impl<'a, T> IntoIterator for &'a JointArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试关节序号与名称的固定映射
    #[test]
    fn test_joint_name_index_mapping() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
            assert_eq!(joint.name(), format!("joint_{}", i));
            assert_eq!(Joint::from_index(i), Some(*joint));
        }
        assert_eq!(Joint::from_index(JOINT_COUNT), None);
    }

    /// 序号稳定性：joint_7 永远是下标 7
    #[test]
    fn test_joint_7_ordinal_stability() {
        assert_eq!(Joint::J7.index(), 7);
        assert_eq!(Joint::J7.name(), "joint_7");
        assert_eq!(Joint::from_index(7), Some(Joint::J7));
    }

    #[test]
    fn test_joint_array_index_ops() {
        let mut arr = JointVector::splat(0.0);
        arr[Joint::J3] = 1.5;
        arr[10] = -2.0;
        assert_eq!(arr[3], 1.5);
        assert_eq!(arr[Joint::J10], -2.0);
    }

    #[test]
    fn test_joint_array_map_and_zip_map() {
        let a = JointVector::splat(2.0);
        let b = JointVector::splat(3.0);
        let doubled = a.map(|x| x * 2.0);
        assert_eq!(doubled, JointVector::splat(4.0));
        let sum = a.zip_map(&b, |x, y| x + y);
        assert_eq!(sum, JointVector::splat(5.0));
    }

    #[test]
    fn test_joint_array_default_is_zeroed() {
        let arr = JointVector::default();
        assert!(arr.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_joint_display() {
        assert_eq!(format!("{}", Joint::J15), "joint_15");
    }
}

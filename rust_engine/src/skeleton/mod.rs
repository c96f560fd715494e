//! 骨骼层级、变换栈、绑定姿态求解与姿态更新

mod hierarchy;
mod joint;
mod pose;
mod transform_stack;

pub use hierarchy::{BoneSegment, JointHierarchy};
pub use joint::{euler_xyz_rotation, Joint};
pub use transform_stack::TransformStack;

use glam::Vec3;

/// 骨骼表中的一行：`x y z parent name`
///
/// `parent == -1` 表示根关节，其余必须引用表中更靠前的关节。
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonRecord {
    pub offset: Vec3,
    pub parent: i32,
    pub name: String,
}

impl SkeletonRecord {
    pub fn new(offset: Vec3, parent: i32, name: impl Into<String>) -> Self {
        Self {
            offset,
            parent,
            name: name.into(),
        }
    }
}

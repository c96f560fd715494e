//! 绑定姿态求解与当前姿态更新
//!
//! 两者使用同一种先序遍历：访问关节时压入其局部变换，读取栈顶作为
//! 组合变换，再依次访问子关节。父关节的组合变换总是先于子关节得到。

use glam::Mat4;

use super::{Joint, JointHierarchy, TransformStack};
use crate::{Result, SkinError};

impl JointHierarchy {
    /// 以 `local` 提供每个关节的局部变换，先序遍历得到每个关节的组合变换
    ///
    /// 结果按关节索引排列；兄弟关节按加载顺序访问。
    pub(super) fn compose_world_transforms<F>(&self, local: F) -> Vec<Mat4>
    where
        F: Fn(&Joint) -> Mat4,
    {
        let mut world = vec![Mat4::IDENTITY; self.joints.len()];
        let mut stack = TransformStack::with_capacity(self.max_depth);
        // (关节, 其父关节在栈中的深度)
        let mut pending = vec![(self.root, 0usize)];

        while let Some((index, depth)) = pending.pop() {
            stack.truncate(depth);

            let joint = &self.joints[index];
            stack.push(local(joint));
            world[index] = stack.top();

            // 逆序压入，保证按加载顺序弹出
            pending.extend(joint.children.iter().rev().map(|&child| (child, depth + 1)));
        }

        world
    }

    /// 求解绑定姿态 世界->关节 变换，仅在加载时执行一次
    pub(super) fn solve_bind_pose(&mut self) -> Result<()> {
        let composed = self.compose_world_transforms(Joint::bind_local_transform);

        let inverses = composed
            .iter()
            .enumerate()
            .map(|(index, world)| {
                let det = world.determinant();
                if !det.is_finite() || det.abs() < f32::EPSILON {
                    return Err(SkinError::SingularTransform(index));
                }
                let inverse = world.inverse();
                if !inverse.is_finite() {
                    return Err(SkinError::SingularTransform(index));
                }
                Ok(inverse)
            })
            .collect::<Result<Vec<_>>>()?;

        for (joint, inverse) in self.joints.iter_mut().zip(inverses) {
            joint.bind_world_to_joint = inverse;
        }
        Ok(())
    }

    /// 用当前局部变换重算每个关节的 关节->世界 变换
    ///
    /// 必须在蒙皮之前完整执行。
    pub fn update_current_transforms(&mut self) {
        let composed = self.compose_world_transforms(|joint| joint.local_transform);
        for (joint, world) in self.joints.iter_mut().zip(composed) {
            joint.current_joint_to_world = world;
        }
    }
}

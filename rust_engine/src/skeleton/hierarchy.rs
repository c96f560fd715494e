//! 骨骼层级

use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec3};

use super::{Joint, SkeletonRecord};
use crate::{Result, SkinError};

/// 骨骼绘制图元：父关节原点到子关节原点的一段骨骼
#[derive(Clone, Debug, PartialEq)]
pub struct BoneSegment {
    pub parent: usize,
    pub child: usize,
    /// 父关节原点（世界空间）
    pub start: Vec3,
    /// 子关节原点（世界空间）
    pub end: Vec3,
    /// 把单位立方体拉伸为 0.05 x 0.05 x 骨骼长度 并沿骨骼方向放置的变换
    pub box_transform: Mat4,
}

/// 骨骼层级
///
/// 关节平铺存放在数组中，父子关系用索引表示。
pub struct JointHierarchy {
    pub(super) joints: Vec<Joint>,
    name_to_index: HashMap<String, usize>,
    pub(super) root: usize,
    /// 根节点到最深叶子的关节数
    pub(super) max_depth: usize,
}

impl JointHierarchy {
    /// 从骨骼表构建层级，校验后求解绑定姿态并计算一次当前姿态
    pub fn from_table(records: &[SkeletonRecord]) -> Result<Self> {
        let joint_count = records.len();
        let mut roots = Vec::new();
        let mut joints = Vec::with_capacity(joint_count);

        for (index, record) in records.iter().enumerate() {
            let parent = match record.parent {
                -1 => {
                    roots.push(index);
                    None
                }
                p if p >= 0 && (p as usize) < index => Some(p as usize),
                p => {
                    return Err(SkinError::InvalidParent {
                        joint: index,
                        parent: i64::from(p),
                    })
                }
            };
            joints.push(Joint::new(record.name.clone(), index, parent, record.offset));
        }

        if roots.len() != 1 {
            return Err(SkinError::RootCount(roots.len()));
        }
        let root = roots[0];

        for index in 0..joint_count {
            if let Some(parent) = joints[index].parent {
                joints[parent].children.push(index);
            }
        }

        let mut name_to_index = HashMap::new();
        for joint in &joints {
            if !joint.name.is_empty() {
                name_to_index.entry(joint.name.clone()).or_insert(joint.index);
            }
        }

        let mut hierarchy = Self {
            joints,
            name_to_index,
            root,
            max_depth: 0,
        };
        hierarchy.max_depth = hierarchy.validate_acyclic()?;
        hierarchy.solve_bind_pose()?;
        hierarchy.update_current_transforms();

        log::debug!(
            "骨骼层级构建完成: {} 个关节, 最大深度 {}",
            joint_count,
            hierarchy.max_depth
        );

        Ok(hierarchy)
    }

    /// 每个关节的祖先链必须在 joint_count 步内到达根，返回最大深度
    fn validate_acyclic(&self) -> Result<usize> {
        let bound = self.joints.len();
        let mut max_depth = 0;

        for joint in &self.joints {
            let mut depth = 1;
            let mut current = joint.index;
            while let Some(parent) = self.joints[current].parent {
                if depth > bound {
                    return Err(SkinError::CyclicHierarchy(joint.index));
                }
                current = parent;
                depth += 1;
            }
            if current != self.root {
                return Err(SkinError::CyclicHierarchy(joint.index));
            }
            max_depth = max_depth.max(depth);
        }

        Ok(max_depth)
    }

    /// 设置关节旋转（欧拉角，X→Y→Z），不触发重算
    pub fn set_joint_rotation(&mut self, index: usize, rx: f32, ry: f32, rz: f32) -> Result<()> {
        let count = self.joints.len();
        let joint = self
            .joints
            .get_mut(index)
            .ok_or(SkinError::JointIndex { index, count })?;
        joint.set_rotation(rx, ry, rz);
        Ok(())
    }

    /// 设置根骨骼平移增量：平移 = 加载时基准位置 + delta，不触发重算
    pub fn set_root_translation(&mut self, dx: f32, dy: f32, dz: f32) {
        let root = &mut self.joints[self.root];
        let translation = root.offset + Vec3::new(dx, dy, dz);
        root.set_translation(translation);
    }

    /// 清零所有旋转和根平移增量
    pub fn reset_pose(&mut self) {
        for joint in &mut self.joints {
            joint.set_rotation(0.0, 0.0, 0.0);
        }
        self.set_root_translation(0.0, 0.0, 0.0);
    }

    /// 获取关节数量
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// 获取关节
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// 根关节索引
    pub fn root(&self) -> usize {
        self.root
    }

    /// 通过名称查找关节（同名时返回最先加载的）
    pub fn find_joint(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.joints.get(index)?.parent
    }

    /// 子关节索引（按加载顺序），越界时为空
    pub fn children(&self, index: usize) -> &[usize] {
        self.joints
            .get(index)
            .map(|j| j.children.as_slice())
            .unwrap_or(&[])
    }

    /// 绑定姿态 世界->关节 变换
    pub fn bind_world_to_joint(&self, index: usize) -> Option<Mat4> {
        self.joints.get(index).map(|j| j.bind_world_to_joint)
    }

    /// 当前姿态 关节->世界 变换
    pub fn current_joint_to_world(&self, index: usize) -> Option<Mat4> {
        self.joints.get(index).map(|j| j.current_joint_to_world)
    }

    /// 所有关节当前的世界坐标（绘制关节球用）
    pub fn joint_positions(&self) -> Vec<Vec3> {
        self.joints.iter().map(Joint::world_position).collect()
    }

    /// 每个非根关节一段骨骼
    pub fn bone_segments(&self) -> Vec<BoneSegment> {
        self.joints
            .iter()
            .filter_map(|joint| {
                let parent = joint.parent?;
                let parent_world = self.joints[parent].current_joint_to_world;

                // 局部平移就是父空间中的骨骼向量
                let bone = joint.translation();
                let length = bone.length();
                let dir_z = bone.normalize_or_zero();
                let mut dir_y = dir_z.cross(Vec3::Z).normalize_or_zero();
                if dir_y == Vec3::ZERO {
                    // 骨骼与 Z 轴平行
                    dir_y = dir_z.cross(Vec3::X).normalize_or_zero();
                }
                let dir_x = dir_y.cross(dir_z).normalize_or_zero();
                let direction = Mat4::from_mat3(Mat3::from_cols(dir_x, dir_y, dir_z));

                let box_transform = parent_world
                    * direction
                    * Mat4::from_scale(Vec3::new(0.05, 0.05, length))
                    * Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5));

                Some(BoneSegment {
                    parent,
                    child: joint.index,
                    start: parent_world.w_axis.truncate(),
                    end: joint.world_position(),
                    box_transform,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn record(x: f32, y: f32, z: f32, parent: i32, name: &str) -> SkeletonRecord {
        SkeletonRecord::new(Vec3::new(x, y, z), parent, name)
    }

    /// root(0.5,0.5,0.5) -> spine(0,1,0) -> head(0,0.5,0)
    ///                   -> hip(0.2,-0.3,0)
    fn sample_table() -> Vec<SkeletonRecord> {
        vec![
            record(0.5, 0.5, 0.5, -1, "root"),
            record(0.0, 1.0, 0.0, 0, "spine"),
            record(0.0, 0.5, 0.0, 1, "head"),
            record(0.2, -0.3, 0.0, 0, "hip"),
        ]
    }

    #[test]
    fn test_build_hierarchy() {
        let skeleton = JointHierarchy::from_table(&sample_table()).unwrap();

        assert_eq!(skeleton.joint_count(), 4);
        assert_eq!(skeleton.root(), 0);
        assert_eq!(skeleton.children(0), &[1, 3]);
        assert_eq!(skeleton.children(1), &[2]);
        assert!(skeleton.children(2).is_empty());
        assert!(skeleton.children(99).is_empty());
        assert_eq!(skeleton.parent(2), Some(1));
        assert_eq!(skeleton.parent(0), None);
        assert_eq!(skeleton.find_joint("head"), Some(2));
        assert_eq!(skeleton.find_joint("tail"), None);
        assert_eq!(skeleton.max_depth, 3);
    }

    #[test]
    fn test_exactly_one_parentless_joint() {
        let skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        let roots = skeleton.joints().iter().filter(|j| j.is_root()).count();
        assert_eq!(roots, 1);

        // 每个非根关节恰好出现在一个父关节的子列表中
        for joint in skeleton.joints().iter().filter(|j| !j.is_root()) {
            let owners = skeleton
                .joints()
                .iter()
                .filter(|p| p.children.contains(&joint.index))
                .count();
            assert_eq!(owners, 1);
        }
    }

    #[test]
    fn test_root_count_errors() {
        let result = JointHierarchy::from_table(&[]);
        assert!(matches!(result, Err(SkinError::RootCount(0))));

        let two_roots = vec![record(0.0, 0.0, 0.0, -1, "a"), record(1.0, 0.0, 0.0, -1, "b")];
        let result = JointHierarchy::from_table(&two_roots);
        assert!(matches!(result, Err(SkinError::RootCount(2))));
    }

    #[test]
    fn test_invalid_parent_errors() {
        let forward = vec![record(0.0, 0.0, 0.0, 1, "a"), record(1.0, 0.0, 0.0, -1, "b")];
        assert!(matches!(
            JointHierarchy::from_table(&forward),
            Err(SkinError::InvalidParent { joint: 0, parent: 1 })
        ));

        let self_parent = vec![record(0.0, 0.0, 0.0, -1, "a"), record(1.0, 0.0, 0.0, 1, "b")];
        assert!(matches!(
            JointHierarchy::from_table(&self_parent),
            Err(SkinError::InvalidParent { joint: 1, parent: 1 })
        ));

        let negative = vec![record(0.0, 0.0, 0.0, -1, "a"), record(1.0, 0.0, 0.0, -7, "b")];
        assert!(matches!(
            JointHierarchy::from_table(&negative),
            Err(SkinError::InvalidParent { joint: 1, parent: -7 })
        ));
    }

    #[test]
    fn test_singular_bind_transform_is_rejected() {
        let table = vec![
            record(0.0, 0.0, 0.0, -1, "root"),
            record(f32::NAN, 0.0, 0.0, 0, "broken"),
        ];
        assert!(matches!(
            JointHierarchy::from_table(&table),
            Err(SkinError::SingularTransform(1))
        ));
    }

    #[test]
    fn test_bind_pose_world_positions() {
        let skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        let positions = skeleton.joint_positions();

        assert!(positions[0].abs_diff_eq(Vec3::new(0.5, 0.5, 0.5), 1e-6));
        assert!(positions[1].abs_diff_eq(Vec3::new(0.5, 1.5, 0.5), 1e-6));
        assert!(positions[2].abs_diff_eq(Vec3::new(0.5, 2.0, 0.5), 1e-6));
        assert!(positions[3].abs_diff_eq(Vec3::new(0.7, 0.2, 0.5), 1e-6));
    }

    #[test]
    fn test_bind_inverse_cancels_current_at_bind_pose() {
        let skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        for joint in skeleton.joints() {
            let product = joint.current_joint_to_world * joint.bind_world_to_joint;
            assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn test_setters_do_not_recompute() {
        let mut skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        let before = skeleton.current_joint_to_world(2).unwrap();

        skeleton.set_joint_rotation(1, 0.0, 0.0, FRAC_PI_2).unwrap();
        skeleton.set_root_translation(1.0, 0.0, 0.0);
        assert_eq!(skeleton.current_joint_to_world(2).unwrap(), before);

        skeleton.update_current_transforms();
        // spine 绕 Z 转 90°，head 的偏移 (0,0.5,0) 变为 (-0.5,0,0)
        let head = skeleton.joint(2).unwrap().world_position();
        assert!(head.abs_diff_eq(Vec3::new(1.0, 1.5, 0.5), 1e-6));
    }

    #[test]
    fn test_set_joint_rotation_out_of_range() {
        let mut skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        let result = skeleton.set_joint_rotation(4, 0.1, 0.2, 0.3);
        assert!(matches!(
            result,
            Err(SkinError::JointIndex { index: 4, count: 4 })
        ));
    }

    #[test]
    fn test_root_translation_replaces_delta() {
        let mut skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        skeleton.set_root_translation(0.3, 0.0, 0.0);
        skeleton.set_root_translation(0.0, -0.5, 0.0);
        skeleton.update_current_transforms();

        let root = skeleton.joint(0).unwrap().world_position();
        assert!(root.abs_diff_eq(Vec3::new(0.5, 0.0, 0.5), 1e-6));
    }

    #[test]
    fn test_reset_pose() {
        let mut skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        skeleton.set_joint_rotation(0, 1.0, 2.0, 3.0).unwrap();
        skeleton.set_joint_rotation(3, -1.0, 0.5, 0.0).unwrap();
        skeleton.set_root_translation(0.4, 0.4, 0.4);
        skeleton.reset_pose();
        skeleton.update_current_transforms();

        for joint in skeleton.joints() {
            assert_eq!(joint.local_transform, joint.bind_local_transform());
            let product = joint.current_joint_to_world * joint.bind_world_to_joint;
            assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn test_bone_segments() {
        let skeleton = JointHierarchy::from_table(&sample_table()).unwrap();
        let segments = skeleton.bone_segments();
        assert_eq!(segments.len(), 3);

        let neck = segments.iter().find(|s| s.child == 2).unwrap();
        assert_eq!(neck.parent, 1);
        assert!(neck.start.abs_diff_eq(Vec3::new(0.5, 1.5, 0.5), 1e-6));
        assert!(neck.end.abs_diff_eq(Vec3::new(0.5, 2.0, 0.5), 1e-6));

        // 单位立方体的两个端面中心落在骨骼两端
        let near = neck.box_transform.transform_point3(Vec3::new(0.0, 0.0, -0.5));
        let far = neck.box_transform.transform_point3(Vec3::new(0.0, 0.0, 0.5));
        assert!(near.abs_diff_eq(neck.start, 1e-5));
        assert!(far.abs_diff_eq(neck.end, 1e-5));
    }

    #[test]
    fn test_bone_segment_parallel_to_z() {
        let table = vec![record(0.0, 0.0, 0.0, -1, "root"), record(0.0, 0.0, 2.0, 0, "tip")];
        let skeleton = JointHierarchy::from_table(&table).unwrap();
        let segment = &skeleton.bone_segments()[0];

        assert!(segment.box_transform.is_finite());
        let far = segment.box_transform.transform_point3(Vec3::new(0.0, 0.0, 0.5));
        assert!(far.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));
    }
}

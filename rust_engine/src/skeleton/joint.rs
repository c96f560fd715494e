//! 骨骼关节

use glam::{Mat3, Mat4, Vec3};

/// 欧拉角旋转，固定按 X、Y、Z 顺序组合：`Rx * Ry * Rz`
pub fn euler_xyz_rotation(rx: f32, ry: f32, rz: f32) -> Mat3 {
    Mat3::from_rotation_x(rx) * Mat3::from_rotation_y(ry) * Mat3::from_rotation_z(rz)
}

/// 骨骼关节
#[derive(Clone, Debug)]
pub struct Joint {
    pub name: String,
    /// 在骨骼表中的加载顺序
    pub index: usize,
    pub parent: Option<usize>,
    /// 子关节索引，按加载顺序
    pub children: Vec<usize>,

    // 加载时相对于父关节的偏移（根关节为基准位置）
    pub offset: Vec3,

    // 局部变换：旋转子矩阵来自欧拉角，平移列来自偏移
    pub local_transform: Mat4,

    // 绑定姿态 世界 -> 关节 变换（加载时计算一次）
    pub bind_world_to_joint: Mat4,

    // 当前姿态 关节 -> 世界 变换（每次姿态更新重算）
    pub current_joint_to_world: Mat4,
}

impl Joint {
    pub fn new(name: String, index: usize, parent: Option<usize>, offset: Vec3) -> Self {
        Self {
            name,
            index,
            parent,
            children: Vec::new(),
            offset,
            local_transform: Mat4::from_translation(offset),
            bind_world_to_joint: Mat4::IDENTITY,
            current_joint_to_world: Mat4::IDENTITY,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 绑定姿态下的局部变换：纯平移，单位旋转
    pub fn bind_local_transform(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }

    /// 用欧拉角替换局部变换的旋转子矩阵，平移列保持不变
    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32) {
        let rotation = euler_xyz_rotation(rx, ry, rz);
        self.local_transform = Mat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            self.local_transform.w_axis,
        );
    }

    /// 替换局部变换的平移列
    pub fn set_translation(&mut self, translation: Vec3) {
        self.local_transform.w_axis = translation.extend(1.0);
    }

    pub fn translation(&self) -> Vec3 {
        self.local_transform.w_axis.truncate()
    }

    /// 当前姿态下关节原点的世界坐标
    pub fn world_position(&self) -> Vec3 {
        self.current_joint_to_world.w_axis.truncate()
    }

    /// 蒙皮矩阵 = 当前 关节->世界 * 绑定 世界->关节
    pub fn skinning_matrix(&self) -> Mat4 {
        self.current_joint_to_world * self.bind_world_to_joint
    }
}

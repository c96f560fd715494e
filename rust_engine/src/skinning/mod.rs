//! 顶点蒙皮计算（线性混合 / SSD）

mod skinning;

pub use skinning::{compute_skinning, skin_vertex, skinning_matrices, SkinningContext};

use glam::{Mat4, Vec3};

use crate::mesh::AttachmentTable;

/// 蒙皮输入数据
pub struct SkinningInput<'a> {
    /// 绑定姿态顶点位置
    pub bind_vertices: &'a [Vec3],
    /// 顶点附着权重
    pub attachments: &'a AttachmentTable,
    /// 每个关节的 当前 关节->世界 * 绑定 世界->关节
    pub skinning_matrices: &'a [Mat4],
}

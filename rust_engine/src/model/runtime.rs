//! 蒙皮模型运行时

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::coloring::{vertex_colors, ColorScheme};
use crate::config::EngineConfig;
use crate::loader::{self, ModelPaths};
use crate::mesh::{AttachmentTable, Mesh, MeshTable};
use crate::skeleton::{BoneSegment, JointHierarchy, SkeletonRecord};
use crate::skinning::{compute_skinning, skinning_matrices, SkinningContext, SkinningInput};
use crate::Result;

/// 骨骼蒙皮模型
pub struct SkeletalModel {
    // 静态数据
    skeleton: JointHierarchy,
    mesh: Mesh,
    attachments: AttachmentTable,

    // 着色
    color_scheme: ColorScheme,
    vertex_colors: Vec<Vec3>,

    // 蒙皮
    skinning: SkinningContext,
    debug_log: bool,
}

impl SkeletalModel {
    /// 由三个数据表创建模型
    ///
    /// 校验全部通过后求解绑定姿态，并完成一次姿态更新和蒙皮。
    pub fn from_tables(
        skeleton: &[SkeletonRecord],
        mesh: MeshTable,
        attachment_rows: &[Vec<f32>],
        config: &EngineConfig,
    ) -> Result<Self> {
        let skeleton = JointHierarchy::from_table(skeleton)?;
        let mesh = Mesh::from_table(mesh)?;
        let attachments =
            AttachmentTable::from_rows(attachment_rows, skeleton.joint_count(), mesh.vertex_count())?;
        let vertex_colors = vertex_colors(&attachments, config.color_scheme);

        let mut model = Self {
            skeleton,
            mesh,
            attachments,
            color_scheme: config.color_scheme,
            vertex_colors,
            skinning: SkinningContext::from_config(config),
            debug_log: config.debug_log,
        };
        model.recompute_pose();

        log::info!(
            "模型加载完成: {} 个关节, {} 个顶点, {} 个三角面",
            model.joint_count(),
            model.vertex_count(),
            model.mesh.face_count()
        );

        Ok(model)
    }

    /// 从 `<prefix>.skel`、`<prefix>.obj`、`<prefix>.attach` 加载
    pub fn load<P: AsRef<Path>>(prefix: P, config: &EngineConfig) -> Result<Self> {
        let paths = ModelPaths::from_prefix(prefix);
        let skeleton = loader::load_skeleton(&paths.skeleton)?;
        let mesh = loader::load_mesh(&paths.mesh)?;
        let attachments = loader::load_attachments(&paths.attachments, skeleton.len())?;
        Self::from_tables(&skeleton, mesh, &attachments, config)
    }

    // ========== 姿态修改 ==========

    /// 设置关节旋转（欧拉角），需要调用 `recompute_pose` 生效
    pub fn set_joint_rotation(&mut self, index: usize, rx: f32, ry: f32, rz: f32) -> Result<()> {
        self.skeleton.set_joint_rotation(index, rx, ry, rz)
    }

    /// 设置根骨骼平移增量，需要调用 `recompute_pose` 生效
    pub fn set_root_translation(&mut self, dx: f32, dy: f32, dz: f32) {
        self.skeleton.set_root_translation(dx, dy, dz);
    }

    /// 回到绑定姿态，需要调用 `recompute_pose` 生效
    pub fn reset_pose(&mut self) {
        self.skeleton.reset_pose();
    }

    // ========== 重算 ==========

    /// 姿态更新 + 蒙皮，同步完成
    pub fn recompute_pose(&mut self) {
        self.update_joint_transforms();
        self.update_mesh();
    }

    /// 更新所有关节的 关节->世界 变换
    pub fn update_joint_transforms(&mut self) {
        self.skeleton.update_current_transforms();
    }

    /// 用当前关节变换重算所有顶点
    pub fn update_mesh(&mut self) {
        let matrices = skinning_matrices(&self.skeleton);
        let (bind_vertices, current_vertices) = self.mesh.vertices_mut();
        let input = SkinningInput {
            bind_vertices,
            attachments: &self.attachments,
            skinning_matrices: &matrices,
        };
        // 网格与附着表在构造时已校验行数，矩阵数即关节数
        if let Err(err) = compute_skinning(&input, &self.skinning, current_vertices) {
            log::error!("蒙皮失败: {}", err);
            return;
        }

        if self.debug_log {
            log::debug!(
                "蒙皮完成: vertex_count={}, joint_count={}, parallel={}",
                self.mesh.vertex_count(),
                matrices.len(),
                self.skinning.parallel
            );
        }
    }

    // ========== 查询 ==========

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// 获取关节数量
    pub fn joint_count(&self) -> usize {
        self.skeleton.joint_count()
    }

    pub fn current_vertices(&self) -> &[Vec3] {
        self.mesh.current_vertices()
    }

    pub fn bind_vertices(&self) -> &[Vec3] {
        self.mesh.bind_vertices()
    }

    /// 三角面（0 基索引）
    pub fn faces(&self) -> &[[u32; 3]] {
        self.mesh.faces()
    }

    pub fn face_normals(&self) -> Vec<Vec3> {
        self.mesh.face_normals()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn skeleton(&self) -> &JointHierarchy {
        &self.skeleton
    }

    pub fn attachments(&self) -> &AttachmentTable {
        &self.attachments
    }

    pub fn current_joint_to_world(&self, index: usize) -> Option<Mat4> {
        self.skeleton.current_joint_to_world(index)
    }

    pub fn bind_world_to_joint(&self, index: usize) -> Option<Mat4> {
        self.skeleton.bind_world_to_joint(index)
    }

    pub fn bone_segments(&self) -> Vec<BoneSegment> {
        self.skeleton.bone_segments()
    }

    // ========== 着色 ==========

    pub fn vertex_colors(&self) -> &[Vec3] {
        &self.vertex_colors
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    /// 切换着色方案，颜色只依赖附着权重，立即重算
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        if scheme != self.color_scheme {
            self.color_scheme = scheme;
            self.vertex_colors = vertex_colors(&self.attachments, scheme);
        }
    }
}

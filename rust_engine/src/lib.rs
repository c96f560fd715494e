//! Skin Engine - 骨骼蒙皮（SSD / 线性混合蒙皮）运行时
//!
//! 提供：
//! - 骨骼层级与变换栈
//! - 绑定姿态逆矩阵求解、当前姿态更新
//! - 顶点蒙皮计算（可选 rayon 并行）
//! - skel / obj / attach 文本表加载
//! - 顶点着色方案与控制面板上下文

pub mod coloring;
pub mod config;
pub mod controls;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod skeleton;
pub mod skinning;

pub use coloring::{vertex_colors, ColorScheme, JOINT_PALETTE};
pub use config::EngineConfig;
pub use controls::{Control, ControlKind, ModelerContext};
pub use loader::{ModelPaths, SkeletonRecord};
pub use mesh::{AttachmentTable, Mesh, MeshTable};
pub use model::SkeletalModel;
pub use skeleton::{BoneSegment, Joint, JointHierarchy, TransformStack};
pub use skinning::{compute_skinning, SkinningContext, SkinningInput};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Skeleton parse error: {0}")]
    SkeletonParse(String),

    #[error("Mesh parse error: {0}")]
    MeshParse(String),

    #[error("Attachment parse error: {0}")]
    AttachmentParse(String),

    #[error("Skeleton must have exactly one root joint, found {0}")]
    RootCount(usize),

    #[error("Joint {joint} has invalid parent index {parent}")]
    InvalidParent { joint: usize, parent: i64 },

    #[error("Joint {0} does not reach the root (cyclic hierarchy)")]
    CyclicHierarchy(usize),

    #[error("Attachment row {vertex} has {found} weights, expected {expected}")]
    AttachmentWidth {
        vertex: usize,
        expected: usize,
        found: usize,
    },

    #[error("Attachment table has {found} rows, mesh has {expected} vertices")]
    VertexCountMismatch { expected: usize, found: usize },

    #[error("Face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    FaceIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Composed bind transform of joint {0} is singular")]
    SingularTransform(usize),

    #[error("Joint index {index} out of range (joint count {count})")]
    JointIndex { index: usize, count: usize },

    #[error("Control index {index} out of range (control count {count})")]
    ControlIndex { index: usize, count: usize },

    #[error("Skinning input has {found} matrices, attachment table has {expected} joints")]
    MatrixCount { expected: usize, found: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SkinError>;

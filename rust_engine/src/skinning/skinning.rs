//! 顶点蒙皮计算

use glam::{Mat4, Vec3, Vec4};
use rayon::prelude::*;

use super::SkinningInput;
use crate::config::EngineConfig;
use crate::skeleton::JointHierarchy;
use crate::{Result, SkinError};

/// 蒙皮上下文
#[derive(Clone, Debug)]
pub struct SkinningContext {
    pub parallel: bool,
    /// 顶点数达到此值才并行
    pub min_parallel_vertices: usize,
}

impl Default for SkinningContext {
    fn default() -> Self {
        Self {
            parallel: false,
            min_parallel_vertices: 0,
        }
    }
}

impl SkinningContext {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            parallel: config.parallel_skinning,
            min_parallel_vertices: config.parallel_min_vertices,
        }
    }

    fn use_parallel(&self, vertex_count: usize) -> bool {
        self.parallel && vertex_count >= self.min_parallel_vertices
    }
}

/// 本次姿态的蒙皮矩阵，每个关节算一次，所有顶点共享
pub fn skinning_matrices(skeleton: &JointHierarchy) -> Vec<Mat4> {
    skeleton.joints().iter().map(|j| j.skinning_matrix()).collect()
}

/// 计算蒙皮，整体覆盖 `output`
///
/// `output`、附着表行数都必须等于绑定顶点数量，矩阵数必须等于附着表关节数。
pub fn compute_skinning(
    input: &SkinningInput,
    ctx: &SkinningContext,
    output: &mut [Vec3],
) -> Result<()> {
    let vertex_count = input.bind_vertices.len();
    for found in [output.len(), input.attachments.vertex_count()] {
        if found != vertex_count {
            return Err(SkinError::VertexCountMismatch {
                expected: vertex_count,
                found,
            });
        }
    }
    if input.skinning_matrices.len() != input.attachments.joint_count() {
        return Err(SkinError::MatrixCount {
            expected: input.attachments.joint_count(),
            found: input.skinning_matrices.len(),
        });
    }

    let vertices = input.bind_vertices;
    let attachments = input.attachments;
    let matrices = input.skinning_matrices;

    if ctx.use_parallel(vertices.len()) {
        output
            .par_iter_mut()
            .zip(vertices.par_iter())
            .enumerate()
            .for_each(|(i, (out, &position))| {
                *out = skin_vertex(position, attachments.weights(i), matrices);
            });
    } else {
        for (i, (out, &position)) in output.iter_mut().zip(vertices).enumerate() {
            *out = skin_vertex(position, attachments.weights(i), matrices);
        }
    }
    Ok(())
}

/// 计算单个顶点
///
/// 在齐次坐标下累加 `w_j * (M_j * (p, 1))`，最后丢弃第四分量，不做归一化。
/// 权重全为 0 的顶点结果是原点。
pub fn skin_vertex(position: Vec3, weights: &[f32], matrices: &[Mat4]) -> Vec3 {
    let homogeneous = position.extend(1.0);

    weights
        .iter()
        .zip(matrices)
        .fold(Vec4::ZERO, |acc, (&w, m)| acc + (*m * homogeneous) * w)
        .truncate()
}

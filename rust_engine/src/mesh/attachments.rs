//! 顶点附着权重表

use crate::{Result, SkinError};

/// 附着权重表
///
/// 每个顶点一行、每个关节一个权重。第 0 列保留给根关节（平移槽），
/// 恒为 0。权重之和不要求为 1，也不会被归一化。
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentTable {
    joint_count: usize,
    vertex_count: usize,
    /// 行优先，vertex_count * joint_count
    weights: Vec<f32>,
}

impl AttachmentTable {
    /// 从源文件行创建：每行不含第 0 列，宽度必须为 joint_count - 1
    pub fn from_rows(rows: &[Vec<f32>], joint_count: usize, vertex_count: usize) -> Result<Self> {
        // 只有根关节时每行宽度为 0，空文件即表示所有顶点
        if joint_count <= 1 && rows.is_empty() {
            return Ok(Self {
                joint_count,
                vertex_count,
                weights: vec![0.0; vertex_count * joint_count],
            });
        }

        if rows.len() != vertex_count {
            return Err(SkinError::VertexCountMismatch {
                expected: vertex_count,
                found: rows.len(),
            });
        }

        let expected = joint_count.saturating_sub(1);
        let mut weights = Vec::with_capacity(vertex_count * joint_count);

        for (vertex, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(SkinError::AttachmentWidth {
                    vertex,
                    expected,
                    found: row.len(),
                });
            }
            if joint_count > 0 {
                weights.push(0.0);
            }
            weights.extend_from_slice(row);
        }

        Ok(Self {
            joint_count,
            vertex_count,
            weights,
        })
    }

    /// 每行宽度（含保留的第 0 列）
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// 某个顶点对所有关节的权重
    pub fn weights(&self, vertex: usize) -> &[f32] {
        let start = vertex * self.joint_count;
        &self.weights[start..start + self.joint_count]
    }

    pub fn weight(&self, vertex: usize, joint: usize) -> f32 {
        self.weights(vertex)[joint]
    }

    /// 逐顶点迭代权重行
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.vertex_count).map(move |vertex| self.weights(vertex))
    }
}

//! 网格数据表：绑定顶点、当前顶点、三角面、附着权重

mod attachments;

pub use attachments::AttachmentTable;

use glam::Vec3;

use crate::{Result, SkinError};

/// 网格表（源文件表示，面索引从 1 开始）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshTable {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

/// 蒙皮网格
#[derive(Clone, Debug)]
pub struct Mesh {
    // 静态数据
    bind_vertices: Vec<Vec3>,
    /// 三角面，索引从 0 开始
    faces: Vec<[u32; 3]>,

    // 运行时数据，每次蒙皮整体重算
    current_vertices: Vec<Vec3>,
}

impl Mesh {
    /// 从网格表创建：校验面索引并转换为从 0 开始
    pub fn from_table(table: MeshTable) -> Result<Self> {
        let vertex_count = table.vertices.len();

        let faces = table
            .faces
            .iter()
            .enumerate()
            .map(|(face, indices)| {
                let mut converted = [0u32; 3];
                for (slot, &index) in converted.iter_mut().zip(indices) {
                    if index == 0 || index as usize > vertex_count {
                        return Err(SkinError::FaceIndex {
                            face,
                            index,
                            vertex_count,
                        });
                    }
                    *slot = index - 1;
                }
                Ok(converted)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            current_vertices: table.vertices.clone(),
            bind_vertices: table.vertices,
            faces,
        })
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.bind_vertices.len()
    }

    /// 获取三角面数量
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bind_vertices(&self) -> &[Vec3] {
        &self.bind_vertices
    }

    pub fn current_vertices(&self) -> &[Vec3] {
        &self.current_vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// (绑定顶点, 当前顶点) 分开借用，供蒙皮写入
    pub(crate) fn vertices_mut(&mut self) -> (&[Vec3], &mut [Vec3]) {
        (&self.bind_vertices, &mut self.current_vertices)
    }

    /// 基于当前顶点的逐面法线（平面着色用），退化三角形为零向量
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let va = self.current_vertices[a as usize];
                let vb = self.current_vertices[b as usize];
                let vc = self.current_vertices[c as usize];
                (vb - va).cross(vc - va).normalize_or_zero()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshTable {
        MeshTable {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[1, 2, 3], [1, 3, 4]],
        }
    }

    #[test]
    fn test_faces_become_zero_based() {
        let mesh = Mesh::from_table(quad()).unwrap();
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.current_vertices(), mesh.bind_vertices());
    }

    #[test]
    fn test_face_index_out_of_range() {
        let mut table = quad();
        table.faces.push([2, 5, 1]);
        let result = Mesh::from_table(table);
        assert!(matches!(
            result,
            Err(SkinError::FaceIndex { face: 2, index: 5, vertex_count: 4 })
        ));

        let mut table = quad();
        table.faces[0] = [0, 1, 2];
        assert!(matches!(
            Mesh::from_table(table),
            Err(SkinError::FaceIndex { face: 0, index: 0, .. })
        ));
    }

    #[test]
    fn test_face_normals() {
        let mut table = quad();
        table.faces.push([1, 2, 2]);
        let mesh = Mesh::from_table(table).unwrap();
        let normals = mesh.face_normals();

        assert!(normals[0].abs_diff_eq(Vec3::Z, 1e-6));
        assert!(normals[1].abs_diff_eq(Vec3::Z, 1e-6));
        assert_eq!(normals[2], Vec3::ZERO);
    }
}

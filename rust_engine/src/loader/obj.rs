//! OBJ 网格解析（只取顶点和三角面）

use glam::Vec3;

use super::parse_f32;
use crate::mesh::MeshTable;
use crate::{Result, SkinError};

/// 解析 OBJ 文本
///
/// `v x y z` 为顶点，`f a b c` 为三角面，面索引保持源文件的 1 基表示。
/// 面索引可带 `/` 分隔的纹理/法线子字段，只保留第一个。其余行类型忽略。
pub fn parse_mesh(text: &str) -> Result<MeshTable> {
    let mut table = MeshTable::default();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut tokens = raw.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords: Vec<&str> = tokens.collect();
                if coords.len() < 3 {
                    return Err(SkinError::MeshParse(format!(
                        "line {}: vertex needs 3 coordinates, got {}",
                        line_no,
                        coords.len()
                    )));
                }
                let x = parse_f32(coords[0], line_no).map_err(SkinError::MeshParse)?;
                let y = parse_f32(coords[1], line_no).map_err(SkinError::MeshParse)?;
                let z = parse_f32(coords[2], line_no).map_err(SkinError::MeshParse)?;
                table.vertices.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    return Err(SkinError::MeshParse(format!(
                        "line {}: only triangles are supported, got {} corners",
                        line_no,
                        corners.len()
                    )));
                }
                let mut face = [0u32; 3];
                for (slot, corner) in face.iter_mut().zip(&corners) {
                    *slot = parse_vertex_index(corner, line_no)?;
                }
                table.faces.push(face);
            }
            _ => {}
        }
    }

    log::info!(
        "网格解析完成: {} 个顶点, {} 个三角面",
        table.vertices.len(),
        table.faces.len()
    );
    Ok(table)
}

/// `7`、`7/2`、`7/2/5`、`7//5` -> 7
fn parse_vertex_index(corner: &str, line_no: usize) -> Result<u32> {
    let index = corner.split('/').next().unwrap_or(corner);
    index.parse::<u32>().map_err(|e| {
        SkinError::MeshParse(format!(
            "line {}: invalid vertex index {:?}: {}",
            line_no, corner, e
        ))
    })
}

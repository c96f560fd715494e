//! 顶点着色方案
//!
//! 按附着权重给顶点上色，便于观察每个关节影响的区域。

use glam::Vec3;

use crate::mesh::AttachmentTable;

/// 关节颜色表，超出表长的关节使用白色
pub const JOINT_PALETTE: [Vec3; 18] = [
    Vec3::new(0.0, 0.0, 0.0),    // Root - 黑
    Vec3::new(0.25, 0.25, 0.25), // Chest - 浅黑
    Vec3::new(0.0, 0.0, 0.5),    // Waist - 海军蓝
    Vec3::new(0.0, 0.5, 0.0),    // Neck - 绿
    Vec3::new(0.0, 0.5, 0.5),    // Right hip - 青
    Vec3::new(0.5, 0.0, 0.0),    // Right leg - 栗
    Vec3::new(0.5, 0.0, 0.5),    // Right knee - 紫
    Vec3::new(0.5, 0.5, 0.0),    // Right foot - 棕
    Vec3::new(0.75, 0.75, 0.75), // Left hip - 银
    Vec3::new(0.5, 0.5, 0.5),    // Left leg - 灰
    Vec3::new(0.0, 0.0, 1.0),    // Left knee - 蓝
    Vec3::new(0.0, 1.0, 0.0),    // Left foot - 亮绿
    Vec3::new(0.0, 1.0, 1.0),    // Right collarbone - 水绿
    Vec3::new(1.0, 0.0, 0.0),    // Right shoulder - 红
    Vec3::new(1.0, 0.0, 1.0),    // Right elbow - 品红
    Vec3::new(1.0, 1.0, 0.0),    // Left collarbone - 黄
    Vec3::new(1.0, 1.0, 0.5),    // Left shoulder - 浅黄
    Vec3::new(1.0, 1.0, 1.0),    // Left elbow - 白
];

/// 着色方案（运行时选择）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// 受多个关节影响的顶点按权重混合关节颜色，只受一个关节影响的顶点为黑色
    #[default]
    Blended,
    /// 取权重最大的关节颜色
    Dominant,
}

/// 关节颜色，超出颜色表为白色
pub fn joint_color(joint: usize) -> Vec3 {
    JOINT_PALETTE.get(joint).copied().unwrap_or(Vec3::ONE)
}

/// 计算所有顶点的颜色
pub fn vertex_colors(attachments: &AttachmentTable, scheme: ColorScheme) -> Vec<Vec3> {
    attachments
        .rows()
        .map(|weights| match scheme {
            ColorScheme::Blended => blended_color(weights),
            ColorScheme::Dominant => dominant_color(weights),
        })
        .collect()
}

fn blended_color(weights: &[f32]) -> Vec3 {
    let binds = weights.iter().filter(|&&w| w > 0.0).count();
    if binds <= 1 {
        return Vec3::ZERO;
    }
    weights
        .iter()
        .enumerate()
        .fold(Vec3::ZERO, |acc, (joint, &w)| acc + joint_color(joint) * w)
}

fn dominant_color(weights: &[f32]) -> Vec3 {
    // 并列时保留索引较小的关节
    let mut best = 0;
    for (joint, &w) in weights.iter().enumerate().skip(1) {
        if w > weights[best] {
            best = joint;
        }
    }
    joint_color(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<f32>>, joint_count: usize) -> AttachmentTable {
        let vertex_count = rows.len();
        AttachmentTable::from_rows(&rows, joint_count, vertex_count).unwrap()
    }

    #[test]
    fn test_blended_rigid_vertex_is_black() {
        let attachments = table(vec![vec![0.0, 1.0, 0.0]], 4);
        let colors = vertex_colors(&attachments, ColorScheme::Blended);
        assert_eq!(colors, vec![Vec3::ZERO]);
    }

    #[test]
    fn test_blended_mixes_palette() {
        // 关节 3 (Neck 绿) 与 关节 13 (Right shoulder 红) 各一半
        let mut row = vec![0.0; 19];
        row[2] = 0.5;
        row[12] = 0.5;
        let attachments = table(vec![row], 20);
        let colors = vertex_colors(&attachments, ColorScheme::Blended);
        assert!(colors[0].abs_diff_eq(Vec3::new(0.5, 0.25, 0.0), 1e-6));
    }

    #[test]
    fn test_joints_past_palette_are_white() {
        let mut row = vec![0.0; 19];
        row[18] = 0.5; // 关节 19
        row[0] = 0.5; // 关节 1 (Chest)
        let attachments = table(vec![row], 20);
        let colors = vertex_colors(&attachments, ColorScheme::Blended);
        assert!(colors[0].abs_diff_eq(Vec3::new(0.625, 0.625, 0.625), 1e-6));
        assert_eq!(joint_color(40), Vec3::ONE);
    }

    #[test]
    fn test_dominant_picks_largest_weight() {
        let attachments = table(vec![vec![0.2, 0.7, 0.1], vec![0.5, 0.5, 0.0]], 4);
        let colors = vertex_colors(&attachments, ColorScheme::Dominant);
        assert_eq!(colors[0], JOINT_PALETTE[2]);
        // 并列取较小索引
        assert_eq!(colors[1], JOINT_PALETTE[1]);
    }

    #[test]
    fn test_dominant_unattached_vertex_uses_root_color() {
        let attachments = table(vec![vec![0.0, 0.0]], 3);
        let colors = vertex_colors(&attachments, ColorScheme::Dominant);
        assert_eq!(colors[0], JOINT_PALETTE[0]);
    }
}

//! 附着权重表解析

use super::parse_f32;
use crate::{Result, SkinError};

/// 解析附着权重表
///
/// 每个非空行对应一个顶点，含 `joint_count - 1` 个权重（第 0 列由核心补齐）。
/// 行宽在这里校验，行数在与网格组合时校验。
pub fn parse_attachments(text: &str, joint_count: usize) -> Result<Vec<Vec<f32>>> {
    let expected = joint_count.saturating_sub(1);
    let mut rows = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let row = raw
            .split_whitespace()
            .map(|token| parse_f32(token, line_no))
            .collect::<std::result::Result<Vec<f32>, String>>()
            .map_err(SkinError::AttachmentParse)?;

        if row.len() != expected {
            return Err(SkinError::AttachmentWidth {
                vertex: rows.len(),
                expected,
                found: row.len(),
            });
        }
        rows.push(row);
    }

    log::info!("附着权重解析完成: {} 行, 每行 {} 个权重", rows.len(), expected);
    Ok(rows)
}

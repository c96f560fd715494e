//! 骨骼表解析

use glam::Vec3;

use super::parse_f32;
use crate::skeleton::SkeletonRecord;
use crate::{Result, SkinError};

/// 解析骨骼表
///
/// 每个非空行一个关节：`x y z parent [name...]`，名称为行尾剩余部分（去除首尾空白，可为空）。
pub fn parse_skeleton(text: &str) -> Result<Vec<SkeletonRecord>> {
    let mut records = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut rest = line;
        let mut fields = [""; 4];
        for field in fields.iter_mut() {
            let (token, tail) = split_token(rest);
            if token.is_empty() {
                return Err(SkinError::SkeletonParse(format!(
                    "line {}: expected `x y z parent [name]`, got {:?}",
                    line_no, line
                )));
            }
            *field = token;
            rest = tail;
        }

        let x = parse_f32(fields[0], line_no).map_err(SkinError::SkeletonParse)?;
        let y = parse_f32(fields[1], line_no).map_err(SkinError::SkeletonParse)?;
        let z = parse_f32(fields[2], line_no).map_err(SkinError::SkeletonParse)?;
        let parent = fields[3].parse::<i32>().map_err(|e| {
            SkinError::SkeletonParse(format!(
                "line {}: invalid parent index {:?}: {}",
                line_no, fields[3], e
            ))
        })?;

        records.push(SkeletonRecord::new(Vec3::new(x, y, z), parent, rest.trim()));
    }

    log::info!("骨骼表解析完成: {} 个关节", records.len());
    Ok(records)
}

/// 取出第一个空白分隔的词，返回 (词, 剩余部分)
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

//! skel / obj / attach 文本表加载
//!
//! 同一模型的三个文件共享前缀：`<prefix>.skel`、`<prefix>.obj`、`<prefix>.attach`。

mod attach;
mod obj;
mod skel;

pub use attach::parse_attachments;
pub use obj::parse_mesh;
pub use skel::parse_skeleton;

pub use crate::skeleton::SkeletonRecord;

use std::fs;
use std::path::{Path, PathBuf};

use crate::mesh::MeshTable;
use crate::Result;

/// 模型的三个数据文件
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelPaths {
    pub skeleton: PathBuf,
    pub mesh: PathBuf,
    pub attachments: PathBuf,
}

impl ModelPaths {
    /// `data/cheb` -> `data/cheb.skel`、`data/cheb.obj`、`data/cheb.attach`
    pub fn from_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let prefix = prefix.as_ref().as_os_str();
        let with_suffix = |suffix: &str| {
            let mut path = prefix.to_os_string();
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            skeleton: with_suffix(".skel"),
            mesh: with_suffix(".obj"),
            attachments: with_suffix(".attach"),
        }
    }
}

/// 从文件加载骨骼表
pub fn load_skeleton<P: AsRef<Path>>(path: P) -> Result<Vec<SkeletonRecord>> {
    let text = fs::read_to_string(path)?;
    parse_skeleton(&text)
}

/// 从文件加载网格表
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<MeshTable> {
    let text = fs::read_to_string(path)?;
    parse_mesh(&text)
}

/// 从文件加载附着权重行（不含第 0 列）
pub fn load_attachments<P: AsRef<Path>>(path: P, joint_count: usize) -> Result<Vec<Vec<f32>>> {
    let text = fs::read_to_string(path)?;
    parse_attachments(&text, joint_count)
}

/// 解析以空白分隔的浮点数，错误信息带 1 基行号
fn parse_f32(token: &str, line: usize) -> std::result::Result<f32, String> {
    token
        .parse::<f32>()
        .map_err(|e| format!("line {}: invalid number {:?}: {}", line, token, e))
}

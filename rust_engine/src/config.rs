//! 引擎配置
//!
//! 所有参数扁平化，构造模型/上下文时显式传入，不使用全局实例。

use std::f32::consts::PI;

use crate::coloring::ColorScheme;
use crate::{Result, SkinError};

/// 引擎配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ========== 蒙皮 ==========
    /// 是否使用 rayon 并行计算顶点，默认 true
    pub parallel_skinning: bool,
    /// 顶点数达到此值才启用并行，默认 1024
    pub parallel_min_vertices: usize,

    // ========== 着色 ==========
    /// 顶点着色方案，默认 Blended
    pub color_scheme: ColorScheme,

    // ========== 控制范围 ==========
    /// 根骨骼平移控制范围 [-range, range]，默认 1.0
    pub translation_range: f32,
    /// 根骨骼平移控制步长，默认 0.05
    pub translation_step: f32,
    /// 关节旋转控制范围 [-range, range]（弧度），默认 PI
    pub rotation_range: f32,
    /// 关节旋转控制步长（弧度），默认 0.1
    pub rotation_step: f32,

    // ========== 调试 ==========
    /// 是否输出蒙皮调试日志，默认 false
    pub debug_log: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // ====== 蒙皮 ======
            // 顶点之间没有数据依赖，小网格串行反而更快
            parallel_skinning: true,
            parallel_min_vertices: 1024,

            // ====== 着色 ======
            color_scheme: ColorScheme::Blended,

            // ====== 控制范围 ======
            translation_range: 1.0,
            translation_step: 0.05,
            rotation_range: PI,
            rotation_step: 0.1,

            // ====== 调试 ======
            debug_log: false,
        }
    }
}

impl EngineConfig {
    /// 检查控制范围与步长；范围可以为负（取绝对值），但必须是有限值
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("translation_range", self.translation_range),
            ("translation_step", self.translation_step),
            ("rotation_range", self.rotation_range),
            ("rotation_step", self.rotation_step),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SkinError::InvalidConfig(format!("{} = {}", name, value)));
            }
        }
        Ok(())
    }
}

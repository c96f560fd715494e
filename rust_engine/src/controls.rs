//! 姿态控制面板
//!
//! 持有所有已加载模型以及每个模型的控制值（根平移 XYZ + 每个关节的旋转 XYZ）。
//! 由调用方显式构造并传递，不存在全局实例。

use std::path::Path;

use crate::config::EngineConfig;
use crate::model::SkeletalModel;
use crate::{Result, SkinError};

/// 控制目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    /// 根骨骼平移增量
    RootTranslation,
    /// 关节欧拉角
    JointRotation(usize),
}

/// 单个控制量（滑块）
#[derive(Clone, Debug)]
pub struct Control {
    pub model: usize,
    pub kind: ControlKind,
    /// 0 = X, 1 = Y, 2 = Z
    pub axis: usize,
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub value: f32,
}

impl Control {
    fn new(model: usize, kind: ControlKind, axis: usize, name: &str, range: f32, step: f32) -> Self {
        let axis_name = ['X', 'Y', 'Z'][axis];
        let range = range.abs();
        Self {
            model,
            kind,
            axis,
            label: format!("{} {}", name, axis_name),
            min: -range,
            max: range,
            step,
            value: 0.0,
        }
    }
}

/// 控制面板上下文
pub struct ModelerContext {
    models: Vec<SkeletalModel>,
    controls: Vec<Control>,
    /// 每个模型第一个控制量的位置
    model_offsets: Vec<usize>,
}

impl ModelerContext {
    /// 为每个模型生成控制：先是根平移 XYZ，再是每个关节的旋转 XYZ
    pub fn new(models: Vec<SkeletalModel>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut controls = Vec::new();
        let mut model_offsets = Vec::with_capacity(models.len());

        for (model_index, model) in models.iter().enumerate() {
            model_offsets.push(controls.len());
            for axis in 0..3 {
                controls.push(Control::new(
                    model_index,
                    ControlKind::RootTranslation,
                    axis,
                    "Root (Translation)",
                    config.translation_range,
                    config.translation_step,
                ));
            }

            for joint in model.skeleton().joints() {
                let name = if joint.name.is_empty() {
                    format!("Joint {}", joint.index)
                } else {
                    joint.name.clone()
                };
                for axis in 0..3 {
                    controls.push(Control::new(
                        model_index,
                        ControlKind::JointRotation(joint.index),
                        axis,
                        &name,
                        config.rotation_range,
                        config.rotation_step,
                    ));
                }
            }
        }

        log::debug!("控制面板: {} 个模型, {} 个控制量", models.len(), controls.len());

        Ok(Self {
            models,
            controls,
            model_offsets,
        })
    }

    /// 按前缀依次加载模型
    pub fn load<P: AsRef<Path>>(prefixes: &[P], config: &EngineConfig) -> Result<Self> {
        let models = prefixes
            .iter()
            .map(|prefix| SkeletalModel::load(prefix, config))
            .collect::<Result<Vec<_>>>()?;
        Self::new(models, config)
    }

    pub fn models(&self) -> &[SkeletalModel] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Option<&SkeletalModel> {
        self.models.get(index)
    }

    pub fn model_mut(&mut self, index: usize) -> Option<&mut SkeletalModel> {
        self.models.get_mut(index)
    }

    /// 获取控制量数量
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, index: usize) -> Option<&Control> {
        self.controls.get(index)
    }

    pub fn control_value(&self, index: usize) -> Option<f32> {
        self.controls.get(index).map(|c| c.value)
    }

    /// 设置控制值，按滑块语义限制在范围内；不触发重算
    pub fn set_control_value(&mut self, index: usize, value: f32) -> Result<()> {
        let count = self.controls.len();
        let control = self
            .controls
            .get_mut(index)
            .ok_or(SkinError::ControlIndex { index, count })?;

        if !value.is_finite() {
            log::warn!("忽略非有限控制值: {} = {}", control.label, value);
            return Ok(());
        }
        control.value = value.max(control.min).min(control.max);
        Ok(())
    }

    /// 某个模型的全部控制量
    pub fn controls_for_model(&self, model: usize) -> impl Iterator<Item = (usize, &Control)> {
        self.controls
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.model == model)
    }

    /// 某个模型某个目标的 XYZ 三个控制值
    pub fn joint_controls(&self, model: usize, kind: ControlKind) -> Option<[f32; 3]> {
        let start = self.control_offset(model, kind)?;
        let c = &self.controls[start..start + 3];
        Some([c[0].value, c[1].value, c[2].value])
    }

    /// 控制量在列表中的起始位置：模型起点 + 根平移 3 个 + 关节序号 * 3
    fn control_offset(&self, model: usize, kind: ControlKind) -> Option<usize> {
        let base = *self.model_offsets.get(model)?;
        let joint_count = self.models[model].joint_count();
        match kind {
            ControlKind::RootTranslation => Some(base),
            ControlKind::JointRotation(joint) if joint < joint_count => Some(base + 3 + joint * 3),
            ControlKind::JointRotation(_) => None,
        }
    }

    /// 把控制值写入模型并重算所有模型的姿态
    pub fn update(&mut self) -> Result<()> {
        for model_index in 0..self.models.len() {
            let [dx, dy, dz] = self
                .joint_controls(model_index, ControlKind::RootTranslation)
                .unwrap_or_default();
            let rotations: Vec<[f32; 3]> = (0..self.models[model_index].joint_count())
                .map(|joint| {
                    self.joint_controls(model_index, ControlKind::JointRotation(joint))
                        .unwrap_or_default()
                })
                .collect();

            let model = &mut self.models[model_index];
            model.set_root_translation(dx, dy, dz);
            for (joint, [rx, ry, rz]) in rotations.into_iter().enumerate() {
                model.set_joint_rotation(joint, rx, ry, rz)?;
            }
            model.recompute_pose();
        }
        Ok(())
    }
}

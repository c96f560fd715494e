//! 蒙皮模型运行时管理

mod runtime;

pub use runtime::SkeletalModel;

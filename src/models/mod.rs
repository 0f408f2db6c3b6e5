//! # 数据模型模块
//!
//! 定义资源字段和作业描述的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `utils/` 和 `commands/` 使用
//! - 子模块: resource, job

pub mod job;
pub mod resource;

pub use job::JobDescriptor;
pub use resource::{Origin, ResourceKind, ResourceSet};

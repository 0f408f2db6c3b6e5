//! # 解析器模块
//!
//! 从 Q-Chem 输入文件和命令行中收集资源请求。
//!
//! 处理顺序：`$rem` 块 -> qsys 注释行 -> 命令行覆盖。
//! 优先级由来源标签决定，不依赖这个顺序。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: units, rem, qsys, overrides

pub mod overrides;
pub mod qsys;
pub mod rem;
pub mod units;

use crate::models::ResourceSet;

pub use overrides::CommandLineOverrides;

/// 从字符串内容提取资源请求
pub fn parse_qchem_content(content: &str, resources: &mut ResourceSet) {
    rem::extract_rem_content(content, resources);
    qsys::extract_qsys_content(content, resources);
}

//! # 资源字段数据模型
//!
//! 每种资源（内存、scratch、walltime、CPU 数）保存至多三个候选值，
//! 按来源打标签：`$rem` 配置块 < qsys 注释行 < 命令行。
//! 有效值总是取权威度最高的已设置来源，与写入顺序无关。
//!
//! ## 依赖关系
//! - 被 `models/job.rs`, `parsers/`, `utils/slurm.rs` 使用
//! - 使用 `parsers/units.rs` 做单位换算与格式化

use crate::error::ResolveWarning;
use crate::parsers::units::{self, WallTime};
use std::fmt;

/// 资源值的来源，按权威度从低到高排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// Q-Chem `$rem` 块
    ConfigBlock,
    /// `qsys` 注释行
    Annotation,
    /// 命令行覆盖
    CommandLine,
}

impl Origin {
    const ALL: [Origin; 3] = [Origin::ConfigBlock, Origin::Annotation, Origin::CommandLine];

    fn index(self) -> usize {
        match self {
            Origin::ConfigBlock => 0,
            Origin::Annotation => 1,
            Origin::CommandLine => 2,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::ConfigBlock => write!(f, "$rem block"),
            Origin::Annotation => write!(f, "qsys line"),
            Origin::CommandLine => write!(f, "command line"),
        }
    }
}

/// 资源种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Memory,
    Scratch,
    WallTime,
    CpuCount,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Memory => write!(f, "memory"),
            ResourceKind::Scratch => write!(f, "scratch"),
            ResourceKind::WallTime => write!(f, "walltime"),
            ResourceKind::CpuCount => write!(f, "cpu count"),
        }
    }
}

/// 单个资源字段：每个来源一个槽位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceField<T> {
    kind: ResourceKind,
    slots: [Option<T>; 3],
}

impl<T> ResourceField<T> {
    pub fn new(kind: ResourceKind) -> Self {
        ResourceField {
            kind,
            slots: [None, None, None],
        }
    }

    /// 写入某个来源的值
    ///
    /// 同一来源再次写入时替换旧值。若其他来源也已有值，
    /// 返回一条 `Overridden` 警告，说明哪个来源胜出、哪个被压下。
    pub fn set(&mut self, origin: Origin, value: T) -> Option<ResolveWarning> {
        self.slots[origin.index()] = Some(value);

        let kept = self.origin()?;
        let dropped = Origin::ALL
            .iter()
            .rev()
            .copied()
            .filter(|o| *o != kept && self.slots[o.index()].is_some())
            .find(|o| *o == origin || kept == origin)?;

        Some(ResolveWarning::Overridden {
            field: self.kind,
            kept,
            dropped,
        })
    }

    /// 某个来源的原始值
    #[cfg(test)]
    pub fn get(&self, origin: Origin) -> Option<&T> {
        self.slots[origin.index()].as_ref()
    }

    /// 有效值：命令行 > 注释行 > 配置块
    pub fn effective(&self) -> Option<&T> {
        self.slots.iter().rev().find_map(|s| s.as_ref())
    }

    /// 有效值的来源
    pub fn origin(&self) -> Option<Origin> {
        Origin::ALL
            .iter()
            .rev()
            .copied()
            .find(|o| self.slots[o.index()].is_some())
    }

    pub fn is_set(&self) -> bool {
        self.effective().is_some()
    }
}

/// 一个作业的全部资源字段
///
/// 每个作业独立持有一份，处理过程中收集到的警告也存放于此。
#[derive(Debug, Clone)]
pub struct ResourceSet {
    /// 内存，单位 MB
    pub memory: ResourceField<u64>,
    /// scratch 空间，单位 MB
    pub scratch: ResourceField<u64>,
    pub walltime: ResourceField<WallTime>,
    pub ncpus: ResourceField<u32>,
    warnings: Vec<ResolveWarning>,
}

impl Default for ResourceSet {
    fn default() -> Self {
        ResourceSet {
            memory: ResourceField::new(ResourceKind::Memory),
            scratch: ResourceField::new(ResourceKind::Scratch),
            walltime: ResourceField::new(ResourceKind::WallTime),
            ncpus: ResourceField::new(ResourceKind::CpuCount),
            warnings: Vec::new(),
        }
    }
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以带单位的字符串设置内存（如 `8gb`）
    pub fn set_memory_text(&mut self, origin: Origin, value: &str) {
        match units::parse_megabytes(value, ResourceKind::Memory) {
            Ok(mb) => self.set_memory_mb(origin, mb),
            Err(w) => self.warn(w),
        }
    }

    /// 以 MB 为单位直接设置内存
    pub fn set_memory_mb(&mut self, origin: Origin, mb: u64) {
        let w = self.memory.set(origin, mb);
        self.warn_opt(w);
    }

    pub fn set_scratch_text(&mut self, origin: Origin, value: &str) {
        match units::parse_megabytes(value, ResourceKind::Scratch) {
            Ok(mb) => self.set_scratch_mb(origin, mb),
            Err(w) => self.warn(w),
        }
    }

    pub fn set_scratch_mb(&mut self, origin: Origin, mb: u64) {
        let w = self.scratch.set(origin, mb);
        self.warn_opt(w);
    }

    pub fn set_walltime_text(&mut self, origin: Origin, value: &str) {
        match units::parse_walltime(value) {
            Ok(t) => self.set_walltime(origin, t),
            Err(w) => self.warn(w),
        }
    }

    pub fn set_walltime(&mut self, origin: Origin, value: WallTime) {
        let w = self.walltime.set(origin, value);
        self.warn_opt(w);
    }

    pub fn set_ncpus_text(&mut self, origin: Origin, value: &str) {
        match units::parse_count(value, ResourceKind::CpuCount) {
            Ok(n) => self.set_ncpus(origin, n),
            Err(w) => self.warn(w),
        }
    }

    pub fn set_ncpus(&mut self, origin: Origin, value: u32) {
        let w = self.ncpus.set(origin, value);
        self.warn_opt(w);
    }

    // ─────────────────────────────────────────────────────────────
    // 格式化为 sbatch 语法
    // ─────────────────────────────────────────────────────────────

    /// `--mem` 的值，如 `2G`
    pub fn memory_directive(&self) -> Option<String> {
        self.memory.effective().map(|mb| units::format_memory(*mb))
    }

    /// `--gres=scratch:` 的值，单位 GB，向上取整
    pub fn scratch_directive(&self) -> Option<String> {
        self.scratch.effective().map(|mb| units::format_scratch(*mb))
    }

    /// `--time` 的值，`DD-HH:MM:SS`
    pub fn walltime_directive(&self) -> Option<String> {
        self.walltime.effective().map(|t| t.to_string())
    }

    pub fn ncpus_directive(&self) -> Option<String> {
        self.ncpus.effective().map(|n| n.to_string())
    }

    // ─────────────────────────────────────────────────────────────
    // 警告
    // ─────────────────────────────────────────────────────────────

    pub fn warn(&mut self, warning: ResolveWarning) {
        self.warnings.push(warning);
    }

    fn warn_opt(&mut self, warning: Option<ResolveWarning>) {
        if let Some(w) = warning {
            self.warn(w);
        }
    }

    #[cfg(test)]
    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.warnings
    }

    /// 取出已收集的警告
    pub fn take_warnings(&mut self) -> Vec<ResolveWarning> {
        std::mem::take(&mut self.warnings)
    }
}

//! # 统一错误处理模块
//!
//! 定义 qchem-send 的错误与警告类型，使用 `thiserror` 派生。
//!
//! - `QsendError`: 致命错误，中断当前输入文件的处理
//! - `ResolveWarning`: 资源解析过程中的非致命警告，随作业收集后统一输出
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 使用 `models/resource.rs` 中的 `Origin`, `ResourceKind`

use crate::models::{Origin, ResourceKind};
use thiserror::Error;

/// qchem-send 统一错误类型
#[derive(Error, Debug)]
pub enum QsendError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse config file: {path}\nReason: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config file already exists: {path} (use --force to overwrite)")]
    ConfigExists { path: String },

    #[error("Q-Chem launcher not found: {name}\nHint: pass --version or set paths.qchem_version in the config file")]
    LauncherNotFound { name: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, QsendError>;

/// 资源解析警告
///
/// 所有变体都不会中断处理：对应的值被忽略，字段保持原状。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    #[error("Unusual {field} string encountered: '{value}'")]
    UnknownUnit { field: ResourceKind, value: String },

    #[error("Could not read a number for {field} from '{value}'")]
    MalformedNumber { field: ResourceKind, value: String },

    #[error("Could not read walltime '{value}', expected [DD-]HH:MM:SS")]
    MalformedWalltime { value: String },

    #[error("Unusual qsys line {line_no} ignored: '{line}'")]
    MalformedAnnotation { line_no: usize, line: String },

    #[error("Unknown qsys keyword '{key}' on line {line_no} ignored")]
    UnknownKeyword { line_no: usize, key: String },

    #[error("{field} from {dropped} is overridden by {kept}")]
    Overridden {
        field: ResourceKind,
        kept: Origin,
        dropped: Origin,
    },

    #[error("No {field} set")]
    MissingField { field: ResourceKind },
}

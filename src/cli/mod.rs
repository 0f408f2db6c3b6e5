//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `submit`: 由 Q-Chem 输入文件生成作业脚本并提交
//! - `config`: 配置文件管理（嵌套子命令）
//!   - `init`: 非交互地创建配置文件
//!   - `show`: 显示当前配置
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: submit, config

pub mod config;
pub mod submit;

use clap::{Parser, Subcommand};

/// qchem-send - Q-Chem 作业脚本生成与提交工具
#[derive(Parser)]
#[command(name = "qchem-send")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Generate and submit Slurm job scripts for Q-Chem input files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Create job scripts from Q-Chem input files and submit them to Slurm
    #[command(after_help = submit::SUBMIT_EPILOG)]
    Submit(submit::SubmitArgs),

    /// Manage the qchem-send config file
    Config(config::ConfigArgs),
}

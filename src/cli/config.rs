//! # config 子命令 CLI 定义
//!
//! 管理配置文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/config.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// config 子命令参数
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,

    /// Path to the config file
    #[arg(long, global = true, env = "QCHEM_SEND_CONFIG")]
    pub config: Option<PathBuf>,
}

/// config 的嵌套子命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a new config file
    Init(InitArgs),

    /// Show the config file in use
    Show,
}

/// config init 参数
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Mail address for Slurm notifications
    #[arg(long)]
    pub mail: Option<String>,

    /// Mail events (comma-separated, 'NONE' for no mails)
    #[arg(long, default_value = "END,FAIL")]
    pub mail_type: String,

    /// Directory containing Q-Chem version scripts
    #[arg(long)]
    pub version_dir: Option<PathBuf>,

    /// Default Q-Chem version script (name inside --version-dir or a path)
    #[arg(long = "version", value_name = "NAME|PATH")]
    pub qchem_version: Option<String>,

    /// Overwrite an existing config file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

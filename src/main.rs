//! # qchem-send - Q-Chem Slurm 作业脚本生成工具
//!
//! 读取 Q-Chem 输入文件中的资源请求，生成 sbatch 脚本并提交。
//!
//! ## 子命令
//! - `submit` - 生成作业脚本并提交到 Slurm
//! - `config` - 配置文件管理
//!
//! ## 资源来源（权威度从低到高）
//! 1. `$rem` 块中的 `threads`, `mem_total`
//! 2. 任意位置的 `qsys <key> <value>` 行
//! 3. 命令行参数
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (资源提取与单位换算)
//!   │     └── models/    (资源字段与作业描述)
//!   ├── utils/      (输出、sbatch 脚本渲染)
//!   ├── config.rs   (全局配置)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

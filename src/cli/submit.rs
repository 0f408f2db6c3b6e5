//! # submit 子命令 CLI 定义
//!
//! 由 Q-Chem 输入文件生成 sbatch 脚本并提交
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::Args;
use std::path::PathBuf;

/// 输入文件关键字说明，显示在帮助末尾
pub const SUBMIT_EPILOG: &str = "\
Resource requests are read from two kinds of lines in the Q-Chem input file:

  qsys lines (anywhere, case insensitive):
      <whatever> qsys <key> = <value>
      <whatever> qsys <key> <value>

      sbatch option    qsys keys             format
      --time           walltime, wt, time    [DD-]HH:MM:SS
      --mem            memory, mem           <number>[mb|gb|tb, the b is optional]
      --gres=scratch   scratch               <number>[mb|gb|tb, the b is optional]
      -n               threads, ncpus        integer

  $rem section:
      --mem            mem_total             integer, MB (5% margin is added)
      -n               threads               integer

Command line requests (--mem, --scratch, --time, --ncpus and resource options
inside -l) override anything specified in the input file.";

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Q-Chem input files to create job scripts for
    #[arg(required = true)]
    pub infiles: Vec<PathBuf>,

    /// Raw sbatch options, forwarded to sbatch (repeatable; use sbatch syntax)
    #[arg(short = 'l', value_name = "SBATCH_OPTIONS", allow_hyphen_values = true)]
    pub sbatch: Vec<String>,

    /// Memory request, overrides the input file (e.g. '16gb')
    #[arg(long)]
    pub mem: Option<String>,

    /// Scratch space request, overrides the input file (e.g. '100gb')
    #[arg(long)]
    pub scratch: Option<String>,

    /// Walltime request, overrides the input file ('[DD-]HH:MM:SS')
    #[arg(long)]
    pub time: Option<String>,

    /// CPU count, overrides the input file
    #[arg(long)]
    pub ncpus: Option<u32>,

    /// Name of or path to a Q-Chem version script
    #[arg(long = "version", value_name = "NAME|PATH")]
    pub qchem_version: Option<String>,

    /// Only generate job scripts, do not submit
    #[arg(long, default_value_t = false)]
    pub no_send: bool,

    /// Continue with the remaining input files when one fails
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,

    /// Path to the config file
    #[arg(long, env = "QCHEM_SEND_CONFIG")]
    pub config: Option<PathBuf>,
}

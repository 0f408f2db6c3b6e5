//! # submit 命令实现
//!
//! 由 Q-Chem 输入文件生成 sbatch 脚本并提交到 Slurm。
//!
//! ## 功能
//! - 读取 `$rem` 块与 qsys 行中的资源请求
//! - 应用命令行覆盖
//! - 生成作业脚本（输入文件同目录，扩展名 `.sh`）
//! - 可选自动提交
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `parsers/`, `utils/slurm.rs`, `utils/output.rs`

use super::config::load_settings;
use crate::cli::submit::SubmitArgs;
use crate::config::Settings;
use crate::error::{QsendError, Result};
use crate::models::job::script_path;
use crate::models::JobDescriptor;
use crate::parsers::{self, CommandLineOverrides};
use crate::utils::slurm::{check_required, generate_jobscript};
use crate::utils::{output, progress};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tabled::{Table, Tabled};

/// 汇总表中的一行
#[derive(Debug, Clone, Tabled)]
struct JobRow {
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "CPUs")]
    ncpus: String,
    #[tabled(rename = "Scratch (GB)")]
    scratch: String,
    #[tabled(rename = "Walltime")]
    walltime: String,
    #[tabled(rename = "Script")]
    script: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl JobRow {
    fn new(job: &JobDescriptor, script: &Path, status: &str) -> Self {
        let res = &job.resources;
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        JobRow {
            job: job.job_name.clone(),
            memory: or_dash(res.memory_directive()),
            ncpus: or_dash(res.ncpus_directive()),
            scratch: or_dash(res.scratch_directive()),
            walltime: or_dash(res.walltime_directive()),
            script: script.display().to_string(),
            status: status.to_string(),
        }
    }
}

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("Q-Chem Job Submission");

    let settings = load_settings(args.config.as_deref())?;
    let launcher = settings.resolve_launcher(args.qchem_version.as_deref())?;
    output::print_info(&format!("Using Q-Chem version script '{}'", launcher.display()));

    let overrides = CommandLineOverrides {
        mem: args.mem.clone(),
        scratch: args.scratch.clone(),
        time: args.time.clone(),
        ncpus: args.ncpus,
        raw: args.sbatch.clone(),
    };
    let sbatch_args = overrides.sbatch_args();

    let mut rows = Vec::new();
    let mut submitted = 0;
    let mut failed = 0;

    for infile in &args.infiles {
        let (job, script) = match prepare_job(infile, &settings, &launcher, &overrides) {
            Ok(prepared) => prepared,
            Err(e) if args.keep_going => {
                output::print_error(&format!("{}", e));
                output::print_skip(&infile.display().to_string());
                failed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let status = if args.no_send {
            output::print_info(&format!("[DRY] Generated job script: {}", script.display()));
            "generated"
        } else if send_job(&script, &sbatch_args) {
            submitted += 1;
            "submitted"
        } else {
            "not submitted"
        };

        rows.push(JobRow::new(&job, &script, status));
    }

    if !rows.is_empty() {
        output::print_separator();
        println!("{}", Table::new(&rows));
    }

    output::print_done(&format!(
        "Processed {} input files, generated {} job scripts, submitted {} jobs, {} failed",
        args.infiles.len(),
        rows.len(),
        submitted,
        failed
    ));

    Ok(())
}

/// 读取一个输入文件，解析资源并写出作业脚本
fn prepare_job(
    infile: &Path,
    settings: &Settings,
    launcher: &Path,
    overrides: &CommandLineOverrides,
) -> Result<(JobDescriptor, PathBuf)> {
    let content = fs::read_to_string(infile).map_err(|e| match e.kind() {
        ErrorKind::NotFound => QsendError::FileNotFound {
            path: infile.display().to_string(),
        },
        _ => QsendError::FileReadError {
            path: infile.display().to_string(),
            source: e,
        },
    })?;

    let mut job = resolve_job(infile, &content, settings, launcher, overrides);
    output::print_resolve_warnings(&job.job_name, &job.resources.take_warnings());
    output::print_resolve_warnings(&job.job_name, &check_required(&job));

    let script = script_path(infile);
    fs::write(&script, generate_jobscript(&job)).map_err(|e| QsendError::FileWriteError {
        path: script.display().to_string(),
        source: e,
    })?;
    output::print_success(&format!(
        "{} -> {}",
        infile.display(),
        script.display()
    ));

    Ok((job, script))
}

/// 构建作业描述：`$rem` 块 -> qsys 行 -> 命令行覆盖
pub fn resolve_job(
    infile: &Path,
    content: &str,
    settings: &Settings,
    launcher: &Path,
    overrides: &CommandLineOverrides,
) -> JobDescriptor {
    let mut job = JobDescriptor::new(infile, launcher)
        .with_mail(settings.mail.mail.as_deref(), &settings.mail.mail_type);

    parsers::parse_qchem_content(content, &mut job.resources);
    overrides.apply(&mut job.resources);
    job
}

/// 调用 sbatch 提交，返回是否提交成功
fn send_job(script: &Path, sbatch_args: &[String]) -> bool {
    let spinner = progress::create_spinner(&format!("Submitting {}", script.display()));
    let result = Command::new("sbatch").args(sbatch_args).arg(script).output();
    spinner.finish_and_clear();

    match result {
        Ok(out) if out.status.success() => {
            output::print_success(&format!(
                "Submitted: {} - {}",
                script.display(),
                String::from_utf8_lossy(&out.stdout).trim()
            ));
            true
        }
        Ok(out) => {
            output::print_error(&format!(
                "sbatch failed for {}: {}",
                script.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            ));
            false
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            output::print_error(&format!(
                "{}",
                QsendError::CommandNotFound {
                    command: "sbatch".to_string()
                }
            ));
            false
        }
        Err(e) => {
            output::print_error(&format!(
                "Failed to run sbatch for {}: {}",
                script.display(),
                e
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailSettings;
    use crate::models::Origin;

    const INPUT: &str = r#"
! qsys walltime = 2-00:00:00
! qsys scratch 20gb
! qsys mem 8gb
$molecule
0 1
He 0.0 0.0 0.0
$end

$rem
   method    ccsd
   basis     cc-pvtz
   threads   8
   mem_total 4096
$end
"#;

    fn settings() -> Settings {
        Settings {
            mail: MailSettings {
                mail: Some("user@example.org".to_string()),
                mail_type: vec!["END".to_string(), "FAIL".to_string()],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_job_without_overrides() {
        let job = resolve_job(
            Path::new("runs/he.in"),
            INPUT,
            &settings(),
            Path::new("/opt/qchem/qchem_6.1"),
            &CommandLineOverrides::default(),
        );

        assert_eq!(job.job_name, "he");
        assert_eq!(job.resources.memory_directive().as_deref(), Some("8G"));
        assert_eq!(job.resources.memory.origin(), Some(Origin::Annotation));
        assert_eq!(job.resources.ncpus.effective(), Some(&8));
        assert_eq!(job.resources.scratch_directive().as_deref(), Some("20"));
        assert_eq!(
            job.resources.walltime_directive().as_deref(),
            Some("02-00:00:00")
        );
        assert!(check_required(&job).is_empty());
        assert_eq!(job.mail.as_deref(), Some("user@example.org"));
    }

    #[test]
    fn test_command_line_overrides_everything() {
        let overrides = CommandLineOverrides {
            mem: Some("16gb".to_string()),
            ncpus: Some(2),
            raw: vec!["--time=00:30:00 --partition dev".to_string()],
            ..Default::default()
        };
        let job = resolve_job(
            Path::new("he.in"),
            INPUT,
            &settings(),
            Path::new("qchem"),
            &overrides,
        );

        let script = generate_jobscript(&job);
        assert!(script.contains("#SBATCH --mem=16G\n"));
        assert!(script.contains("#SBATCH -n 2\n"));
        assert!(script.contains("#SBATCH --time=00-00:30:00\n"));
        assert!(script.contains("qchem -slurm -nt 2 \"he.in\" \"he.out\""));
        assert_eq!(
            overrides.sbatch_args(),
            vec!["--time=00:30:00", "--partition", "dev"]
        );
    }

    #[test]
    fn test_missing_input_file() {
        let err = prepare_job(
            Path::new("no/such/input.in"),
            &settings(),
            Path::new("qchem"),
            &CommandLineOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QsendError::FileNotFound { .. }));
    }
}

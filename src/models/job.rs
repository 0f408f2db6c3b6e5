//! # 作业描述
//!
//! 一个 Q-Chem 输入文件对应一个 `JobDescriptor`：资源字段、作业名、
//! 邮件通知设置和 Q-Chem 启动脚本路径。由提取器和命令行覆盖修改，
//! 由 `utils/slurm.rs` 渲染一次后丢弃。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `utils/slurm.rs`, `commands/submit.rs` 使用
//! - 使用 `models/resource.rs`

use super::resource::ResourceSet;
use std::path::{Path, PathBuf};

/// 单个作业的全部信息
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    /// 作业名（输入文件名去掉 `.in`）
    pub job_name: String,

    /// 输入文件路径去掉 `.in`，用于作业脚本中的文件名
    pub infile: String,

    /// 通知邮箱
    pub mail: Option<String>,

    /// 通知事件，如 `END`, `FAIL`
    pub mail_types: Vec<String>,

    /// Q-Chem 启动脚本
    pub launcher: PathBuf,

    pub resources: ResourceSet,
}

impl JobDescriptor {
    pub fn new(input: &Path, launcher: impl Into<PathBuf>) -> Self {
        let stem = input_stem(input);
        let job_name = stem
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "job".to_string());

        JobDescriptor {
            job_name,
            infile: stem.display().to_string(),
            mail: None,
            mail_types: Vec::new(),
            launcher: launcher.into(),
            resources: ResourceSet::new(),
        }
    }

    /// 设置邮件通知；空地址视为未设置
    pub fn with_mail(mut self, mail: Option<&str>, mail_types: &[String]) -> Self {
        self.mail = mail
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        self.mail_types = mail_types.to_vec();
        self
    }
}

/// 去掉 `.in` 扩展名后的路径
pub fn input_stem(input: &Path) -> PathBuf {
    if is_qchem_input(input) {
        input.with_extension("")
    } else {
        input.to_path_buf()
    }
}

/// 作业脚本路径：`foo.in` -> `foo.sh`，其他扩展名直接追加 `.sh`
pub fn script_path(input: &Path) -> PathBuf {
    if is_qchem_input(input) {
        input.with_extension("sh")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".sh");
        PathBuf::from(name)
    }
}

fn is_qchem_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("in"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_name_from_input() {
        let job = JobDescriptor::new(Path::new("calcs/water.in"), "/opt/qchem/6.1");
        assert_eq!(job.job_name, "water");
        assert_eq!(job.infile, Path::new("calcs/water").display().to_string());
    }

    #[test]
    fn test_script_path() {
        assert_eq!(script_path(Path::new("a/b.in")), PathBuf::from("a/b.sh"));
        assert_eq!(script_path(Path::new("b.inp")), PathBuf::from("b.inp.sh"));
        assert_eq!(script_path(Path::new("b")), PathBuf::from("b.sh"));
    }

    #[test]
    fn test_blank_mail_is_unset() {
        let job = JobDescriptor::new(Path::new("x.in"), "qchem").with_mail(Some("  "), &[]);
        assert!(job.mail.is_none());
    }
}

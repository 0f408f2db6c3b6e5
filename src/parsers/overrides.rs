//! # 命令行覆盖
//!
//! 命令行上的资源请求总是最后写入，占据最高权威度的槽位。
//! 来源有两种：
//! - 显式参数 `--mem`, `--scratch`, `--time`, `--ncpus`
//! - 原样转发给 sbatch 的 `-l` 字符串，其中能识别的选项同时写入资源字段
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/submit.rs` 使用
//! - 使用 `models/resource.rs`

use crate::models::{Origin, ResourceSet};

/// 显式的命令行资源覆盖
#[derive(Debug, Clone, Default)]
pub struct CommandLineOverrides {
    pub mem: Option<String>,
    pub scratch: Option<String>,
    pub time: Option<String>,
    pub ncpus: Option<u32>,
    /// 原样转发给 sbatch 的选项
    pub raw: Vec<String>,
}

impl CommandLineOverrides {
    /// 写入资源字段：先处理 `-l` 字符串，再处理显式参数
    pub fn apply(&self, resources: &mut ResourceSet) {
        for raw in &self.raw {
            apply_sbatch_options(raw, resources);
        }

        if let Some(ref mem) = self.mem {
            resources.set_memory_text(Origin::CommandLine, mem);
        }
        if let Some(ref scratch) = self.scratch {
            resources.set_scratch_text(Origin::CommandLine, scratch);
        }
        if let Some(ref time) = self.time {
            resources.set_walltime_text(Origin::CommandLine, time);
        }
        if let Some(n) = self.ncpus {
            resources.set_ncpus(Origin::CommandLine, n);
        }
    }

    /// 转发给 sbatch 的参数列表（按空白拆分）
    pub fn sbatch_args(&self) -> Vec<String> {
        self.raw
            .iter()
            .flat_map(|r| r.split_whitespace())
            .map(str::to_string)
            .collect()
    }
}

/// 识别一段 sbatch 选项中的资源请求
///
/// 支持 `--opt=value` 与 `--opt value` 两种写法；无法识别的选项只转发不解析。
pub fn apply_sbatch_options(raw: &str, resources: &mut ResourceSet) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        let (opt, inline) = match tokens[i].split_once('=') {
            Some((o, v)) if o.starts_with('-') => (o, Some(v)),
            _ => (tokens[i], None),
        };

        if !is_resource_option(opt) {
            i += 1;
            continue;
        }

        let value = match inline {
            Some(v) => v,
            None => match tokens.get(i + 1) {
                Some(v) => {
                    i += 1;
                    *v
                }
                None => break,
            },
        };
        i += 1;

        match opt {
            "--mem" => {
                resources.set_memory_text(Origin::CommandLine, &with_default_unit(value, "m"))
            }
            "--time" | "-t" => resources.set_walltime_text(Origin::CommandLine, value),
            "--ntasks" | "-n" => resources.set_ncpus_text(Origin::CommandLine, value),
            "--gres" => {
                for gres in value.split(',') {
                    if let Some(size) = gres.strip_prefix("scratch:") {
                        let size = with_default_unit(size, "g");
                        resources.set_scratch_text(Origin::CommandLine, &size);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_resource_option(opt: &str) -> bool {
    matches!(opt, "--mem" | "--time" | "-t" | "--ntasks" | "-n" | "--gres")
}

/// sbatch 对不带单位的数字使用默认单位（`--mem` 为 MB，scratch gres 为 GB）
fn with_default_unit(value: &str, unit: &str) -> String {
    if value.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{}{}", value, unit)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbatch_options() {
        let mut res = ResourceSet::new();
        apply_sbatch_options(
            "--mem=16G -t 2-00:00:00 --partition long -n 4 --gres=scratch:50",
            &mut res,
        );

        assert_eq!(res.memory_directive().as_deref(), Some("16G"));
        assert_eq!(res.walltime_directive().as_deref(), Some("02-00:00:00"));
        assert_eq!(res.ncpus.effective(), Some(&4));
        assert_eq!(res.scratch_directive().as_deref(), Some("50"));
        assert_eq!(res.memory.origin(), Some(Origin::CommandLine));
    }

    #[test]
    fn test_command_line_beats_file_sources() {
        let mut res = ResourceSet::new();
        res.set_memory_text(Origin::ConfigBlock, "4gb");
        res.set_memory_text(Origin::Annotation, "8gb");

        let overrides = CommandLineOverrides {
            mem: Some("16gb".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut res);

        assert_eq!(res.memory_directive().as_deref(), Some("16G"));
    }

    #[test]
    fn test_explicit_flag_wins_over_raw() {
        let mut res = ResourceSet::new();
        let overrides = CommandLineOverrides {
            ncpus: Some(8),
            raw: vec!["-n 2".to_string()],
            ..Default::default()
        };
        overrides.apply(&mut res);

        assert_eq!(res.ncpus.effective(), Some(&8));
    }

    #[test]
    fn test_sbatch_args_split() {
        let overrides = CommandLineOverrides {
            raw: vec!["--partition long".to_string(), "--qos=high".to_string()],
            ..Default::default()
        };
        assert_eq!(
            overrides.sbatch_args(),
            vec!["--partition", "long", "--qos=high"]
        );
    }

    #[test]
    fn test_sbatch_default_units() {
        let mut res = ResourceSet::new();
        apply_sbatch_options("--mem=16000 --gres=scratch:50G", &mut res);

        assert_eq!(res.memory_directive().as_deref(), Some("16000M"));
        assert_eq!(res.scratch_directive().as_deref(), Some("50"));
        assert!(res.warnings().is_empty());

        let mut res = ResourceSet::new();
        apply_sbatch_options("--mem 2048 --gres=gpu:1,scratch:1t", &mut res);

        assert_eq!(res.memory_directive().as_deref(), Some("2G"));
        assert_eq!(res.scratch_directive().as_deref(), Some("1024"));
    }

    #[test]
    fn test_dangling_option_is_ignored() {
        let mut res = ResourceSet::new();
        apply_sbatch_options("--mem", &mut res);
        assert!(!res.memory.is_set());
    }
}

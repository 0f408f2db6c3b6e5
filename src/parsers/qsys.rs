//! # qsys 注释行提取器
//!
//! 输入文件中任意位置含有 `qsys`（大小写不敏感）的行都被视为调度提示。
//!
//! ## 格式说明
//! ```text
//! ! qsys walltime = 1-00:00:00
//! ! qsys mem 16gb
//! ! qsys scratch=100g
//! ! qsys ncpus 16
//! ```
//!
//! | 字段      | 关键字                   |
//! |-----------|--------------------------|
//! | walltime  | walltime, wt, time       |
//! | memory    | memory, mem              |
//! | scratch   | scratch                  |
//! | cpu count | threads, ncpus           |
//!
//! 同一字段出现多次时，文件中最后一行生效。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `regex` 匹配标记
//! - 使用 `models/resource.rs`

use crate::error::ResolveWarning;
use crate::models::{Origin, ResourceKind, ResourceSet};
use regex::Regex;
use std::sync::OnceLock;

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)qsys").expect("qsys marker pattern"))
}

/// 关键字对应的资源种类
fn keyword_kind(key: &str) -> Option<ResourceKind> {
    match key {
        "walltime" | "wt" | "time" => Some(ResourceKind::WallTime),
        "memory" | "mem" => Some(ResourceKind::Memory),
        "scratch" => Some(ResourceKind::Scratch),
        "threads" | "ncpus" => Some(ResourceKind::CpuCount),
        _ => None,
    }
}

/// 扫描所有 qsys 行，填充资源字段
pub fn extract_qsys_content(content: &str, resources: &mut ResourceSet) {
    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;

        // 取最后一个标记之后的部分
        let Some(m) = marker().find_iter(line).last() else {
            continue;
        };
        let rest = line[m.end()..].to_lowercase().replace('=', " ");
        let tokens: Vec<&str> = rest.split_whitespace().collect();

        let &[key, value] = &tokens[..] else {
            resources.warn(ResolveWarning::MalformedAnnotation {
                line_no,
                line: line.trim().to_string(),
            });
            continue;
        };

        match keyword_kind(key) {
            Some(ResourceKind::WallTime) => resources.set_walltime_text(Origin::Annotation, value),
            Some(ResourceKind::Memory) => resources.set_memory_text(Origin::Annotation, value),
            Some(ResourceKind::Scratch) => resources.set_scratch_text(Origin::Annotation, value),
            Some(ResourceKind::CpuCount) => resources.set_ncpus_text(Origin::Annotation, value),
            None => resources.warn(ResolveWarning::UnknownKeyword {
                line_no,
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_fields() {
        let content = r#"
! QSYS walltime = 1-00:00:00
! qsys mem 16gb
! qsys scratch=100g
! Qsys ncpus 16
$rem
method hf
$end
"#;
        let mut res = ResourceSet::new();
        extract_qsys_content(content, &mut res);

        assert_eq!(res.walltime_directive().as_deref(), Some("01-00:00:00"));
        assert_eq!(res.memory_directive().as_deref(), Some("16G"));
        assert_eq!(res.scratch_directive().as_deref(), Some("100"));
        assert_eq!(res.ncpus.effective(), Some(&16));
        assert!(res.warnings().is_empty());
    }

    #[test]
    fn test_synonyms() {
        let content = "! qsys wt 02:00:00\n! qsys memory 500mb\n! qsys threads 2\n";
        let mut res = ResourceSet::new();
        extract_qsys_content(content, &mut res);

        assert_eq!(res.walltime_directive().as_deref(), Some("00-02:00:00"));
        assert_eq!(res.memory_directive().as_deref(), Some("500M"));
        assert_eq!(res.ncpus.effective(), Some(&2));
    }

    #[test]
    fn test_wrong_token_count_is_skipped() {
        let content = "! qsys mem\n! qsys mem 4gb extra\n! qsys\n";
        let mut res = ResourceSet::new();
        extract_qsys_content(content, &mut res);

        assert!(!res.memory.is_set());
        let warnings = res.take_warnings();
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings[0],
            ResolveWarning::MalformedAnnotation {
                line_no: 1,
                line: "! qsys mem".to_string(),
            }
        );
    }

    #[test]
    fn test_last_line_wins() {
        let content = "! qsys time 01:00:00\n! qsys walltime 0-03:00:00\n";
        let mut res = ResourceSet::new();
        extract_qsys_content(content, &mut res);

        assert_eq!(res.walltime_directive().as_deref(), Some("00-03:00:00"));
    }

    #[test]
    fn test_unknown_keyword() {
        let mut res = ResourceSet::new();
        extract_qsys_content("! qsys queue long\n", &mut res);

        assert_eq!(
            res.warnings(),
            &[ResolveWarning::UnknownKeyword {
                line_no: 1,
                key: "queue".to_string(),
            }]
        );
    }
}

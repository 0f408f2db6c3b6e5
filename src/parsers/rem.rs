//! # Q-Chem `$rem` 块提取器
//!
//! 从 `$rem` ... `$end` 块中读取与资源有关的关键字。
//!
//! ## 格式说明
//! ```text
//! $rem
//!    method      b3lyp
//!    threads     8
//!    mem_total = 2000      ! 单位固定为 MB
//! $end
//! ```
//!
//! `mem_total` 额外加 5% 余量作为运行时开销。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/resource.rs`

use crate::error::ResolveWarning;
use crate::models::{Origin, ResourceKind, ResourceSet};

const REM_OPEN: &str = "$rem";
const REM_CLOSE: &str = "$end";

/// `mem_total` 的余量，百分比
const MEM_TOTAL_MARGIN_PERCENT: u64 = 105;

/// 扫描输入内容中的 `$rem` 块，填充资源字段
pub fn extract_rem_content(content: &str, resources: &mut ResourceSet) {
    let mut in_rem = false;

    for line in content.lines() {
        let lower = line.to_lowercase();

        if lower.contains(REM_CLOSE) {
            in_rem = false;
        }

        if in_rem {
            apply_rem_line(&lower, resources);
        }

        if lower.contains(REM_OPEN) {
            in_rem = true;
        }
    }
}

fn apply_rem_line(line: &str, resources: &mut ResourceSet) {
    let line = line.replace('=', " ");
    let mut tokens = line.split_whitespace();
    let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
        return;
    };

    match key {
        "threads" => resources.set_ncpus_text(Origin::ConfigBlock, value),
        "mem_total" => match value
            .parse::<u64>()
            .ok()
            .and_then(|mb| mb.checked_mul(MEM_TOTAL_MARGIN_PERCENT))
        {
            Some(scaled) => resources.set_memory_mb(Origin::ConfigBlock, scaled / 100),
            None => resources.warn(ResolveWarning::MalformedNumber {
                field: ResourceKind::Memory,
                value: value.to_string(),
            }),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"
$molecule
0 1
O
H 1 0.96
H 1 0.96 2 104.5
$end

$rem
   METHOD      b3lyp
   BASIS       6-31g*
   THREADS     8
   MEM_TOTAL = 2000
$end
"#;

    #[test]
    fn test_extract_threads_and_mem_total() {
        let mut res = ResourceSet::new();
        extract_rem_content(WATER, &mut res);

        assert_eq!(res.ncpus.effective(), Some(&8));
        assert_eq!(res.memory.effective(), Some(&2100));
        assert_eq!(res.memory.origin(), Some(Origin::ConfigBlock));
        assert!(res.warnings().is_empty());
    }

    #[test]
    fn test_keys_outside_rem_are_ignored() {
        let content = "threads 4\n$rem\nmethod hf\n$end\nmem_total 1000\n";
        let mut res = ResourceSet::new();
        extract_rem_content(content, &mut res);

        assert!(!res.ncpus.is_set());
        assert!(!res.memory.is_set());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let content = "$REM\nthreads 4\nthreads=16\n$END\n";
        let mut res = ResourceSet::new();
        extract_rem_content(content, &mut res);

        assert_eq!(res.ncpus.effective(), Some(&16));
    }

    #[test]
    fn test_bad_mem_total_warns() {
        let content = "$rem\nmem_total lots\n\n$end\n";
        let mut res = ResourceSet::new();
        extract_rem_content(content, &mut res);

        assert!(!res.memory.is_set());
        assert_eq!(res.warnings().len(), 1);
    }

    #[test]
    fn test_oversized_mem_total_warns() {
        let content = "$rem\nmem_total 18446744073709551615\nthreads 2\n$end\n";
        let mut res = ResourceSet::new();
        extract_rem_content(content, &mut res);

        assert!(!res.memory.is_set());
        assert_eq!(res.ncpus.effective(), Some(&2));
        assert_eq!(
            res.take_warnings(),
            vec![ResolveWarning::MalformedNumber {
                field: ResourceKind::Memory,
                value: "18446744073709551615".to_string(),
            }]
        );
    }
}

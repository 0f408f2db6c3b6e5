//! # 单位换算
//!
//! 将自由格式的大小/时长字符串换算成内部单位，并格式化回 sbatch 语法。
//!
//! ## 格式说明
//! ```text
//! 大小:   <number>[m|mb|g|gb|t|tb]    (大小写不敏感，内部统一为 MB)
//! 时长:   [DD-]HH:MM:SS               (溢出部分会被规整，如 90 分钟 -> 1:30:00)
//! ```
//!
//! ## 依赖关系
//! - 被 `models/resource.rs`, `parsers/overrides.rs` 使用
//! - 使用 `chrono` 表示时长

use crate::error::ResolveWarning;
use crate::models::ResourceKind;
use chrono::Duration;
use std::fmt;

const MB_PER_GB: u64 = 1024;
const MB_PER_TB: u64 = 1024 * 1024;
const SECONDS_PER_DAY: i64 = 24 * 3600;

/// 作业 walltime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallTime(Duration);

impl WallTime {
    /// 超出 `chrono::Duration` 表示范围时返回 `None`
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        Duration::try_seconds(seconds).map(WallTime)
    }

    pub fn total_seconds(&self) -> i64 {
        self.0.num_seconds()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_seconds().max(0);
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        write!(
            f,
            "{:02}-{:02}:{:02}:{:02}",
            days,
            rest / 3600,
            (rest % 3600) / 60,
            rest % 60
        )
    }
}

/// 解析带单位的大小字符串，返回整数 MB
///
/// 单位后缀按 `mb/m`, `gb/g`, `tb/t` 的顺序检查；无法识别的后缀返回
/// `UnknownUnit`。小数会按换算后的 MB 截断。
pub fn parse_megabytes(value: &str, field: ResourceKind) -> Result<u64, ResolveWarning> {
    let lower = value.trim().to_lowercase();

    let factor = if lower.ends_with("mb") || lower.ends_with('m') {
        1
    } else if lower.ends_with("gb") || lower.ends_with('g') {
        MB_PER_GB
    } else if lower.ends_with("tb") || lower.ends_with('t') {
        MB_PER_TB
    } else {
        return Err(ResolveWarning::UnknownUnit {
            field,
            value: value.to_string(),
        });
    };

    let number = leading_number(&lower).ok_or_else(|| ResolveWarning::MalformedNumber {
        field,
        value: value.to_string(),
    })?;

    Ok(number.to_megabytes(factor))
}

/// 解析非负整数（CPU 数等）
pub fn parse_count(value: &str, field: ResourceKind) -> Result<u32, ResolveWarning> {
    value
        .trim()
        .parse()
        .map_err(|_| ResolveWarning::MalformedNumber {
            field,
            value: value.to_string(),
        })
}

/// 解析 `[DD-]HH:MM:SS` 形式的时长
///
/// 天数段无法解析时按 0 处理；时、分、秒可以溢出，最终统一折算。
pub fn parse_walltime(value: &str) -> Result<WallTime, ResolveWarning> {
    let malformed = || ResolveWarning::MalformedWalltime {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (days, clock) = match trimmed.split_once('-') {
        Some((d, rest)) => (d.trim().parse::<i64>().unwrap_or(0), rest),
        None => (0, trimmed),
    };

    let parts: Vec<i64> = clock
        .split(':')
        .map(|p| p.trim().parse::<i64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| malformed())?;

    let &[hours, minutes, seconds] = &parts[..] else {
        return Err(malformed());
    };
    if hours < 0 || minutes < 0 || seconds < 0 {
        return Err(malformed());
    }

    days.checked_mul(SECONDS_PER_DAY)
        .zip(hours.checked_mul(3600))
        .zip(minutes.checked_mul(60))
        .and_then(|((d, h), m)| d.checked_add(h)?.checked_add(m)?.checked_add(seconds))
        .and_then(WallTime::from_seconds)
        .ok_or_else(malformed)
}

/// 以最大的整单位格式化内存：`<N>T`, `<N>G` 或 `<N>M`
pub fn format_memory(mb: u64) -> String {
    if mb == 0 {
        "0M".to_string()
    } else if mb % MB_PER_TB == 0 {
        format!("{}T", mb / MB_PER_TB)
    } else if mb % MB_PER_GB == 0 {
        format!("{}G", mb / MB_PER_GB)
    } else {
        format!("{}M", mb)
    }
}

/// scratch 以整 GB 表示，向上取整
pub fn format_scratch(mb: u64) -> String {
    mb.div_ceil(MB_PER_GB).to_string()
}

/// 字符串开头的数字部分
enum Number {
    Int(u64),
    Float(f64),
}

impl Number {
    fn to_megabytes(&self, factor: u64) -> u64 {
        match *self {
            Number::Int(n) => n.saturating_mul(factor),
            Number::Float(x) => (x * factor as f64) as u64,
        }
    }
}

/// 取最长的 "数字 + 至多一个小数点" 前缀
fn leading_number(s: &str) -> Option<Number> {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    let body = &s[..end];
    if !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if seen_dot {
        body.parse().ok().map(Number::Float)
    } else {
        body.parse().ok().map(Number::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(s: &str) -> u64 {
        parse_megabytes(s, ResourceKind::Memory).unwrap()
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(mb("500m"), 500);
        assert_eq!(mb("500MB"), 500);
        assert_eq!(mb("2g"), 2048);
        assert_eq!(mb("2gb"), 2048);
        assert_eq!(mb("1t"), 1048576);
        assert_eq!(mb("1TB"), 1048576);
        assert_eq!(mb("1.5g"), 1536);
        assert_eq!(mb("0.5tb"), 524288);
    }

    #[test]
    fn test_memory_round_trip() {
        let cases = [
            ("m", "M"),
            ("mb", "M"),
            ("g", "G"),
            ("gb", "G"),
            ("t", "T"),
            ("tb", "T"),
        ];
        for n in [1, 3, 1000] {
            for (suffix, unit) in cases {
                let text = format!("{}{}", n, suffix);
                assert_eq!(format_memory(mb(&text)), format!("{}{}", n, unit), "{}", text);
            }
        }

        assert_eq!(format_memory(mb("2048m")), "2G");
        assert_eq!(format_memory(2100), "2100M");
    }

    #[test]
    fn test_unknown_unit() {
        let err = parse_megabytes("100kb", ResourceKind::Memory).unwrap_err();
        assert!(matches!(err, ResolveWarning::UnknownUnit { .. }));

        let err = parse_megabytes("100", ResourceKind::Memory).unwrap_err();
        assert!(matches!(err, ResolveWarning::UnknownUnit { .. }));

        let err = parse_megabytes("gb", ResourceKind::Memory).unwrap_err();
        assert!(matches!(err, ResolveWarning::MalformedNumber { .. }));
    }

    #[test]
    fn test_scratch_rounds_up() {
        assert_eq!(format_scratch(1025), "2");
        assert_eq!(format_scratch(1024), "1");
        assert_eq!(format_scratch(1), "1");
        assert_eq!(format_scratch(0), "0");
    }

    #[test]
    fn test_walltime_normalization() {
        let t = parse_walltime("0-25:70:70").unwrap();
        assert_eq!(t.to_string(), "01-02:11:10");

        let t = parse_walltime("2-00:90:00").unwrap();
        assert_eq!(t.to_string(), "02-01:30:00");
    }

    #[test]
    fn test_walltime_without_days() {
        let t = parse_walltime("12:00:00").unwrap();
        assert_eq!(t.to_string(), "00-12:00:00");

        let t = parse_walltime("48:00:00").unwrap();
        assert_eq!(t.to_string(), "02-00:00:00");
    }

    #[test]
    fn test_walltime_malformed() {
        assert!(parse_walltime("12:00").is_err());
        assert!(parse_walltime("1-ab:00:00").is_err());
        assert!(parse_walltime("").is_err());
    }

    #[test]
    fn test_walltime_out_of_range() {
        assert!(parse_walltime("200000000000000-00:00:00").is_err());
        assert!(parse_walltime("0-9223372036854775807:00:00").is_err());
        assert!(parse_walltime("0-00:00:9223372036854775807").is_err());
        assert!(WallTime::from_seconds(i64::MAX).is_none());
        let t = WallTime::from_seconds(90).map(|t| t.to_string());
        assert_eq!(t.as_deref(), Some("00-00:01:30"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("8", ResourceKind::CpuCount), Ok(8));
        assert!(parse_count("eight", ResourceKind::CpuCount).is_err());
    }
}

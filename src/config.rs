//! # 全局配置
//!
//! 进程级配置：通知邮箱、通知事件、Q-Chem 启动脚本路径。
//! 启动时读取一次，之后只读。
//!
//! ## 配置文件格式 (TOML)
//! ```text
//! [paths]
//! qchem_version = "/opt/qchem/versions/qchem_6.1"
//! qchem_version_dir = "/opt/qchem/versions"
//!
//! [mail]
//! mail = "user@example.org"
//! mail_type = ["END", "FAIL"]
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `serde` + `toml`

use crate::error::{QsendError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件默认位置（相对于 `$HOME`）
const DEFAULT_CONFIG_PATH: &str = ".config/qchem_send_slurm.toml";

/// 全部配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub mail: MailSettings,
}

/// Q-Chem 启动脚本相关路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// 默认启动脚本
    pub qchem_version: Option<PathBuf>,
    /// 启动脚本所在目录，`--version <NAME>` 在此查找
    pub qchem_version_dir: Option<PathBuf>,
}

/// Slurm 邮件通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub mail: Option<String>,
    pub mail_type: Vec<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        MailSettings {
            mail: None,
            mail_type: vec!["END".to_string(), "FAIL".to_string()],
        }
    }
}

impl Settings {
    /// 从 TOML 字符串解析
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| QsendError::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 读取配置文件；文件不存在时返回 `None`
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| QsendError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_toml(&content, path).map(Some)
    }

    /// 写入配置文件，必要时创建父目录
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| QsendError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| QsendError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 解析 `--version` 参数或默认配置得到启动脚本路径
    ///
    /// 查找顺序：直接路径 -> `qchem_version_dir/<name>` -> 配置中的 `qchem_version`
    pub fn resolve_launcher(&self, requested: Option<&str>) -> Result<PathBuf> {
        if let Some(name) = requested {
            let direct = PathBuf::from(name);
            if direct.is_file() {
                return Ok(direct);
            }

            if let Some(ref dir) = self.paths.qchem_version_dir {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }

            return Err(QsendError::LauncherNotFound {
                name: name.to_string(),
            });
        }

        match self.paths.qchem_version {
            Some(ref path) if path.is_file() => Ok(path.clone()),
            Some(ref path) => Err(QsendError::LauncherNotFound {
                name: path.display().to_string(),
            }),
            None => Err(QsendError::LauncherNotFound {
                name: "<unset>".to_string(),
            }),
        }
    }
}

/// 配置文件路径：显式指定优先，否则 `$HOME/.config/qchem_send_slurm.toml`
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }

    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_PATH))
        .ok_or_else(|| {
            QsendError::InvalidArgument(
                "HOME is not set; pass --config to locate the config file".to_string(),
            )
        })
}

//! # config 命令实现
//!
//! 非交互地创建或显示配置文件。
//!
//! ## 依赖关系
//! - 使用 `cli/config.rs` 定义的参数
//! - 使用 `config.rs`, `utils/output.rs`
//! - `load_settings` 被 `commands/submit.rs` 使用

use crate::cli::config::{ConfigArgs, ConfigCommands, InitArgs};
use crate::config::{self, MailSettings, PathSettings, Settings};
use crate::error::{QsendError, Result};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 执行 config 命令
pub fn execute(args: ConfigArgs) -> Result<()> {
    let path = config::config_path(args.config.as_deref())?;

    match args.command {
        ConfigCommands::Init(init) => init_config(&path, init),
        ConfigCommands::Show => show_config(&path),
    }
}

/// 读取配置；文件不存在时给出警告并使用默认值
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let path = config::config_path(explicit)?;

    match Settings::load(&path)? {
        Some(settings) => Ok(settings),
        None => {
            output::print_warning(&format!(
                "No config file found at '{}', using defaults (create one with 'qchem-send config init')",
                path.display()
            ));
            Ok(Settings::default())
        }
    }
}

fn init_config(path: &Path, args: InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        return Err(QsendError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let settings = settings_from_args(&args);

    if let Some(ref dir) = settings.paths.qchem_version_dir {
        if !dir.is_dir() {
            output::print_warning(&format!("{} does not exist!", dir.display()));
        }
    }
    if settings.mail.mail.is_none() {
        output::print_warning("No mail address set, Slurm will not send notifications");
    }

    settings.save(path)?;
    output::print_success(&format!("Config written to '{}'", path.display()));
    Ok(())
}

fn show_config(path: &Path) -> Result<()> {
    output::print_header("qchem-send Configuration");

    let settings = match Settings::load(path)? {
        Some(s) => {
            output::print_info(&format!("Config file: {}", path.display()));
            s
        }
        None => {
            output::print_warning(&format!(
                "No config file at '{}', showing defaults",
                path.display()
            ));
            Settings::default()
        }
    };

    print!("{}", toml::to_string_pretty(&settings)?);
    Ok(())
}

/// 由命令行参数组装配置
fn settings_from_args(args: &InitArgs) -> Settings {
    let mail_type = if args.mail_type.trim().to_uppercase().starts_with("NO") {
        Vec::new()
    } else {
        args.mail_type
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    };

    // 版本脚本可以是目录中的名字，也可以是完整路径
    let qchem_version = args.qchem_version.as_ref().map(|v| {
        let direct = PathBuf::from(v);
        match args.version_dir {
            Some(ref dir) if !direct.is_file() => dir.join(v),
            _ => direct,
        }
    });

    Settings {
        paths: PathSettings {
            qchem_version,
            qchem_version_dir: args.version_dir.clone(),
        },
        mail: MailSettings {
            mail: args.mail.clone().filter(|m| !m.trim().is_empty()),
            mail_type,
        },
    }
}

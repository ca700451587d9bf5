use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

pub const CFG_FILE_NAME: &str = "inkpost.toml";

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe
        .parent()
        .and_then(|dir| dir.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not resolve exe dir"))?;
    let str_path = path.to_string_lossy().replace("${exe_dir}", exe_dir);
    Ok(PathBuf::from(str_path))
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!(
                    "Error opening configuration file {}: {}",
                    cfg_path.display(),
                    e
                ),
            ))
        }
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing configuration file: {}", e),
            ))
        }
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
    };

    Ok(cfg)
}

fn find_config_path() -> Option<PathBuf> {
    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if exe_dir.join(CFG_FILE_NAME).exists() {
                return Some(exe_dir.join(CFG_FILE_NAME));
            }
        }
    }

    if let Ok(cur_dir) = env::current_dir() {
        if cur_dir.join(CFG_FILE_NAME).exists() {
            return Some(cur_dir.join(CFG_FILE_NAME));
        }
    }

    if let Some(cfg_dir) = dirs::config_dir() {
        if cfg_dir.join(CFG_FILE_NAME).exists() {
            return Some(cfg_dir.join(CFG_FILE_NAME));
        }
    }

    None
}

/// Loads the configuration from an explicit path, or searches the exe dir,
/// the working dir and the user config dir, in that order.
pub fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(find_config_path) {
        None => return Err("Could not find inkpost configuration".to_string()),
        Some(x) => x,
    };

    let mut config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => return Err(e.to_string()),
    };

    if let Some(mut log) = config.log {
        let location = log.location.unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(env::temp_dir)
                .join("inkpost")
                .join("log")
                .join("server.log")
        });
        log.location = Some(location);
        config.log = Some(log);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG_SRC: &str = r##"
[site]
title = "My Blog"
description = "A blog about things"

[paths]
posts_dir = "data/posts"
template_dir = "${exe_dir}/templates"
public_dir = "public"

[server]
address = "127.0.0.1"
port = 8080

[log]
level = "Info"
log_to_console = true
"##;

    #[test]
    fn test_parse_config() {
        let cfg: Config = toml::from_str(CFG_SRC).unwrap();
        assert_eq!(cfg.site.title, "My Blog");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("data/posts"));
        assert!(cfg.log.is_some());
    }

    #[test]
    fn test_exe_dir_expansion() {
        let path = parse_path(PathBuf::from("${exe_dir}/templates")).unwrap();
        assert!(!path.to_string_lossy().contains("${exe_dir}"));
        assert!(path.ends_with("templates"));
    }

    #[test]
    fn test_plain_path_untouched() {
        let path = parse_path(PathBuf::from("data/posts")).unwrap();
        assert_eq!(path, PathBuf::from("data/posts"));
    }
}

//! Startup paths derived from the resolved global flags and the environment

use std::path::{Path, PathBuf};

use log::debug;

/// Environment variable overriding the work path when no flag sets it
pub const ENV_WORK_DIR: &str = "GANTRY_WORK_DIR";
/// Environment variable overriding the custom path when no flag sets it
pub const ENV_CUSTOM: &str = "GANTRY_CUSTOM";

const DEFAULT_CUSTOM_DIR: &str = "custom";
const DEFAULT_CONF_FILE: &str = "conf/app.ini";

/// Values of the global path flags, taken from the nearest level that set them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgWorkPathAndCustomConf {
    pub work_path: Option<String>,
    pub custom_path: Option<String>,
    pub custom_conf: Option<String>,
}

/// Absolute paths the application runs with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppPaths {
    pub app_path: PathBuf,
    pub work_path: PathBuf,
    pub custom_path: PathBuf,
    pub custom_conf: PathBuf,
}

/// Join `child` onto `parent` unless it is already absolute
#[must_use]
pub fn resolve_path(parent: &Path, child: &str) -> PathBuf {
    let child = PathBuf::from(child);
    if child.is_relative() {
        parent.join(child)
    } else {
        child
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// Compute the application paths.
///
/// Explicit arguments win over the environment, which wins over the
/// conventional layout next to the binary at `app_path`.
pub fn init_work_path_and_common_config(
    env: &dyn Fn(&str) -> Option<String>,
    app_path: &Path,
    args: &ArgWorkPathAndCustomConf,
) -> AppPaths {
    let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

    let work_path = match args.work_path.clone().or_else(|| lookup(ENV_WORK_DIR)) {
        Some(path) => PathBuf::from(path),
        None => app_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    let work_path = absolute(work_path);

    let custom_path = args
        .custom_path
        .clone()
        .or_else(|| lookup(ENV_CUSTOM))
        .unwrap_or_else(|| DEFAULT_CUSTOM_DIR.to_string());
    let custom_path = resolve_path(&work_path, &custom_path);

    let custom_conf = match &args.custom_conf {
        Some(conf) => resolve_path(&work_path, conf),
        None => custom_path.join(DEFAULT_CONF_FILE),
    };

    let paths = AppPaths {
        app_path: app_path.to_path_buf(),
        work_path,
        custom_path,
        custom_conf,
    };
    debug!("Initialized application paths: {paths:?}");
    paths
}

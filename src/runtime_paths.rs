use std::{env, path::PathBuf};

use crate::{PACKAGED_ROOT_DIR_NAME, ROOT_DIR_ENV};

pub fn default_packaged_root_dir() -> Option<PathBuf> {
    resolve_packaged_root_dir(env::var(ROOT_DIR_ENV).ok().as_deref(), home::home_dir())
}

pub(crate) fn resolve_packaged_root_dir(
    root_override: Option<&str>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(root) = root_override.map(str::trim).filter(|root| !root.is_empty()) {
        return Some(PathBuf::from(root));
    }

    home_dir.map(|home| home.join(PACKAGED_ROOT_DIR_NAME))
}

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "devtask.yaml";
pub const GOPATH_DIR: &str = "go";
pub const GOPATH_BIN: &str = "bin";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `$HOME/go`, the Go toolchain's own default for an unset `GOPATH`.
pub fn default_gopath() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(GOPATH_DIR))
}

pub fn gopath_bin(gopath: &Path) -> PathBuf {
    gopath.join(GOPATH_BIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_dir_is_under_gopath() {
        assert_eq!(
            gopath_bin(Path::new("/opt/go")),
            PathBuf::from("/opt/go/bin")
        );
    }

    #[test]
    fn config_lives_at_root() {
        assert_eq!(
            config_path(Path::new("/work/svc")),
            PathBuf::from("/work/svc/devtask.yaml")
        );
    }
}

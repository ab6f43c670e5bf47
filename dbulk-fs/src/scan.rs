use dbulk_model::Config;

use crate::disk::{is_not_found, DiskInterface};
use crate::error::FatalError;

/// Lists every name directly under `srcpkgs/`, for the no-targets-given CLI
/// case of no targets named on the command line. Order is whatever the directory iteration
/// yields; callers that need determinism should sort.
pub fn scan_all_packages(
    config: &Config,
    disk: &impl DiskInterface,
) -> Result<Vec<String>, FatalError> {
    let path = config.srcpkgs_dir();
    match disk.read_dir_names(&path) {
        Ok(mut names) => {
            names.sort();
            Ok(names)
        }
        Err(e) if is_not_found(&e) => Ok(Vec::new()),
        Err(e) => Err(FatalError { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::SystemDisk;
    use std::{fs, path::PathBuf};

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            distdir: dir.to_path_buf(),
            maxjobs: 1,
            dryrun: false,
            explain: false,
            tool_mode: None,
            tool: PathBuf::from("xbps-src"),
        }
    }

    #[test]
    fn lists_every_entry_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let srcpkgs = tmp.path().join("srcpkgs");
        fs::create_dir_all(srcpkgs.join("zeta")).unwrap();
        fs::create_dir_all(srcpkgs.join("alpha")).unwrap();

        let config = config_in(tmp.path());
        let names = scan_all_packages(&config, &SystemDisk).unwrap();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn missing_srcpkgs_dir_is_an_empty_list() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let names = scan_all_packages(&config, &SystemDisk).unwrap();
        assert!(names.is_empty());
    }
}

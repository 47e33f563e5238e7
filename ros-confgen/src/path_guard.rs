use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an `-o` target that is the topology being read.
pub fn guard_output(output: &Path, topology: &Path) -> Result<()> {
    let target = resolve(output)?;
    let source = resolve(topology)?;
    if target == source {
        bail!(
            "refusing to overwrite topology file: output {} matches input {}",
            output.display(),
            topology.display()
        );
    }
    Ok(())
}

/// Absolute form of `path`. A missing file is resolved through its parent
/// directory so `dir/../topology.toml` still compares equal.
fn resolve(path: &Path) -> Result<PathBuf> {
    if let Ok(real) = path.canonicalize() {
        return Ok(real);
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().context("cannot read the working directory")?,
    };
    let parent = parent.canonicalize().unwrap_or(parent);
    match path.file_name() {
        Some(name) => Ok(parent.join(name)),
        None => Ok(parent),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::guard_output;

    #[test]
    fn topology_path_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let topology = dir.path().join("topology.toml");
        fs::write(&topology, "").expect("write");

        let err = guard_output(&topology, &topology).expect_err("same path");
        assert!(err.to_string().contains("refusing to overwrite"));

        let roundabout = dir.path().join("sub").join("..").join("topology.toml");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        assert!(guard_output(&roundabout, &topology).is_err());
    }

    #[test]
    fn fresh_output_is_allowed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let topology = dir.path().join("topology.toml");
        fs::write(&topology, "").expect("write");
        assert!(guard_output(&dir.path().join("router.rsc"), &topology).is_ok());
    }
}

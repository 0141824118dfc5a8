use anyhow::Context;
use nginx_map_patcher::{PatchOptions, PatchReport, patch_text};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads `path`, strips its map blocks and inserts the upgrade map.
///
/// The file is only written after the whole transformation succeeded, so an
/// error leaves it untouched. With `dry_run` nothing is written at all.
pub fn apply_patch(path: &Path, options: &PatchOptions, dry_run: bool) -> anyhow::Result<PatchReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let report = patch_text(&content, options)
        .with_context(|| format!("failed to patch {}", path.display()))?;

    for block in &report.removed {
        if block.terminated {
            info!(
                "Removed map block at lines {}-{}: {}",
                block.start_line, block.end_line, block.header
            );
        } else {
            warn!(
                "Map block at line {} is never closed, dropped the rest of the file (through line {})",
                block.start_line, block.end_line
            );
        }
    }
    debug!("Inserted upgrade map after line {}", report.inserted_after_line);

    if dry_run {
        info!("Dry run, {} left unchanged", path.display());
        return Ok(report);
    }

    fs::write(path, &report.text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nginx_map_patcher::{PatchError, UPGRADE_MAP_BLOCK};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn conf(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn rewrites_file_in_place() {
        let file = conf("map $bad $x {\n  1 2;\n}\nhttp {\n}\n");
        apply_patch(file.path(), &PatchOptions::default(), false).unwrap();
        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, format!("http {{\n{UPGRADE_MAP_BLOCK}\n}}\n"));
    }

    #[test]
    fn second_run_changes_nothing() {
        let file = conf("http {\n    server { listen 80; }\n}\n");
        apply_patch(file.path(), &PatchOptions::default(), false).unwrap();
        let once = fs::read_to_string(file.path()).unwrap();
        apply_patch(file.path(), &PatchOptions::default(), false).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), once);
    }

    #[test]
    fn missing_http_leaves_file_untouched() {
        let original = "events {\n}\nmap $a $b {\n}\n";
        let file = conf(original);
        let err = apply_patch(file.path(), &PatchOptions::default(), false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PatchError>(),
            Some(&PatchError::MissingHttpBlock)
        );
        assert_eq!(fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn strict_failure_leaves_file_untouched() {
        let original = "http {\n    map $a $b {\n        1 2;\n";
        let file = conf(original);
        let options = PatchOptions { strict: true };
        assert!(apply_patch(file.path(), &options, false).is_err());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn dry_run_does_not_write() {
        let original = "http {\n}\n";
        let file = conf(original);
        let report = apply_patch(file.path(), &PatchOptions::default(), true).unwrap();
        assert!(report.text.contains(UPGRADE_MAP_BLOCK));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = apply_patch(&dir.path().join("nginx.conf"), &PatchOptions::default(), false)
            .unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}

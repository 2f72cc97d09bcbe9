//! Library artifact collection
//!
//! Scans a package tree for files shaped like platform library artifacts and
//! reports their logical names (`libfoo.a` -> `foo`). Firmware packages
//! normally contain none, so the collected list is usually empty.

use std::io;
use std::path::Path;
use tokio::fs;

/// Collect logical library names found anywhere under `root`, sorted and
/// deduplicated.
///
/// # Errors
///
/// Returns the underlying I/O error when the tree cannot be enumerated.
pub async fn collect_libs(root: &Path) -> io::Result<Vec<String>> {
    let mut libs = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(name) = logical_lib_name(file_name) {
                libs.push(name);
            }
        }
    }

    libs.sort();
    libs.dedup();
    Ok(libs)
}

/// Logical name for a library-shaped file name, or `None` for anything else
fn logical_lib_name(file_name: &str) -> Option<String> {
    if let Some(rest) = file_name.strip_prefix("lib") {
        if let Some(name) = rest.strip_suffix(".a") {
            return non_empty(name);
        }
        if let Some(name) = rest.strip_suffix(".dylib") {
            return non_empty(name);
        }
        // libfoo.so and versioned libfoo.so.1.2
        if let Some(pos) = rest.find(".so") {
            let (name, tail) = rest.split_at(pos);
            if tail == ".so" || tail.starts_with(".so.") {
                return non_empty(name);
            }
        }
    }
    if let Some(name) = file_name.strip_suffix(".dll") {
        return non_empty(name);
    }
    if let Some(name) = file_name.strip_suffix(".lib") {
        return non_empty(name);
    }
    None
}

fn non_empty(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_names() {
        assert_eq!(logical_lib_name("libpnc.a").as_deref(), Some("pnc"));
        assert_eq!(logical_lib_name("libpnc.so").as_deref(), Some("pnc"));
        assert_eq!(logical_lib_name("libpnc.so.5.1").as_deref(), Some("pnc"));
        assert_eq!(logical_lib_name("libpnc.dylib").as_deref(), Some("pnc"));
        assert_eq!(logical_lib_name("pnc.dll").as_deref(), Some("pnc"));
        assert_eq!(logical_lib_name("pnc.lib").as_deref(), Some("pnc"));
    }

    #[test]
    fn test_firmware_artifacts_are_not_libraries() {
        assert_eq!(logical_lib_name("provencore.bin"), None);
        assert_eq!(logical_lib_name("bl2.bin"), None);
        assert_eq!(logical_lib_name("fip.bin"), None);
        assert_eq!(logical_lib_name("lib.a"), None);
        assert_eq!(logical_lib_name("library.notes"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directories_are_not_traversed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/libpnc.a"), b"").unwrap();
        // A link back at the root must not send the scan into a cycle.
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

        let libs = collect_libs(dir.path()).await.unwrap();
        assert_eq!(libs, vec!["pnc".to_string()]);
    }

    #[tokio::test]
    async fn test_collect_is_sorted_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("libzz.a"), b"").unwrap();
        std::fs::write(dir.path().join("libaa.so"), b"").unwrap();
        std::fs::write(dir.path().join("sub/libaa.so.1"), b"").unwrap();

        let libs = collect_libs(dir.path()).await.unwrap();
        assert_eq!(libs, vec!["aa".to_string(), "zz".to_string()]);
    }
}

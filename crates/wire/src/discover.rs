//! Controller discovery: a recursive walk that invokes a hook for
//! matching files.
//!
//! Two behaviors are part of the contract:
//! - a file matches only when the marker appears past the first
//!   character of its name, so a name that starts with the marker is
//!   skipped;
//! - nested directory walks never see the caller's `params`; only the
//!   top-level call passes them through.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

/// Walk `dir` and invoke `hook(path, params)` for every matching file.
///
/// The hook is the invocable unit; loading code from the matched files
/// is up to the caller.
pub fn discover<F>(
    dir: &Path,
    marker: &str,
    params: Option<&Value>,
    hook: &mut F,
) -> io::Result<()>
where
    F: FnMut(&Path, Option<&Value>),
{
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            discover(&path, marker, None, hook)?;
        } else if marker_matches(&entry.file_name().to_string_lossy(), marker) {
            hook(&path, params);
        }
    }
    Ok(())
}

fn marker_matches(name: &str, marker: &str) -> bool {
    name.find(marker).map_or(false, |at| at > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn invokes_hook_for_marked_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("user.controller.js"));
        touch(&dir.path().join("readme.md"));

        let mut seen = Vec::new();
        discover(dir.path(), ".controller", None, &mut |path, _| {
            seen.push(path.to_path_buf());
        })
        .unwrap();

        assert_eq!(seen.len(), 1);
        assert!(seen[0].ends_with("user.controller.js"));
    }

    #[test]
    fn marker_at_position_zero_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".controller.js"));
        touch(&dir.path().join("a.controller.js"));

        let mut seen = 0;
        discover(dir.path(), ".controller", None, &mut |_, _| seen += 1).unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn nested_walks_drop_params() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("top.controller.js"));
        touch(&dir.path().join("nested").join("deep.controller.js"));

        let params = json!({"app": true});
        let mut received = Vec::new();
        discover(dir.path(), ".controller", Some(&params), &mut |path, params| {
            received.push((path.to_path_buf(), params.cloned()));
        })
        .unwrap();

        received.sort_by_key(|(path, _)| path.clone());
        assert_eq!(received.len(), 2);
        let (deep, deep_params) = &received[0];
        assert!(deep.ends_with("deep.controller.js"));
        assert!(deep_params.is_none());
        let (top, top_params) = &received[1];
        assert!(top.ends_with("top.controller.js"));
        assert_eq!(top_params.as_ref(), Some(&params));
    }

    #[test]
    fn missing_directory_propagates_io_error() {
        let mut hits = 0;
        let result = discover(
            Path::new("/definitely/not/here"),
            ".controller",
            None,
            &mut |_, _| hits += 1,
        );
        assert!(result.is_err());
        assert_eq!(hits, 0);
    }
}

//! Path containment for the resource store.
//!
//! A resource name arrives percent-encoded from the request target. It is
//! decoded, joined onto the storage root and lexically cleaned. The result is
//! accepted only if it sits strictly below the root **and** the decoded name
//! has no `..` segment. Both checks always run.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::store::error::StoreError;

/// Strictly percent-decodes a resource name.
///
/// Fails on a `%` not followed by two hex digits, on bytes that are not
/// UTF-8 once decoded, and on embedded NUL. `+` is left alone.
pub fn decode_name(raw: &str) -> Result<String, StoreError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(StoreError::InvalidEncoding(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| StoreError::InvalidEncoding(raw.to_string()))?;

    if decoded.contains('\0') {
        return Err(StoreError::InvalidEncoding(raw.to_string()));
    }

    Ok(decoded.into_owned())
}

/// Lexically normalizes a path: drops `.` and folds `..` into its parent.
/// Never touches the filesystem, so symlinks are not followed.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
        }
    }
    out
}

/// True if any `/`- or `\`-separated segment of `name` is exactly `..`.
pub fn has_parent_segment(name: &str) -> bool {
    name.split(['/', '\\']).any(|segment| segment == "..")
}

/// Resolves a raw (still encoded) name against `root`.
///
/// `root` must already be absolute and cleaned.
pub fn resolve(root: &Path, raw_name: &str) -> Result<PathBuf, StoreError> {
    let name = decode_name(raw_name)?;
    let target = clean(&root.join(&name));

    let contained = target.starts_with(root) && target != root;
    if !contained || has_parent_segment(&name) {
        return Err(StoreError::Forbidden(name));
    }

    Ok(target)
}

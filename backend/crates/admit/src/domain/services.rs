//! Domain Services
//!
//! Pure logic for name normalization and storage path authorization.
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Joins a family/clan name to a personal name (U+00B7 MIDDLE DOT)
pub const NAME_SEPARATOR: char = '·';

/// Keep only the part of `name` before the first [`NAME_SEPARATOR`].
///
/// A name starting with the separator normalizes to `""`.
pub fn normalize_name(name: &str) -> &str {
    match name.find(NAME_SEPARATOR) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Resolve `.` and `..` without consulting the filesystem.
///
/// `..` removes the preceding normal component; at the start of a relative
/// path it is kept, directly under the root it is dropped.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }
    components.into_iter().collect()
}

/// Authorize `requested` against the storage root.
///
/// Returns the normalized path when it names an entry strictly below `root`
/// (component-wise, so `<root>Evil/x` does not match), `None` otherwise.
pub fn authorize_path(root: &Path, requested: &Path) -> Option<PathBuf> {
    if requested.as_os_str().as_encoded_bytes().contains(&0) {
        return None;
    }

    let root = lexical_normalize(root);
    if root.as_os_str().is_empty() {
        return None;
    }

    let normalized = lexical_normalize(requested);
    let rest = normalized.strip_prefix(&root).ok()?;
    if rest.as_os_str().is_empty()
        || !rest
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    Some(normalized)
}

//! Where uploaded and enhanced images live under the static root.
//!
//! Files are stored as `<root>/uploads/<name>` and
//! `<root>/enhanced/enhanced_<name>`; the evaluation state references them
//! relative to the root with forward slashes.

use std::path::{Path, PathBuf};

pub const UPLOADS_DIR: &str = "uploads";
pub const ENHANCED_DIR: &str = "enhanced";
pub const ENHANCED_PREFIX: &str = "enhanced_";

#[derive(Debug, Clone)]
pub struct StaticLayout {
    root: PathBuf,
}

impl StaticLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }

    pub fn enhanced_dir(&self) -> PathBuf {
        self.root.join(ENHANCED_DIR)
    }

    pub fn upload_path(&self, storage_name: &str) -> PathBuf {
        self.uploads_dir().join(storage_name)
    }

    pub fn enhanced_path(&self, storage_name: &str) -> PathBuf {
        self.enhanced_dir().join(enhanced_name(storage_name))
    }

    /// Reference stored in the evaluation state for an upload.
    pub fn upload_ref(storage_name: &str) -> String {
        format!("{UPLOADS_DIR}/{storage_name}")
    }

    /// Reference stored in the evaluation state for an enhanced image.
    pub fn enhanced_ref(storage_name: &str) -> String {
        format!("{ENHANCED_DIR}/{}", enhanced_name(storage_name))
    }
}

fn enhanced_name(storage_name: &str) -> String {
    format!("{ENHANCED_PREFIX}{storage_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_refs_agree() {
        let layout = StaticLayout::new("/srv/static");
        assert_eq!(layout.upload_path("t_smile.png"), PathBuf::from("/srv/static/uploads/t_smile.png"));
        assert_eq!(
            layout.enhanced_path("t_smile.png"),
            PathBuf::from("/srv/static/enhanced/enhanced_t_smile.png")
        );
        assert_eq!(StaticLayout::upload_ref("t_smile.png"), "uploads/t_smile.png");
        assert_eq!(StaticLayout::enhanced_ref("t_smile.png"), "enhanced/enhanced_t_smile.png");
    }
}

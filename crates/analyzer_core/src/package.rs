use std::path::PathBuf;

/// Content type a package must declare to be accepted for upload.
pub const PACKAGE_CONTENT_TYPE: &str = "application/gzip";

const PACKAGE_CONTENT_TYPE_ALIASES: &[&str] = &[PACKAGE_CONTENT_TYPE, "application/x-gzip"];

/// A file offered by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub name: String,
    pub path: PathBuf,
    /// Declared by the front end; the bytes are never sniffed.
    pub content_type: Option<String>,
}

impl PackageFile {
    pub fn new(path: impl Into<PathBuf>, content_type: Option<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            content_type,
        }
    }

    pub fn is_package(&self) -> bool {
        let Some(content_type) = self.content_type.as_deref() else {
            return false;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        PACKAGE_CONTENT_TYPE_ALIASES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(essence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_gzip_variants_only() {
        let ok = PackageFile::new("pkg.tgz", Some("application/gzip".into()));
        assert!(ok.is_package());
        assert_eq!(ok.name, "pkg.tgz");
        assert!(PackageFile::new("a.tgz", Some("Application/X-Gzip; q=1".into())).is_package());
        assert!(!PackageFile::new("a.zip", Some("application/zip".into())).is_package());
        assert!(!PackageFile::new("a.tgz", None).is_package());
    }
}

//! Asset kinds and their file extensions

use std::fmt;
use std::path::Path;

/// The file types a specification's asset map may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Comma-separated table with a header row
    Csv,
    /// Markdown text
    Markdown,
    /// Arbitrary JSON document
    Json,
    /// Bincode-encoded application object
    Object,
}

impl AssetKind {
    /// Expected file extension (without dot)
    #[inline]
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Object => "bin",
        }
    }

    /// Check whether `path` carries this kind's extension (case-insensitive)
    #[must_use]
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_extension() {
        assert!(AssetKind::Csv.matches(Path::new("data.csv")));
        assert!(AssetKind::Csv.matches(Path::new("/a/b/DATA.CSV")));
        assert!(!AssetKind::Csv.matches(Path::new("data.txt")));
        assert!(!AssetKind::Csv.matches(Path::new("csv")));
        assert!(AssetKind::Markdown.matches(Path::new("intro.Md")));
        assert!(AssetKind::Object.matches(Path::new("model.bin")));
    }

    #[test]
    fn display_is_extension() {
        assert_eq!(AssetKind::Json.to_string(), "json");
    }
}

// certgen: locating and loading TrueType fonts

use crate::config::{FontChoice, FONT_SEARCH_DIRS, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::error::CertError;
use ab_glyph::{FontArc, PxScale};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Resolver
// ============================================================================

/// Hidden files and directories are not searched.
const SEARCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Finds a font file by name, falling back to a recursive search of a list of
/// root directories.
#[derive(Debug, Clone)]
pub struct FontResolver {
    roots: Vec<PathBuf>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::with_roots(FONT_SEARCH_DIRS)
    }
}

impl FontResolver {
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve `font_file_name` to a usable path.
    ///
    /// An existing file is returned as an absolute path. Otherwise the first
    /// file below one of the roots whose name contains the requested stem
    /// (case-insensitive, the part before the first `.`) wins. When nothing
    /// matches, the input comes back unchanged and loading it will fail later.
    pub fn resolve(&self, font_file_name: &str) -> String {
        let direct = Path::new(font_file_name);
        if direct.is_file() {
            return absolute(direct).to_string_lossy().into_owned();
        }

        let stem = font_file_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if stem.is_empty() {
            return font_file_name.to_string();
        }

        for root in &self.roots {
            let pattern = format!("{}/**/*.*", glob::Pattern::escape(&root.to_string_lossy()));
            let Ok(entries) = glob::glob_with(&pattern, SEARCH_OPTIONS) else {
                continue;
            };
            for path in entries.flatten() {
                let name_matches = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase().contains(&stem))
                    .unwrap_or(false);
                if name_matches && path.is_file() {
                    return path.to_string_lossy().into_owned();
                }
            }
        }

        debug!("No font file matching '{}' in search roots", stem);
        font_file_name.to_string()
    }
}

fn absolute(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve a font file name against the standard search directories.
pub fn resolve_font_path(font_file_name: &str) -> String {
    FontResolver::default().resolve(font_file_name)
}

// ============================================================================
// Loading
// ============================================================================

pub fn load_font(path: &str) -> Result<FontArc, CertError> {
    let bytes = std::fs::read(path).map_err(|e| CertError::FontLoad(format!("{}: {}", path, e)))?;
    FontArc::try_from_vec(bytes).map_err(|e| CertError::FontLoad(format!("{}: {}", path, e)))
}

/// Where the font comes from: one of the enumerated families or an explicit file
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Choice(FontChoice),
    File(PathBuf),
}

/// Font family plus pixel size, resolved to a concrete font on every render
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub source: FontSource,
    pub size: u32,
}

/// A parsed font ready for drawing
#[derive(Clone)]
pub struct LoadedFont {
    pub font: FontArc,
    pub scale: PxScale,
    pub path: String,
}

impl FontSpec {
    pub fn new(source: FontSource, size: u32) -> Self {
        Self { source, size }
    }

    pub fn file_name(&self) -> String {
        match &self.source {
            FontSource::Choice(choice) => choice.file_name().to_string(),
            FontSource::File(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn load(&self) -> Result<LoadedFont, CertError> {
        self.load_with(&FontResolver::default())
    }

    pub fn load_with(&self, resolver: &FontResolver) -> Result<LoadedFont, CertError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.size) {
            return Err(CertError::FontLoad(format!(
                "size {} outside {}..={}",
                self.size, MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }

        let requested = self.file_name();
        let path = resolver.resolve(&requested);
        let font = load_font(&path)?;
        info!("Using font {} for {} ({}px)", path, requested, self.size);

        Ok(LoadedFont {
            font,
            scale: PxScale::from(self.size as f32),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BUNDLED_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fonts/DejaVuSans.ttf");

    #[test]
    fn test_existing_file_resolves_to_absolute_path() {
        let resolver = FontResolver::with_roots(Vec::<PathBuf>::new());
        let resolved = resolver.resolve(BUNDLED_FONT);
        assert!(Path::new(&resolved).is_absolute());
        assert!(resolved.ends_with("DejaVuSans.ttf"));
    }

    #[test]
    fn test_missing_font_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FontResolver::with_roots([dir.path()]);
        assert_eq!(resolver.resolve("Nonexistent.ttf"), "Nonexistent.ttf");
    }

    #[test]
    fn test_search_matches_stem_case_insensitively_in_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("deco");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("gabriola-regular.TTF"), b"not really a font").unwrap();

        let resolver = FontResolver::with_roots([dir.path()]);
        let resolved = resolver.resolve("Gabriola.ttf");
        assert!(resolved.ends_with("gabriola-regular.TTF"), "got {}", resolved);
    }

    #[test]
    fn test_roots_are_searched_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("javatext.ttf"), b"a").unwrap();
        fs::write(second.path().join("javatext.ttf"), b"b").unwrap();

        let resolver = FontResolver::with_roots([second.path(), first.path()]);
        let resolved = resolver.resolve("javatext.ttf");
        assert!(resolved.starts_with(&*second.path().to_string_lossy()));
    }

    #[test]
    fn test_hidden_files_and_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".cache");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("gabriola.ttf"), b"cached").unwrap();
        fs::write(dir.path().join(".gabriola.ttf"), b"dotfile").unwrap();

        let resolver = FontResolver::with_roots([dir.path()]);
        assert_eq!(resolver.resolve("Gabriola.ttf"), "Gabriola.ttf");

        fs::write(dir.path().join("Gabriola.ttf"), b"visible").unwrap();
        let resolved = resolver.resolve("gabriola.otf");
        assert!(resolved.ends_with("Gabriola.ttf") && !resolved.contains(".cache"), "got {}", resolved);
    }

    #[test]
    fn test_directories_do_not_count_as_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("georgiai.d")).unwrap();
        let resolver = FontResolver::with_roots([dir.path()]);
        assert_eq!(resolver.resolve("georgiai.ttf"), "georgiai.ttf");
    }

    #[test]
    fn test_empty_stem_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("anything.ttf"), b"x").unwrap();
        let resolver = FontResolver::with_roots([dir.path()]);
        assert_eq!(resolver.resolve(".ttf"), ".ttf");
    }

    #[test]
    fn test_load_bundled_font() {
        let spec = FontSpec::new(FontSource::File(PathBuf::from(BUNDLED_FONT)), 48);
        let loaded = spec.load_with(&FontResolver::with_roots(Vec::<PathBuf>::new())).unwrap();
        assert_eq!(loaded.scale, PxScale::from(48.0));
    }

    #[test]
    fn test_unresolved_font_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let spec = FontSpec::new(FontSource::Choice(FontChoice::BodoniPoster), 60);
        let err = spec.load_with(&FontResolver::with_roots([dir.path()])).err().unwrap();
        assert!(matches!(err, CertError::FontLoad(_)));
    }

    #[test]
    fn test_non_font_match_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("INFROMAN.txt"), b"plain text").unwrap();
        let spec = FontSpec::new(FontSource::Choice(FontChoice::Infroman), 60);
        let err = spec.load_with(&FontResolver::with_roots([dir.path()])).err().unwrap();
        assert!(matches!(err, CertError::FontLoad(_)));
    }

    #[test]
    fn test_size_out_of_range_is_rejected() {
        let spec = FontSpec::new(FontSource::File(PathBuf::from(BUNDLED_FONT)), 5);
        assert!(matches!(spec.load(), Err(CertError::FontLoad(_))));
    }
}

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Somewhere configuration variables can be read from.
pub trait ReadEnv {
    /// Returns the value if the key is defined, even when it is empty.
    fn var(&self, key: &str) -> Option<String>;
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ReadEnv for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                tracing::warn!("{} is not valid unicode, ignoring it", key);
                None
            }
        }
    }
}

/// Variables parsed out of a `.env` file. The process environment is left untouched.
#[derive(Debug, Clone, Default)]
pub struct DotenvFile {
    pub path: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl DotenvFile {
    /// Looks for `.env` in the working directory and its parents.
    pub fn discover() -> Result<Option<Self>> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        Self::discover_from(cwd)
    }

    /// The nearest `.env` in `dir` or one of its ancestors wins.
    pub fn discover_from(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let found = dir
            .as_ref()
            .ancestors()
            .map(|ancestor| ancestor.join(".env"))
            .find(|candidate| candidate.is_file());

        match found {
            Some(path) => Self::from_path(path),
            None => {
                tracing::debug!("no .env file found above {}", dir.as_ref().display());
                Ok(None)
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        match dotenvy::from_path_iter(path) {
            Ok(iter) => {
                let vars = iter
                    .collect::<Result<HashMap<_, _>, _>>()
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                tracing::debug!("loaded {} variables from {}", vars.len(), path.display());
                Ok(Some(Self {
                    path: Some(path.to_path_buf()),
                    vars,
                }))
            }
            Err(e) if e.not_found() => {
                tracing::warn!("{} does not exist, skipping", path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

impl ReadEnv for DotenvFile {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl ReadEnv for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: ReadEnv + ?Sized> ReadEnv for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

impl<T: ReadEnv> ReadEnv for Option<T> {
    fn var(&self, key: &str) -> Option<String> {
        self.as_ref().and_then(|source| source.var(key))
    }
}

/// `primary` shadows `fallback` for every key it defines.
#[derive(Debug, Clone)]
pub struct Layered<A, B> {
    pub primary: A,
    pub fallback: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: ReadEnv, B: ReadEnv> ReadEnv for Layered<A, B> {
    fn var(&self, key: &str) -> Option<String> {
        self.primary.var(key).or_else(|| self.fallback.var(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_layered_primary_wins() {
        let layered = Layered::new(map(&[("KEY", "process")]), map(&[("KEY", "file")]));
        assert_eq!(layered.var("KEY").as_deref(), Some("process"));
    }

    #[test]
    fn test_layered_empty_primary_still_shadows() {
        let layered = Layered::new(map(&[("KEY", "")]), map(&[("KEY", "file")]));
        assert_eq!(layered.var("KEY").as_deref(), Some(""));
    }

    #[test]
    fn test_layered_falls_through() {
        let layered = Layered::new(map(&[]), map(&[("KEY", "file")]));
        assert_eq!(layered.var("KEY").as_deref(), Some("file"));
        assert_eq!(layered.var("OTHER"), None);
    }

    #[test]
    fn test_none_source_is_empty() {
        let source: Option<HashMap<String, String>> = None;
        assert_eq!(source.var("KEY"), None);
    }

    #[test]
    fn test_process_env_missing_key() {
        assert_eq!(ProcessEnv.var("GOOGLE_OAUTH_CONFIG_SURELY_UNSET_KEY"), None);
    }

    #[test]
    fn test_dotenv_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "GOOGLE_CLIENT_ID=abc.apps.googleusercontent.com").unwrap();
        writeln!(file, "EMPTY=").unwrap();

        let dotenv = DotenvFile::from_path(file.path()).unwrap().unwrap();
        assert_eq!(
            dotenv.var("GOOGLE_CLIENT_ID").as_deref(),
            Some("abc.apps.googleusercontent.com")
        );
        assert_eq!(dotenv.var("EMPTY").as_deref(), Some(""));
        assert_eq!(dotenv.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_dotenv_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = DotenvFile::from_path(dir.path().join(".env")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_discover_finds_nearest_ancestor() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("app").join("src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".env"), "GOOGLE_CLIENT_ID=outer\n").unwrap();
        std::fs::write(root.path().join("app").join(".env"), "GOOGLE_CLIENT_ID=inner\n").unwrap();

        let dotenv = DotenvFile::discover_from(&nested).unwrap().unwrap();
        assert_eq!(dotenv.var("GOOGLE_CLIENT_ID").as_deref(), Some("inner"));
        assert_eq!(dotenv.path, Some(root.path().join("app").join(".env")));
    }

    #[test]
    fn test_discover_malformed_file_errors() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(".env"), "GOOGLE_CLIENT_ID='unterminated\n").unwrap();

        assert!(DotenvFile::discover_from(root.path()).is_err());
    }

    #[test]
    fn test_dotenv_malformed_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GOOGLE_CLIENT_ID='unterminated").unwrap();

        assert!(DotenvFile::from_path(file.path()).is_err());
    }
}

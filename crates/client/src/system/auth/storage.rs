use std::path::{Path, PathBuf};

/// Файл с токеном сессии (аналог localStorage для консольного клиента)
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save token, creating parent directories
    pub fn save(&self, token: &str) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, token.trim())?;
        Ok(())
    }

    /// Get token; missing or empty file means no session
    pub fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    /// Clear token; a missing file is not an error
    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session").join("token"));
        assert_eq!(store.load(), None);

        store.save("eyJhbGciOi\n").unwrap();
        assert!(store.path().starts_with(dir.path()));
        assert_eq!(store.load().as_deref(), Some("eyJhbGciOi"));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }
}

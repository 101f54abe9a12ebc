//! Where the bearer token lives between runs.
use std::fs;
use std::io;
use std::path::PathBuf;

const TOKEN_FILENAME: &str = "token";

pub trait CredentialStore {
    /// Returns the stored token, `None` if the user isn't logged in.
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

pub type BoxedCredentialStore = Box<dyn CredentialStore + Send + Sync + 'static>;

/// Keeps the token in a plain file under the storage path.
pub struct FileCredentialStore {
    storage_path: String,
}

impl FileCredentialStore {
    pub fn new(storage_path: &str) -> Self {
        Self {
            storage_path: storage_path.to_string(),
        }
    }

    fn token_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_path).join(TOKEN_FILENAME)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(self.token_path()) {
            Ok(token) => {
                let token = token.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.token_path()) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// A token fixed at construction. Useful for tests and for passing a
/// token straight from the environment.
pub struct StaticCredentialStore(Option<String>);

impl StaticCredentialStore {
    pub fn new(token: Option<&str>) -> Self {
        Self(token.map(String::from))
    }
}

impl CredentialStore for StaticCredentialStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.0.clone())
    }

    fn save(&self, _token: &str) -> io::Result<()> {
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        Ok(())
    }
}

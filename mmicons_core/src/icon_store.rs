use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use log::{debug, info};
use crate::icon_set::IconSet;

const ICON_EXTENSION: &str = "png";

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    PermissionDenied(PathBuf),
    InvalidName(String),
    Io { path: PathBuf, detail: String },
}

impl Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::PermissionDenied(path) => write!(f, "permission denied: {}", path.display()),
            StoreError::InvalidName(name) => write!(f, "'{}' cannot be used as a file name", name),
            StoreError::Io { path, detail } => write!(f, "could not write {}: {}", path.display(), detail),
        }
    }
}

impl StoreError {
    fn from_io(path: &Path, error: std::io::Error) -> StoreError {
        if error.kind() == ErrorKind::PermissionDenied {
            StoreError::PermissionDenied(path.to_path_buf())
        } else {
            StoreError::Io { path: path.to_path_buf(), detail: error.to_string() }
        }
    }
}

/// Writes generated icons as `<name>.png` files into one directory.
#[derive(Debug, Clone)]
pub struct IconStore {
    dir: PathBuf,
}

impl IconStore {
    pub fn new(dir: impl Into<PathBuf>) -> IconStore {
        IconStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Nothing is written unless the directory is usable and every name maps to a valid file.
    pub fn save(&self, icons: &IconSet) -> Result<Vec<PathBuf>, StoreError> {
        self.prepare_dir()?;

        let mut taken = HashSet::new();
        let mut targets = Vec::with_capacity(icons.len());

        for icon in icons.iter() {
            let stem = icon.name.file_stem()
                .ok_or_else(|| StoreError::InvalidName(icon.name.to_string()))?;

            targets.push((self.dir.join(IconStore::unique_file_name(&stem, &mut taken)), &icon.bytes));
        }

        let mut written = Vec::with_capacity(targets.len());

        for (path, bytes) in targets {
            debug!("writing icon to: {} ...", path.display());
            fs::write(&path, bytes).map_err(|e| StoreError::from_io(&path, e))?;
            written.push(path);
        }

        info!("{} icon(s) saved to {}", written.len(), self.dir.display());
        Ok(written)
    }

    /// Names that sanitize to the same stem (or differ only by case) get a `-2`, `-3` ... suffix.
    fn unique_file_name(stem: &str, taken: &mut HashSet<String>) -> String {
        let mut file_name = format!("{}.{}", stem, ICON_EXTENSION);
        let mut counter = 2;

        while !taken.insert(file_name.to_lowercase()) {
            debug!("'{}' already used, trying suffix {}", file_name, counter);
            file_name = format!("{}-{}.{}", stem, counter, ICON_EXTENSION);
            counter += 1;
        }

        file_name
    }

    fn prepare_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::from_io(&self.dir, e))?;

        let metadata = fs::metadata(&self.dir).map_err(|e| StoreError::from_io(&self.dir, e))?;

        if !metadata.is_dir() {
            return Err(StoreError::Io { path: self.dir.clone(), detail: "not a directory".to_string() });
        }

        if metadata.permissions().readonly() {
            return Err(StoreError::PermissionDenied(self.dir.clone()));
        }

        Ok(())
    }
}

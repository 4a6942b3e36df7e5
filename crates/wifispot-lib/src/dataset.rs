use std::env;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::catalog::SpotCatalog;
use crate::config::{build_client, ServiceEndpoints};
use crate::error::{Error, Result};

/// Default filename for the cached dataset.
const DATASET_FILENAME: &str = "nyc_wifi_data.csv";
const DATA_DIR_ENV: &str = "WIFISPOT_DATA_DIR";
const DATASET_SOURCE_ENV: &str = "WIFISPOT_DATASET_SOURCE";

/// Where a missing dataset is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Download over HTTP(S).
    Url(String),
    /// Copy from a local file (used by tests and offline setups).
    File(PathBuf),
}

impl DatasetSource {
    /// Resolve the source from `WIFISPOT_DATASET_SOURCE`, falling back to the
    /// configured dataset URL.
    pub fn from_env(endpoints: &ServiceEndpoints) -> Self {
        match env::var_os(DATASET_SOURCE_ENV) {
            Some(path) if !path.is_empty() => DatasetSource::File(PathBuf::from(path)),
            _ => DatasetSource::Url(endpoints.dataset_url.clone()),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => write!(f, "{}", url),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "wifispot", "wifispot").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Ensure the dataset is available locally and return its path.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `WIFISPOT_DATA_DIR` environment variable.
/// 3. XDG/Platform-specific project directories.
///
/// An existing directory, or a path without an extension, gets the default
/// filename appended. An existing file is
/// used as-is; otherwise it is fetched once from `source`.
pub fn ensure_dataset(target: Option<&Path>, source: &DatasetSource) -> Result<PathBuf> {
    if let Some(explicit) = target {
        let resolved = canonical_dataset_path(explicit);
        return ensure_or_fetch(&resolved, source);
    }

    if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        let resolved = canonical_dataset_path(Path::new(&env_path));
        return ensure_or_fetch(&resolved, source);
    }

    let default = default_dataset_path()?;
    ensure_or_fetch(&default, source)
}

/// Load and parse the dataset at `path`.
pub fn load_catalog(path: &Path) -> Result<SpotCatalog> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading WiFi spot dataset");
    let file = File::open(path)?;
    SpotCatalog::from_reader(BufReader::new(file))
}

fn ensure_or_fetch(path: &Path, source: &DatasetSource) -> Result<PathBuf> {
    if path.exists() {
        debug!(path = %path.display(), "using cached dataset");
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    info!(source = %source, "fetching dataset to {}", path.display());
    match source {
        DatasetSource::File(local) => copy_file_atomic(local, path)?,
        DatasetSource::Url(url) => {
            let client = build_client()?;
            download_to_path(&client, url, path)?;
        }
    }
    Ok(path.to_path_buf())
}

fn canonical_dataset_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(DATASET_FILENAME);
    }
    if path.extension().is_some() {
        return path.to_path_buf();
    }

    path.join(DATASET_FILENAME)
}

fn download_to_path(client: &Client, url: &str, destination: &Path) -> Result<()> {
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    let mut response = client.get(url).send()?.error_for_status()?;
    io::copy(&mut response, tmp.as_file_mut())?;
    tmp.flush()?;
    tmp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

fn copy_file_atomic(source: &Path, destination: &Path) -> Result<()> {
    if source == destination {
        return Ok(());
    }
    if !source.exists() {
        warn!(source = %source.display(), "dataset source override does not exist");
        return Err(Error::DatasetNotFound {
            path: source.to_path_buf(),
        });
    }

    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut reader = File::open(source)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    io::copy(&mut reader, tmp.as_file_mut())?;
    tmp.flush()?;
    tmp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

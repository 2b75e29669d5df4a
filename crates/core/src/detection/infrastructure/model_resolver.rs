use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{MODEL_BASE_URL_ENV, MODEL_DIR_ENV};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file {name} not found in {searched:?}")]
    NotFound { name: String, searched: Vec<PathBuf> },
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Resolve a model or vocabulary file by name.
///
/// Resolution order:
/// 1. Explicit directory (e.g. from a `--model-dir` flag)
/// 2. `LIPREAD_MODEL_DIR` environment variable
/// 3. User cache directory (platform-specific)
/// 4. Download from `LIPREAD_MODEL_BASE_URL` into the cache, when set
pub fn resolve(name: &str, explicit_dir: Option<&Path>) -> Result<PathBuf, ModelResolveError> {
    let mut searched = Vec::new();

    if let Some(dir) = explicit_dir {
        let path = dir.join(name);
        if path.exists() {
            return Ok(path);
        }
        searched.push(path);
    }

    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        let path = PathBuf::from(dir).join(name);
        if path.exists() {
            return Ok(path);
        }
        searched.push(path);
    }

    let cache_dir = model_cache_dir()?;
    let cached = cache_dir.join(name);
    if cached.exists() {
        return Ok(cached);
    }
    searched.push(cached.clone());

    if let Ok(base) = std::env::var(MODEL_BASE_URL_ENV) {
        let url = format!("{}/{}", base.trim_end_matches('/'), name);
        fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
        download(&url, &cached)?;
        return Ok(cached);
    }

    Err(ModelResolveError::NotFound {
        name: name.to_string(),
        searched,
    })
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/lipread/models/`
/// - Linux: `$XDG_CACHE_HOME/lipread/models/` or `~/.cache/lipread/models/`
/// - Windows: `%LOCALAPPDATA%/lipread/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("lipread").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("lipread").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    log::info!("downloading {url} to {}", dest.display());

    let response = reqwest::blocking::get(url).map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;
    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes).map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    file.flush().map_err(|e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

//! Cache-or-fetch loading of the registered datasets.

use crate::{combine, Dataset, Fetcher, PageSource};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use tsprep_common::codec::{read_csv_file, write_csv};
use tsprep_common::{Result, Table};
use tsprep_config::CacheConfig;

/// How [`CacheLoader::load`] treats the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Return the cached file when it exists.
    pub use_cache: bool,
    /// Persist a freshly fetched table to the cache file.
    pub cache_data: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_data: true,
        }
    }
}

impl From<&CacheConfig> for LoadOptions {
    fn from(config: &CacheConfig) -> Self {
        Self {
            use_cache: config.use_cache,
            cache_data: config.cache_data,
        }
    }
}

/// Loads datasets from CSV files in a cache directory, falling back to the
/// API on a miss.
///
/// There is no locking. Two loads of the same missing dataset both fetch and
/// the last one to finish owns the cache file. Cache files never expire.
#[derive(Debug, Clone)]
pub struct CacheLoader<S> {
    fetcher: Fetcher<S>,
    dir: PathBuf,
}

impl<S: PageSource> CacheLoader<S> {
    /// Creates a loader keeping its files in `dir`.
    pub fn new(fetcher: Fetcher<S>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            dir: dir.into(),
        }
    }

    /// The fetcher used on cache misses.
    pub const fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    /// Path of a dataset's cache file.
    pub fn cache_path(&self, dataset: Dataset) -> PathBuf {
        self.dir.join(dataset.descriptor().file)
    }

    /// Loads the dataset called `name`. Unknown names fail before any I/O.
    pub async fn load(&self, name: &str, options: LoadOptions) -> Result<Table> {
        let dataset: Dataset = name.parse()?;
        self.load_dataset(dataset, options).await
    }

    /// Loads a dataset from its cache file or from the API.
    ///
    /// The cache file is written only after every page has arrived, so a
    /// failed fetch never leaves a partial file behind.
    #[instrument(skip_all, fields(dataset = %dataset))]
    pub async fn load_dataset(&self, dataset: Dataset, options: LoadOptions) -> Result<Table> {
        let path = self.cache_path(dataset);

        if options.use_cache && path.exists() {
            info!(path = %path.display(), "Reading from cache file");
            return read_csv_file(&path);
        }

        info!("Reading from API");
        let table = self.fetcher.fetch_dataset(dataset).await?;

        if options.cache_data {
            write_cache(&table, &path)?;
            debug!(path = %path.display(), rows = table.len(), "Cached dataset");
        }

        Ok(table)
    }

    /// Loads sales, items and stores and joins them into one table.
    pub async fn load_combined(&self, options: LoadOptions) -> Result<Table> {
        let sales = self.load_dataset(Dataset::Sales, options).await?;
        let items = self.load_dataset(Dataset::Items, options).await?;
        let stores = self.load_dataset(Dataset::Stores, options).await?;
        combine(&sales, &items, &stores)
    }
}

/// Writes through a temporary file in the target directory, then renames it
/// over `path`.
fn write_cache(table: &Table, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    write_csv(table, &mut file)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

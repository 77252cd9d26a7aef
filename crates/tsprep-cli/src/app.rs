//! Command dispatch over the acquisition and preparation crates.

use crate::{CliResult, Command, Target};
use std::path::Path;
use tracing::{debug, info};
use tsprep_acquire::{
    get_open_power_systems_data, CacheLoader, Fetcher, HttpSource, LoadOptions, PageSource,
};
use tsprep_common::codec::{write_csv, write_csv_file};
use tsprep_common::Table;
use tsprep_config::Config;
use tsprep_prepare::{prepare, prepare_ops, DistributionPlot};

/// The tsprep application: configuration plus a cache-backed loader.
#[derive(Debug)]
pub struct App<S> {
    config: Config,
    loader: CacheLoader<S>,
}

impl App<HttpSource> {
    /// Creates an application talking to the configured API over HTTP.
    pub fn from_config(config: Config) -> CliResult<Self> {
        let source = HttpSource::from_config(&config.api)?;
        Ok(Self::new(config, source))
    }
}

impl<S: PageSource> App<S> {
    /// Creates an application over an arbitrary transport.
    pub fn new(config: Config, source: S) -> Self {
        let fetcher = Fetcher::new(source, config.api.base_url.clone());
        let loader = CacheLoader::new(fetcher, config.cache.dir.clone());
        Self { config, loader }
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying transport.
    pub const fn source(&self) -> &S {
        self.loader.fetcher().source()
    }

    /// Runs one subcommand to completion.
    pub async fn run(&self, command: &Command) -> CliResult<()> {
        match command {
            Command::Acquire {
                dataset,
                refresh,
                no_store,
            } => {
                let table = self.acquire(dataset, *refresh, *no_store).await?;
                info!(
                    dataset = %dataset,
                    rows = table.len(),
                    columns = table.columns().len(),
                    "Dataset ready"
                );
            }
            Command::Combine { output } => {
                let table = self.combined().await?;
                emit(&table, output.as_deref())?;
            }
            Command::Prepare { target, output } => {
                let table = self.prepared(*target).await?;
                emit(&table, output.as_deref())?;
            }
            Command::Plot { target, output } => {
                let table = self.prepared(*target).await?;
                DistributionPlot::from_config(&self.config.plot).render_to_file(&table, output)?;
            }
        }
        Ok(())
    }

    /// Loads one dataset by name. `refresh` bypasses an existing cache file
    /// and `no_store` skips writing one.
    pub async fn acquire(&self, dataset: &str, refresh: bool, no_store: bool) -> CliResult<Table> {
        let mut options = LoadOptions::from(&self.config.cache);
        if refresh {
            options.use_cache = false;
        }
        if no_store {
            options.cache_data = false;
        }
        Ok(self.loader.load(dataset, options).await?)
    }

    /// The joined sales, items and stores table.
    pub async fn combined(&self) -> CliResult<Table> {
        let options = LoadOptions::from(&self.config.cache);
        Ok(self.loader.load_combined(options).await?)
    }

    /// The prepared series for `target`.
    pub async fn prepared(&self, target: Target) -> CliResult<Table> {
        debug!(?target, "Preparing series");
        let table = match target {
            Target::Sales => prepare(&self.combined().await?)?,
            Target::Ops => {
                let raw =
                    get_open_power_systems_data(self.source(), &self.config.sources.ops_url)
                        .await?;
                prepare_ops(&raw)?
            }
        };
        Ok(table)
    }
}

/// Writes `table` to `output`, or to stdout when no file is given.
fn emit(table: &Table, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            write_csv_file(table, path)?;
            info!(path = %path.display(), rows = table.len(), "Wrote CSV");
        }
        None => write_csv(table, std::io::stdout().lock())?,
    }
    Ok(())
}

use crate::{catalog::SAMPLE_SIZE, client::Client, model::StoreId, notify::Notifications};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: String,
    pub store: StoreId,
    pub stores: Vec<StoreId>,
    pub rental_timeout_secs: u64,
    pub sample_size: usize,
    pub notification_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: Client::DEFAULT_API.to_owned(),
            store: StoreId(1),
            stores: vec![StoreId(1), StoreId(2)],
            rental_timeout_secs: Client::RENTAL_TIMEOUT.as_secs(),
            sample_size: SAMPLE_SIZE,
            notification_secs: Notifications::TTL.as_secs(),
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "rental-store.toml";

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid settings file")
    }

    /// Defaults, then the first settings file found, then the environment.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::read(path)?,
            None => match Self::candidates().into_iter().find(|path| path.is_file()) {
                Some(path) => Self::read(&path)?,
                None => Self::default(),
            },
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        debug!(path = %path.display(), "read settings");
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read settings from `{}`", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("in `{}`", path.display()))
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(Self::FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("rental-store").join("config.toml"));
        }
        paths
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(api) = var("RENTAL_API") {
            self.api = api;
        }
        if let Some(store) = var("RENTAL_STORE") {
            self.store = parse_store(&store).context("in RENTAL_STORE")?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, api: Option<String>, store: Option<u32>) {
        if let Some(api) = api {
            self.api = api;
        }
        if let Some(store) = store {
            self.store = StoreId(store);
        }
    }

    /// Validates the merged settings; the initial store is always selectable.
    pub fn finish(mut self) -> anyhow::Result<Self> {
        if self.api.trim().is_empty() {
            bail!("api url cannot be empty");
        }
        if self.store.0 == 0 || self.stores.iter().any(|store| store.0 == 0) {
            bail!("store ids must be positive");
        }
        if self.rental_timeout_secs == 0 {
            bail!("rental_timeout_secs must be positive");
        }
        if !self.stores.contains(&self.store) {
            self.stores.push(self.store);
        }
        self.stores.sort_unstable();
        self.stores.dedup();
        Ok(self)
    }

    pub const fn rental_timeout(&self) -> Duration {
        Duration::from_secs(self.rental_timeout_secs)
    }

    pub const fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

fn parse_store(raw: &str) -> anyhow::Result<StoreId> {
    let id: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("store id `{raw}` is not a number"))?;
    Ok(StoreId(id))
}

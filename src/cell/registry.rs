use crate::cell::{CellProvider, GRID5K_TYPE, Grid5k, MEMORY_TYPE, MemoryProvider};
use crate::config::ProviderConfig;
use crate::error::{AtlasError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a provider from its configuration. Named providers built earlier
/// are available through `providers`.
pub type InitFn = fn(&ProviderConfig, &Providers) -> Result<Arc<dyn CellProvider>>;

/// Provider type name to init function.
///
/// Owned by the application and passed to whatever needs to build providers.
#[derive(Default)]
pub struct Registry {
    inits: HashMap<String, InitFn>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `memory` and `grid5k` types.
    pub fn with_builtin() -> Self {
        let mut inits: HashMap<String, InitFn> = HashMap::new();
        inits.insert(MEMORY_TYPE.to_string(), MemoryProvider::from_config);
        inits.insert(GRID5K_TYPE.to_string(), Grid5k::from_config);
        Self { inits }
    }

    pub fn register(&mut self, kind: &str, init: InitFn) -> Result<()> {
        if self.inits.contains_key(kind) {
            return Err(AtlasError::ProviderTypeExists(kind.to_string()));
        }
        debug!(kind, "registering provider type");
        self.inits.insert(kind.to_string(), init);
        Ok(())
    }

    /// Registered type names, sorted.
    pub fn registered(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.inits.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Builds one provider of `config.kind`.
    pub fn build(
        &self,
        config: &ProviderConfig,
        providers: &Providers,
    ) -> Result<Arc<dyn CellProvider>> {
        if self.inits.is_empty() {
            return Err(AtlasError::NoProvidersRegistered);
        }
        let init = self
            .inits
            .get(&config.kind)
            .ok_or_else(|| AtlasError::ProviderNotRegistered(config.kind.clone()))?;
        info!(name = %config.name, kind = %config.kind, "building provider");
        init(config, providers)
    }

    /// Builds every provider in order. A provider may name any provider listed before it.
    pub fn build_all(&self, configs: &[ProviderConfig]) -> Result<Providers> {
        let mut providers = Providers::default();
        for config in configs {
            if providers.contains(&config.name) {
                return Err(AtlasError::Config(format!(
                    "duplicate provider name ({})",
                    config.name
                )));
            }
            let provider = self.build(config, &providers)?;
            providers.insert(config.name.clone(), provider);
        }
        Ok(providers)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.registered())
            .finish()
    }
}

/// Built providers by name.
#[derive(Clone, Default)]
pub struct Providers {
    by_name: HashMap<String, Arc<dyn CellProvider>>,
}

impl Providers {
    pub fn insert(&mut self, name: impl Into<String>, provider: Arc<dyn CellProvider>) {
        self.by_name.insert(name.into(), provider);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn CellProvider>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| AtlasError::ProviderMissing(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("names", &self.names())
            .finish()
    }
}

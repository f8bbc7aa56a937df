//! A configuration has two states: resolved and unresolved

use crate::dependencies::{AcquisitionError, DependencyResolver, ExternalDependency};
use log::debug;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// A named set of dependencies. Clones share the same configuration.
#[derive(Clone)]
pub struct Configuration {
    inner: Arc<Mutex<ConfigurationInner>>,
}

impl Configuration {
    /// Create a new configuration
    pub(crate) fn new(name: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConfigurationInner {
                name: name.to_string(),
                dependencies: vec![],
                resolved: OnceCell::new(),
            })),
        }
    }

    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    pub fn dependencies(&self) -> Vec<ExternalDependency> {
        self.inner.lock().dependencies.clone()
    }

    /// Add a dependency to this configuration
    ///
    /// # Error
    /// Errors if the configuration was already resolved
    pub fn add_dependency(&self, dependency: ExternalDependency) -> Result<(), ConfigurationError> {
        let mut inner = self.inner.lock();
        if inner.resolved.get().is_some() {
            return Err(ConfigurationError::AlreadyResolved(inner.name.clone()));
        }
        if !inner.dependencies.contains(&dependency) {
            inner.dependencies.push(dependency);
        }
        Ok(())
    }

    /// Gets the resolved form of this configuration.
    ///
    /// If the configuration hasn't been resolved yet, resolves it at this point.
    pub fn resolve(
        &self,
        resolver: &dyn DependencyResolver,
    ) -> Result<ResolvedConfiguration, AcquisitionError> {
        let inner = self.inner.lock();
        inner
            .resolved
            .get_or_try_init(|| {
                let mut files = vec![];
                for dependency in &inner.dependencies {
                    debug!("resolving {} for {}", dependency, inner);
                    files.extend(resolver.resolve(dependency)?);
                }
                Ok(ResolvedConfiguration { files })
            })
            .map(|res| res.clone())
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct(&inner.to_string())
            .field("dependencies", &inner.dependencies)
            .finish()
    }
}

struct ConfigurationInner {
    name: String,
    dependencies: Vec<ExternalDependency>,
    resolved: OnceCell<ResolvedConfiguration>,
}

impl Display for ConfigurationInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration {:?}", self.name)
    }
}

/// The files a configuration resolved to
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    files: Vec<PathBuf>,
}

impl ResolvedConfiguration {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// The configurations of a project
#[derive(Debug, Default)]
pub struct ConfigurationContainer {
    configurations: BTreeMap<String, Configuration>,
}

impl ConfigurationContainer {
    pub fn contains(&self, name: &str) -> bool {
        self.configurations.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Configuration> {
        self.configurations.get(name).cloned()
    }

    /// Gets the configuration with this name, creating it if it doesn't exist yet
    pub fn maybe_create(&mut self, name: &str) -> Configuration {
        self.configurations
            .entry(name.to_string())
            .or_insert_with(|| Configuration::new(name))
            .clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Configuration {0:?} already resolved")]
    AlreadyResolved(String),
}

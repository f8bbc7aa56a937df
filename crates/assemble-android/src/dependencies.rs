//! Dependencies are artifacts declared by coordinate and resolved into files.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod configurations;

pub use configurations::{Configuration, ConfigurationContainer, ResolvedConfiguration};

/// A dependency on an external artifact, declared as `group:module:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalDependency {
    group: String,
    module: String,
    version: String,
}

impl ExternalDependency {
    pub fn new(group: &str, module: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            module: module.to_string(),
            version: version.to_string(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The path of the artifact's jar within a maven layout repository
    pub fn repository_path(&self) -> PathBuf {
        let mut path: PathBuf = self.group.split('.').collect();
        path.push(&self.module);
        path.push(&self.version);
        path.push(format!("{}-{}.jar", self.module, self.version));
        path
    }
}

impl FromStr for ExternalDependency {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, module, version]
                if !group.is_empty() && !module.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, module, version))
            }
            _ => Err(AcquisitionError::InvalidCoordinate(s.to_string())),
        }
    }
}

impl Display for ExternalDependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

/// Resolves dependencies into files.
pub trait DependencyResolver: Send + Sync {
    fn resolve(&self, dependency: &ExternalDependency) -> Result<Vec<PathBuf>, AcquisitionError>;
}

assert_obj_safe!(DependencyResolver);

impl<F> DependencyResolver for F
where
    F: Fn(&ExternalDependency) -> Result<Vec<PathBuf>, AcquisitionError> + Send + Sync,
{
    fn resolve(&self, dependency: &ExternalDependency) -> Result<Vec<PathBuf>, AcquisitionError> {
        (self)(dependency)
    }
}

/// Resolves dependencies from a maven layout repository on disk.
#[derive(Debug, Clone)]
pub struct MavenLocal {
    root: PathBuf,
}

impl MavenLocal {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The repository in `~/.m2/repository`
    pub fn user_default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".m2").join("repository"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DependencyResolver for MavenLocal {
    fn resolve(&self, dependency: &ExternalDependency) -> Result<Vec<PathBuf>, AcquisitionError> {
        let path = self.root.join(dependency.repository_path());
        if path.is_file() {
            Ok(vec![path])
        } else {
            Err(AcquisitionError::NotFound {
                dependency: dependency.to_string(),
                searched: path,
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Could not find {dependency} (searched {searched:?})")]
    NotFound { dependency: String, searched: PathBuf },
    #[error("Invalid coordinate {0:?}, expected group:module:version")]
    InvalidCoordinate(String),
    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_coordinates() {
        let dep: ExternalDependency = "org.scala-lang:scala-compiler:2.11.7".parse().unwrap();
        assert_eq!(dep.group(), "org.scala-lang");
        assert_eq!(dep.module(), "scala-compiler");
        assert_eq!(dep.version(), "2.11.7");
        assert_eq!(dep.to_string(), "org.scala-lang:scala-compiler:2.11.7");
        assert!("org.scala-lang:scala-compiler".parse::<ExternalDependency>().is_err());
        assert!("a::c".parse::<ExternalDependency>().is_err());
    }

    #[test]
    fn maven_local_resolves_jars() {
        let repo = tempdir().unwrap();
        let dep = ExternalDependency::new("com.typesafe.zinc", "zinc", "0.3.7");
        let jar = repo.path().join("com/typesafe/zinc/zinc/0.3.7/zinc-0.3.7.jar");
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        std::fs::write(&jar, b"").unwrap();

        let resolver = MavenLocal::new(repo.path());
        assert_eq!(resolver.resolve(&dep).unwrap(), vec![jar]);

        let missing = ExternalDependency::new("com.typesafe.zinc", "zinc", "0.3.8");
        assert!(matches!(
            resolver.resolve(&missing),
            Err(AcquisitionError::NotFound { .. })
        ));
    }
}

//! Conda package inspection inside a running image.
//!
//! [`PackageHelper`] owns a probe container for its lifetime and lazily
//! collects the installed, requested and available package lists from
//! `mamba`.

pub mod conda;
pub mod imports;

pub use conda::{PackageVersions, UpdatablePackage};
pub use imports::ImportCheck;

use parking_lot::Mutex;
use stacks_tag_core::error::{Result, TagError};

use crate::docker::{ContainerHandle, DockerCli};

/// Package queries against one running container.
pub struct PackageHelper<'a> {
    docker: &'a DockerCli,
    container: ContainerHandle,
    installed: Mutex<Option<PackageVersions>>,
    requested: Mutex<Option<PackageVersions>>,
    available: Mutex<Option<PackageVersions>>,
}

impl<'a> PackageHelper<'a> {
    /// Start a probe container from `image`.
    pub async fn start(docker: &'a DockerCli, image: &str) -> Result<PackageHelper<'a>> {
        tracing::info!(image, "Starting package probe container");
        let container = docker.run_detached(image).await?;
        Ok(Self::with_container(docker, container))
    }

    /// Wrap an already running container.
    pub fn with_container(docker: &'a DockerCli, container: ContainerHandle) -> Self {
        Self {
            docker,
            container,
            installed: Mutex::new(None),
            requested: Mutex::new(None),
            available: Mutex::new(None),
        }
    }

    pub fn container(&self) -> &ContainerHandle {
        &self.container
    }

    /// Stop and remove the probe container.
    pub async fn finish(self) -> Result<()> {
        self.docker.stop_and_remove(&self.container).await
    }

    async fn cached(
        &self,
        cache: &Mutex<Option<PackageVersions>>,
        cmd: &str,
        parse: fn(&str) -> Result<PackageVersions>,
    ) -> Result<PackageVersions> {
        if let Some(packages) = cache.lock().as_ref() {
            return Ok(packages.clone());
        }
        let output = self.docker.exec(&self.container, cmd).await?;
        let packages = parse(&output.stdout)?;
        *cache.lock() = Some(packages.clone());
        Ok(packages)
    }

    /// Every package in the environment, dependencies included.
    pub async fn installed_packages(&self) -> Result<PackageVersions> {
        tracing::info!("Grabbing the list of installed packages");
        self.cached(
            &self.installed,
            "mamba env export --no-build --json",
            conda::parse_env_export,
        )
        .await
    }

    /// Packages explicitly requested with `mamba install`.
    pub async fn requested_packages(&self) -> Result<PackageVersions> {
        tracing::info!("Grabbing the list of manually requested packages");
        self.cached(
            &self.requested,
            "mamba env export --no-build --json --from-history",
            conda::parse_env_export,
        )
        .await
    }

    /// Newer versions published on the configured channels.
    pub async fn available_packages(&self) -> Result<PackageVersions> {
        tracing::info!("Grabbing the list of available packages (can take a while)");
        self.cached(
            &self.available,
            "mamba search --outdated --quiet",
            conda::parse_available,
        )
        .await
    }

    /// Packages with a newer version available.
    pub async fn check_updatable(&self, requested_only: bool) -> Result<Vec<UpdatablePackage>> {
        let requested = self.requested_packages().await?;
        let installed = self.installed_packages().await?;
        let available = self.available_packages().await?;
        Ok(conda::updatable_packages(
            &requested,
            &installed,
            &available,
            requested_only,
        ))
    }

    /// Summary line for a `check_updatable` result.
    pub async fn outdated_summary(
        &self,
        updatable: &[UpdatablePackage],
        requested_only: bool,
    ) -> Result<String> {
        let total = if requested_only {
            self.requested_packages().await?.len()
        } else {
            self.installed_packages().await?.len()
        };
        Ok(conda::outdated_summary(updatable.len(), total))
    }

    /// Import every requested package; failures are collected, not short-circuited.
    pub async fn check_imports(&self) -> Result<Vec<ImportCheck>> {
        let requested = self.requested_packages().await?;
        let checks = imports::import_checks(requested.keys());
        let mut failed = Vec::new();
        for check in &checks {
            tracing::info!(package = %check.package, module = %check.module, "Trying to import");
            match self.docker.exec(&self.container, &check.command()).await {
                Ok(_) => {}
                Err(TagError::CommandFailed { stderr, .. }) => {
                    tracing::error!(package = %check.package, output = %stderr, "Failed to import package");
                    failed.push(check.package.clone());
                }
                Err(e) => return Err(e),
            }
        }
        if !failed.is_empty() {
            return Err(TagError::ImportCheckFailed(failed));
        }
        Ok(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;
    use std::sync::Arc;

    const REQUESTED: &str = r#"{"dependencies": ["numpy", "r-rcurl", "python=3.11", "sympy"]}"#;
    const INSTALLED: &str =
        r#"{"dependencies": ["numpy=1.25.2", "r-rcurl=1.98", "python=3.11.4", "sympy=1.12", "libzlib=1.2.13"]}"#;
    const AVAILABLE: &str = "header\nheader\nnumpy 1.26.0 b c\nlibzlib 1.3 b c\n";

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .stdout("docker run", "feed\n")
            .stdout("docker exec feed sh -c 'mamba env export --no-build --json --from-history'", REQUESTED)
            .stdout("docker exec feed sh -c 'mamba env export --no-build --json'", INSTALLED)
            .stdout("docker exec feed sh -c 'mamba search --outdated --quiet'", AVAILABLE)
    }

    #[tokio::test]
    async fn test_check_updatable_requested_only() {
        let runner = Arc::new(runner());
        let docker = DockerCli::new(runner.clone(), "docker");
        let helper = PackageHelper::start(&docker, "scipy-notebook").await.unwrap();

        let updatable = helper.check_updatable(true).await.unwrap();
        assert_eq!(updatable.len(), 1);
        assert_eq!(updatable[0].package, "numpy");
        assert_eq!(
            helper.outdated_summary(&updatable, true).await.unwrap(),
            "1/4 (25%) packages could be updated"
        );

        let all = helper.check_updatable(false).await.unwrap();
        assert_eq!(all.len(), 2);

        helper.finish().await.unwrap();
        // Each listing is fetched once
        assert_eq!(runner.calls_starting_with("docker exec").len(), 3);
        assert_eq!(runner.calls_starting_with("docker rm feed").len(), 1);
    }

    #[tokio::test]
    async fn test_check_imports_collects_failures() {
        let runner = Arc::new(
            runner()
                .fail("docker exec feed sh -c 'python -c \"import sympy\"'", 1, "ImportError")
                .fail("docker exec feed sh -c 'R --slave -e library(RCurl)'", 1, "no package"),
        );
        let docker = DockerCli::new(runner.clone(), "docker");
        let helper = PackageHelper::start(&docker, "r-notebook").await.unwrap();

        let err = helper.check_imports().await.unwrap_err();
        match err {
            TagError::ImportCheckFailed(failed) => assert_eq!(failed, vec!["r-rcurl", "sympy"]),
            other => panic!("unexpected error: {other}"),
        }
        // numpy, r-rcurl and sympy are checked; python is excluded
        assert_eq!(
            runner
                .calls()
                .iter()
                .filter(|c| c.contains("import ") || c.contains("library("))
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_check_imports_success() {
        let runner = Arc::new(runner());
        let docker = DockerCli::new(runner.clone(), "docker");
        let helper = PackageHelper::start(&docker, "scipy-notebook").await.unwrap();
        let checks = helper.check_imports().await.unwrap();
        assert_eq!(checks.len(), 3);
    }
}

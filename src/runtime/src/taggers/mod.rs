//! Version taggers.
//!
//! A tagger probes one installed tool inside a running container and
//! yields a short tag fragment such as `python-3.11.4`. The set is closed;
//! new probes are added as variants of [`Tagger`].

pub mod versions;

use std::path::Path;

use serde::{Deserialize, Serialize};
use stacks_tag_core::error::{Result, TagError};

use crate::docker::{ContainerHandle, DockerCli};
use crate::git;

/// Everything a tagger may probe: the container and the host checkout.
pub struct TagContext<'a> {
    pub docker: &'a DockerCli,
    pub container: &'a ContainerHandle,
    pub repo_root: &'a Path,
}

/// Known taggers, named after the fragment they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tagger {
    #[serde(rename = "SHATagger")]
    Sha,
    #[serde(rename = "PythonVersionTagger")]
    PythonVersion,
    #[serde(rename = "PythonMajorMinorVersionTagger")]
    PythonMajorMinorVersion,
    #[serde(rename = "JupyterNotebookVersionTagger")]
    JupyterNotebookVersion,
    #[serde(rename = "JupyterLabVersionTagger")]
    JupyterLabVersion,
    #[serde(rename = "JupyterHubVersionTagger")]
    JupyterHubVersion,
    #[serde(rename = "RVersionTagger")]
    RVersion,
    #[serde(rename = "JuliaVersionTagger")]
    JuliaVersion,
    #[serde(rename = "TensorflowVersionTagger")]
    TensorflowVersion,
    #[serde(rename = "PytorchVersionTagger")]
    PytorchVersion,
    #[serde(rename = "SparkVersionTagger")]
    SparkVersion,
    #[serde(rename = "HadoopVersionTagger")]
    HadoopVersion,
    #[serde(rename = "JavaVersionTagger")]
    JavaVersion,
}

impl Tagger {
    pub const ALL: [Tagger; 13] = [
        Tagger::Sha,
        Tagger::PythonVersion,
        Tagger::PythonMajorMinorVersion,
        Tagger::JupyterNotebookVersion,
        Tagger::JupyterLabVersion,
        Tagger::JupyterHubVersion,
        Tagger::RVersion,
        Tagger::JuliaVersion,
        Tagger::TensorflowVersion,
        Tagger::PytorchVersion,
        Tagger::SparkVersion,
        Tagger::HadoopVersion,
        Tagger::JavaVersion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha => "SHATagger",
            Self::PythonVersion => "PythonVersionTagger",
            Self::PythonMajorMinorVersion => "PythonMajorMinorVersionTagger",
            Self::JupyterNotebookVersion => "JupyterNotebookVersionTagger",
            Self::JupyterLabVersion => "JupyterLabVersionTagger",
            Self::JupyterHubVersion => "JupyterHubVersionTagger",
            Self::RVersion => "RVersionTagger",
            Self::JuliaVersion => "JuliaVersionTagger",
            Self::TensorflowVersion => "TensorflowVersionTagger",
            Self::PytorchVersion => "PytorchVersionTagger",
            Self::SparkVersion => "SparkVersionTagger",
            Self::HadoopVersion => "HadoopVersionTagger",
            Self::JavaVersion => "JavaVersionTagger",
        }
    }

    /// Probe the container and return this tagger's tag fragment.
    pub async fn tag_value(&self, ctx: &TagContext<'_>) -> Result<String> {
        let value = match self {
            Self::Sha => git::short_commit_hash(ctx.docker.runner(), ctx.repo_root).await?,
            Self::PythonVersion => {
                let out = program_version(ctx, "python").await?;
                format!("python-{}", versions::python_version(&out)?)
            }
            Self::PythonMajorMinorVersion => {
                let out = program_version(ctx, "python").await?;
                let full = versions::python_version(&out)?;
                format!("python-{}", versions::major_minor(&full)?)
            }
            Self::JupyterNotebookVersion => {
                let out = program_version(ctx, "jupyter-notebook").await?;
                format!("notebook-{}", versions::bare_version(self.name(), &out)?)
            }
            Self::JupyterLabVersion => {
                let out = program_version(ctx, "jupyter-lab").await?;
                format!("lab-{}", versions::bare_version(self.name(), &out)?)
            }
            Self::JupyterHubVersion => {
                let out = program_version(ctx, "jupyterhub").await?;
                format!("hub-{}", versions::bare_version(self.name(), &out)?)
            }
            Self::RVersion => {
                let out = program_version(ctx, "R").await?;
                format!("r-{}", versions::r_version(&out)?)
            }
            Self::JuliaVersion => {
                let out = program_version(ctx, "julia").await?;
                format!("julia-{}", versions::julia_version(&out)?)
            }
            Self::TensorflowVersion => {
                let version = match pip_package_version(ctx, "tensorflow").await {
                    Err(TagError::PackageNotFound(_)) => {
                        tracing::debug!("tensorflow not installed, probing tensorflow-cpu");
                        pip_package_version(ctx, "tensorflow-cpu").await?
                    }
                    other => other?,
                };
                format!("tensorflow-{}", version)
            }
            Self::PytorchVersion => {
                let version = pip_package_version(ctx, "torch").await?;
                format!("pytorch-{}", versions::strip_local_version(&version))
            }
            Self::SparkVersion => {
                let out = program_version(ctx, "spark-submit").await?;
                format!("spark-{}", versions::spark_version(&out)?)
            }
            Self::HadoopVersion => {
                let out = ctx.docker.exec(ctx.container, "hadoop version").await?;
                format!("hadoop-{}", versions::hadoop_version(&out.combined())?)
            }
            Self::JavaVersion => {
                let out = program_version(ctx, "java").await?;
                format!("java-{}", versions::java_version(&out)?)
            }
        };
        tracing::info!(tagger = self.name(), value = %value, "Calculated tag value");
        Ok(value)
    }
}

impl std::fmt::Display for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Tagger {
    type Err = TagError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| TagError::ConfigError(format!("unknown tagger: '{}'", s)))
    }
}

/// Printed by `pip show` when a package is not installed.
const PIP_NOT_FOUND_MARKER: &str = "Package(s) not found";

async fn program_version(ctx: &TagContext<'_>, program: &str) -> Result<String> {
    let out = ctx
        .docker
        .exec(ctx.container, &format!("{} --version", program))
        .await?;
    Ok(out.combined())
}

/// Installed version of a pip package; `PackageNotFound` when pip reports it missing.
async fn pip_package_version(ctx: &TagContext<'_>, package: &str) -> Result<String> {
    let out = match ctx
        .docker
        .exec(ctx.container, &format!("pip show {}", package))
        .await
    {
        Ok(out) => out,
        Err(TagError::CommandFailed {
            exit_code: 1,
            stderr,
            ..
        }) if stderr.contains(PIP_NOT_FOUND_MARKER) => {
            return Err(TagError::PackageNotFound(package.to_string()))
        }
        Err(e) => return Err(e),
    };
    versions::pip_show_version(package, &out.stdout)
}

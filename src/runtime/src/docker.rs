//! Docker command-line wrapper.
//!
//! Containers are started detached with a sleep-forever command so that
//! probes can be `exec`ed into them; the caller owns the container until
//! [`DockerCli::stop_and_remove`] is called.

use std::sync::Arc;

use stacks_tag_core::error::{Result, TagError};

use crate::process::{CommandOutput, CommandRunner};

/// A running container started by [`DockerCli::run_detached`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    /// Container ID as printed by `docker run --detach`
    pub id: String,
    /// Image the container was started from
    pub image: String,
}

/// Shells out to the `docker` binary.
#[derive(Clone)]
pub struct DockerCli {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl DockerCli {
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// The underlying command runner, shared with host-side probes.
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    async fn docker(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(&self.binary, &args).await
    }

    /// Start a detached container that idles until stopped.
    pub async fn run_detached(&self, image: &str) -> Result<ContainerHandle> {
        let output = self
            .docker(&["run", "--detach", image, "sleep", "infinity"])
            .await?;
        let id = output.stdout.trim().to_string();
        if id.is_empty() {
            return Err(TagError::Other(format!(
                "docker run for {} returned no container ID",
                image
            )));
        }
        tracing::info!(image, container = %short_id(&id), "Container started");
        Ok(ContainerHandle {
            id,
            image: image.to_string(),
        })
    }

    /// Run a shell command inside the container.
    pub async fn exec(&self, container: &ContainerHandle, cmd: &str) -> Result<CommandOutput> {
        tracing::debug!(container = %short_id(&container.id), cmd, "Exec in container");
        self.docker(&["exec", &container.id, "sh", "-c", cmd]).await
    }

    /// Stop and remove the container.
    pub async fn stop_and_remove(&self, container: &ContainerHandle) -> Result<()> {
        self.docker(&["stop", &container.id]).await?;
        self.docker(&["rm", &container.id]).await?;
        tracing::info!(container = %short_id(&container.id), "Container removed");
        Ok(())
    }

    pub async fn pull(&self, image: &str) -> Result<()> {
        tracing::info!(image, "Pulling image");
        self.docker(&["pull", image]).await.map(|_| ())
    }

    pub async fn tag(&self, source: &str, target: &str) -> Result<()> {
        tracing::info!(source, target, "Tagging image");
        self.docker(&["tag", source, target]).await.map(|_| ())
    }

    pub async fn push(&self, image: &str) -> Result<()> {
        tracing::info!(image, "Pushing image");
        self.docker(&["push", image]).await.map(|_| ())
    }

    /// `docker manifest create --amend <list> <images>...`
    pub async fn manifest_create(&self, list: &str, images: &[String]) -> Result<()> {
        tracing::info!(manifest = list, entries = images.len(), "Creating manifest");
        let mut args = vec!["manifest", "create", "--amend", list];
        args.extend(images.iter().map(String::as_str));
        self.docker(&args).await.map(|_| ())
    }

    pub async fn manifest_push(&self, list: &str) -> Result<()> {
        tracing::info!(manifest = list, "Pushing manifest");
        self.docker(&["manifest", "push", list]).await.map(|_| ())
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

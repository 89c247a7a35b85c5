//! OpenFGA container helper
//!
//! Automates pulling and running the third-party OpenFGA server container,
//! replacing hand-run docker commands. The server itself stays external.

use crate::error::{ContainerError, Error, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Default OpenFGA image
pub const OPENFGA_IMAGE: &str = "openfga/openfga:latest";
/// Name given to the managed container
pub const CONTAINER_NAME: &str = "swarmline-openfga";

/// Port mappings of a managed OpenFGA container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFgaPorts {
    pub http: u16,
    pub grpc: u16,
    pub playground: u16,
}

impl Default for OpenFgaPorts {
    fn default() -> Self {
        Self {
            http: 8080,
            grpc: 8081,
            playground: 3000,
        }
    }
}

/// Manages the OpenFGA container via the local docker CLI
pub struct OpenFgaContainer {
    image: String,
    name: String,
    ports: OpenFgaPorts,
}

impl OpenFgaContainer {
    pub fn new() -> Self {
        Self {
            image: OPENFGA_IMAGE.to_string(),
            name: CONTAINER_NAME.to_string(),
            ports: OpenFgaPorts::default(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_ports(mut self, ports: OpenFgaPorts) -> Self {
        self.ports = ports;
        self
    }

    /// Pull the image
    pub async fn pull(&self) -> Result<()> {
        info!("Pulling {}", self.image);
        self.docker(&["pull", &self.image]).await?;
        Ok(())
    }

    /// Start a detached container with the HTTP/gRPC/playground ports mapped
    pub async fn up(&self) -> Result<()> {
        info!("Starting {} as '{}'", self.image, self.name);
        let http = format!("{}:8080", self.ports.http);
        let grpc = format!("{}:8081", self.ports.grpc);
        let playground = format!("{}:3000", self.ports.playground);

        self.docker(&[
            "run", "--detach", "--rm",
            "--name", &self.name,
            "-p", &http,
            "-p", &grpc,
            "-p", &playground,
            &self.image, "run",
        ])
        .await?;
        Ok(())
    }

    /// Stop the managed container
    pub async fn down(&self) -> Result<()> {
        info!("Stopping '{}'", self.name);
        self.docker(&["stop", &self.name]).await?;
        Ok(())
    }

    /// Whether the managed container is currently running
    pub async fn status(&self) -> Result<bool> {
        let filter = format!("name={}", self.name);
        let out = self
            .docker(&["ps", "--filter", &filter, "--format", "{{.Names}}"])
            .await?;
        Ok(out.lines().any(|l| l.trim() == self.name))
    }

    /// Run one docker command, returning its stdout
    async fn docker(&self, args: &[&str]) -> Result<String> {
        debug!("docker {}", args.join(" "));
        let output = Command::new("docker").args(args).output().await.map_err(|e| {
            Error::Container(ContainerError::DockerUnavailable(e.to_string()))
        })?;

        if !output.status.success() {
            return Err(Error::Container(ContainerError::CommandFailed {
                command: format!("docker {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for OpenFgaContainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let ports = OpenFgaPorts::default();
        assert_eq!(ports.http, 8080);
        assert_eq!(ports.grpc, 8081);
        assert_eq!(ports.playground, 3000);
    }

    #[test]
    fn test_builders() {
        let container = OpenFgaContainer::new()
            .with_image("openfga/openfga:v1.5")
            .with_ports(OpenFgaPorts {
                http: 18080,
                grpc: 18081,
                playground: 13000,
            });
        assert_eq!(container.image, "openfga/openfga:v1.5");
        assert_eq!(container.ports.http, 18080);
    }
}

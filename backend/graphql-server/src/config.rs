//! Configuration for the GraphQL server
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! for local development.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// HS256 secrets shorter than this are rejected at startup
pub const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub jwt: JwtConfig,
    pub graphql: GraphQLConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Which graph store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphBackend {
    Neo4j,
    Memory,
}

impl FromStr for GraphBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "neo4j" => Ok(GraphBackend::Neo4j),
            "memory" => Ok(GraphBackend::Memory),
            other => bail!("Unknown GRAPH_BACKEND: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub backend: GraphBackend,
    pub uri: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Max query depth
    pub max_depth: usize,
    /// Enable introspection
    pub introspection: bool,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            introspection: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend = env::var("GRAPH_BACKEND")
            .unwrap_or_else(|_| "neo4j".to_string())
            .parse()?;

        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let config = Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                workers: env::var("SERVER_WORKERS")
                    .ok()
                    .and_then(|w| w.parse().ok())
                    .unwrap_or(num_cpus::get()),
            },
            graph: GraphConfig {
                backend,
                uri: env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
                user: env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
                password: env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "letmein".to_string()),
            },
            jwt: JwtConfig { secret },
            graphql: GraphQLConfig {
                max_depth: env::var("GRAPHQL_MAX_DEPTH")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(15),
                introspection: env::var("GRAPHQL_INTROSPECTION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            bail!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                self.jwt.secret.len()
            );
        }
        if self.graphql.max_depth == 0 {
            bail!("GRAPHQL_MAX_DEPTH must be greater than zero");
        }
        Ok(())
    }
}

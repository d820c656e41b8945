//! # Deployment Bootstrap
//!
//! Reads a deployment manifest at startup and configures the API server
//! for its tenant estate.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Deployment Manifest** — Parse YAML, validate required
//!    fields.
//! 2. **Seed Issuer Directory** — Upsert the manifest's issuers into the
//!    directory (and the database, when configured).
//! 3. **Log Deployment Identity** — Structured startup banner.
//!
//! If `IDW_CONFIG` is unset, the server operates in generic mode with an
//! empty issuer directory. All other behavior is preserved — accounts
//! simply register without a default-issuer link.

use std::path::Path;

use idw_core::IssuerId;
use serde::Deserialize;

use crate::state::{AppConfig, AppState, IssuerRecord};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during deployment bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Deployment manifest file not found at the given path.
    #[error("deployment manifest not found: {path}")]
    ManifestNotFound {
        /// The path that was checked.
        path: String,
    },

    /// Deployment manifest failed parsing or validation.
    #[error("invalid deployment manifest: {0}")]
    InvalidManifest(String),

    /// Seeding the issuer directory into the database failed.
    #[error("issuer seeding error: {0}")]
    IssuerSeeding(String),

    /// IO error during bootstrap.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Deployment context and manifest
// ---------------------------------------------------------------------------

/// Deployment context loaded during bootstrap.
///
/// When present, the server operates as a configured deployment. When
/// absent (generic mode), defaults apply.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    /// Deployment identifier from the manifest.
    pub deployment_id: String,
    /// Issuer name linked to newly registered accounts.
    pub default_issuer: String,
}

/// On-disk manifest shape.
#[derive(Debug, Deserialize)]
struct DeploymentManifest {
    deployment_id: String,
    #[serde(default = "default_issuer_name")]
    default_issuer: String,
    #[serde(default)]
    issuers: Vec<ManifestIssuer>,
}

#[derive(Debug, Deserialize)]
struct ManifestIssuer {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

fn default_issuer_name() -> String {
    crate::accounts::DEFAULT_ISSUER_NAME.to_string()
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Bootstrap the application state from a deployment manifest.
///
/// Reads the deployment configuration, seeds the issuer directory, and
/// returns the enriched `AppState` ready for
/// [`crate::app`].
///
/// If no deployment config is provided (`IDW_CONFIG` env var is unset),
/// returns the default `AppState` — the server operates as a generic
/// instance.
pub async fn bootstrap(
    config: AppConfig,
    remote_provisioner: Option<idw_provision_client::ProvisionerClient>,
    db_pool: Option<sqlx::PgPool>,
) -> Result<AppState, BootstrapError> {
    let mut state = AppState::with_config(config, remote_provisioner, db_pool);

    match std::env::var("IDW_CONFIG").ok() {
        Some(path) => {
            let manifest = load_manifest(Path::new(&path))?;
            seed_issuers(&state, &manifest).await?;
            log_deployment_banner(&manifest, &state);
            state.deployment = Some(DeploymentContext {
                deployment_id: manifest.deployment_id,
                default_issuer: manifest.default_issuer,
            });
        }
        None => {
            log_generic_banner(&state);
        }
    }

    Ok(state)
}

// ---------------------------------------------------------------------------
// Phase 1: Load Deployment Manifest
// ---------------------------------------------------------------------------

fn load_manifest(path: &Path) -> Result<DeploymentManifest, BootstrapError> {
    if !path.exists() {
        return Err(BootstrapError::ManifestNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    let manifest: DeploymentManifest = serde_yaml::from_str(&contents)
        .map_err(|e| BootstrapError::InvalidManifest(format!("YAML parse error: {e}")))?;

    if manifest.deployment_id.trim().is_empty() {
        return Err(BootstrapError::InvalidManifest(
            "deployment_id must be non-empty".to_string(),
        ));
    }
    if manifest
        .issuers
        .iter()
        .any(|issuer| issuer.name.trim().is_empty())
    {
        return Err(BootstrapError::InvalidManifest(
            "issuer names must be non-empty".to_string(),
        ));
    }

    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Phase 2: Seed Issuer Directory
// ---------------------------------------------------------------------------

async fn seed_issuers(
    state: &AppState,
    manifest: &DeploymentManifest,
) -> Result<(), BootstrapError> {
    for issuer in &manifest.issuers {
        if state.issuers.find(|i| i.name == issuer.name).is_some() {
            continue;
        }
        let record = IssuerRecord {
            id: IssuerId::new(),
            name: issuer.name.clone(),
            description: issuer.description.clone(),
        };
        if let Some(pool) = &state.db_pool {
            crate::db::issuers::upsert(pool, &record)
                .await
                .map_err(|e| BootstrapError::IssuerSeeding(e.to_string()))?;
        }
        state.issuers.insert(*record.id.as_uuid(), record);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Phase 3: Log Deployment Identity
// ---------------------------------------------------------------------------

fn log_deployment_banner(manifest: &DeploymentManifest, state: &AppState) {
    let provisioning = if state.provisioner.is_local() {
        "in-process"
    } else {
        "remote"
    };
    let persistence = if state.db_pool.is_some() {
        "postgres"
    } else {
        "in-memory"
    };

    tracing::info!(
        deployment = %manifest.deployment_id,
        default_issuer = %manifest.default_issuer,
        issuers = manifest.issuers.len(),
        provisioning,
        persistence,
        "deployment bootstrap complete"
    );

    println!("┌──────────────────────────────────────────────────┐");
    println!("│  IDW API Server                                  │");
    println!("├──────────────────────────────────────────────────┤");
    println!("│  Deployment:     {:<32}│", manifest.deployment_id);
    println!("│  Default issuer: {:<32}│", manifest.default_issuer);
    println!("│  Issuers seeded: {:<32}│", manifest.issuers.len());
    println!("│  Provisioning:   {:<32}│", provisioning);
    println!("│  Persistence:    {:<32}│", persistence);
    println!("│  Port:           {:<32}│", state.config.port);
    println!("└──────────────────────────────────────────────────┘");
}

fn log_generic_banner(state: &AppState) {
    tracing::info!(
        port = state.config.port,
        "starting in generic mode (no deployment configuration)"
    );
    println!("┌──────────────────────────────────────────────────┐");
    println!("│  IDW API Server                                  │");
    println!("│  Mode: generic (no deployment configuration)     │");
    println!("│  Port: {:<42}│", state.config.port);
    println!("└──────────────────────────────────────────────────┘");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    /// Create a temporary manifest for testing.
    fn write_temp_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("deployment.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_manifest_with_valid_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let yaml = r#"
deployment_id: eu-prod
default_issuer: walt.id
issuers:
  - name: walt.id
    description: Default credential issuer
  - name: gov-pilot
"#;
        let path = write_temp_manifest(tmp.path(), yaml);
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.deployment_id, "eu-prod");
        assert_eq!(manifest.default_issuer, "walt.id");
        assert_eq!(manifest.issuers.len(), 2);
        assert_eq!(manifest.issuers[1].name, "gov-pilot");
    }

    #[test]
    fn load_manifest_defaults_issuer_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_temp_manifest(tmp.path(), "deployment_id: minimal\n");
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(
            manifest.default_issuer,
            crate::accounts::DEFAULT_ISSUER_NAME
        );
        assert!(manifest.issuers.is_empty());
    }

    #[test]
    fn load_manifest_missing_file_returns_error() {
        let result = load_manifest(Path::new("/nonexistent/deployment.yaml"));
        assert!(matches!(
            result.unwrap_err(),
            BootstrapError::ManifestNotFound { .. }
        ));
    }

    #[test]
    fn load_manifest_empty_deployment_id_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_temp_manifest(tmp.path(), "deployment_id: \"\"\n");
        let result = load_manifest(&path);
        assert!(matches!(
            result.unwrap_err(),
            BootstrapError::InvalidManifest(_)
        ));
    }

    #[test]
    fn load_manifest_rejects_unparseable_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_temp_manifest(tmp.path(), ": not yaml [");
        assert!(matches!(
            load_manifest(&path).unwrap_err(),
            BootstrapError::InvalidManifest(_)
        ));
    }

    #[tokio::test]
    async fn seed_issuers_populates_directory_once() {
        let state = AppState::new();
        let manifest = DeploymentManifest {
            deployment_id: "test".to_string(),
            default_issuer: "walt.id".to_string(),
            issuers: vec![
                ManifestIssuer {
                    name: "walt.id".to_string(),
                    description: None,
                },
                ManifestIssuer {
                    name: "walt.id".to_string(),
                    description: Some("duplicate".to_string()),
                },
            ],
        };

        seed_issuers(&state, &manifest).await.unwrap();
        assert_eq!(state.issuers.len(), 1);

        // Seeding again is idempotent.
        seed_issuers(&state, &manifest).await.unwrap();
        assert_eq!(state.issuers.len(), 1);
    }
}

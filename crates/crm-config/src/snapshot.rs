//! Config snapshots recorded alongside a transform run.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::pipeline::PipelineConfig;
use crate::resolve::ResolvedConfig;

/// The effective config of a run plus a content fingerprint.
///
/// Two runs with the same fingerprint read the same inputs and wrote the
/// same outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub source: String,
    pub fingerprint: String,
    pub config: PipelineConfig,
}

impl ConfigSnapshot {
    pub fn capture(resolved: &ResolvedConfig) -> Result<Self, serde_json::Error> {
        Self::from_config(resolved.source.to_string(), &resolved.config)
    }

    pub fn from_config(
        source: impl Into<String>,
        config: &PipelineConfig,
    ) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(config)?;
        Ok(Self {
            source: source.into(),
            fingerprint: sha256_hex(json.as_bytes()),
            config: config.clone(),
        })
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable() {
        let cfg = PipelineConfig::default();
        let a = ConfigSnapshot::from_config("defaults", &cfg).unwrap();
        let b = ConfigSnapshot::from_config("defaults", &cfg).unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.fingerprint.len(), 64);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let cfg = PipelineConfig::default();
        let mut other = cfg.clone();
        other.table_name = "deals".into();
        let a = ConfigSnapshot::from_config("defaults", &cfg).unwrap();
        let b = ConfigSnapshot::from_config("defaults", &other).unwrap();
        assert_ne!(a.fingerprint, b.fingerprint);
    }
}

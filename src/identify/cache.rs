use serde::{Deserialize, Serialize};

use super::correlation::CfIdentification;
use super::identification::ClusterIdentification;
use crate::base::CemcError;

/// Lookup key for a persisted identification snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentificationKey {
    pub structure: String,
    pub phase: String,
    pub model: String,
    pub num_components: usize,
}

/// Serializable snapshot of both identification stages.
///
/// Round-tripping reproduces every field; the wire format is JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationCache {
    pub key: IdentificationKey,
    pub identification: ClusterIdentification,
    pub cf: CfIdentification,
}

impl IdentificationCache {
    pub fn new(
        key: IdentificationKey,
        identification: ClusterIdentification,
        cf: CfIdentification,
    ) -> Self {
        Self {
            key,
            identification,
            cf,
        }
    }

    pub fn to_json(&self) -> Result<String, CemcError> {
        serde_json::to_string(self).map_err(|_| CemcError::CacheSerializationError)
    }

    pub fn from_json(json: &str) -> Result<Self, CemcError> {
        serde_json::from_str(json).map_err(|_| CemcError::CacheDeserializationError)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;

    use super::*;
    use crate::base::{Cluster, Operation};
    use crate::identify::{basis_symbols, cluster_list};

    #[test]
    fn test_round_trip() {
        let maximal = vec![Cluster::from_positions(vec![
            vector![0.0, 0.0, 0.0],
            vector![0.5, 0.5, 0.5],
        ])];
        let operations = vec![Operation::identity()];
        let geometric = cluster_list(&maximal, &operations, None);
        let identification = ClusterIdentification::new(geometric, None).unwrap();
        let symbols = basis_symbols(2);
        let decorated = cluster_list(&maximal, &operations, Some(&symbols));
        let cf = CfIdentification::new(&identification, decorated.clone(), decorated).unwrap();

        let cache = IdentificationCache::new(
            IdentificationKey {
                structure: "bcc".to_string(),
                phase: "A2".to_string(),
                model: "pair".to_string(),
                num_components: 2,
            },
            identification,
            cf,
        );
        let restored = IdentificationCache::from_json(&cache.to_json().unwrap()).unwrap();
        assert_eq!(restored.key, cache.key);
        assert_eq!(
            restored.identification.nij,
            cache.identification.nij
        );
        assert_eq!(
            restored.identification.kb_coefficients,
            cache.identification.kb_coefficients
        );
        assert_eq!(restored.cf.num_cfs, cache.cf.num_cfs);
        assert_eq!(restored.cf.grouped, cache.cf.grouped);
        assert_eq!(
            restored.cf.cfs.clusters.len(),
            cache.cf.cfs.clusters.len()
        );
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(IdentificationCache::from_json("{not json").is_err());
    }
}

#[allow(unused_imports)]
#[macro_use]
extern crate approx;

pub mod base;
pub mod embed;
pub mod identify;
pub mod mc;

use serde::{Deserialize, Serialize};

use crate::base::{CemcError, Cluster, SpaceGroup};
use crate::identify::{
    basis_symbols, cluster_list, CfIdentification, ClusterIdentification,
};

/// Both identification stages for one structure: geometric cluster types
/// with their entropy coefficients, and the correlation functions for a
/// given component count.
///
/// The ordered phase, when present, must carry the affine map into the
/// disordered reference frame on its space group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterDataset {
    pub identification: ClusterIdentification,
    pub cf: CfIdentification,
    pub num_components: usize,
}

impl ClusterDataset {
    pub fn new(
        disordered_clusters: &[Cluster],
        disordered_group: &SpaceGroup,
        ordered: Option<(&[Cluster], &SpaceGroup)>,
        num_components: usize,
    ) -> Result<Self, CemcError> {
        if num_components < 2 {
            return Err(CemcError::InvalidComponentCount(num_components));
        }

        let disordered = cluster_list(disordered_clusters, &disordered_group.operations, None);
        let ordered_geometry = match ordered {
            None => None,
            Some((clusters, group)) => {
                let parent_map = group
                    .parent_map
                    .clone()
                    .ok_or(CemcError::MissingParentMap)?;
                let list = cluster_list(clusters, &group.operations, None);
                Some((list, parent_map))
            }
        };
        let identification = ClusterIdentification::new(disordered, ordered_geometry)?;

        let symbols = basis_symbols(num_components);
        let disordered_cfs =
            cluster_list(disordered_clusters, &disordered_group.operations, Some(&symbols));
        let cfs = match ordered {
            None => disordered_cfs.clone(),
            Some((clusters, group)) => {
                cluster_list(clusters, &group.operations, Some(&symbols))
            }
        };
        let cf = CfIdentification::new(&identification, cfs, disordered_cfs)?;

        Ok(Self {
            identification,
            cf,
            num_components,
        })
    }
}

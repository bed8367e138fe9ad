mod cache;
mod cluster_list;
mod correlation;
mod equivalence;
mod identification;
mod subcluster;

pub use cache::{IdentificationCache, IdentificationKey};
pub use cluster_list::{cluster_list, ClusterListResult};
pub use correlation::{basis_symbols, CfIdentification};
pub use equivalence::{generate_orbit, is_contained, translation_equivalent};
pub use identification::ClusterIdentification;
pub use subcluster::{decorated_sub_clusters, sub_clusters};

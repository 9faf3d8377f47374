pub mod fk;
pub mod growth;

pub use fk::{swendsen_wang_update, wolff_update};
pub use growth::{grow_cluster, partition, ClusterLabels, UNLABELED};

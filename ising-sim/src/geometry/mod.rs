pub mod lattice;

pub use lattice::{Lattice, Neighbours};

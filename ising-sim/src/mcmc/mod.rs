pub mod metropolis;

pub mod compression;
pub mod runner;

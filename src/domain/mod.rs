pub mod blame;
pub mod filter;
pub mod git;
pub mod languages;
pub mod ranking;
pub mod stats;
pub mod tree;

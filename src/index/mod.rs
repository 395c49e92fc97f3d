pub mod bwt;
pub mod config;
pub mod fm;
pub mod occ;
pub mod rank;
pub mod sa;
pub mod ssa;

pub use config::IndexConfig;
pub use fm::{FmIndex, IndexMeta, IndexStats, MatchInterval};

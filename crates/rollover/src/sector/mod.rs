//! Sector classification for NSE symbols.

pub mod map;
pub mod nse;

pub use map::{SYMBOL_ALIASES, SectorClassifier, SectorEntry, SectorMap, UNMAPPED, canonical_symbol};
pub use nse::NseSector;

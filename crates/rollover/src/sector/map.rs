//! Symbol to sector lookup.

use crate::sector::nse::NseSector;
use rollover_data::normalize::{
    column_names, missing_columns, normalize_symbol, read_text_frame, text_values,
};
use rollover_data::{DataError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

/// Sector assigned to symbols with no entry in the map.
pub const UNMAPPED: &str = "UNMAPPED";

/// Legacy symbol spellings and their current NSE symbol.
pub const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("PHOENIXL", "PHOENIXLTD"),
    ("UNO MINDA", "UNOMINDA"),
    ("LTI", "LTIM"),
    ("MCDOWELL", "MCDOWELL-N"),
];

/// Normalize a symbol and resolve legacy aliases.
pub fn canonical_symbol(raw: &str) -> String {
    let symbol = normalize_symbol(raw);
    SYMBOL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map_or(symbol, |(_, current)| (*current).to_string())
}

/// Anything that can name the sector of a symbol.
pub trait SectorClassifier {
    /// Sector of an already canonical symbol, if known.
    fn sector_of(&self, symbol: &str) -> Option<&str>;

    /// Sector of a raw symbol, falling back to [`UNMAPPED`].
    fn classify(&self, raw: &str) -> &str {
        self.sector_of(&canonical_symbol(raw)).unwrap_or(UNMAPPED)
    }
}

/// One symbol with its sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorEntry {
    /// Symbol.
    pub symbol: String,
    /// Sector name.
    pub sector: String,
}

/// Immutable symbol to sector mapping, built once per run.
#[derive(Debug, Clone, Default)]
pub struct SectorMap {
    entries: Vec<SectorEntry>,
    symbol_to_sector: HashMap<String, String>,
}

impl SectorMap {
    /// Build from `(symbol, sector)` pairs. Both are trimmed and upper-cased;
    /// the first entry for a symbol wins.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut map = Self::default();
        for (symbol, sector) in pairs {
            let symbol = normalize_symbol(symbol.as_ref());
            let sector = sector.as_ref().trim().to_uppercase();
            if symbol.is_empty() || map.symbol_to_sector.contains_key(&symbol) {
                continue;
            }
            map.symbol_to_sector.insert(symbol.clone(), sector.clone());
            map.entries.push(SectorEntry { symbol, sector });
        }
        map
    }

    /// The built-in NSE table.
    pub fn nse_default() -> Self {
        Self::from_pairs(NseSector::all().into_iter().flat_map(|sector| {
            sector
                .symbols()
                .iter()
                .map(move |symbol| (*symbol, sector.name()))
        }))
    }

    /// Load an external `SYMBOL, SECTOR` table.
    ///
    /// # Errors
    ///
    /// [`DataError::MissingInput`] if the file is absent, [`DataError::MissingColumns`]
    /// if either column is missing.
    pub fn from_csv(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DataError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let df = read_text_frame(path)?;
        let available = column_names(&df);
        let missing = missing_columns(&available, &["SYMBOL", "SECTOR"]);
        if !missing.is_empty() {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                missing,
                available,
            });
        }

        let symbols = text_values(&df, "SYMBOL")?;
        let sectors = text_values(&df, "SECTOR")?;
        let rows = df.height();
        let map = Self::from_pairs(
            symbols
                .into_iter()
                .zip(sectors)
                .map(|(symbol, sector)| (symbol.unwrap_or_default(), sector.unwrap_or_default())),
        );

        if map.len() < rows {
            debug!(
                path = %path.display(),
                dropped = rows - map.len(),
                "dropped duplicate or blank sector rows"
            );
        }
        info!(path = %path.display(), symbols = map.len(), "loaded sector table");
        Ok(map)
    }

    /// All entries in definition order.
    pub fn entries(&self) -> &[SectorEntry] {
        &self.entries
    }

    /// Number of mapped symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no symbol is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All symbols in a sector, in definition order.
    pub fn symbols_in_sector(&self, sector: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.sector == sector)
            .map(|e| e.symbol.clone())
            .collect()
    }

    /// Symbol count per sector.
    pub fn sector_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.sector.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl SectorClassifier for SectorMap {
    fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.symbol_to_sector.get(symbol).map(String::as_str)
    }
}

//! Column flag tables and the bitmask translator.
//!
//! Every Mozscape endpoint that lets the caller pick result columns takes
//! those columns as a single integer where each column owns one bit. The
//! tables below map the human-readable column names onto those bits.
//!
//! Unknown column names are dropped without an error. Use
//! [`FlagTable::unknown`] to validate user input before building a request
//! if silent omission is not acceptable.

use std::fmt;

/// Static lookup from column name to its bit value for one endpoint.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlagTable {
    name: &'static str,
    entries: &'static [(&'static str, u64)],
}

impl FlagTable {
    const fn new(name: &'static str, entries: &'static [(&'static str, u64)]) -> Self {
        Self { name, entries }
    }

    /// Short name of the table, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the bit value for `column`, if the table knows it.
    pub fn get(&self, column: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, bit)| *bit)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Iterates over all column names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Iterates over `(name, bit)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names from `columns` that [`FlagTable::bitmask`] would drop.
    pub fn unknown<I, S>(&self, columns: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        columns
            .into_iter()
            .filter(|column| !self.contains(column.as_ref()))
            .map(|column| column.as_ref().to_owned())
            .collect()
    }

    /// Translates column names into the combined bitmask.
    ///
    /// Names missing from the table are ignored and an empty input yields
    /// `0`. A column listed twice contributes its bit once.
    pub fn bitmask<I, S>(&self, columns: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        columns
            .into_iter()
            .fold(0u64, |bits, column| match self.get(column.as_ref()) {
                Some(bit) => bits | bit,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        table = self.name,
                        column = column.as_ref(),
                        "ignoring unknown column"
                    );
                    bits
                }
            })
    }
}

impl fmt::Debug for FlagTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagTable")
            .field("name", &self.name)
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Translates `columns` through `table`; see [`FlagTable::bitmask`].
pub fn translate_bitfield<I, S>(columns: I, table: &FlagTable) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    table.bitmask(columns)
}

/// URL metrics columns. Also used for `TargetCols`/`SourceCols` on the links
/// endpoint and for `Cols` on top pages.
pub const URL_METRICS_FLAGS: FlagTable = FlagTable::new(
    "url_metrics",
    &[
        ("title", 1),
        ("url", 4),
        ("subdomain", 8),
        ("root_domain", 16),
        ("external_links", 32),
        ("subdomain_external_links", 64),
        ("domain_external_links", 128),
        ("juice_passing_links", 256),
        ("subdomains_linking", 512),
        ("domains_linking", 1024),
        ("links", 2048),
        ("subdomain_subs_linking", 4096),
        ("domain_domains_linking", 8192),
        ("mozRank", 16384),
        ("subdomain_mozRank", 32768),
        ("domain_mozRank", 65536),
        ("mozTrust", 131072),
        ("subdomain_mozTrust", 262144),
        ("domain_mozTrust", 524288),
        ("external_mozRank", 1048576),
        ("subdomain_external_juice", 2097152),
        ("domain_external_juice", 4194304),
        ("subdomain_domain_juice", 8388608),
        ("domain_domain_juice", 16777216),
        ("canonical_url", 268435456),
        ("http_status", 536870912),
        ("subdomain_links", 4294967296),
        ("domain_links", 8589934592),
        ("domains_linking_to_subdomain", 17179869184),
        ("page_authority", 34359738368),
        ("domain_authority", 68719476736),
    ],
);

/// Link columns for `LinkCols` on the links endpoint.
pub const LINK_FLAGS: FlagTable = FlagTable::new(
    "link",
    &[("flags", 2), ("anchor_text", 4), ("moxRank_passed", 16)],
);

/// Anchor text columns.
pub const ANCHOR_TEXT_FLAGS: FlagTable = FlagTable::new(
    "anchor_text",
    &[
        ("phrase", 2),
        ("internal_pages_linking", 8),
        ("internal_subdomains_linking", 16),
        ("external_pages_linking", 32),
        ("external_subdomains_linking", 64),
        ("external_domains_linking", 128),
        ("internal_mozRank_passed", 256),
        ("external_mozRank_passed", 512),
        ("flags", 1024),
    ],
);

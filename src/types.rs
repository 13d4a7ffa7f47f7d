use std::fmt;

use getset::Getters;
use indexmap::{IndexMap, IndexSet};

use crate::error::Error;
use crate::parser;

/// The VCF missing-value placeholder.
pub(crate) const MISSING: &str = ".";
/// Token that must appear on the first line of a VCF file.
pub(crate) const FILE_SIGNATURE: &str = "VCF";
pub(crate) const FILE_DATE_KEY: &str = "##fileDate=";
pub(crate) const PASS: &str = "PASS";

/// Columns every data line carries, in order. FORMAT is optional and only
/// present when the file has samples.
pub const FIXED_COLUMNS: [&str; 8] = ["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];
pub const FORMAT_COLUMN: &str = "FORMAT";

pub(crate) const CHROM: usize = 0;
pub(crate) const POS: usize = 1;
pub(crate) const ID: usize = 2;
pub(crate) const REF: usize = 3;
pub(crate) const ALT: usize = 4;
pub(crate) const QUAL: usize = 5;
pub(crate) const FILTER: usize = 6;
pub(crate) const INFO: usize = 7;
pub(crate) const FORMAT: usize = 8;

/// A single INFO value, numeric whenever it parses as a float.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn parse(raw: &str) -> Self {
        raw.parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::Text(raw.to_owned()))
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// `true` for `.` and empty values, i.e. a key that is present without content.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty() || s == MISSING)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Parsed INFO column. Flags map to themselves.
pub type InfoMap = IndexMap<String, Value>;

/// Column layout of a VCF file plus the metadata lines that preceded it.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Header {
    /// `##` lines, verbatim and in order.
    meta: Vec<String>,
    /// The `#CHROM ...` line, verbatim.
    line: String,
    columns: IndexSet<String>,
    samples: Vec<Sample>,
}

pub type Sample = String;

impl Header {
    /// Builds a header from a `#CHROM ...` line.
    pub fn from_line(line: &str, meta: Vec<String>) -> Result<Self, Error> {
        let trimmed = line.trim_end();
        let names = parser::header_columns(trimmed)
            .map_err(|_| Error::InvalidHeader(trimmed.to_owned()))?;
        Self::new(names, meta, trimmed.to_owned())
    }

    pub(crate) fn new(names: Vec<&str>, meta: Vec<String>, line: String) -> Result<Self, Error> {
        if names.len() < FIXED_COLUMNS.len()
            || names.iter().zip(FIXED_COLUMNS.iter()).any(|(n, f)| n != f)
        {
            return Err(Error::InvalidHeader(line));
        }
        if names.len() > FORMAT && names[FORMAT] != FORMAT_COLUMN {
            return Err(Error::InvalidHeader(line));
        }
        let columns: IndexSet<String> = names.iter().map(|&n| n.to_owned()).collect();
        if columns.len() != names.len() {
            return Err(Error::InvalidHeader(line));
        }
        let samples = names.iter().skip(FORMAT + 1).map(|&s| s.to_owned()).collect();
        Ok(Header {
            meta,
            line,
            columns,
            samples,
        })
    }

    pub fn has_format(&self) -> bool {
        self.columns.len() > FORMAT
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }
}

/// A sample's diploid call. Allele order is not significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genotype {
    Called(u32, u32),
    Missing,
}

impl Genotype {
    /// The alleles in ascending order, `None` when missing.
    pub fn sorted(self) -> Option<(u32, u32)> {
        match self {
            Genotype::Called(a, b) if a <= b => Some((a, b)),
            Genotype::Called(a, b) => Some((b, a)),
            Genotype::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        self == Genotype::Missing
    }

    pub fn is_homozygous(self) -> bool {
        matches!(self, Genotype::Called(a, b) if a == b)
    }

    /// Number of matching alleles between two calls: 2 for identical unordered
    /// pairs, 1 if any allele is shared, 0 otherwise. Missing calls share nothing.
    pub fn ibs(self, other: Genotype) -> u8 {
        match (self.sorted(), other.sorted()) {
            (Some(a), Some(b)) if a == b => 2,
            (Some((a1, a2)), Some((b1, b2))) => {
                if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
                    1
                } else {
                    0
                }
            }
            _ => 0,
        }
    }
}

use crate::condition::InheritanceModel;

/// `(chromosome, start, stop)`, with `-1` as an open bound on either side.
///
/// Bounds are kept as given and validated when the conditions are compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    pub chrom: String,
    pub start: String,
    pub stop: String,
}

/// An INFO predicate as given on the command line, e.g. `AF gt 0.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoFilterSpec {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl InfoFilterSpec {
    pub fn new(field: &str, operator: &str, value: &str) -> Self {
        InfoFilterSpec {
            field: field.to_owned(),
            operator: operator.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Which conditions to build and with what parameters.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub region: Option<RegionSpec>,
    pub min_qual: Option<f64>,
    pub require_pass: bool,
    pub min_call_rate: Option<f64>,
    pub info_filters: Vec<InfoFilterSpec>,
    pub inheritance: Vec<InheritanceModel>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            region: None,
            min_qual: None,
            require_pass: true,
            min_call_rate: None,
            info_filters: vec![],
            inheritance: vec![],
        }
    }
}

/// Cheap structural checks and reporting switches for the stream driver.
///
/// The checks run before condition evaluation and are not part of the
/// statistics table.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Only keep records whose ID starts with this prefix.
    pub id_prefix: Option<String>,
    /// Only keep records with a single-base REF and ALT.
    pub snv_only: bool,
    /// Log every passing record.
    pub progress: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            id_prefix: None,
            snv_only: false,
            progress: true,
        }
    }
}

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use getset::{CopyGetters, Getters};
use log::{debug, info, warn};

use crate::condition::Conditions;
use crate::config::StreamOptions;
use crate::error::{Error, Result};
use crate::reader::VcfRecords;
use crate::record::VariantRecord;
use crate::stats::FilterStats;
use crate::types::FILE_DATE_KEY;

/// Outcome of a filtering run.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct FilterReport {
    #[getset(get = "pub")]
    descriptions: Vec<String>,
    #[getset(get = "pub")]
    stats: FilterStats,
    /// Data lines dropped because they could not be parsed or evaluated.
    #[getset(get_copy = "pub")]
    skipped: u64,
    /// Data lines removed by the ID/SNV pre-checks.
    #[getset(get_copy = "pub")]
    prefiltered: u64,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total variants examined: {}", self.stats.examined())?;
        writeln!(
            f,
            "Filter\tFilter Description\tVariants passing\tVariants passing sequentially"
        )?;
        let rows = self
            .descriptions
            .iter()
            .zip(self.stats.passing_total())
            .zip(self.stats.passing_sequential());
        for (i, ((description, passing), sequential)) in rows.enumerate() {
            writeln!(f, "{}\t{}\t{}\t{}", i + 1, description, passing, sequential)?;
        }
        Ok(())
    }
}

fn passes_prechecks(record: &VariantRecord, options: &StreamOptions) -> bool {
    if let Some(prefix) = &options.id_prefix {
        if !record.id().starts_with(prefix.as_str()) {
            return false;
        }
    }
    !options.snv_only || record.is_snv()
}

fn write_header<W: Write, R: BufRead>(records: &VcfRecords<R>, out: &mut W) -> io::Result<()> {
    let today = chrono::Local::now().format("%Y%m%d").to_string();
    for line in records.header().meta() {
        if line.starts_with(FILE_DATE_KEY) {
            writeln!(out, "{}{}", FILE_DATE_KEY, today)?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    writeln!(out, "{}", records.header().line())
}

/// Streams records through the conditions, writing the header and every
/// record that passes all of them to `out`.
pub fn filter_records<R: BufRead, W: Write>(
    mut records: VcfRecords<R>,
    conditions: &Conditions,
    options: &StreamOptions,
    mut out: W,
) -> Result<FilterReport> {
    write_header(&records, &mut out)?;

    let mut stats = FilterStats::new(conditions.len());
    let mut skipped = 0;
    let mut prefiltered = 0;
    while let Some(record) = records.next() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_record_error() => {
                warn!("Skipping record: {}", e);
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if !passes_prechecks(&record, options) {
            debug!("Line {} removed by pre-checks", records.line_number());
            prefiltered += 1;
            continue;
        }
        let filters_passed = match conditions.evaluate(&record) {
            Ok(filters_passed) => filters_passed,
            Err(source) => {
                let e = Error::Record {
                    line_number: records.line_number(),
                    source,
                };
                warn!("Skipping record: {}", e);
                skipped += 1;
                continue;
            }
        };
        stats.record(&filters_passed);
        if filters_passed.iter().all(|&passed| passed) {
            if options.progress {
                info!(
                    "Variant passed: {} {} {}",
                    record.chrom(),
                    record.get("POS").unwrap_or_default(),
                    record.id()
                );
            }
            writeln!(out, "{}", record.line())?;
        }
    }
    out.flush()?;

    if skipped > 0 {
        warn!("{} records could not be parsed and were skipped", skipped);
    }
    if prefiltered > 0 {
        info!("{} records removed by ID/SNV pre-checks", prefiltered);
    }
    Ok(FilterReport {
        descriptions: conditions.descriptions().clone(),
        stats,
        skipped,
        prefiltered,
    })
}

/// Filters the VCF at `input`, writing survivors to `output` if given.
pub fn filter_path<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    conditions: &Conditions,
    options: &StreamOptions,
) -> Result<FilterReport> {
    let records = VcfRecords::from_path(input)?;
    match output {
        Some(path) => {
            let file = File::create(path).map_err(Error::Io)?;
            filter_records(records, conditions, options, BufWriter::new(file))
        }
        None => filter_records(records, conditions, options, io::sink()),
    }
}

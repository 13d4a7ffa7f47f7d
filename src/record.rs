use std::rc::Rc;

use itertools::Itertools;

use crate::error::RecordError;
use crate::parser;
use crate::types::{
    Genotype, Header, InfoMap, Value, ALT, CHROM, FILTER, FORMAT, ID, INFO, MISSING, POS, QUAL,
    REF,
};

/// One data line of a VCF file.
///
/// The fixed columns are kept as text and converted on access, except for
/// INFO (parsed into an [`InfoMap`]) and QUAL, which are converted eagerly.
#[derive(Debug)]
pub struct VariantRecord {
    fields: Vec<String>,
    info: InfoMap,
    qual: Option<f64>,
    line: String,
    header: Rc<Header>,
}

impl VariantRecord {
    /// Zips a whitespace-delimited line with the header columns.
    pub fn parse(header: Rc<Header>, line: &str) -> Result<Self, RecordError> {
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let fields = line.split_whitespace().map(str::to_owned).collect_vec();
        let expected = header.columns().len();
        if fields.len() != expected {
            return Err(RecordError::MalformedRecord {
                expected,
                found: fields.len(),
            });
        }
        let qual = match fields[QUAL].as_str() {
            MISSING => None,
            q => Some(
                q.parse::<f64>()
                    .map_err(|_| RecordError::InvalidQual(q.to_owned()))?,
            ),
        };
        let info = parse_info(&fields[INFO]);
        Ok(VariantRecord {
            fields,
            info,
            qual,
            line: line.to_owned(),
            header,
        })
    }

    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    /// The line this record was parsed from, without its line terminator.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Raw value of any column by name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .column_index(column)
            .map(|idx| self.fields[idx].as_str())
    }

    pub fn chrom(&self) -> &str {
        &self.fields[CHROM]
    }

    /// POS, converted on each call.
    pub fn pos(&self) -> Result<u64, RecordError> {
        let pos = &self.fields[POS];
        pos.parse()
            .map_err(|_| RecordError::InvalidPos(pos.to_owned()))
    }

    pub fn id(&self) -> &str {
        &self.fields[ID]
    }

    pub fn ref_allele(&self) -> &str {
        &self.fields[REF]
    }

    pub fn alt_alleles(&self) -> Vec<&str> {
        self.fields[ALT].split(',').collect()
    }

    /// QUAL, `None` if set to `.`.
    pub fn qual(&self) -> Option<f64> {
        self.qual
    }

    pub fn filter(&self) -> &str {
        &self.fields[FILTER]
    }

    pub fn info(&self) -> &InfoMap {
        &self.info
    }

    pub fn format(&self) -> Option<&str> {
        self.fields.get(FORMAT).map(String::as_str)
    }

    /// Raw sample columns, in header order.
    pub fn samples(&self) -> &[String] {
        if self.header.has_format() {
            &self.fields[FORMAT + 1..]
        } else {
            &[]
        }
    }

    /// Whether REF and the single ALT allele are one base each.
    pub fn is_snv(&self) -> bool {
        self.ref_allele().len() == 1 && self.fields[ALT].len() == 1
    }

    /// One genotype per sample column, taken from the GT sub-field.
    ///
    /// Samples that carry no GT value are reported as missing.
    pub fn genotypes(&self) -> Result<Vec<Genotype>, RecordError> {
        let format = match self.format() {
            Some(format) => format,
            None => return Ok(vec![]),
        };
        let gt_idx = match format.split(':').position(|key| key == "GT") {
            Some(idx) => idx,
            None => return Ok(vec![Genotype::Missing; self.samples().len()]),
        };
        self.samples()
            .iter()
            .map(|sample| match sample.split(':').nth(gt_idx) {
                Some(gt) => parse_genotype(gt),
                None => Ok(Genotype::Missing),
            })
            .collect()
    }
}

pub(crate) fn parse_info(raw: &str) -> InfoMap {
    parser::info_pairs(raw)
        .into_iter()
        .map(|(key, value)| match value {
            Some(v) => (key.to_owned(), Value::parse(v)),
            None => (key.to_owned(), Value::Text(key.to_owned())),
        })
        .collect()
}

pub(crate) fn parse_genotype(gt: &str) -> Result<Genotype, RecordError> {
    match parser::genotype_alleles(gt) {
        Some((None, None)) => Ok(Genotype::Missing),
        Some((Some(a), Some(b))) => Ok(Genotype::Called(a, b)),
        _ => Err(RecordError::InvalidGenotype(gt.to_owned())),
    }
}

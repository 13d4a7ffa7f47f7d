use std::fmt;

use getset::Getters;
use itertools::Itertools;
use strum::{Display, EnumString};

use crate::config::{FilterConfig, InfoFilterSpec, RegionSpec};
use crate::error::{ConfigError, RecordError};
use crate::record::VariantRecord;
use crate::types::{Genotype, InfoMap, Value, PASS};

/// Comparison applied to an INFO value. Both symbolic and word forms parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Operator {
    #[strum(to_string = "is-set", serialize = "is_set", serialize = "set")]
    IsSet,
    #[strum(to_string = "not-set", serialize = "not_set", serialize = "unset")]
    NotSet,
    #[strum(to_string = ">", serialize = "gt")]
    Greater,
    #[strum(to_string = ">=", serialize = "gte", serialize = "ge")]
    GreaterEqual,
    #[strum(to_string = "<", serialize = "lt")]
    Less,
    #[strum(to_string = "<=", serialize = "lte", serialize = "le")]
    LessEqual,
    #[strum(to_string = "=", serialize = "==", serialize = "eq")]
    Equal,
    #[strum(to_string = "!=", serialize = "neq", serialize = "ne")]
    NotEqual,
    #[strum(to_string = "contains")]
    Contains,
    #[strum(
        to_string = "not-contains",
        serialize = "not_contains",
        serialize = "ncontains"
    )]
    NotContains,
}

impl Operator {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Operator::Greater | Operator::GreaterEqual | Operator::Less | Operator::LessEqual
        )
    }

    fn is_presence(self) -> bool {
        matches!(self, Operator::IsSet | Operator::NotSet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InheritanceModel {
    Dominant,
    Recessive,
}

/// A single predicate over a record, carrying its own parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// CHROM matches and POS lies within the inclusive bounds; `None` is open.
    Region {
        chrom: String,
        start: Option<u64>,
        stop: Option<u64>,
    },
    /// QUAL strictly above the threshold.
    MinQual(f64),
    FilterPass,
    /// Fraction of samples with a called genotype.
    MinCallRate(f64),
    Info {
        field: String,
        operator: Operator,
        value: Value,
    },
    Inheritance(InheritanceModel),
}

type GenotypeCache = Option<Vec<Genotype>>;

impl Condition {
    pub fn uses_genotypes(&self) -> bool {
        matches!(self, Condition::MinCallRate(_) | Condition::Inheritance(_))
    }

    /// Evaluates the condition. Only POS and genotype conversion can fail;
    /// INFO predicates on a missing key are simply false.
    pub fn matches(&self, record: &VariantRecord) -> Result<bool, RecordError> {
        self.matches_cached(record, &mut None)
    }

    fn matches_cached(
        &self,
        record: &VariantRecord,
        cache: &mut GenotypeCache,
    ) -> Result<bool, RecordError> {
        let passed = match self {
            Condition::Region { chrom, start, stop } => {
                if record.chrom() != chrom {
                    false
                } else {
                    let pos = record.pos()?;
                    start.map_or(true, |start| start <= pos) && stop.map_or(true, |stop| pos <= stop)
                }
            }
            Condition::MinQual(threshold) => record.qual().map_or(false, |qual| qual > *threshold),
            Condition::FilterPass => record.filter() == PASS,
            Condition::MinCallRate(threshold) => {
                let genotypes = genotypes(record, cache)?;
                call_rate(genotypes).map_or(false, |rate| rate >= *threshold)
            }
            Condition::Info {
                field,
                operator,
                value,
            } => info_matches(record.info(), field, *operator, value),
            Condition::Inheritance(InheritanceModel::Dominant) => {
                dominant_consistent(genotypes(record, cache)?)
            }
            Condition::Inheritance(InheritanceModel::Recessive) => {
                recessive_consistent(genotypes(record, cache)?)
            }
        };
        Ok(passed)
    }
}

fn genotypes<'a>(
    record: &VariantRecord,
    cache: &'a mut GenotypeCache,
) -> Result<&'a [Genotype], RecordError> {
    if cache.is_none() {
        *cache = Some(record.genotypes()?);
    }
    Ok(cache.as_deref().unwrap_or_default())
}

fn info_matches(info: &InfoMap, field: &str, operator: Operator, expected: &Value) -> bool {
    let actual = match info.get(field) {
        Some(actual) => actual,
        None => return false,
    };
    let numeric = |cmp: fn(f64, f64) -> bool| match (actual.number(), expected.number()) {
        (Some(a), Some(e)) => cmp(a, e),
        _ => false,
    };
    let substring = |want: bool| match (actual.text(), expected.text()) {
        (Some(a), Some(e)) => a.contains(e) == want,
        _ => false,
    };
    match operator {
        Operator::IsSet => true,
        Operator::NotSet => actual.is_missing(),
        Operator::Greater => numeric(|a, e| a > e),
        Operator::GreaterEqual => numeric(|a, e| a >= e),
        Operator::Less => numeric(|a, e| a < e),
        Operator::LessEqual => numeric(|a, e| a <= e),
        Operator::Equal => actual == expected,
        Operator::NotEqual => actual != expected,
        Operator::Contains => substring(true),
        Operator::NotContains => substring(false),
    }
}

/// Fraction of called genotypes, `None` without samples.
pub fn call_rate(genotypes: &[Genotype]) -> Option<f64> {
    if genotypes.is_empty() {
        return None;
    }
    let called = genotypes.iter().filter(|gt| !gt.is_missing()).count();
    Some(called as f64 / genotypes.len() as f64)
}

fn called(genotypes: &[Genotype]) -> Vec<Genotype> {
    genotypes.iter().copied().filter(|gt| !gt.is_missing()).collect()
}

/// No called sample may be homozygous reference and all calls must be identical.
pub fn dominant_consistent(genotypes: &[Genotype]) -> bool {
    let called = called(genotypes);
    if called.iter().any(|gt| *gt == Genotype::Called(0, 0)) {
        return false;
    }
    called
        .iter()
        .tuple_combinations()
        .all(|(a, b)| a.ibs(*b) == 2)
}

/// Every called sample must be homozygous for an alternate allele and any two
/// calls must share an allele.
pub fn recessive_consistent(genotypes: &[Genotype]) -> bool {
    let called = called(genotypes);
    if !called.iter().all(|gt| gt.is_homozygous()) {
        return false;
    }
    if called
        .iter()
        .any(|gt| matches!(gt, Genotype::Called(a, b) if *a == 0 || *b == 0))
    {
        return false;
    }
    called
        .iter()
        .tuple_combinations()
        .all(|(a, b)| a.ibs(*b) >= 1)
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Region { chrom, start, stop } => {
                let start = start.map_or_else(|| "-inf".to_owned(), |s| s.to_string());
                let stop = stop.map_or_else(|| "inf".to_owned(), |s| s.to_string());
                write!(f, "CHROM is {} and {} <= POS <= {}", chrom, start, stop)
            }
            Condition::MinQual(threshold) => write!(f, "QUAL > {}", threshold),
            Condition::FilterPass => write!(f, "FILTER is {}", PASS),
            Condition::MinCallRate(threshold) => write!(f, "Genotype call rate >= {}", threshold),
            Condition::Info {
                field, operator, ..
            } if operator.is_presence() => write!(f, "INFO {} {}", field, operator),
            Condition::Info {
                field,
                operator,
                value,
            } => write!(f, "INFO {} {} {}", field, operator, value),
            Condition::Inheritance(model) => {
                write!(f, "Genotypes consistent with {} inheritance", model)
            }
        }
    }
}

/// The compiled, ordered condition list with one description per condition.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Conditions {
    conditions: Vec<Condition>,
    descriptions: Vec<String>,
}

impl Conditions {
    /// Builds the conditions in their fixed order: region, quality, FILTER,
    /// call rate, INFO predicates as given, inheritance model.
    pub fn compile(config: &FilterConfig) -> Result<Self, ConfigError> {
        let mut conditions = Vec::new();
        if let Some(region) = &config.region {
            conditions.push(region_condition(region)?);
        }
        if let Some(threshold) = config.min_qual {
            conditions.push(Condition::MinQual(threshold));
        }
        if config.require_pass {
            conditions.push(Condition::FilterPass);
        }
        if let Some(rate) = config.min_call_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidCallRate(rate));
            }
            conditions.push(Condition::MinCallRate(rate));
        }
        for spec in &config.info_filters {
            conditions.push(info_condition(spec)?);
        }
        match config.inheritance.iter().unique().collect_vec().as_slice() {
            [] => {}
            [model] => conditions.push(Condition::Inheritance(**model)),
            _ => return Err(ConfigError::ConflictingInheritanceModels),
        }
        Ok(Conditions::new(conditions))
    }

    pub fn new(conditions: Vec<Condition>) -> Self {
        let descriptions = conditions.iter().map(ToString::to_string).collect();
        Conditions {
            conditions,
            descriptions,
        }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn uses_genotypes(&self) -> bool {
        self.conditions.iter().any(Condition::uses_genotypes)
    }

    /// One boolean per condition, in order. Genotypes are extracted at most
    /// once, and only if a condition needs them.
    pub fn evaluate(&self, record: &VariantRecord) -> Result<Vec<bool>, RecordError> {
        let mut cache = None;
        self.conditions
            .iter()
            .map(|condition| condition.matches_cached(record, &mut cache))
            .collect()
    }
}

fn region_bound(bound: &str) -> Result<Option<u64>, ConfigError> {
    match bound.parse::<i64>() {
        Ok(-1) => Ok(None),
        Ok(b) if b >= 0 => Ok(Some(b as u64)),
        _ => Err(ConfigError::InvalidRegionBound(bound.to_owned())),
    }
}

fn region_condition(region: &RegionSpec) -> Result<Condition, ConfigError> {
    Ok(Condition::Region {
        chrom: region.chrom.clone(),
        start: region_bound(&region.start)?,
        stop: region_bound(&region.stop)?,
    })
}

fn info_condition(spec: &InfoFilterSpec) -> Result<Condition, ConfigError> {
    let operator: Operator = spec
        .operator
        .parse()
        .map_err(|_| ConfigError::UnknownOperator(spec.operator.clone()))?;
    let value = match operator {
        Operator::Contains | Operator::NotContains => Value::Text(spec.value.clone()),
        op if op.is_presence() => Value::Text(spec.value.clone()),
        op => {
            let value = Value::parse(&spec.value);
            if op.is_numeric() && value.number().is_none() {
                return Err(ConfigError::NonNumericThreshold {
                    operator: spec.operator.clone(),
                    value: spec.value.clone(),
                });
            }
            value
        }
    };
    Ok(Condition::Info {
        field: spec.field.clone(),
        operator,
        value,
    })
}

pub mod condition;
pub mod config;
pub mod error;
pub mod filter;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod stats;
pub mod types;

pub use condition::{Condition, Conditions, InheritanceModel, Operator};
pub use config::{FilterConfig, InfoFilterSpec, RegionSpec, StreamOptions};
pub use error::{ConfigError, Error, RecordError};
pub use filter::{filter_path, filter_records, FilterReport};
pub use reader::VcfRecords;
pub use record::VariantRecord;
pub use stats::FilterStats;

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::types::Genotype;

    const EXAMPLE: &str = "resources/example.vcf";

    fn passing_lines(path: &str) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_samples() {
        let records = VcfRecords::from_path(EXAMPLE).unwrap();
        assert_eq!(records.header().samples(), &vec!["NA00001", "NA00002", "NA00003"]);
    }

    #[test]
    fn test_compressed_inputs() {
        for path in [EXAMPLE, "resources/example.vcf.gz", "resources/example.vcf.bz2"] {
            let records = VcfRecords::from_path(path).unwrap();
            assert_eq!(records.filter(Result::is_ok).count(), 6, "{}", path);
        }
    }

    #[test]
    fn test_genotypes_from_file() {
        let first = VcfRecords::from_path(EXAMPLE)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(
            first.genotypes().unwrap(),
            vec![
                Genotype::Called(0, 0),
                Genotype::Called(1, 0),
                Genotype::Called(1, 1)
            ]
        );
    }

    #[test]
    fn test_default_run() {
        let conditions = Conditions::compile(&FilterConfig::default()).unwrap();
        let report = filter_path(EXAMPLE, None, &conditions, &StreamOptions::default()).unwrap();
        assert_eq!(report.stats().examined(), 6);
        assert_eq!(report.stats().passing_total(), &vec![4]);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn test_output_round_trip() {
        let dir = std::env::temp_dir().join(format!("vcf-filter-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let out = dir.join("filtered.vcf");

        let config = FilterConfig {
            min_qual: Some(20.0),
            info_filters: vec![InfoFilterSpec::new("DP", "gte", "10")],
            ..FilterConfig::default()
        };
        let conditions = Conditions::compile(&config).unwrap();
        let report = filter_path(
            "resources/example.vcf.gz",
            Some(out.as_path()),
            &conditions,
            &StreamOptions::default(),
        )
        .unwrap();

        let passed = passing_lines(out.to_str().unwrap());
        let ids: Vec<&str> = passed
            .iter()
            .map(|l| l.split('\t').nth(2).unwrap())
            .collect();
        assert_eq!(ids, vec!["rs6054257", "rs6040355", "."]);

        let input = passing_lines(EXAMPLE);
        for line in &passed {
            assert!(input.contains(line));
        }
        assert_eq!(report.stats().passing_total(), &vec![5, 4, 5]);
        assert_eq!(report.stats().passing_sequential(), &vec![5, 4, 3]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_genotype_based_conditions() {
        let config = FilterConfig {
            require_pass: false,
            min_call_rate: Some(1.0),
            inheritance: vec![InheritanceModel::Dominant],
            ..FilterConfig::default()
        };
        let conditions = Conditions::compile(&config).unwrap();
        let report = filter_path(EXAMPLE, None, &conditions, &StreamOptions::default()).unwrap();
        assert_eq!(report.stats().examined(), 6);
        assert_eq!(report.stats().passing_total(), &vec![5, 1]);
        assert_eq!(report.stats().passing_sequential(), &vec![5, 1]);
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::info;

use vcf_filter::{
    filter_path, Conditions, FilterConfig, InfoFilterSpec, InheritanceModel, RegionSpec,
    StreamOptions,
};

/// Filter variants in a VCF file
#[derive(Parser, Debug)]
#[command(name = "vcf-filter", version, about)]
struct Cli {
    /// VCF file for processing (plain, gzip or bzip2)
    #[arg(short, long = "file", value_name = "VCFFILE")]
    file: PathBuf,

    /// File for output; nothing is written if omitted
    #[arg(short, long = "out", value_name = "OUTFILE")]
    out: Option<PathBuf>,

    /// Restrict to a region; -1 leaves a bound open
    #[arg(
        long,
        num_args = 3,
        value_names = ["CHROM", "START", "STOP"],
        allow_negative_numbers = true
    )]
    region: Option<Vec<String>>,

    /// Minimum QUAL (exclusive)
    #[arg(long)]
    min_qual: Option<f64>,

    /// Minimum fraction of samples with a called genotype
    #[arg(long)]
    call_rate: Option<f64>,

    /// Do not require FILTER to be PASS
    #[arg(long)]
    no_pass_filter: bool,

    /// Filter on an INFO field, e.g. `--info-filter AF gt 0.3`. Repeatable
    #[arg(
        long = "info-filter",
        num_args = 3,
        value_names = ["FIELD", "OP", "VALUE"],
        action = clap::ArgAction::Append,
        allow_negative_numbers = true
    )]
    info_filters: Vec<String>,

    /// Require genotypes consistent with an inheritance model (dominant or recessive)
    #[arg(long = "model", value_parser = parse_model)]
    models: Vec<InheritanceModel>,

    /// Only keep variants with an external identifier
    #[arg(long)]
    require_id: bool,

    /// Identifier prefix used by --require-id
    #[arg(long, default_value = "rs")]
    id_prefix: String,

    /// Only keep single-nucleotide variants
    #[arg(long)]
    snv_only: bool,

    /// Do not log each passing variant
    #[arg(short, long)]
    quiet: bool,
}

fn parse_model(s: &str) -> Result<InheritanceModel, strum::ParseError> {
    s.parse()
}

impl Cli {
    fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            region: self.region.as_ref().and_then(|r| {
                r.iter()
                    .cloned()
                    .collect_tuple()
                    .map(|(chrom, start, stop)| RegionSpec { chrom, start, stop })
            }),
            min_qual: self.min_qual,
            require_pass: !self.no_pass_filter,
            min_call_rate: self.call_rate,
            info_filters: self
                .info_filters
                .iter()
                .tuples()
                .map(|(field, operator, value)| InfoFilterSpec::new(field, operator, value))
                .collect(),
            inheritance: self.models.clone(),
        }
    }

    fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            id_prefix: self.require_id.then(|| self.id_prefix.clone()),
            snv_only: self.snv_only,
            progress: !self.quiet,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let conditions = Conditions::compile(&cli.filter_config()).context("Invalid filter")?;
    for (i, description) in conditions.descriptions().iter().enumerate() {
        info!("Filter {}: {}", i + 1, description);
    }

    let report = filter_path(
        &cli.file,
        cli.out.as_deref(),
        &conditions,
        &cli.stream_options(),
    )
    .with_context(|| format!("Failed to filter {}", cli.file.display()))?;
    print!("{}", report);
    Ok(())
}

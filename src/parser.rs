use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_till};
use nom::character::complete::{char, digit1, one_of, space1};
use nom::combinator::{all_consuming, map_res, opt, value};
use nom::multi::{separated_list0, separated_list1};
use nom::sequence::{pair, preceded, tuple};
use nom::{Finish, IResult};

use crate::types::MISSING;

/// A single allele index, `None` for the `.` placeholder.
fn allele(input: &str) -> IResult<&str, Option<u32>> {
    alt((
        value(None, tag(MISSING)),
        map_res(digit1, |d: &str| d.parse::<u32>().map(Some)),
    ))(input)
}

/// `a/b` or `a|b`; phasing is dropped.
fn genotype(input: &str) -> IResult<&str, (Option<u32>, Option<u32>)> {
    let (input, (first, _, second)) = tuple((allele, one_of("/|"), allele))(input)?;
    Ok((input, (first, second)))
}

pub(crate) fn genotype_alleles(input: &str) -> Option<(Option<u32>, Option<u32>)> {
    all_consuming(genotype)(input).finish().ok().map(|(_, gt)| gt)
}

fn info_pair(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    // split on the first '=' only, the value may contain further '='
    pair(
        take_till(|c| c == '=' || c == ';'),
        opt(preceded(char('='), take_till(|c| c == ';'))),
    )(input)
}

/// Splits an INFO column into `(key, value)` pairs, skipping empty entries.
pub(crate) fn info_pairs(input: &str) -> Vec<(&str, Option<&str>)> {
    // every input is accepted, since both halves of a pair may be empty
    separated_list0(char(';'), info_pair)(input)
        .map(|(_, pairs)| pairs)
        .unwrap_or_default()
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn header_line(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(char('#'), separated_list1(space1, is_not(" \t")))(input)
}

pub(crate) fn header_columns(input: &str) -> Result<Vec<&str>, nom::error::Error<&str>> {
    all_consuming(header_line)(input)
        .finish()
        .map(|(_, columns)| columns)
}

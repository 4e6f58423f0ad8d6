//! `$top` and `$skip`.

use crate::translation::error::{Error, ErrorKind, Parameter};

/// Parse `$top`, clamping it to `max_top`.
pub fn parse_top(raw: &str, max_top: u32) -> Result<u32, Error> {
    let top = parse_count_of_rows(Parameter::Top, raw)?;
    Ok(u32::try_from(top).map_or(max_top, |top| top.min(max_top)))
}

/// Parse `$skip`.
pub fn parse_skip(raw: &str) -> Result<u32, Error> {
    let skip = parse_count_of_rows(Parameter::Skip, raw)?;
    u32::try_from(skip).map_err(|_| {
        Error::new(
            Parameter::Skip,
            ErrorKind::InvalidParameter(format!("{skip} is too large")),
        )
    })
}

fn parse_count_of_rows(parameter: Parameter, raw: &str) -> Result<u64, Error> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::new(
            parameter,
            ErrorKind::InvalidParameter(format!("expected a non-negative integer, got '{raw}'")),
        )
    })
}

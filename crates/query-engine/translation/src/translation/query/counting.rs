//! `$count` and `$inlinecount`.

use crate::translation::error::{Error, ErrorKind, Parameter};

/// `$count` on its own, or `$count=true`, asks for the number of matching rows.
pub fn parse_count(raw: &str) -> Result<bool, Error> {
    match raw.trim() {
        "" => Ok(true),
        value if value.eq_ignore_ascii_case("true") => Ok(true),
        value if value.eq_ignore_ascii_case("false") => Ok(false),
        value => Err(Error::new(
            Parameter::Count,
            ErrorKind::InvalidParameter(format!("expected 'true' or 'false', got '{value}'")),
        )),
    }
}

/// `$inlinecount=allpages` asks for the number of matching rows next to the results.
pub fn parse_inline_count(raw: &str) -> Result<bool, Error> {
    match raw.trim() {
        value if value.eq_ignore_ascii_case("allpages") => Ok(true),
        value if value.eq_ignore_ascii_case("none") => Ok(false),
        value => Err(Error::new(
            Parameter::InlineCount,
            ErrorKind::InvalidParameter(format!(
                "expected 'allpages' or 'none', got '{value}'"
            )),
        )),
    }
}

//! Split a raw query string into the system query options we understand.

use crate::translation::error::{Error, ErrorKind, Parameter};

/// The raw, decoded value of every system query option present in a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub top: Option<String>,
    pub skip: Option<String>,
    pub select: Option<String>,
    pub count: Option<String>,
    pub inline_count: Option<String>,
}

impl RawParameters {
    /// Decode an `application/x-www-form-urlencoded` query string. A leading `?` is ignored.
    ///
    /// Each option may appear at most once. Anything that is not a system query option we
    /// support is skipped.
    pub fn parse(query: &str) -> Result<RawParameters, Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parameters = RawParameters::default();

        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let Some(parameter) = Parameter::from_name(&name) else {
                tracing::debug!(parameter = %name, "ignoring unsupported query parameter");
                continue;
            };
            let slot = parameters.slot(parameter);
            if slot.is_some() {
                return Err(Error::new(
                    parameter,
                    ErrorKind::InvalidParameter(format!("{parameter} given more than once")),
                ));
            }
            *slot = Some(value.into_owned());
        }

        Ok(parameters)
    }

    fn slot(&mut self, parameter: Parameter) -> &mut Option<String> {
        match parameter {
            Parameter::Filter => &mut self.filter,
            Parameter::OrderBy => &mut self.order_by,
            Parameter::Top => &mut self.top,
            Parameter::Skip => &mut self.skip,
            Parameter::Select => &mut self.select,
            Parameter::Count => &mut self.count,
            Parameter::InlineCount => &mut self.inline_count,
        }
    }
}

use thiserror::Error;

use crate::fields::FieldSelector;

/// Items per page when no `limit` is given
pub const DEFAULT_LIMIT: u32 = 10;
/// Page served when no `page` is given
pub const DEFAULT_PAGE: u32 = 1;

/// Raw url parameters for pagination and projection, as sent by the client
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Maximum number of entries returned
    pub limit: Option<String>,
    /// 1-based page index
    pub page: Option<String>,
    /// Comma separated list of fields to return
    pub fields: Option<String>,
}

/// Rejected pagination parameter
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamError {
    /// Value is not an integer
    #[error("`{param}` must be a positive integer, got `{value}`")]
    NotANumber {
        /// Parameter name
        param: &'static str,
        /// Raw value
        value: String,
    },
    /// Value is an integer below 1
    #[error("`{param}` must be greater than zero, got `{value}`")]
    NotPositive {
        /// Parameter name
        param: &'static str,
        /// Raw value
        value: String,
    },
}

/// Validated pagination request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Items per page, always at least 1
    pub limit: u32,
    /// 1-based page index, always at least 1
    pub page: u32,
    /// Requested projection
    pub fields: FieldSelector,
}

impl PaginationParams {
    /// Pick `limit`, `page` and `fields` out of decoded query pairs.
    ///
    /// A repeated key keeps its last value, other keys are ignored.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "limit" => params.limit = Some(value),
                "page" => params.page = Some(value),
                "fields" => params.fields = Some(value),
                _ => {}
            }
        }
        params
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, page: DEFAULT_PAGE, fields: FieldSelector::All }
    }
}

impl PageRequest {
    /// Number of entries to skip to reach the requested page
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl TryFrom<&PaginationParams> for PageRequest {
    type Error = ParamError;

    fn try_from(params: &PaginationParams) -> Result<Self, Self::Error> {
        normalize(params.limit.as_deref(), params.page.as_deref(), params.fields.as_deref())
    }
}

/// Parse a strictly positive integer parameter, `default` when absent.
/// # Errors
/// `ParamError` when the value is not an integer or is below 1
pub fn parse_positive(
    param: &'static str,
    raw: Option<&str>,
    default: u32,
) -> Result<u32, ParamError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let trimmed = raw.trim();

    match trimmed.parse::<u32>() {
        Ok(0) => Err(ParamError::NotPositive { param, value: raw.to_owned() }),
        Ok(n) => Ok(n),
        // Negative integers are still integers, report them as such
        Err(_) if trimmed.strip_prefix('-').is_some_and(|d| d.parse::<u64>().is_ok()) => {
            Err(ParamError::NotPositive { param, value: raw.to_owned() })
        }
        Err(_) => Err(ParamError::NotANumber { param, value: raw.to_owned() }),
    }
}

/// Turn raw `limit`, `page` and `fields` values into a `PageRequest`.
/// # Errors
/// `ParamError` for a malformed `limit` or `page`, there is no silent fallback
pub fn normalize(
    raw_limit: Option<&str>,
    raw_page: Option<&str>,
    raw_fields: Option<&str>,
) -> Result<PageRequest, ParamError> {
    Ok(PageRequest {
        limit: parse_positive("limit", raw_limit, DEFAULT_LIMIT)?,
        page: parse_positive("page", raw_page, DEFAULT_PAGE)?,
        fields: FieldSelector::parse(raw_fields),
    })
}

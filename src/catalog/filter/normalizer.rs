use chrono::NaiveDateTime;
use crate::catalog::filter::{FilterRequest, NormalizedFilter};
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::parse_naive_date_time;

pub(crate) const INVALID_DATE: &str = "invalid_date";
pub(crate) const INVALID_PAGE: &str = "invalid_page";

// trimmed and lower-cased, blank input counts as absent
pub(crate) fn normalize_text(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_lowercase()).filter(|v| !v.is_empty())
}

// Blank input is absent and never parsed. Anything else must parse.
pub(crate) fn normalize_date(field: &str, value: Option<&str>) -> LibraryResult<Option<NaiveDateTime>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_naive_date_time(raw).map(Some).ok_or_else(|| {
            tracing::warn!(field, value = raw, "rejected malformed date");
            LibraryError::validation(
                format!("Bad date format for {}. Use YYYY-MM-DD.", field).as_str(),
                Some(INVALID_DATE.to_string()))
        }),
    }
}

pub(crate) fn normalize(request: &FilterRequest) -> LibraryResult<NormalizedFilter> {
    if request.page < 1 {
        return Err(LibraryError::validation("page must be 1 or greater", Some(INVALID_PAGE.to_string())));
    }
    if request.limit < 1 {
        return Err(LibraryError::validation("limit must be 1 or greater", Some(INVALID_PAGE.to_string())));
    }
    Ok(NormalizedFilter {
        book_name: normalize_text(request.book_name.as_deref()),
        author: normalize_text(request.author.as_deref()),
        book_type: normalize_text(request.book_type.as_deref()),
        price: request.price,
        published_from: normalize_date("publication_date_start_date",
                                       request.publication_date_start_date.as_deref())?,
        published_to: normalize_date("publication_date_end_date",
                                     request.publication_date_end_date.as_deref())?,
        page: request.page,
        limit: request.limit,
        group_by: request.group_by.clone(),
        asc_or_desc: request.asc_or_desc.clone(),
    })
}

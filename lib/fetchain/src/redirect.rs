//! Redirect handling for [`Redirect::Follow`](crate::Redirect::Follow).

use url::Url;

use crate::{Method, TransportError};

/// Default maximum number of redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Statuses that carry a `Location` to follow.
pub(crate) const fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Method for the next hop.
///
/// 303 turns anything but `GET`/`HEAD` into `GET`; 301/302 only rewrite
/// `POST`. 307/308 always keep the method.
pub(crate) const fn redirect_method(status: u16, original: Method) -> Method {
    match (status, original) {
        (303, Method::Get | Method::Head) => original,
        (303, _) | (301 | 302, Method::Post) => Method::Get,
        _ => original,
    }
}

/// Headers that must not follow a redirect to another origin.
pub(crate) const CREDENTIAL_HEADERS: [&str; 3] = ["authorization", "proxy-authorization", "cookie"];

/// Whether `name` carries credentials.
pub(crate) fn is_credential_header(name: &str) -> bool {
    CREDENTIAL_HEADERS
        .iter()
        .any(|credential| name.eq_ignore_ascii_case(credential))
}

/// Resolve a `Location` header against the URL that produced it.
pub(crate) fn resolve_location(current: &Url, location: &str) -> Result<Url, TransportError> {
    current
        .join(location)
        .map_err(|err| TransportError::Redirect(format!("bad location '{location}': {err}")))
}

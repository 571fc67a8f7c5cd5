// SPDX-License-Identifier: MPL-2.0

//! Cookie-header parsing for the CSRF token.

use percent_encoding::percent_decode_str;

/// Find `name` in a `Cookie` header value (`a=1; b=2`) and percent-decode it.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| decode_component(value))
        })
        .filter(|value| !value.is_empty())
}

/// Percent-decode a URI component. `+` stays literal; invalid UTF-8 is
/// replaced.
pub(crate) fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

use std::borrow::Cow;

/// Encodes text placed between tags.
pub fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Encodes text placed inside a double-quoted attribute.
pub fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Encoded `href` value for an http(s) URL. Any other scheme yields `None`.
pub fn http_href(url: &str) -> Option<Cow<'_, str>> {
    let url = url.trim();
    let scheme = url.split_once("://").map(|(scheme, _)| scheme)?;
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")).then(|| attr(url))
}

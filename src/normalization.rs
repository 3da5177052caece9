use crate::entry::SubmissionForm;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// Trims a website and prepends `https://` unless it already starts
/// with an `http://` or `https://` scheme, in any case.
///
/// ```
/// use directory::normalization::normalize_website;
/// assert_eq!(normalize_website(" example.com "), "https://example.com");
/// assert_eq!(normalize_website("HTTP://Example.com"), "HTTP://Example.com");
/// assert_eq!(normalize_website("   "), "");
/// ```
pub fn normalize_website(raw: impl AsRef<str>) -> String {
    let trimmed = raw.as_ref().trim();

    if trimmed.is_empty() {
        return String::new();
    }

    if has_scheme(trimmed, HTTP_SCHEME) || has_scheme(trimmed, HTTPS_SCHEME) {
        trimmed.to_owned()
    } else {
        format!("{}{}", HTTPS_SCHEME, trimmed)
    }
}

/// Trims an Instagram handle and strips at most one leading `@`.
///
/// ```
/// use directory::normalization::normalize_instagram;
/// assert_eq!(normalize_instagram(" @Foo "), "Foo");
/// assert_eq!(normalize_instagram("@@foo"), "@foo");
/// ```
pub fn normalize_instagram(raw: impl AsRef<str>) -> String {
    let trimmed = raw.as_ref().trim();

    trimmed.strip_prefix('@').unwrap_or(trimmed).to_owned()
}

/// Applies the website and Instagram normalizations to a form, leaving
/// every other field as entered.
pub fn normalize_form(form: SubmissionForm) -> SubmissionForm {
    SubmissionForm {
        website: normalize_website(&form.website),
        instagram: normalize_instagram(&form.instagram),
        ..form
    }
}

fn has_scheme(s: &str, scheme: &str) -> bool {
    s.get(..scheme.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .unwrap_or(false)
}

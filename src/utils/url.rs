// src/utils/url.rs

//! URL manipulation utilities.

/// Build the URL for the Nth page of a paginated listing.
///
/// The CMS pages listings as `list.htm`, `list2.htm`, `list3.htm`, ...
///
/// # Examples
/// ```
/// use bboard::utils::url::make_page_url;
///
/// assert_eq!(
///     make_page_url("http://x/12577/list.htm", 1),
///     "http://x/12577/list.htm"
/// );
/// assert_eq!(
///     make_page_url("http://x/12577/list.htm", 2),
///     "http://x/12577/list2.htm"
/// );
/// ```
pub fn make_page_url(list_url: &str, page: u32) -> String {
    if page <= 1 {
        return list_url.to_string();
    }
    list_url.replace("/list.htm", &format!("/list{page}.htm"))
}

/// Resolve an article href against a base domain.
///
/// Absolute hrefs are used as-is; anything else is appended to the base
/// domain with its trailing slash stripped.
pub fn resolve(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}{}", base_url.trim_end_matches('/'), href)
}

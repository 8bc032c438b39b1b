// src/services/extractor.rs

//! Structural notice extraction from listing pages.
//!
//! WebPlus CMS structure: `<li><a href="...page.htm">title</a><span>date</span></li>`

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::NoticeItem;
use crate::utils::url::resolve;

/// WebPlus article URL pattern, e.g. `/2026/0213/c12577a3134640/page.htm`.
static ARTICLE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d{4}/\d{4}/[^/]+/page\.htm$").expect("valid regex"));

/// Date pattern in text: `YYYY-MM-DD`.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

static SPAN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));

/// Extract notice items from a parsed listing page.
///
/// Pure function over the document tree: selects anchors whose target looks
/// like an article page, skips anchors with empty visible text, dedupes by
/// absolute URL within the page (first occurrence wins), and attaches a
/// best-effort date. Never fails on malformed markup; a page with no
/// matching anchors yields an empty list.
pub fn extract_items(document: &Html, base_url: &str) -> Vec<NoticeItem> {
    let mut items = Vec::new();
    let mut seen_urls = HashSet::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !ARTICLE_URL_RE.is_match(href) {
            continue;
        }

        let title = normalize_whitespace(&anchor.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        let url = resolve(base_url, href);
        if !seen_urls.insert(url.clone()) {
            continue;
        }

        let date = find_date(&anchor);
        items.push(NoticeItem { title, url, date });
    }

    items
}

/// Best-effort date lookup around an anchor.
///
/// Searches the nearest `<li>` ancestor for a `YYYY-MM-DD` substring,
/// preferring one inside a `<span>` (the CMS renders the date as a badge
/// next to the title) over the raw list-item text. Returns an empty string
/// when nothing matches.
fn find_date(anchor: &ElementRef) -> String {
    let Some(li) = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "li")
    else {
        return String::new();
    };

    for span in li.select(&SPAN_SELECTOR) {
        let text: String = span.text().collect();
        if let Some(m) = DATE_RE.find(&text) {
            return m.as_str().to_string();
        }
    }

    let text: String = li.text().collect();
    DATE_RE
        .find(&text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://ckc.zju.edu.cn";

    fn extract(html: &str) -> Vec<NoticeItem> {
        let document = Html::parse_document(html);
        extract_items(&document, BASE)
    }

    #[test]
    fn test_extracts_title_url_and_date() {
        let items = extract(
            r#"<ul>
                <li><a href="/2026/0213/c54005a100/page.htm">考试安排</a><span>2026-02-13</span></li>
            </ul>"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "考试安排");
        assert_eq!(items[0].url, "http://ckc.zju.edu.cn/2026/0213/c54005a100/page.htm");
        assert_eq!(items[0].date, "2026-02-13");
    }

    #[test]
    fn test_ignores_non_article_links() {
        let items = extract(
            r#"<ul>
                <li><a href="/54005/list2.htm">下一页</a></li>
                <li><a href="/about/index.htm">关于</a></li>
            </ul>"#,
        );
        assert!(items.is_empty());
    }

    #[test]
    fn test_skips_empty_title() {
        let items = extract(
            r#"<ul>
                <li><a href="/2026/0213/c54005a100/page.htm">  </a></li>
                <li><a href="/2026/0213/c54005a101/page.htm">有标题</a></li>
            </ul>"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "有标题");
    }

    #[test]
    fn test_dedupes_within_page_first_wins() {
        let items = extract(
            r#"<ul>
                <li><a href="/2026/0213/c54005a100/page.htm">第一条</a></li>
                <li><a href="/2026/0213/c54005a100/page.htm">重复条目</a></li>
            </ul>"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "第一条");
    }

    #[test]
    fn test_absolute_href_used_as_is() {
        let items = extract(
            r#"<li><a href="http://cspo.zju.edu.cn/2026/0101/c86671a1/page.htm">通知</a></li>"#,
        );
        assert_eq!(items[0].url, "http://cspo.zju.edu.cn/2026/0101/c86671a1/page.htm");
    }

    #[test]
    fn test_date_prefers_span_over_li_text() {
        let items = extract(
            r#"<li>
                2025-12-31
                <a href="/2026/0101/c54005a1/page.htm">元旦通知</a>
                <span>2026-01-01</span>
            </li>"#,
        );
        assert_eq!(items[0].date, "2026-01-01");
    }

    #[test]
    fn test_date_falls_back_to_li_text() {
        let items = extract(
            r#"<li><a href="/2026/0101/c54005a1/page.htm">通知</a> 发布于 2026-01-02</li>"#,
        );
        assert_eq!(items[0].date, "2026-01-02");
    }

    #[test]
    fn test_date_empty_when_absent() {
        let items = extract(r#"<li><a href="/2026/0101/c54005a1/page.htm">通知</a></li>"#);
        assert_eq!(items[0].date, "");
    }

    #[test]
    fn test_date_empty_without_li_ancestor() {
        let items = extract(
            r#"<div><a href="/2026/0101/c54005a1/page.htm">通知</a> 2026-01-03</div>"#,
        );
        assert_eq!(items[0].date, "");
    }

    #[test]
    fn test_title_whitespace_normalized() {
        let items = extract(
            "<li><a href=\"/2026/0101/c54005a1/page.htm\">  多行\n  标题  </a></li>",
        );
        assert_eq!(items[0].title, "多行 标题");
    }

    #[test]
    fn test_malformed_markup_yields_empty() {
        let items = extract("<li><a href='/2026/....'><<<</li>");
        assert!(items.is_empty());
    }
}

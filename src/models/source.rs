// src/models/source.rs

//! College source descriptors and source resolution.

use serde::{Deserialize, Serialize};

/// A college bulletin board source.
///
/// Every college has a public listing page. Some additionally declare an
/// intranet listing page that is only reachable through the WebVPN gateway;
/// for those the public page serves as a fallback when no authenticated
/// session is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique identifier for the college (e.g., "cs")
    pub id: String,

    /// Display name
    pub name: String,

    /// Public notice list URL, reachable without authentication
    pub list_url: String,

    /// Base domain for resolving relative links on the public list page
    pub base_url: String,

    /// Campus-only notice list URL, accessed via the WebVPN gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intranet_url: Option<String>,

    /// Base domain for resolving relative links on intranet pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intranet_base: Option<String>,
}

/// The URL/base pair actually used for a run, picked by [`SourceConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Listing page URL to fetch
    pub url: String,

    /// Base domain for resolving relative article links
    pub base_url: String,

    /// Whether requests must be rewritten through the gateway proxy
    pub via_gateway: bool,
}

impl SourceConfig {
    /// Pick the listing URL and base domain for this run.
    ///
    /// The intranet pair is used only when it is declared and the gateway
    /// login succeeded; everything else falls back to the public pair.
    pub fn resolve(&self, authenticated: bool) -> ResolvedSource {
        if authenticated {
            if let (Some(url), Some(base)) = (&self.intranet_url, &self.intranet_base) {
                return ResolvedSource {
                    url: url.clone(),
                    base_url: base.clone(),
                    via_gateway: true,
                };
            }
        }

        ResolvedSource {
            url: self.list_url.clone(),
            base_url: self.base_url.clone(),
            via_gateway: false,
        }
    }

    /// Whether this college declares an intranet listing.
    pub fn has_intranet(&self) -> bool {
        self.intranet_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_only() -> SourceConfig {
        SourceConfig {
            id: "sis".to_string(),
            name: "外国语学院".to_string(),
            list_url: "http://www.sis.zju.edu.cn/sischinese/12577/list.htm".to_string(),
            base_url: "http://www.sis.zju.edu.cn".to_string(),
            intranet_url: None,
            intranet_base: None,
        }
    }

    fn with_intranet() -> SourceConfig {
        SourceConfig {
            id: "cs".to_string(),
            name: "计算机科学与技术学院".to_string(),
            list_url: "http://www.cs.zju.edu.cn/csen/xwdt_38564/list.htm".to_string(),
            base_url: "http://www.cs.zju.edu.cn".to_string(),
            intranet_url: Some("http://cspo.zju.edu.cn/86671/list.htm".to_string()),
            intranet_base: Some("http://cspo.zju.edu.cn".to_string()),
        }
    }

    #[test]
    fn test_resolve_intranet_when_authenticated() {
        let resolved = with_intranet().resolve(true);
        assert_eq!(resolved.url, "http://cspo.zju.edu.cn/86671/list.htm");
        assert_eq!(resolved.base_url, "http://cspo.zju.edu.cn");
        assert!(resolved.via_gateway);
    }

    #[test]
    fn test_resolve_public_when_unauthenticated() {
        let resolved = with_intranet().resolve(false);
        assert_eq!(resolved.url, "http://www.cs.zju.edu.cn/csen/xwdt_38564/list.htm");
        assert_eq!(resolved.base_url, "http://www.cs.zju.edu.cn");
        assert!(!resolved.via_gateway);
    }

    #[test]
    fn test_resolve_public_only_ignores_auth_state() {
        let source = public_only();
        for authenticated in [true, false] {
            let resolved = source.resolve(authenticated);
            assert_eq!(resolved.url, source.list_url);
            assert_eq!(resolved.base_url, source.base_url);
            assert!(!resolved.via_gateway);
        }
    }
}

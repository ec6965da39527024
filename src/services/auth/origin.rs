//! Cross-origin allow-list.
//!
//! Built once from `Config` at startup and shared read-only afterwards; there
//! is no mutation API.

use axum::http::HeaderValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// No `Origin` header: same-origin or non-browser client.
    AdmitAbsent,
    /// Exact match against the allow-list.
    AdmitListed,
    Reject,
}

#[derive(Debug, Clone)]
pub struct AllowList {
    origins: Vec<HeaderValue>,
}

impl AllowList {
    /// Entries that are empty or not valid header values are dropped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<HeaderValue> = Vec::new();
        for origin in origins {
            let origin = origin.as_ref().trim();
            if origin.is_empty() {
                continue;
            }
            match HeaderValue::from_str(origin) {
                Ok(v) if !list.contains(&v) => list.push(v),
                Ok(_) => {}
                Err(_) => tracing::warn!(origin, "ignoring unusable allow-list entry"),
            }
        }

        Self { origins: list }
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|v| v == origin)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Decide on the raw `Origin` header value (absent when `None`).
    pub fn decide(&self, origin: Option<&HeaderValue>) -> OriginDecision {
        match origin {
            None => OriginDecision::AdmitAbsent,
            Some(o) if self.contains(o) => OriginDecision::AdmitListed,
            Some(_) => OriginDecision::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> AllowList {
        AllowList::new(["http://localhost:3000", "https://shop.example.com"])
    }

    #[test]
    fn absent_origin_is_always_admitted() {
        assert_eq!(list().decide(None), OriginDecision::AdmitAbsent);
        assert_eq!(
            AllowList::new(Vec::<String>::new()).decide(None),
            OriginDecision::AdmitAbsent
        );
    }

    #[test]
    fn listed_origin_is_admitted() {
        let origin = HeaderValue::from_static("https://shop.example.com");
        assert_eq!(list().decide(Some(&origin)), OriginDecision::AdmitListed);
    }

    #[test]
    fn match_is_exact() {
        for raw in [
            "https://shop.example.com/",
            "http://shop.example.com",
            "https://SHOP.example.com",
            "https://shop.example.com.evil.io",
            "null",
        ] {
            let origin = HeaderValue::from_static(raw);
            assert_eq!(list().decide(Some(&origin)), OriginDecision::Reject, "{raw}");
        }
    }

    #[test]
    fn non_utf8_origin_is_rejected() {
        let origin = HeaderValue::from_bytes(b"https://\xffshop").unwrap();
        assert_eq!(list().decide(Some(&origin)), OriginDecision::Reject);
    }

    #[test]
    fn empty_and_duplicate_entries_are_dropped() {
        let list = AllowList::new(["", "  ", "http://a.test", "http://a.test"]);
        assert_eq!(list.len(), 1);
    }
}

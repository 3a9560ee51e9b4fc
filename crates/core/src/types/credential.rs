//! Backend session credential.
//!
//! The backend authenticates browsers with its own cookie. Each of our
//! sessions keeps the cookies the backend set for it and replays them on
//! every call made on that browser's behalf.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Cookies issued by the backend, in the order first seen.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCookie {
    pairs: Vec<(String, String)>,
}

impl BackendCookie {
    /// An empty jar.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Whether no cookie is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Forget every cookie.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Value of a named cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Apply `Set-Cookie` header values.
    ///
    /// A cookie with an empty value or a non-positive `Max-Age` is removed;
    /// otherwise its value replaces any previous one with the same name.
    /// Malformed headers are skipped.
    pub fn absorb<'a>(&mut self, set_cookie_headers: impl IntoIterator<Item = &'a str>) {
        for header in set_cookie_headers {
            let mut parts = header.split(';');
            let Some((name, value)) = parts.next().and_then(|kv| kv.split_once('=')) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');

            let expired = parts.any(|attr| {
                attr.split_once('=').is_some_and(|(k, v)| {
                    k.trim().eq_ignore_ascii_case("max-age")
                        && v.trim().parse::<i64>().is_ok_and(|age| age <= 0)
                })
            });

            self.pairs.retain(|(n, _)| n != name);
            if !expired && !value.is_empty() {
                self.pairs.push((name.to_owned(), value.to_owned()));
            }
        }
    }

    /// Render the `Cookie` request header, if any cookie is held.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }
        Some(
            self.pairs
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl fmt::Debug for BackendCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.pairs.iter().map(|(n, _)| format!("{n}=[REDACTED]")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_and_render() {
        let mut jar = BackendCookie::new();
        jar.absorb(["jwt=abc.def; Path=/; HttpOnly; SameSite=None; Secure"]);
        jar.absorb(["theme=dark"]);
        assert_eq!(jar.header_value().as_deref(), Some("jwt=abc.def; theme=dark"));
    }

    #[test]
    fn test_absorb_replaces_by_name() {
        let mut jar = BackendCookie::new();
        jar.absorb(["jwt=old", "jwt=new; Max-Age=3600"]);
        assert_eq!(jar.get("jwt"), Some("new"));
        assert_eq!(jar.header_value().as_deref(), Some("jwt=new"));
    }

    #[test]
    fn test_absorb_removes_expired_or_empty() {
        let mut jar = BackendCookie::new();
        jar.absorb(["jwt=abc", "sid=1"]);
        jar.absorb(["jwt=; Path=/", "sid=1; max-age=0"]);
        assert!(jar.is_empty());
        assert_eq!(jar.header_value(), None);
    }

    #[test]
    fn test_absorb_skips_malformed() {
        let mut jar = BackendCookie::new();
        jar.absorb(["garbage", "=novalue", ""]);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_debug_redacts_values() {
        let mut jar = BackendCookie::new();
        jar.absorb(["jwt=super-secret-token"]);
        let debug = format!("{jar:?}");
        assert!(debug.contains("jwt=[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }
}

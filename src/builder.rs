use crate::chars::CharClass;
use crate::encoding::quote;
use crate::error::{UriSyntaxError, UriSyntaxErrorKind};
use crate::log::trace;
use crate::parser::ParseOptions;
use crate::uri::Uri;

/// Builds a [`Uri`] from unescaped components.
///
/// Each component is quoted with the characters allowed at its place, then the resulting string is parsed.
/// A literal `%` is quoted in every component except the host, which is written as is.
///
/// Three forms are available:
/// * with a [`host`](Self::host): a server-based authority, which must be valid;
/// * with an [`authority`](Self::authority): a server-based or registry-based authority;
/// * with a [`scheme_specific_part`](Self::scheme_specific_part): the other hierarchical components are ignored.
///
/// ```
/// use oxuri::UriBuilder;
///
/// let uri = UriBuilder::new()
///     .scheme("http")
///     .user_info("j doe")
///     .host("example.com")
///     .port(8080)
///     .path("/a b/c")
///     .query("q=1 2")
///     .fragment("top")
///     .build()
///     .unwrap();
/// assert_eq!(uri.as_str(), "http://j%20doe@example.com:8080/a%20b/c?q=1%202#top");
/// assert_eq!(uri.path(), Some("/a b/c"));
///
/// let mailto = UriBuilder::new()
///     .scheme("mailto")
///     .scheme_specific_part("a@b.com?subject=hello world")
///     .build()
///     .unwrap();
/// assert_eq!(mailto.as_str(), "mailto:a@b.com?subject=hello%20world");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriBuilder {
    scheme: Option<String>,
    scheme_specific_part: Option<String>,
    authority: Option<String>,
    user_info: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
}

impl UriBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Sets the opaque part, used instead of the authority, the path and the query.
    #[inline]
    #[must_use]
    pub fn scheme_specific_part(mut self, scheme_specific_part: impl Into<String>) -> Self {
        self.scheme_specific_part = Some(scheme_specific_part.into());
        self
    }

    /// Sets a whole authority, ignored if a [`host`](Self::host) is set.
    #[inline]
    #[must_use]
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn user_info(mut self, user_info: impl Into<String>) -> Self {
        self.user_info = Some(user_info.into());
        self
    }

    /// Sets the host, written as is.
    ///
    /// An IPv6 address may be given without its brackets.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[inline]
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Quotes the components and parses the result.
    ///
    /// ```
    /// use oxuri::UriBuilder;
    ///
    /// let error = UriBuilder::new().scheme("http").path("relative").build().unwrap_err();
    /// assert_eq!(error.reason(), "Relative path in absolute URI");
    /// assert_eq!(error.index(), None);
    ///
    /// let ipv6 = UriBuilder::new().scheme("http").host("::1").path("/").build().unwrap();
    /// assert_eq!(ipv6.as_str(), "http://[::1]/");
    /// ```
    pub fn build(&self) -> Result<Uri, UriSyntaxError> {
        let uri = self.to_uri_string();
        trace!("Building URI {}", uri);
        if self.scheme_specific_part.is_none() && self.scheme.is_some() {
            if let Some(path) = &self.path {
                if !path.is_empty() && !path.starts_with('/') {
                    return Err(UriSyntaxError::new(
                        &uri,
                        UriSyntaxErrorKind::RelativePathInAbsoluteUri,
                        None,
                    ));
                }
            }
        }
        ParseOptions::new()
            .require_server_authority(self.host.is_some())
            .parse(uri)
    }

    fn to_uri_string(&self) -> String {
        let mut output = String::new();
        if let Some(scheme) = &self.scheme {
            output.push_str(scheme);
            output.push(':');
        }
        if let Some(scheme_specific_part) = &self.scheme_specific_part {
            match scheme_specific_part
                .strip_prefix("//")
                .and_then(split_ipv6_literal)
            {
                Some((literal, rest)) => {
                    output.push_str("//");
                    output.push_str(literal);
                    output.push_str(&quote(rest, CharClass::URIC));
                }
                None => output.push_str(&quote(scheme_specific_part, CharClass::URIC)),
            }
        } else {
            self.push_authority(&mut output);
            if let Some(path) = &self.path {
                output.push_str(&quote(path, CharClass::PATH));
            }
            if let Some(query) = &self.query {
                output.push('?');
                output.push_str(&quote(query, CharClass::URIC));
            }
        }
        if let Some(fragment) = &self.fragment {
            output.push('#');
            output.push_str(&quote(fragment, CharClass::URIC));
        }
        output
    }

    fn push_authority(&self, output: &mut String) {
        if let Some(host) = &self.host {
            output.push_str("//");
            if let Some(user_info) = &self.user_info {
                output.push_str(&quote(user_info, CharClass::USERINFO));
                output.push('@');
            }
            let brackets = host.contains(':') && !host.starts_with('[') && !host.ends_with(']');
            if brackets {
                output.push('[');
            }
            output.push_str(host);
            if brackets {
                output.push(']');
            }
            if let Some(port) = self.port {
                output.push(':');
                output.push_str(&port.to_string());
            }
        } else if let Some(authority) = &self.authority {
            output.push_str("//");
            let class = CharClass::REG_NAME.union(CharClass::SERVER);
            match split_ipv6_literal(authority) {
                Some((literal, rest)) => {
                    output.push_str(literal);
                    output.push_str(&quote(rest, class));
                }
                None => output.push_str(&quote(authority, class)),
            }
        }
    }
}

/// Splits a leading `[...]` IPv6 literal, which must be written without quoting.
fn split_ipv6_literal(s: &str) -> Option<(&str, &str)> {
    if !s.starts_with('[') || !s.contains(':') {
        return None;
    }
    let end = s.find(']')?;
    Some(s.split_at(end + 1))
}

use crate::chars::{is_other, CharClass};
use crate::error::{UriSyntaxError, UriSyntaxErrorKind};
use crate::log::debug;
use crate::uri::Uri;

/// Options of the URI parser.
///
/// By default an authority that is not a valid `[user-info@]host[:port]` is kept as a
/// registry-based authority.
///
/// ```
/// use oxuri::{ParseOptions, Uri};
///
/// let uri = Uri::parse("http://a_b/").unwrap();
/// assert_eq!(uri.raw_authority(), Some("a_b"));
/// assert_eq!(uri.host(), None);
///
/// let strict = ParseOptions::new().require_server_authority(true);
/// assert!(strict.parse("http://a_b/").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    require_server_authority: bool,
}

impl ParseOptions {
    #[inline]
    pub const fn new() -> Self {
        Self {
            require_server_authority: false,
        }
    }

    /// Fails instead of falling back to a registry-based authority.
    #[inline]
    #[must_use]
    pub const fn require_server_authority(mut self, require: bool) -> Self {
        self.require_server_authority = require;
        self
    }

    /// Parses and validates `input` following [RFC 2396](https://www.ietf.org/rfc/rfc2396) `URI-reference` syntax.
    pub fn parse(self, input: impl Into<String>) -> Result<Uri, UriSyntaxError> {
        let input = input.into();
        let components = UriParser::parse(&input, self.require_server_authority)?;
        Ok(Uri::from_parsed(components, input))
    }
}

/// The defining components of a URI, raw.
#[derive(Debug, Clone, Default)]
pub(crate) struct Components {
    pub(crate) scheme: Option<String>,
    pub(crate) scheme_specific_part: Option<String>,
    pub(crate) authority: Option<String>,
    pub(crate) user_info: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) path: Option<String>,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
}

struct Server {
    user_info: Option<String>,
    host: String,
    port: Option<u16>,
}

type ParseResult<T> = Result<T, UriSyntaxError>;

/// Single pass parser of the RFC 2396 grammar, extended with RFC 2732 IPv6 literals.
///
/// Positions are byte offsets in the input.
/// Every delimiter of the grammar is US-ASCII so they always fall on character boundaries.
pub(crate) struct UriParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    require_server_authority: bool,
    components: Components,
}

impl<'a> UriParser<'a> {
    pub(crate) fn parse(
        input: &'a str,
        require_server_authority: bool,
    ) -> ParseResult<Components> {
        let mut parser = Self {
            input,
            bytes: input.as_bytes(),
            require_server_authority,
            components: Components::default(),
        };
        parser.parse_uri_reference()?;
        Ok(parser.components)
    }

    fn parse_uri_reference(&mut self) -> ParseResult<()> {
        let n = self.bytes.len();
        let scheme_end = self.find(0, n, b":/?#");
        let ssp_start;
        let mut p;
        if self.at(scheme_end, n, b':') {
            if scheme_end == 0 {
                return self.fail(UriSyntaxErrorKind::Expected("scheme name"), 0);
            }
            self.check_char(0, CharClass::ALPHA, "scheme name")?;
            self.check_chars(1, scheme_end, CharClass::SCHEME, "scheme name")?;
            self.components.scheme = Some(self.input[..scheme_end].to_ascii_lowercase());
            p = scheme_end + 1;
            ssp_start = p;
            if self.at(p, n, b'/') {
                p = self.parse_hierarchical(p, n)?;
            } else {
                let q = self.find(p, n, b"#");
                if q <= p {
                    return self.fail(UriSyntaxErrorKind::Expected("scheme-specific part"), p);
                }
                self.check_chars(p, q, CharClass::URIC, "opaque part")?;
                p = q;
            }
        } else {
            ssp_start = 0;
            p = self.parse_hierarchical(0, n)?;
        }
        self.components.scheme_specific_part = Some(self.input[ssp_start..p].to_owned());
        if self.at(p, n, b'#') {
            self.check_chars(p + 1, n, CharClass::URIC, "fragment")?;
            self.components.fragment = Some(self.input[p + 1..].to_owned());
            p = n;
        }
        if p < n {
            return self.fail(UriSyntaxErrorKind::Expected("end of URI"), p);
        }
        Ok(())
    }

    fn parse_hierarchical(&mut self, start: usize, n: usize) -> ParseResult<usize> {
        let mut p = start;
        if self.at(p, n, b'/') && self.at(p + 1, n, b'/') {
            p += 2;
            let q = self.find(p, n, b"/?#");
            if q > p {
                p = self.parse_authority(p, q)?;
            } else if q >= n {
                return self.fail(UriSyntaxErrorKind::Expected("authority"), p);
            }
            // An empty authority is allowed before a path, a query or a fragment (file:///foo)
        }
        let q = self.find(p, n, b"?#");
        self.check_chars(p, q, CharClass::PATH, "path")?;
        self.components.path = Some(self.input[p..q].to_owned());
        p = q;
        if self.at(p, n, b'?') {
            p += 1;
            let q = self.find(p, n, b"#");
            self.check_chars(p, q, CharClass::URIC, "query")?;
            self.components.query = Some(self.input[p..q].to_owned());
            p = q;
        }
        Ok(p)
    }

    fn parse_authority(&mut self, start: usize, n: usize) -> ParseResult<usize> {
        let server_class = if self.input[start..n].contains(']') {
            CharClass::SERVER_PERCENT
        } else {
            CharClass::SERVER
        };
        let server_end = self.scan(start, n, server_class)?;
        let registry_end = self.scan(start, n, CharClass::REG_NAME)?;
        let server_chars = server_end == n;
        let registry_chars = registry_end == n;

        if registry_chars && !server_chars {
            self.components.authority = Some(self.input[start..n].to_owned());
            return Ok(n);
        }

        let mut server_error = None;
        if server_chars {
            match self.parse_server(start, n) {
                Ok(server) => {
                    self.components.user_info = server.user_info;
                    self.components.host = Some(server.host);
                    self.components.port = server.port;
                    self.components.authority = Some(self.input[start..n].to_owned());
                    return Ok(n);
                }
                Err(error) if self.require_server_authority => {
                    debug!(
                        "Authority {} rejected: {}",
                        &self.input[start..n],
                        error.reason()
                    );
                    return Err(error);
                }
                Err(error) => {
                    debug!(
                        "Authority {} is not server-based ({}), trying registry-based",
                        &self.input[start..n],
                        error.reason()
                    );
                    server_error = Some(error);
                }
            }
        }

        if registry_chars {
            self.components.authority = Some(self.input[start..n].to_owned());
            Ok(n)
        } else if let Some(error) = server_error {
            Err(error)
        } else {
            self.fail(
                UriSyntaxErrorKind::IllegalCharacter("authority"),
                server_end.max(registry_end),
            )
        }
    }

    fn parse_server(&self, start: usize, n: usize) -> ParseResult<Server> {
        let mut p = start;
        let mut user_info = None;
        let q = self.find(p, n, b"@");
        if self.at(q, n, b'@') {
            self.check_chars(p, q, CharClass::USERINFO, "user info")?;
            user_info = Some(self.input[p..q].to_owned());
            p = q + 1;
        }

        let host_start = p;
        if self.at(p, n, b'[') {
            p += 1;
            let q = self.find(p, n, b"]");
            if q <= p || !self.at(q, n, b']') {
                return self.fail(
                    UriSyntaxErrorKind::Expected("closing bracket for IPv6 address"),
                    q,
                );
            }
            let r = self.find(p, q, b"%");
            if r > p {
                self.parse_ipv6_reference(p, r)?;
                if r < q {
                    if r + 1 == q {
                        return Err(UriSyntaxError::new(
                            self.input,
                            UriSyntaxErrorKind::ScopeIdExpected,
                            None,
                        ));
                    }
                    self.check_chars(r + 1, q, CharClass::SCOPE_ID, "scope id")?;
                }
            } else {
                self.parse_ipv6_reference(p, q)?;
            }
            p = q + 1;
        } else {
            p = match self.parse_ipv4_address(p, n) {
                Some(q) if q > p => q,
                _ => self.parse_hostname(p, n)?,
            };
        }
        let host = self.input[host_start..p].to_owned();

        let mut port = None;
        if self.at(p, n, b':') {
            p += 1;
            let q = self.find(p, n, b"/");
            if q > p {
                let digits_end = self.scan(p, q, CharClass::DIGIT)?;
                if digits_end < q {
                    return self.fail(UriSyntaxErrorKind::MalformedPort, digits_end);
                }
                port = Some(
                    self.input[p..q]
                        .parse::<u16>()
                        .map_err(|_| self.error(UriSyntaxErrorKind::MalformedPort, p))?,
                );
                p = q;
            }
        }
        if p < n {
            return self.fail(UriSyntaxErrorKind::Expected("port number"), p);
        }
        Ok(Server {
            user_info,
            host,
            port,
        })
    }

    /// A dotted-decimal address is tried first, anything else is a host name.
    fn parse_ipv4_address(&self, start: usize, n: usize) -> Option<usize> {
        let p = self.scan_ipv4_address(start, n, false).ok()??;
        if p > start && p < n && self.bytes[p] != b':' {
            return None;
        }
        Some(p)
    }

    fn scan_ipv4_address(&self, start: usize, n: usize, strict: bool) -> ParseResult<Option<usize>> {
        let m = self.scan(start, n, CharClass::DIGIT.union(CharClass::DOT))?;
        if m <= start || (strict && m != n) {
            return Ok(None);
        }
        let mut p = start;
        for i in 0..4 {
            if i > 0 {
                if !self.at(p, m, b'.') {
                    return self.fail(UriSyntaxErrorKind::MalformedIpv4, p);
                }
                p += 1;
            }
            let byte_start = p;
            p = self
                .scan_byte(byte_start, m)
                .ok_or_else(|| self.error(UriSyntaxErrorKind::MalformedIpv4, byte_start))?;
        }
        if p < m {
            return self.fail(UriSyntaxErrorKind::MalformedIpv4, p);
        }
        Ok(Some(p))
    }

    /// At most three digits with a value fitting in a byte.
    fn scan_byte(&self, start: usize, n: usize) -> Option<usize> {
        let digits = self.bytes[start..n]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 || digits > 3 {
            return None;
        }
        let value = self.input[start..start + digits].parse::<u16>().ok()?;
        (value <= 255).then_some(start + digits)
    }

    fn take_ipv4_address(&self, start: usize, n: usize, expected: &'static str) -> ParseResult<usize> {
        match self.scan_ipv4_address(start, n, true)? {
            Some(p) if p > start => Ok(p),
            _ => self.fail(UriSyntaxErrorKind::Expected(expected), start),
        }
    }

    fn parse_hostname(&self, start: usize, n: usize) -> ParseResult<usize> {
        let mut p = start;
        let mut last_label = None;
        loop {
            let q = self.scan(p, n, CharClass::ALPHANUM)?;
            if q <= p {
                break;
            }
            last_label = Some(p);
            p = q;
            let q = self.scan(p, n, CharClass::ALPHANUM.union(CharClass::DASH))?;
            if q > p {
                if self.bytes[q - 1] == b'-' {
                    return self.fail(UriSyntaxErrorKind::IllegalCharacter("hostname"), q - 1);
                }
                p = q;
            }
            if !self.at(p, n, b'.') {
                break;
            }
            p += 1;
            if p >= n {
                break;
            }
        }
        if p < n && !self.at(p, n, b':') {
            return self.fail(UriSyntaxErrorKind::IllegalCharacter("hostname"), p);
        }
        let Some(last_label) = last_label else {
            return self.fail(UriSyntaxErrorKind::Expected("hostname"), start);
        };
        // In a qualified name the rightmost label starts with a letter
        if last_label > start && !self.bytes[last_label].is_ascii_alphabetic() {
            return self.fail(UriSyntaxErrorKind::IllegalCharacter("hostname"), last_label);
        }
        Ok(p)
    }

    fn parse_ipv6_reference(&self, start: usize, n: usize) -> ParseResult<usize> {
        let mut byte_count = 0;
        let mut p = start;
        let mut compressed_zeros = false;
        match self.scan_hex_sequence(p, n, &mut byte_count)? {
            Some(q) => {
                p = q;
                if self.at_str(p, n, "::") {
                    compressed_zeros = true;
                    p = self.scan_hex_post(p + 2, n, &mut byte_count)?;
                } else if self.at(p, n, b':') {
                    p = self.take_ipv4_address(p + 1, n, "IPv4 address")?;
                    byte_count += 4;
                }
            }
            None => {
                if self.at_str(p, n, "::") {
                    compressed_zeros = true;
                    p = self.scan_hex_post(p + 2, n, &mut byte_count)?;
                }
            }
        }
        if p < n {
            return self.fail(UriSyntaxErrorKind::MalformedIpv6, start);
        }
        if byte_count > 16 {
            return self.fail(UriSyntaxErrorKind::Ipv6TooLong, start);
        }
        if !compressed_zeros && byte_count < 16 {
            return self.fail(UriSyntaxErrorKind::Ipv6TooShort, start);
        }
        if compressed_zeros && byte_count == 16 {
            return self.fail(UriSyntaxErrorKind::MalformedIpv6, start);
        }
        Ok(p)
    }

    fn scan_hex_post(&self, start: usize, n: usize, byte_count: &mut usize) -> ParseResult<usize> {
        if start == n {
            return Ok(start);
        }
        if let Some(mut p) = self.scan_hex_sequence(start, n, byte_count)? {
            if self.at(p, n, b':') {
                p = self.take_ipv4_address(p + 1, n, "hex digits or IPv4 address")?;
                *byte_count += 4;
            }
            Ok(p)
        } else {
            let p = self.take_ipv4_address(start, n, "hex digits or IPv4 address")?;
            *byte_count += 4;
            Ok(p)
        }
    }

    /// `hex4 *( ":" hex4 )`, stopping before `::` and before a trailing IPv4 address.
    ///
    /// Returns `None` if the input does not start with a group.
    fn scan_hex_sequence(
        &self,
        start: usize,
        n: usize,
        byte_count: &mut usize,
    ) -> ParseResult<Option<usize>> {
        let mut p = start;
        let q = self.scan(p, n, CharClass::HEX)?;
        if q <= p || self.at(q, n, b'.') {
            return Ok(None);
        }
        if q > p + 4 {
            return self.fail(UriSyntaxErrorKind::Ipv6HexSequenceTooLong, p);
        }
        *byte_count += 2;
        p = q;
        while p < n {
            if !self.at(p, n, b':') || self.at(p + 1, n, b':') {
                break;
            }
            p += 1;
            let q = self.scan(p, n, CharClass::HEX)?;
            if q <= p {
                return self.fail(
                    UriSyntaxErrorKind::Expected("digits for an IPv6 address"),
                    p,
                );
            }
            if self.at(q, n, b'.') {
                p -= 1;
                break;
            }
            if q > p + 4 {
                return self.fail(UriSyntaxErrorKind::Ipv6HexSequenceTooLong, p);
            }
            *byte_count += 2;
            p = q;
        }
        Ok(Some(p))
    }

    #[inline]
    fn at(&self, p: usize, n: usize, c: u8) -> bool {
        p < n && self.bytes[p] == c
    }

    #[inline]
    fn at_str(&self, p: usize, n: usize, s: &str) -> bool {
        p + s.len() <= n && self.bytes[p..].starts_with(s.as_bytes())
    }

    /// Position of the first byte of `stops` in `start..end`, or `end`.
    #[inline]
    fn find(&self, start: usize, end: usize, stops: &[u8]) -> usize {
        self.bytes[start..end]
            .iter()
            .position(|b| stops.contains(b))
            .map_or(end, |i| start + i)
    }

    /// Position of the first character in `start..end` not allowed by `class`.
    ///
    /// Fails on a `%` not followed by two hex digits if the class allows escapes.
    fn scan(&self, start: usize, end: usize, class: CharClass) -> ParseResult<usize> {
        let mut p = start;
        while p < end {
            let b = self.bytes[p];
            if b.is_ascii() {
                if class.contains(char::from(b)) {
                    p += 1;
                } else if b == b'%' && class.allows_escapes() {
                    if p + 3 <= end
                        && self.bytes[p + 1].is_ascii_hexdigit()
                        && self.bytes[p + 2].is_ascii_hexdigit()
                    {
                        p += 3;
                    } else {
                        return self.fail(UriSyntaxErrorKind::MalformedEscape, p);
                    }
                } else {
                    break;
                }
            } else {
                match self.input[p..].chars().next() {
                    Some(c) if class.allows_escapes() && is_other(c) => p += c.len_utf8(),
                    _ => break,
                }
            }
        }
        Ok(p)
    }

    fn check_chars(
        &self,
        start: usize,
        end: usize,
        class: CharClass,
        what: &'static str,
    ) -> ParseResult<()> {
        let p = self.scan(start, end, class)?;
        if p < end {
            return self.fail(UriSyntaxErrorKind::IllegalCharacter(what), p);
        }
        Ok(())
    }

    #[inline]
    fn check_char(&self, p: usize, class: CharClass, what: &'static str) -> ParseResult<()> {
        self.check_chars(p, p + 1, class, what)
    }

    #[inline]
    fn error(&self, kind: UriSyntaxErrorKind, index: usize) -> UriSyntaxError {
        UriSyntaxError::new(self.input, kind, Some(index))
    }

    #[inline]
    fn fail<T>(&self, kind: UriSyntaxErrorKind, index: usize) -> ParseResult<T> {
        Err(self.error(kind, index))
    }
}

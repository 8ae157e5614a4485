use std::error::Error;
use std::fmt;

/// An error raised during [`Uri`](crate::Uri) parsing.
///
/// ```
/// use oxuri::Uri;
///
/// let error = Uri::parse("http://a b/").unwrap_err();
/// assert_eq!(error.input(), "http://a b/");
/// assert_eq!(error.reason(), "Illegal character in authority");
/// assert_eq!(error.index(), Some(8));
/// assert_eq!(
///     error.to_string(),
///     "Illegal character in authority at index 8: http://a b/"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriSyntaxError {
    input: String,
    kind: UriSyntaxErrorKind,
    index: Option<usize>,
}

impl UriSyntaxError {
    pub(crate) fn new(input: &str, kind: UriSyntaxErrorKind, index: Option<usize>) -> Self {
        Self {
            input: input.to_owned(),
            kind,
            index,
        }
    }

    /// The string that failed to parse.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// A human readable explanation of the failure.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }

    /// The byte offset of the failure in the input, if known.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for UriSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            write!(f, "{} at index {}: {}", self.kind, index, self.input)
        } else {
            write!(f, "{}: {}", self.kind, self.input)
        }
    }
}

impl Error for UriSyntaxError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UriSyntaxErrorKind {
    Expected(&'static str),
    IllegalCharacter(&'static str),
    MalformedEscape,
    MalformedIpv4,
    MalformedIpv6,
    Ipv6TooLong,
    Ipv6TooShort,
    Ipv6HexSequenceTooLong,
    ScopeIdExpected,
    MalformedPort,
    RelativePathInAbsoluteUri,
}

impl fmt::Display for UriSyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(what) => write!(f, "Expected {}", what),
            Self::IllegalCharacter(what) => write!(f, "Illegal character in {}", what),
            Self::MalformedEscape => write!(f, "Malformed escape pair"),
            Self::MalformedIpv4 => write!(f, "Malformed IPv4 address"),
            Self::MalformedIpv6 => write!(f, "Malformed IPv6 address"),
            Self::Ipv6TooLong => write!(f, "IPv6 address too long"),
            Self::Ipv6TooShort => write!(f, "IPv6 address too short"),
            Self::Ipv6HexSequenceTooLong => {
                write!(f, "IPv6 hexadecimal digit sequence too long")
            }
            Self::ScopeIdExpected => write!(f, "scope id expected"),
            Self::MalformedPort => write!(f, "Malformed port number"),
            Self::RelativePathInAbsoluteUri => write!(f, "Relative path in absolute URI"),
        }
    }
}

//! Character classes of the [RFC 2396](https://www.ietf.org/rfc/rfc2396) grammar (appendix A).
//!
//! Each class is a 128-bit set over US-ASCII.
//! NUL never belongs to any class so its bit is used as the [`CharClass::ESCAPED`] flag.

/// A set of US-ASCII characters allowed by a grammar production.
///
/// ```
/// use oxuri::CharClass;
///
/// assert!(CharClass::PATH.contains('/'));
/// assert!(!CharClass::PATH.contains('?'));
/// assert!(CharClass::PATH.allows_escapes());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharClass(u128);

const fn chars(set: &str) -> u128 {
    let bytes = set.as_bytes();
    let mut mask = 0;
    let mut i = 0;
    while i < bytes.len() {
        mask |= 1 << bytes[i];
        i += 1;
    }
    mask
}

const fn range(first: u8, last: u8) -> u128 {
    let mut mask = 0;
    let mut b = first;
    while b <= last {
        mask |= 1 << b;
        b += 1;
    }
    mask
}

impl CharClass {
    /// `digit = "0" | ... | "9"`
    pub const DIGIT: Self = Self(range(b'0', b'9'));
    /// `alpha = lowalpha | upalpha`
    pub const ALPHA: Self = Self(range(b'a', b'z') | range(b'A', b'Z'));
    /// `alphanum = alpha | digit`
    pub const ALPHANUM: Self = Self::ALPHA.union(Self::DIGIT);
    /// `hex = digit | "A" | ... | "F" | "a" | ... | "f"`
    pub const HEX: Self = Self(Self::DIGIT.0 | range(b'a', b'f') | range(b'A', b'F'));
    /// `mark = "-" | "_" | "." | "!" | "~" | "*" | "'" | "(" | ")"`
    pub const MARK: Self = Self(chars("-_.!~*'()"));
    /// `unreserved = alphanum | mark`
    pub const UNRESERVED: Self = Self::ALPHANUM.union(Self::MARK);
    /// `reserved`, including the `[` and `]` added by RFC 2732.
    pub const RESERVED: Self = Self(chars(";/?:@&=+$,[]"));
    /// `escaped = "%" hex hex`
    ///
    /// As a flag it also accepts the visible non-ASCII characters.
    pub const ESCAPED: Self = Self(1);
    /// `uric = reserved | unreserved | escaped`
    pub const URIC: Self = Self::RESERVED.union(Self::UNRESERVED).union(Self::ESCAPED);
    /// `pchar = unreserved | escaped | ":" | "@" | "&" | "=" | "+" | "$" | ","`
    pub const PCHAR: Self = Self::UNRESERVED
        .union(Self::ESCAPED)
        .union(Self(chars(":@&=+$,")));
    /// Characters of a whole path: `pchar`, `;` and `/`.
    pub const PATH: Self = Self::PCHAR.union(Self(chars(";/")));
    /// `-`
    pub const DASH: Self = Self(chars("-"));
    /// `.`
    pub const DOT: Self = Self(chars("."));
    /// `userinfo = *( unreserved | escaped | ";" | ":" | "&" | "=" | "+" | "$" | "," )`
    pub const USERINFO: Self = Self::UNRESERVED
        .union(Self::ESCAPED)
        .union(Self(chars(";:&=+$,")));
    /// `reg_name = 1*( unreserved | escaped | "$" | "," | ";" | ":" | "@" | "&" | "=" | "+" )`
    pub const REG_NAME: Self = Self::UNRESERVED
        .union(Self::ESCAPED)
        .union(Self(chars("$,;:@&=+")));
    /// All characters that may appear in a server-based authority.
    pub const SERVER: Self = Self::USERINFO
        .union(Self::ALPHANUM)
        .union(Self::DASH)
        .union(Self(chars(".:@[]")));
    /// [`CharClass::SERVER`] plus a literal `%`, for IPv6 zone identifiers.
    pub const SERVER_PERCENT: Self = Self::SERVER.union(Self(chars("%")));
    /// `scheme = alpha *( alpha | digit | "+" | "-" | "." )`
    pub const SCHEME: Self = Self::ALPHA.union(Self::DIGIT).union(Self(chars("+-.")));
    /// IPv6 zone identifiers.
    pub const SCOPE_ID: Self = Self::ALPHANUM.union(Self(chars("_.")));

    /// Returns the set of characters allowed by either class.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether `c` is a US-ASCII character of this class.
    ///
    /// NUL and non-ASCII characters are never contained.
    #[inline]
    pub const fn contains(self, c: char) -> bool {
        let c = c as u32;
        c != 0 && c < 128 && self.0 & (1 << c) != 0
    }

    /// Whether `%XX` escapes and visible non-ASCII characters are allowed too.
    #[inline]
    pub const fn allows_escapes(self) -> bool {
        self.0 & Self::ESCAPED.0 != 0
    }
}

/// Non-ASCII characters that are neither spaces nor controls.
///
/// They are accepted unescaped wherever escapes are.
#[inline]
pub(crate) fn is_other(c: char) -> bool {
    !c.is_ascii() && !c.is_whitespace() && !c.is_control()
}

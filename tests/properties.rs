use oxuri::{decode, normalize_path, quote, CharClass, Uri, UriBuilder};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn scheme() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9+.-]{0,7}"
}

fn hostname() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,16}",
        "[a-z0-9]{1,8}\\.[a-z][a-z0-9]{1,4}",
        "[a-z0-9]{1,8}\\.[a-z0-9][a-z0-9-]{0,6}[a-z0-9]\\.[a-z]{2,4}",
    ]
}

fn ipv4() -> impl Strategy<Value = String> {
    (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
        .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
}

fn ipv6() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("::1".to_owned()),
        Just("::ffff:127.0.0.1".to_owned()),
        Just("2001:db8::1".to_owned()),
        Just("fe80::1%eth0".to_owned()),
        proptest::collection::vec(0u16..=0xFFFF, 8).prop_map(|groups| groups
            .iter()
            .map(|g| format!("{g:x}"))
            .collect::<Vec<_>>()
            .join(":")),
    ]
}

fn host() -> impl Strategy<Value = String> {
    prop_oneof![hostname(), ipv4(), ipv6()]
}

/// Unescaped component text, with characters that must be quoted.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 %?#/:;@=&\u{e9}\u{3000}-]{0,12}"
}

fn path_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_~-]{1,8}"
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(path_segment(), 0..4)
}

fn dotted_path() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        proptest::collection::vec(
            prop_oneof![
                Just(".".to_owned()),
                Just("..".to_owned()),
                Just(String::new()),
                Just("a:b".to_owned()),
                path_segment(),
            ],
            0..8,
        ),
    )
        .prop_map(|(absolute, segments)| {
            let path = segments.join("/");
            if absolute {
                format!("/{path}")
            } else {
                path
            }
        })
}

fn hash(value: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_parse_does_not_panic(s in "\\PC{0,64}") {
        if let Ok(uri) = Uri::parse(s.as_str()) {
            prop_assert_eq!(uri.as_str(), s.as_str());
            let reparsed = Uri::parse(uri.as_str()).unwrap();
            prop_assert_eq!(&reparsed, &uri);
            prop_assert_eq!(hash(&reparsed), hash(&uri));
        }
    }
}

proptest! {
    #[test]
    fn prop_quote_decode_roundtrip(s in "\\PC{0,32}") {
        let quoted = quote(&s, CharClass::PATH);
        prop_assert_eq!(decode(&quoted), s.as_str());
        let uri = Uri::parse(format!("/p/{quoted}")).unwrap();
        prop_assert_eq!(uri.path().unwrap(), format!("/p/{s}"));
    }
}

proptest! {
    #[test]
    fn prop_build_roundtrip(
        scheme in scheme(),
        user_info in proptest::option::of(text()),
        host in host(),
        port in proptest::option::of(any::<u16>()),
        segments in segments(),
        query in proptest::option::of(text()),
        fragment in proptest::option::of(text()),
    ) {
        let path = segments.iter().map(|s| format!("/{s}")).collect::<String>();
        let mut builder = UriBuilder::new().scheme(&scheme).host(&host).path(&path);
        if let Some(user_info) = &user_info {
            builder = builder.user_info(user_info);
        }
        if let Some(port) = port {
            builder = builder.port(port);
        }
        if let Some(query) = &query {
            builder = builder.query(query);
        }
        if let Some(fragment) = &fragment {
            builder = builder.fragment(fragment);
        }
        let uri = builder.build().unwrap();

        prop_assert_eq!(uri.scheme(), Some(scheme.as_str()));
        prop_assert_eq!(uri.user_info(), user_info.as_deref());
        let expected_host = if host.contains(':') { format!("[{host}]") } else { host };
        prop_assert_eq!(uri.host(), Some(expected_host.as_str()));
        prop_assert_eq!(uri.port(), port);
        prop_assert_eq!(uri.path(), Some(path.as_str()));
        prop_assert_eq!(uri.query(), query.as_deref());
        prop_assert_eq!(uri.fragment(), fragment.as_deref());
        prop_assert_eq!(Uri::parse(uri.as_str()).unwrap(), uri);
    }
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(path in dotted_path()) {
        let once = normalize_path(&path).into_owned();
        prop_assert_eq!(normalize_path(&once), once.as_str());
        prop_assert!(!once.split('/').skip(1).any(|s| s == "."));
        let first = |p: &str| p.split('/').next().unwrap_or_default().contains(':');
        if !path.starts_with('/') && !first(&path) {
            prop_assert!(!first(&once), "{} would be read as a scheme", once);
        }
    }
}

proptest! {
    #[test]
    fn prop_normalize_uri_idempotent(host in hostname(), path in dotted_path()) {
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        let uri = Uri::parse(format!("http://{host}{path}")).unwrap();
        let once = uri.normalize();
        prop_assert_eq!(once.normalize(), once.clone());
        prop_assert_eq!(Uri::parse(once.as_str()).unwrap(), once);
    }
}

proptest! {
    #[test]
    fn prop_resolve_relativize_inverse(
        host in hostname(),
        base in segments(),
        rest in segments(),
        colon in any::<bool>(),
        query in proptest::option::of("[a-z]{1,8}=[a-z0-9]{1,8}"),
        fragment in proptest::option::of("[a-zA-Z0-9_-]{1,16}"),
    ) {
        let base_path = base.iter().map(|s| format!("/{s}")).collect::<String>() + "/";
        let mut child_path = base_path.clone() + &rest.join("/");
        if colon {
            child_path.push_str("x:y");
        }
        let mut child = format!("http://{host}{child_path}");
        if let Some(query) = &query {
            child.push('?');
            child.push_str(query);
        }
        if let Some(fragment) = &fragment {
            child.push('#');
            child.push_str(fragment);
        }
        let base = Uri::parse(format!("http://{host}{base_path}")).unwrap();
        let child = Uri::parse(child).unwrap();

        let relative = base.relativize(&child);
        prop_assert!(!relative.is_absolute());
        prop_assert_eq!(Uri::parse(relative.as_str()).unwrap(), relative.clone());
        prop_assert_eq!(base.resolve(&relative), child);
    }
}

proptest! {
    #[test]
    fn prop_relativize_other_authority(a in hostname(), b in hostname(), path in segments()) {
        prop_assume!(a != b);
        let path = path.join("/");
        let base = Uri::parse(format!("http://{a}/")).unwrap();
        let child = Uri::parse(format!("http://{b}/{path}")).unwrap();
        prop_assert!(base.relativize(&child).ptr_eq(&child));
    }
}

proptest! {
    #[test]
    fn prop_escape_case_equality(host in hostname(), bytes in proptest::collection::vec(any::<u8>(), 1..8)) {
        let lower = bytes.iter().map(|b| format!("%{b:02x}")).collect::<String>();
        let upper = bytes.iter().map(|b| format!("%{b:02X}")).collect::<String>();
        let a = Uri::parse(format!("http://{host}/{lower}?{lower}#{lower}")).unwrap();
        let b = Uri::parse(format!("HTTP://{}/{upper}?{upper}#{upper}", host.to_uppercase())).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash(&a), hash(&b));
        prop_assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
        prop_assert_eq!(a.path(), b.path());
    }
}

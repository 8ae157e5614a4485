#![no_main]
use libfuzzer_sys::fuzz_target;
use oxuri::Uri;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = str::from_utf8(data) {
        let Ok(uri) = Uri::parse(s) else {
            return;
        };
        for base in ["http://a/b/c/", "http://a/b/c/d/", "http://a/", "file:/tmp/"] {
            let base = Uri::parse(base).unwrap();
            let relative = base.relativize(&uri);
            assert_eq!(Uri::parse(relative.as_str()).unwrap(), relative);
            if relative.ptr_eq(&uri) {
                continue;
            }
            let uri = uri.normalize();
            let from_relative = base.resolve(&relative);
            assert_eq!(
                uri, from_relative,
                "Resolving {relative} computed from {uri} with base {base} gives {from_relative}"
            );
        }
    }
});

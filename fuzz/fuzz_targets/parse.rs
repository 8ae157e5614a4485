#![no_main]
use libfuzzer_sys::fuzz_target;
use oxuri::Uri;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::str;

fn hash(uri: &Uri) -> u64 {
    let mut hasher = DefaultHasher::new();
    uri.hash(&mut hasher);
    hasher.finish()
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = str::from_utf8(data) {
        let Ok(uri) = Uri::parse(s) else {
            return;
        };
        assert_eq!(uri.as_str(), s);
        let reparsed = Uri::parse(uri.as_str()).unwrap();
        assert_eq!(uri, reparsed);
        assert_eq!(hash(&uri), hash(&reparsed));

        // The ASCII form denotes the same URI
        let ascii = Uri::parse(uri.to_ascii_string().into_owned()).unwrap();
        assert!(ascii.as_str().is_ascii());

        let normalized = uri.normalize();
        assert_eq!(normalized.normalize(), normalized);
        let _ = uri.parse_server_authority();
    }
});

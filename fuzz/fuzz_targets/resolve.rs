#![no_main]
use libfuzzer_sys::fuzz_target;
use oxuri::Uri;
use std::str;

fuzz_target!(|data: &[u8]| {
    let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
    if let Ok(s) = str::from_utf8(data) {
        let Ok(child) = Uri::parse(s) else {
            return;
        };
        let resolved = base.resolve(&child);
        assert_eq!(base.resolve_str(s).unwrap(), resolved);

        // The computed string must parse back to the same URI
        let reparsed = Uri::parse(resolved.as_str()).unwrap();
        assert_eq!(
            reparsed, resolved,
            "Resolving {child} against {base} gives {resolved} which reparses to {reparsed}"
        );
    }
});

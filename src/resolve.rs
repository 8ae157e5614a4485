//! Reference resolution and relativization following [RFC 2396](https://www.ietf.org/rfc/rfc2396) section 5.2.

use crate::encoding::eq_escaped;
use crate::log::trace;
use crate::normalize::normalize_path;
use crate::parser::Components;
use crate::uri::Uri;
use std::borrow::Cow;

pub(crate) fn resolve(base: &Uri, child: &Uri) -> Uri {
    if base.is_opaque() || child.is_opaque() {
        return child.clone();
    }
    let (b, c) = (base.components(), child.components());

    if c.scheme.is_none()
        && c.authority.is_none()
        && c.path.as_deref() == Some("")
        && c.query.is_none()
    {
        if let Some(fragment) = &c.fragment {
            if b.fragment.as_ref() == Some(fragment) {
                trace!("Same document reference {} resolved to its base", child);
                return base.clone();
            }
            return Uri::from_components(Components {
                fragment: Some(fragment.clone()),
                ..b.clone()
            });
        }
    }

    if c.scheme.is_some() {
        return child.clone();
    }

    let mut target = Components {
        scheme: b.scheme.clone(),
        query: c.query.clone(),
        fragment: c.fragment.clone(),
        ..Components::default()
    };
    if c.authority.is_some() {
        target.authority = c.authority.clone();
        target.user_info = c.user_info.clone();
        target.host = c.host.clone();
        target.port = c.port;
        target.path = c.path.clone();
    } else {
        target.authority = b.authority.clone();
        target.user_info = b.user_info.clone();
        target.host = b.host.clone();
        target.port = b.port;
        let child_path = c.path.as_deref().unwrap_or_default();
        target.path = Some(if child_path.starts_with('/') {
            child_path.to_owned()
        } else {
            merge_paths(
                b.path.as_deref().unwrap_or_default(),
                child_path,
                b.authority.is_some(),
            )
        });
    }
    Uri::from_components(target)
}

/// Appends `child` to the directory of `base` then removes the dot segments.
fn merge_paths(base: &str, child: &str, base_has_authority: bool) -> String {
    let directory = match base.rfind('/') {
        Some(i) => &base[..=i],
        None if base_has_authority => "/",
        None => "",
    };
    let mut path = String::with_capacity(directory.len() + child.len());
    path.push_str(directory);
    path.push_str(child);
    if let Cow::Owned(normalized) = normalize_path(&path) {
        return normalized;
    }
    path
}

pub(crate) fn relativize(base: &Uri, child: &Uri) -> Uri {
    if base.is_opaque() || child.is_opaque() {
        return child.clone();
    }
    let (b, c) = (base.components(), child.components());
    let same_scheme = match (&b.scheme, &c.scheme) {
        (Some(b), Some(c)) => b.eq_ignore_ascii_case(c),
        (None, None) => true,
        _ => false,
    };
    let same_authority = match (&b.authority, &c.authority) {
        (Some(b), Some(c)) => eq_escaped(b, c),
        (None, None) => true,
        _ => false,
    };
    if !same_scheme || !same_authority {
        trace!("{} does not share the scheme and authority of {}", child, base);
        return child.clone();
    }

    let base_path = normalize_path(b.path.as_deref().unwrap_or_default());
    let child_path = normalize_path(c.path.as_deref().unwrap_or_default());
    let mut prefix_len = base_path.len();
    if base_path != child_path {
        let is_prefix = if base_path.ends_with('/') {
            child_path.starts_with(&*base_path)
        } else {
            prefix_len += 1;
            child_path.starts_with(&*base_path)
                && child_path.as_bytes().get(base_path.len()) == Some(&b'/')
        };
        if !is_prefix {
            trace!("{} is not below the path of {}", child, base);
            return child.clone();
        }
    }

    let relative = &child_path[prefix_len.min(child_path.len())..];
    let first_segment = relative.split('/').next().unwrap_or_default();
    let path = if first_segment.contains(':') {
        format!("./{relative}")
    } else {
        relative.to_owned()
    };
    Uri::from_components(Components {
        path: Some(path),
        query: c.query.clone(),
        fragment: c.fragment.clone(),
        ..Components::default()
    })
}

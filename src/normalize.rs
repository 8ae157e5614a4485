use std::borrow::Cow;

/// Removes the `.` and `..` segments and the redundant slashes of a URI path.
///
/// A `..` segment is removed together with the preceding segment if it is not `..` itself.
/// Leading `..` segments that can't be removed are kept.
/// If the leading segments of a relative path are removed and the new first segment
/// contains a `:`, the result is prefixed by `./` so that it is not mistaken for a scheme.
/// A first segment that is kept is left as is.
///
/// The input is returned borrowed when it is already normal.
///
/// ```
/// use oxuri::normalize_path;
///
/// assert_eq!(normalize_path("/a/b/../c"), "/a/c");
/// assert_eq!(normalize_path("/a/./b"), "/a/b");
/// assert_eq!(normalize_path("../a"), "../a");
/// assert_eq!(normalize_path("a/../b:c"), "./b:c");
/// assert_eq!(normalize_path("a:b/./c"), "a:b/c");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let Some(count) = segment_count_if_not_normal(path) else {
        return Cow::Borrowed(path);
    };
    let mut segments = split(path, count);
    remove_dots(path, &mut segments);
    let leading_dot = needs_leading_dot(path, &segments);
    let normalized = join(path, &segments, leading_dot);
    if normalized == path {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(normalized)
    }
}

#[derive(Clone, Copy)]
struct Segment {
    start: usize,
    end: usize,
    removed: bool,
}

impl Segment {
    fn as_str(self, path: &str) -> &str {
        &path[self.start..self.end]
    }
}

/// Returns `None` if the path has no redundant slash and no `.` or `..` segment,
/// else the number of segments.
fn segment_count_if_not_normal(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    let mut normal = true;
    let mut count = 0;
    let mut p = bytes.iter().take_while(|b| **b == b'/').count();
    if p > 1 {
        normal = false;
    }
    while p < bytes.len() {
        let end = bytes[p..]
            .iter()
            .position(|b| *b == b'/')
            .map_or(bytes.len(), |i| p + i);
        if matches!(&bytes[p..end], b"." | b"..") {
            normal = false;
        }
        count += 1;
        p = end;
        if p < bytes.len() {
            p += 1;
            while bytes.get(p) == Some(&b'/') {
                normal = false;
                p += 1;
            }
        }
    }
    if normal {
        None
    } else {
        Some(count)
    }
}

fn split(path: &str, count: usize) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(count);
    let mut start = None;
    for (i, b) in path.bytes().enumerate() {
        match (b, start) {
            (b'/', Some(s)) => {
                segments.push(Segment {
                    start: s,
                    end: i,
                    removed: false,
                });
                start = None;
            }
            (b'/', None) => (),
            (_, None) => start = Some(i),
            (_, Some(_)) => (),
        }
    }
    if let Some(s) = start {
        segments.push(Segment {
            start: s,
            end: path.len(),
            removed: false,
        });
    }
    debug_assert_eq!(segments.len(), count);
    segments
}

fn remove_dots(path: &str, segments: &mut [Segment]) {
    for i in 0..segments.len() {
        match segments[i].as_str(path) {
            "." => segments[i].removed = true,
            ".." => {
                let previous = (0..i).rev().find(|j| !segments[*j].removed);
                if let Some(j) = previous {
                    if segments[j].as_str(path) != ".." {
                        segments[i].removed = true;
                        segments[j].removed = true;
                    }
                }
            }
            _ => (),
        }
    }
}

/// A relative path whose first segment was removed must not start with a segment containing `:`.
fn needs_leading_dot(path: &str, segments: &[Segment]) -> bool {
    if path.starts_with('/') {
        return false;
    }
    match segments.iter().position(|s| !s.removed) {
        Some(first) if first > 0 => segments[first].as_str(path).contains(':'),
        _ => false,
    }
}

fn join(path: &str, segments: &[Segment], leading_dot: bool) -> String {
    let mut output = String::with_capacity(path.len() + 2);
    if path.starts_with('/') {
        output.push('/');
    }
    if leading_dot {
        output.push_str("./");
    }
    for segment in segments.iter().filter(|s| !s.removed) {
        output.push_str(segment.as_str(path));
        if segment.end < path.len() {
            output.push('/');
        }
    }
    output
}

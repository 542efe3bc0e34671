//! Path heuristics used when an import string does not resolve directly.

/// Last path segment.
pub fn base(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the last segment, or `"."` for bare file names.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[..idx],
        Some(_) => "/",
        None => ".",
    }
}

/// Whether a path looks like a plain relative reference: not absolute, no
/// parent-directory escapes.
pub fn is_local(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') {
        return false;
    }
    !path.split('/').any(|segment| segment == ".." || segment == ".")
}

/// Resolve `target` against a suffix-matched parent of `source`.
///
/// Splitting both into segments, each offset into `source`'s tail is
/// scored by the length of the common prefix with `target`'s leading
/// directories; the best-scoring offset wins and `source`'s tail from
/// there is replaced with the whole of `target`:
///
/// ```text
/// source: vendor/acme/pkg/store/storepb/rpc.proto
/// target: store/storepb/types.proto
///      -> vendor/acme/pkg/store/storepb/types.proto   (score 2)
/// ```
pub fn find_suffix_matched_path(
    target: &str,
    source: &str,
) -> Option<String> {
    let target_dir = parent(target);
    if target_dir == "." {
        return Some(join(parent(source), target));
    }
    let source_dir = parent(source);

    let target_parts: Vec<&str> = target_dir.split('/').collect();
    let source_parts: Vec<&str> = source_dir.split('/').collect();

    let mut best: Option<(usize, String)> = None;
    for offset in 1..=source_parts.len() {
        let source_start = source_parts.len() - offset;
        let mut score = 0;
        for i in 0..target_parts.len().min(source_parts.len() - source_start) {
            if target_parts[i] == source_parts[source_start + i] {
                score += 1;
            } else {
                break;
            }
        }
        if score > 0 {
            let prefix = source_parts[..source_start].join("/");
            let candidate = join(&prefix, target);
            if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
                best = Some((score, candidate));
            }
        }
    }
    best.map(|(_, path)| path)
}

fn join(
    prefix: &str,
    rest: &str,
) -> String {
    if prefix.is_empty() || prefix == "." {
        rest.to_owned()
    } else if prefix == "/" {
        format!("/{rest}")
    } else {
        format!("{prefix}/{rest}")
    }
}

/// Join segments and lexically resolve `.` and `..` components.
pub fn clean_join(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let absolute = parts.first().is_some_and(|part| part.starts_with('/'));
    for part in parts {
        for segment in part.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    if segments.last().is_some_and(|last| *last != "..") {
                        segments.pop();
                    } else if !absolute {
                        segments.push("..");
                    }
                },
                segment => segments.push(segment),
            }
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Relative path from directory `from` to `to`, both slash-separated.
pub fn relative_to(
    from: &str,
    to: &str,
) -> Option<String> {
    let from_parts: Vec<&str> = from.split('/').filter(|segment| !segment.is_empty() && *segment != ".").collect();
    let to_parts: Vec<&str> = to.split('/').filter(|segment| !segment.is_empty() && *segment != ".").collect();
    if from.starts_with('/') != to.starts_with('/') {
        return None;
    }
    let common = from_parts.iter().zip(&to_parts).take_while(|(a, b)| a == b).count();
    let mut segments: Vec<&str> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..");
    }
    segments.extend(&to_parts[common..]);
    if segments.is_empty() {
        return Some(".".to_owned());
    }
    Some(segments.join("/"))
}

/// Scan proto source for `option go_package = "…";` and return the quoted
/// package path, with any `;packageName` directive stripped. The option
/// sits near the top of the file, so the scan is a cheap line pass.
pub fn fast_lookup_go_package(source: &str) -> Option<String> {
    for line in source.lines() {
        if !line.starts_with("option") {
            continue;
        }
        let Some(index) = line.find("go_package") else {
            continue;
        };
        let rest = &line[index..];
        let Some(eq) = rest.find('=') else {
            continue;
        };
        let Some(open) = rest[eq..].find('"') else {
            continue;
        };
        let start = eq + open + 1;
        let Some(end) = rest.rfind('"') else {
            continue;
        };
        let mut end = end;
        if end <= start {
            continue;
        }
        if let Some(semicolon) = rest.find(';')
            && semicolon > start
            && semicolon < end
        {
            end = semicolon;
        }
        return Some(rest[start..end].to_owned());
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/resolver/path_match_tests.rs"]
mod tests;

//! Path resolution for `cd` and friends.
//!
//! Pure string manipulation over `cwd` and one input token; existence is the
//! caller's concern.

/// Resolve `input` against `cwd`.
///
/// `home` is both the `~` target and the floor for `..`: popping never goes
/// above the depth of `home`.
pub fn resolve(cwd: &str, input: &str, home: &str) -> String {
    match input {
        "" | "~" => home.to_string(),
        "." => cwd.to_string(),
        ".." => parent(cwd, home),
        abs if abs.starts_with('/') => strip_trailing(abs),
        rel => strip_trailing(&format!("{}/{}", cwd.trim_end_matches('/'), rel)),
    }
}

/// `cwd` with one segment popped, clamped at the depth of `home`
fn parent(cwd: &str, home: &str) -> String {
    let mut segments: Vec<&str> = cwd.split('/').filter(|s| !s.is_empty()).collect();
    let floor = depth(home).max(1);

    if segments.len() <= floor {
        return cwd.to_string();
    }

    segments.pop();
    format!("/{}", segments.join("/"))
}

fn depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

fn strip_trailing(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Prompt form of `cwd`: the home prefix shown as `~`
pub fn shorten(cwd: &str, home: &str) -> String {
    match cwd.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{}", rest),
        _ => cwd.to_string(),
    }
}

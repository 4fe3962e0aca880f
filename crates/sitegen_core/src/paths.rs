//! URL and output-path normalization shared by the valid-path set and the link verifier.

const EXTERNAL_PREFIXES: &[&str] = &[
    "http:",
    "https:",
    "mailto:",
    "tel:",
    "ftp:",
    "data:",
    "javascript:",
    "//",
];

/// Converts `\` to `/` and drops any leading `./` or `/` segments.
pub fn normalize_relative_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let mut rest = unified.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.to_string()
}

/// True for links that leave the site: web schemes, mail, phone, data URIs
/// and protocol-relative references.
pub fn is_external_link(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    EXTERNAL_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Cuts the URL at the first `?` or `#`.
pub fn strip_query_and_fragment(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Removes a base path prefix (e.g. `/docs`) from an absolute path.
///
/// Only whole segments are stripped: `/documents` keeps its prefix when the
/// base is `/docs`. The result always starts with `/`.
pub fn strip_base_path(path: &str, base: Option<&str>) -> String {
    let path = ensure_leading_slash(path);
    let Some(base) = base.map(normalize_base).filter(|b| !b.is_empty()) else {
        return path;
    };

    let matches_base = path
        .get(..base.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&base));
    if !matches_base {
        return path;
    }
    let rest = &path[base.len()..];
    if rest.is_empty() {
        "/".to_string()
    } else if rest.starts_with('/') {
        rest.to_string()
    } else {
        path
    }
}

/// Converts an output-relative file path into the URL path it is served at.
pub fn output_file_to_url(target: &str, base: Option<&str>) -> String {
    let relative = normalize_relative_path(target);
    strip_base_path(&format!("/{relative}"), base)
}

/// Normalizes a link into a site-absolute path: query and fragment are cut,
/// a leading `./` is dropped, the base prefix is stripped and a leading `/`
/// is forced, so `guide` and `/guide` name the same page.
///
/// Returns `None` for links that are not checked: empty values, anchors,
/// query-only references and external links.
pub fn normalize_link(raw: &str, base: Option<&str>) -> Option<String> {
    checked_link_path(raw).map(|path| strip_base_path(&normalize_relative_path(path), base))
}

/// Like [`normalize_link`], but relative links are resolved against the
/// directory of `source_page` the way a browser would.
pub fn resolve_link(raw: &str, source_page: &str, base: Option<&str>) -> Option<String> {
    let path = checked_link_path(raw)?;
    if path.starts_with('/') {
        Some(strip_base_path(path, base))
    } else {
        Some(resolve_relative(path, source_page))
    }
}

fn checked_link_path(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || is_external_link(trimmed) {
        return None;
    }
    let path = strip_query_and_fragment(trimmed);
    (!path.is_empty()).then_some(path)
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        ensure_leading_slash(trimmed)
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Resolves a relative reference against the directory of the source page,
/// collapsing `.` and `..` segments.
fn resolve_relative(path: &str, source_page: &str) -> String {
    let source = ensure_leading_slash(strip_query_and_fragment(source_page));
    let dir = match source.rfind('/') {
        Some(idx) => &source[..=idx],
        None => "/",
    };
    let joined = format!("{dir}{path}");
    let keep_trailing = joined.ends_with('/') || joined.ends_with("/.") || joined.ends_with("/..");

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut resolved = format!("/{}", segments.join("/"));
    if keep_trailing && resolved.len() > 1 {
        resolved.push('/');
    }
    resolved
}

use url::Url;

const MAX_COMPONENT_LEN: usize = 80;

/// Android package container formats served by the supported sites.
pub const PACKAGE_EXTENSIONS: &[&str] = &["apk", "apkm", "apks", "xapk"];

/// Lowercase slug: ASCII alphanumerics kept, every other run becomes one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_dash = true;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Relative path of a mirror release page: `apk/{org}/{app}/{app}-{version}-release/`.
///
/// Dots in the version become dashes.
pub fn mirror_release_path(organization: &str, app_name: &str, version: &str) -> String {
    let org = slugify(organization);
    let app = slugify(app_name);
    let version = slugify(&version.replace('.', "-"));
    format!("apk/{org}/{app}/{app}-{version}-release/")
}

/// Filesystem-safe `{app}-v{version}.{extension}`.
pub fn artifact_file_name(app_name: &str, version: &str, extension: &str) -> String {
    let app = sanitize_component(app_name, "app");
    let version = sanitize_component(version, "unknown");
    let extension = extension.trim_start_matches('.');
    format!("{app}-v{version}.{extension}")
}

/// Extension of the last path segment of `url`, lowercased.
///
/// Returns `None` for unparsable URLs or segments without a usable extension.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.last()?;
    split_extension(last).1.map(|ext| ext.to_ascii_lowercase())
}

/// Splits `name` into stem and extension.
///
/// The part after the last dot counts as an extension only when it is
/// alphanumeric and holds at least one letter, so `app-v1.0` keeps its `.0`.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}

pub fn is_package_extension(extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    PACKAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
}

/// Replaces (or appends) the extension of `file_name`.
pub fn with_extension(file_name: &str, extension: &str) -> String {
    let (stem, _) = split_extension(file_name);
    format!("{stem}.{}", extension.trim_start_matches('.'))
}

fn sanitize_component(input: &str, fallback: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| {
            if is_forbidden(c) || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = fallback.to_string();
    }
    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.len() > MAX_COMPONENT_LEN {
        let mut end = MAX_COMPONENT_LEN;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::sanitize_component;

    #[test]
    fn sanitize_replaces_separators_and_patches_reserved_names() {
        assert_eq!(sanitize_component("my app/v:2", "x"), "my_app_v_2");
        assert_eq!(sanitize_component("CON", "x"), "CON_");
        assert_eq!(sanitize_component("  ..  ", "fallback"), "fallback");
    }
}

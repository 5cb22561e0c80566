use semver::Version;
use std::cmp::Ordering;
use tracing::debug;

/// Parses the version strings mod authors actually upload. Accepts a leading
/// `v` and pads `1` or `1.2` out to three components before handing the rest
/// to `semver`.
pub fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);
    let padded = match core.matches('.').count() {
        0 if !core.is_empty() => format!("{core}.0.0{suffix}"),
        1 => format!("{core}.0{suffix}"),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded)
}

/// Returns the item with the highest version by semver precedence. Build
/// metadata is ignored and the earliest item wins a tie. Items whose version
/// does not parse are skipped.
pub fn select_latest<'a, T, F>(items: &'a [T], version_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut best: Option<(&'a T, Version)> = None;
    for item in items {
        let raw = version_of(item);
        let version = match parse_version(raw) {
            Ok(version) => version,
            Err(err) => {
                debug!("skipping release with unparseable version {raw:?}: {err}");
                continue;
            }
        };

        let replace = match &best {
            Some((_, current)) => version.cmp_precedence(current) == Ordering::Greater,
            None => true,
        };
        if replace {
            best = Some((item, version));
        }
    }

    best.map(|(item, _)| item)
}

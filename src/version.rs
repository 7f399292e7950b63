//! Version information for the makeip and ipinfo binaries

/// Crate version, from `MAKEIP_VERSION` at build time
pub const VERSION: &str = env!("MAKEIP_VERSION");

/// Build timestamp, if the build environment provided one
pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");

/// Git commit hash, if the build environment provided one
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Version plus short commit and build time when known
pub fn full_version() -> String {
    describe(VERSION, GIT_COMMIT, BUILD_TIME)
}

fn describe(version: &str, commit: Option<&str>, built: Option<&str>) -> String {
    let mut out = version.to_string();
    if let Some(commit) = commit {
        let short = commit.get(..8).unwrap_or(commit);
        out.push_str(&format!(" ({short})"));
    }
    if let Some(built) = built {
        out.push_str(&format!(" built {built}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe("2.0.0", None, None), "2.0.0");
        assert_eq!(
            describe("2.0.0", Some("0123456789abcdef"), Some("2024-01-01")),
            "2.0.0 (01234567) built 2024-01-01"
        );
        assert_eq!(describe("2.0.0", Some("abc"), None), "2.0.0 (abc)");
    }

    #[test]
    fn test_full_version_starts_with_version() {
        assert!(full_version().starts_with(VERSION));
    }
}

//! Shared key generation for the file relay.
//!
//! Upload and serve both pass keys through [`sanitize_key`], so any key issued at
//! upload time resolves to the same stored object at serve time.

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Idempotent: the output only contains characters that are kept as-is.
pub fn sanitize_key(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build a relay key from an upload timestamp (milliseconds since the epoch)
/// and the client-supplied filename.
pub fn generate_key(timestamp_ms: i64, filename: &str) -> String {
    format!("{}-{}", timestamp_ms, sanitize_key(filename))
}

/// Backend location of the payload for a relay key.
pub fn object_key(key: &str) -> String {
    format!("files/{}", key)
}

/// Backend location of the sidecar metadata for a relay key.
pub fn metadata_key(key: &str) -> String {
    format!("meta/{}.json", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_key("my file (1).pdf"), "my_file__1_.pdf");
        assert_eq!(sanitize_key("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_key("report_v2-final.TXT"), "report_v2-final.TXT");
    }

    #[test]
    fn test_sanitize_maps_each_unicode_char_to_one_underscore() {
        assert_eq!(sanitize_key("café.png"), "caf_.png");
        assert_eq!(sanitize_key("日本.txt"), "__.txt");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["a.txt", "weird name?.doc", "ü/ß\\x", "", "..", "semi;colon"] {
            let once = sanitize_key(input);
            assert_eq!(sanitize_key(&once), once, "input: {:?}", input);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }
    }

    #[test]
    fn test_generated_key_survives_serve_sanitization() {
        let key = generate_key(1_700_000_000_000, "Quarterly Report #3.xlsx");
        assert_eq!(key, "1700000000000-Quarterly_Report__3.xlsx");
        assert_eq!(sanitize_key(&key), key);
    }

    #[test]
    fn test_backend_locations_are_disjoint() {
        assert_eq!(object_key("1-a.txt"), "files/1-a.txt");
        assert_eq!(metadata_key("1-a.txt"), "meta/1-a.txt.json");
        assert_ne!(object_key("1-a.txt.json"), metadata_key("1-a.txt"));
    }
}

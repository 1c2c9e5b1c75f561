//! Cleaning rules for names and paths written by legacy package exporters.

use std::borrow::Cow;

/// Literal suffix left behind when an exporter turned a NUL byte into text.
const CORRUPT_NUL_SUFFIX: &str = "00";

/// Clean a raw tar entry name.
///
/// Some writers pad names with NUL bytes inside the declared header length,
/// and Windows exporters may use backslashes. The name is cut at the first
/// NUL and separators are normalised to `/`.
///
/// # Example
///
/// ```
/// use uview::codec::clean_entry_name;
///
/// assert_eq!(clean_entry_name(b"abc\\pathname\0\0\0"), "abc/pathname");
/// ```
pub fn clean_entry_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).replace('\\', "/")
}

/// Clean the text of a `pathname` member.
///
/// All control characters are removed (stray newlines and NULs), then every
/// trailing `"00"` pair is stripped. Paths that show neither corruption are
/// returned unchanged, and cleaning an already cleaned path is a no-op.
///
/// # Example
///
/// ```
/// use uview::codec::clean_pathname;
///
/// assert_eq!(clean_pathname("Assets/MyFile.cs\n\0\0"), "Assets/MyFile.cs");
/// assert_eq!(clean_pathname("Assets/MyFile.cs\n00"), "Assets/MyFile.cs");
/// assert_eq!(clean_pathname("Assets/Scripts/MyFile.cs"), "Assets/Scripts/MyFile.cs");
/// ```
pub fn clean_pathname(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    while cleaned.ends_with(CORRUPT_NUL_SUFFIX) {
        cleaned.truncate(cleaned.len() - CORRUPT_NUL_SUFFIX.len());
    }
    cleaned
}

/// Decode `pathname` bytes as UTF-8 and clean them.
pub(crate) fn clean_pathname_bytes(raw: &[u8]) -> String {
    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(text) => clean_pathname(text),
        Cow::Owned(text) => clean_pathname(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_pathname_trailing_newline_and_nuls() {
        assert_eq!(clean_pathname("Assets/MyFile.cs\n\0\0"), "Assets/MyFile.cs");
    }

    #[test]
    fn test_clean_pathname_text_zeros() {
        assert_eq!(clean_pathname("Assets/MyFile.cs00"), "Assets/MyFile.cs");
    }

    #[test]
    fn test_clean_pathname_newline_then_text_zeros() {
        assert_eq!(clean_pathname("Assets/MyFile.cs\n00"), "Assets/MyFile.cs");
    }

    #[test]
    fn test_clean_pathname_leaves_clean_paths_alone() {
        for path in [
            "Assets/Scripts/MyFile.cs",
            "Assets/Textures/stone 01.png",
            "Assets/Ünïcödé/файл.txt",
            "Assets/Folder/",
        ] {
            assert_eq!(clean_pathname(path), path);
        }
    }

    #[test]
    fn test_clean_pathname_repeated_suffix() {
        assert_eq!(clean_pathname("Assets/a0000"), "Assets/a");
        assert_eq!(clean_pathname("Assets/a000"), "Assets/a0");
    }

    #[test]
    fn test_clean_pathname_bytes_handles_invalid_utf8() {
        let cleaned = clean_pathname_bytes(b"Assets/\xFFbad.txt\n");
        assert_eq!(cleaned, "Assets/\u{FFFD}bad.txt");
    }

    #[test]
    fn test_clean_entry_name_truncates_at_nul() {
        assert_eq!(clean_entry_name(b"guid/asset\0junk"), "guid/asset");
        assert_eq!(clean_entry_name(b"\0"), "");
    }

    #[test]
    fn test_clean_entry_name_normalises_backslashes() {
        assert_eq!(clean_entry_name(b"guid\\asset.meta"), "guid/asset.meta");
        assert_eq!(clean_entry_name(b".\\guid\\preview.png\0"), "./guid/preview.png");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_clean_pathname_is_idempotent(raw in proptest::collection::vec(any::<u8>(), 0..64)) {
                let once = clean_pathname_bytes(&raw);
                let twice = clean_pathname(&once);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn test_clean_pathname_never_leaves_controls(raw in ".*") {
                let cleaned = clean_pathname(&raw);
                prop_assert!(!cleaned.chars().any(char::is_control));
                prop_assert!(!cleaned.ends_with("00"));
            }
        }
    }
}

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_FILENAME: &str = "video.mp4";

/// Linux `NAME_MAX`, in bytes.
const NAME_MAX: usize = 255;
const EXTENSION: &str = ".mp4";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid filename pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Reduce a title to letters, digits, `_` and `-`, with whitespace runs turned into `_`.
///
/// `\w` is Unicode-aware here, so accented and non-Latin letters survive. The web
/// client this replaces matched ASCII word characters only.
pub fn sanitize_title(title: &str) -> String {
    let kept = DISALLOWED.replace_all(title.trim(), "");
    WHITESPACE.replace_all(&kept, "_").into_owned()
}

/// Filename to save the media under. Always non-empty, ending in `.mp4` and
/// no longer than `NAME_MAX` bytes.
pub fn suggested_filename(title: Option<&str>) -> String {
    let stem = title
        .map(sanitize_title)
        .map(|stem| truncate_on_char_boundary(&stem, NAME_MAX - EXTENSION.len()).to_string());

    match stem {
        Some(stem) if !stem.is_empty() => format!("{}{}", stem, EXTENSION),
        _ => DEFAULT_FILENAME.to_string(),
    }
}

/// `name (n).ext`, kept within `NAME_MAX` bytes. `n == 0` returns the name unchanged.
pub fn numbered_filename(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => filename.split_at(dot),
        _ => (filename, ""),
    };
    let suffix = format!(" ({}){}", n, ext);
    let stem = truncate_on_char_boundary(stem, NAME_MAX.saturating_sub(suffix.len()));
    format!("{}{}", stem, suffix)
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(
            sanitize_title("Official Trailer #1 (HD)!!"),
            "Official_Trailer_1_HD"
        );
        assert_eq!(sanitize_title("  a \t b\n\nc  "), "a_b_c");
        assert_eq!(sanitize_title("foo/bar:baz"), "foobarbaz");
        assert_eq!(sanitize_title("keep-hyphens_and_underscores"), "keep-hyphens_and_underscores");
        assert_eq!(sanitize_title("Café Müller"), "Café_Müller");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for title in [
            "Official Trailer #1 (HD)!!",
            "  spaced   out  ",
            "Hello !",
            "a - b",
            "###",
            "",
        ] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once, "{title:?}");
        }
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename(Some("Official Trailer #1 (HD)!!")),
            "Official_Trailer_1_HD.mp4"
        );
        assert_eq!(suggested_filename(Some("")), DEFAULT_FILENAME);
        assert_eq!(suggested_filename(Some("###")), DEFAULT_FILENAME);
        assert_eq!(suggested_filename(Some("   ")), DEFAULT_FILENAME);
        assert_eq!(suggested_filename(None), DEFAULT_FILENAME);
    }

    #[test]
    fn test_long_multibyte_title_fits_name_max() {
        let title = "日本語のタイトル".repeat(12);
        let name = suggested_filename(Some(&title));

        assert!(name.len() <= 255, "{} bytes", name.len());
        assert!(name.ends_with(".mp4"));
        assert!(name.starts_with("日本語のタイトル"));
        // 251 bytes of stem rounds down to whole 3-byte characters.
        assert_eq!(name.len(), 249 + 4);
    }

    #[test]
    fn test_numbered_filename() {
        assert_eq!(numbered_filename("video.mp4", 0), "video.mp4");
        assert_eq!(numbered_filename("video.mp4", 1), "video (1).mp4");
        assert_eq!(numbered_filename("Clip_v2.mp4", 12), "Clip_v2 (12).mp4");
        assert_eq!(numbered_filename("noext", 3), "noext (3)");

        let longest = suggested_filename(Some(&"a".repeat(400)));
        let numbered = numbered_filename(&longest, 7);
        assert_eq!(numbered.len(), 255);
        assert!(numbered.ends_with("a (7).mp4"));
    }

    #[test]
    fn test_long_ascii_title_is_cut_to_name_max() {
        let name = suggested_filename(Some(&"a".repeat(400)));
        assert_eq!(name.len(), 255);
        assert_eq!(name, format!("{}.mp4", "a".repeat(251)));
    }
}

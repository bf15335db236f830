pub const NEWLINE_TOKEN: &str = "{[NEWLINE]}";
pub const RETURN_TOKEN: &str = "{[RETURN]}";
pub const TAB_TOKEN: &str = "{[TAB]}";

/// Replace the control characters that break the flat row format with
/// literal placeholder tokens. Newlines are handled first, so a CRLF pair
/// comes out as the two tokens back to back rather than a combined one.
pub fn scrub_format_destroyers(text: &str) -> String {
    text.replace('\n', NEWLINE_TOKEN)
        .replace('\r', RETURN_TOKEN)
        .replace('\t', TAB_TOKEN)
}

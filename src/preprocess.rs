//! Comment and whitespace stripping.
//!
//! The parser works positionally over a compact buffer, so before parsing the
//! raw text goes through a single left-to-right pass that drops comments and
//! insignificant whitespace while copying string literals verbatim.
//!
//! Two details of the pass are easy to trip over:
//!
//! - A literal ends only at an unescaped copy of the quote that opened it, so
//!   a `"` inside `'...'` (or a `'` inside `"..."`) is ordinary content.
//! - A whitespace or comment run between two non-structural characters (any
//!   byte other than `{ } [ ] , :`) is kept as a single space. Nothing in the
//!   grammar accepts that space, so `1 2` stays two tokens and fails to parse
//!   instead of silently becoming `12`.

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentMode {
    None,
    Line,
    Block,
}

/// Separator left between two tokens that were split only by whitespace or comments.
pub(crate) const TOKEN_BOUNDARY: u8 = b' ';

/// Whitespace as classified by C `isspace` in the "C" locale.
#[inline]
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

#[inline]
fn is_structural(byte: u8) -> bool {
    matches!(byte, b'{' | b'}' | b'[' | b']' | b',' | b':')
}

/// Strips comments and whitespace outside string literals.
///
/// Comments are `// ...` up to `\n` or `\r`, and `/* ... */`. Inside string
/// literals every byte, including whitespace and comment markers, is copied
/// unchanged; a backslash escapes the following byte.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::preprocess;
///
/// let compact = preprocess("{ /* note */ a : 'x y' // tail\n }");
/// assert_eq!(compact, b"{a:'x y'}");
/// ```
#[must_use]
pub fn preprocess(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    // Opening quote of the literal being copied, if any.
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut comment = CommentMode::None;
    // Set when whitespace or a comment was skipped since the last copied byte.
    let mut gap = false;

    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];

        if let Some(open) = quote {
            output.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == open {
                quote = None;
            }
            i += 1;
            continue;
        }

        match comment {
            CommentMode::Line => {
                if byte == b'\n' || byte == b'\r' {
                    comment = CommentMode::None;
                }
                i += 1;
                continue;
            }
            CommentMode::Block => {
                if byte == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    comment = CommentMode::None;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            CommentMode::None => {}
        }

        if byte == b'/' {
            match bytes.get(i + 1) {
                Some(b'/') => {
                    comment = CommentMode::Line;
                    gap = true;
                    i += 2;
                    continue;
                }
                Some(b'*') => {
                    comment = CommentMode::Block;
                    gap = true;
                    i += 2;
                    continue;
                }
                _ => {}
            }
        }

        if is_space(byte) {
            gap = true;
            i += 1;
            continue;
        }

        if gap {
            if let Some(&last) = output.last() {
                if !is_structural(last) && !is_structural(byte) {
                    output.push(TOKEN_BOUNDARY);
                }
            }
            gap = false;
        }

        output.push(byte);
        if byte == b'\'' || byte == b'"' {
            quote = Some(byte);
        }
        i += 1;
    }

    log::trace!(
        "preprocessed {} input bytes into {} bytes",
        bytes.len(),
        output.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> String {
        String::from_utf8(preprocess(input)).unwrap()
    }

    #[test]
    fn test_strips_whitespace_around_structure() {
        assert_eq!(run("{ key:\n\t42 }"), "{key:42}");
        assert_eq!(run(" [ 1 , 2 ] "), "[1,2]");
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(run("{ /*c*/ a : 1 // trailing\n }"), "{a:1}");
        assert_eq!(run("[1,/* multi\nline */2]"), "[1,2]");
        assert_eq!(run("// only a comment"), "");
        assert_eq!(run("[1,// x\r2]"), "[1,2]");
    }

    #[test]
    fn test_block_comment_needs_its_own_close() {
        // "/*/" opens a comment; the slash does not close it
        assert_eq!(run("[1,/*/ 2 */3]"), "[1,3]");
    }

    #[test]
    fn test_preserves_string_contents() {
        assert_eq!(run("'a  b // not a comment'"), "'a  b // not a comment'");
        assert_eq!(run("{ k : ' /* x */ ' }"), "{k:' /* x */ '}");
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        assert_eq!(run("'it\\'s  here'"), "'it\\'s  here'");
        assert_eq!(run("['a\\\\' , 'b']"), "['a\\\\','b']");
    }

    #[test]
    fn test_other_quote_is_string_content() {
        assert_eq!(run("'a\"  x  \"b'"), "'a\"  x  \"b'");
        assert_eq!(run("[ \"it's\" , 1 ]"), "[\"it's\",1]");
        assert_eq!(run("{ k : \"a '  b\" }"), "{k:\"a '  b\"}");
    }

    #[test]
    fn test_token_boundary_between_words() {
        assert_eq!(run("123 456"), "123 456");
        assert_eq!(run("{a:1   b:2}"), "{a:1 b:2}");
        assert_eq!(run("1/*c*/2"), "1 2");
        assert_eq!(run("  true  "), "true");
    }

    #[test]
    fn test_quote_in_comment_is_ignored() {
        assert_eq!(run("// it's\n[1]"), "[1]");
    }
}

//! Locate the `__version__ = "..."` assignment inside a source file.

use std::ops::Range;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::SpecifierProblem;

// One assignment per line: optional indentation, the symbol, `=`, a quoted
// literal without line breaks, then at most a trailing comment.
static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*__version__[ \t]*=[ \t]*(?:"([^"\r\n]*)"|'([^'\r\n]*)')[ \t]*(?:#[^\r\n]*)?\r?$"#,
    )
    .expect("Invalid regex")
});

/// The version literal found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLiteral<'a> {
    /// The literal's contents, without quotes.
    pub text: &'a str,
    /// Byte range of `text` within the searched source.
    pub span: Range<usize>,
}

/// Find the single version assignment in `source`.
///
/// Zero matches and several matches are both errors: neither leaves an
/// authoritative literal to rewrite.
pub fn locate(source: &str) -> Result<VersionLiteral<'_>, SpecifierProblem> {
    let mut literals = ASSIGNMENT_RE.captures_iter(source).filter_map(|caps| {
        caps.get(1).or_else(|| caps.get(2)).map(|m| VersionLiteral {
            text: m.as_str(),
            span: m.range(),
        })
    });

    let first = literals.next().ok_or(SpecifierProblem::Missing)?;
    let extra = literals.count();
    if extra > 0 {
        return Err(SpecifierProblem::Ambiguous { count: extra + 1 });
    }

    Ok(first)
}

/// Replace the literal at `span` with `replacement`, keeping every other byte.
pub fn splice(source: &str, span: Range<usize>, replacement: &str) -> String {
    let mut updated = String::with_capacity(source.len() + replacement.len());
    updated.push_str(&source[..span.start]);
    updated.push_str(replacement);
    updated.push_str(&source[span.end..]);
    updated
}

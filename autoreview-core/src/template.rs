//! Comment template rendering
//!
//! Templates substitute `${name}` placeholders from an explicit set of
//! bindings in a single pass. Only bare names are accepted inside a
//! placeholder; anything else is rejected rather than evaluated.
//! Substituted values are never rescanned.
//!
//! Backslash escapes read the way they do in a JavaScript template literal:
//! `\n`, `\t`, `\r`, `\b`, `\f`, `\v` and `\0` become control characters, a
//! backslash before a line break joins the lines, and any other escaped
//! character stands for itself, so `\${` is a literal `${` and `\\` is one
//! backslash. `\x` and `\u` code escapes are not decoded. A trailing lone
//! backslash is kept.

use std::collections::HashMap;

use crate::error::TemplateError;

/// Named values available to a template
pub type Bindings = HashMap<String, String>;

/// Render `template` with `bindings`
pub fn render(template: &str, bindings: &Bindings) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(pos) = rest.find(|c: char| c == '$' || c == '\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let advance = if let Some(escaped) = tail.strip_prefix('\\') {
            match escaped.chars().next() {
                Some(c) => {
                    if let Some(unescaped) = unescape(c) {
                        out.push(unescaped);
                    }
                    pos + 1 + c.len_utf8()
                }
                None => {
                    out.push('\\');
                    pos + 1
                }
            }
        } else if tail.starts_with("${") {
            let body = &tail[2..];
            let len = body.find('}').ok_or(TemplateError::Unterminated {
                offset: consumed + pos,
            })?;
            let expression = &body[..len];
            out.push_str(lookup(expression, bindings)?);
            pos + 2 + len + 1
        } else {
            // lone `$`
            out.push('$');
            pos + 1
        };

        consumed += advance;
        rest = &rest[advance..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Character produced by `\c`; `None` for an escaped line break
fn unescape(c: char) -> Option<char> {
    let unescaped = match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '0' => '\0',
        '\n' => return None,
        other => other,
    };
    Some(unescaped)
}

/// Render with a single binding
pub fn render_one(template: &str, name: &str, value: &str) -> Result<String, TemplateError> {
    let bindings = Bindings::from([(name.to_string(), value.to_string())]);
    render(template, &bindings)
}

fn lookup<'b>(expression: &str, bindings: &'b Bindings) -> Result<&'b str, TemplateError> {
    let name = expression.trim();
    if !is_name(name) {
        return Err(TemplateError::Unsupported {
            expression: expression.to_string(),
        });
    }

    bindings
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| TemplateError::Unbound {
            name: name.to_string(),
        })
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewers(value: &str) -> Bindings {
        Bindings::from([("reviewers".to_string(), value.to_string())])
    }

    #[test]
    fn test_substitutes_binding() {
        let out = render(":wave: ${reviewers}", &reviewers("@alice, @bob")).unwrap();
        assert_eq!(out, ":wave: @alice, @bob");
    }

    #[test]
    fn test_default_template() {
        let out = render(crate::config::DEFAULT_TEMPLATE, &reviewers("@alice")).unwrap();
        assert_eq!(
            out,
            ":wave: @alice have been assigned to review this pull request."
        );
    }

    #[test]
    fn test_unbound_name_fails() {
        let err = render("Hello ${team}", &reviewers("@alice")).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unbound {
                name: "team".to_string()
            }
        );
    }

    #[test]
    fn test_expressions_rejected() {
        for template in [
            "${reviewers.length}",
            "${process.exit(1)}",
            "${1 + 1}",
            "${}",
            "${ `x` }",
        ] {
            let err = render(template, &reviewers("@alice")).unwrap_err();
            assert!(
                matches!(err, TemplateError::Unsupported { .. }),
                "{template} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_whitespace_inside_placeholder() {
        let out = render("${ reviewers }!", &reviewers("@a")).unwrap();
        assert_eq!(out, "@a!");
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = render("ok ${reviewers", &reviewers("@a")).unwrap_err();
        assert_eq!(err, TemplateError::Unterminated { offset: 3 });
    }

    #[test]
    fn test_escaped_placeholder_is_literal() {
        let out = render("\\${reviewers} = ${reviewers}", &reviewers("@a")).unwrap();
        assert_eq!(out, "${reviewers} = @a");
    }

    #[test]
    fn test_lone_dollar_kept() {
        let out = render("costs $5 ${reviewers}$", &reviewers("@a")).unwrap();
        assert_eq!(out, "costs $5 @a$");
    }

    #[test]
    fn test_escape_sequences() {
        let out = render("Hi\\n${reviewers}\\tthanks", &reviewers("@a")).unwrap();
        assert_eq!(out, "Hi\n@a\tthanks");

        let out = render("a\\\\b \\$ \\` \\q", &reviewers("@a")).unwrap();
        assert_eq!(out, "a\\b $ ` q");

        let out = render("one \\\ntwo", &reviewers("@a")).unwrap();
        assert_eq!(out, "one two");

        let out = render("\\r\\0\\b\\f\\v", &reviewers("@a")).unwrap();
        assert_eq!(out, "\r\0\u{8}\u{c}\u{b}");
    }

    #[test]
    fn test_trailing_backslash_kept() {
        let out = render("${reviewers} \\", &reviewers("@a")).unwrap();
        assert_eq!(out, "@a \\");
    }

    #[test]
    fn test_escaped_backslash_before_placeholder() {
        let out = render("\\\\${reviewers}", &reviewers("@a")).unwrap();
        assert_eq!(out, "\\@a");
    }

    #[test]
    fn test_escape_offsets_unterminated() {
        let err = render("é\\é ${x", &reviewers("@a")).unwrap_err();
        assert_eq!(err, TemplateError::Unterminated { offset: 6 });
    }

    #[test]
    fn test_values_not_rescanned() {
        let out = render("${reviewers}", &reviewers("${reviewers}")).unwrap();
        assert_eq!(out, "${reviewers}");
    }

    #[test]
    fn test_multiple_placeholders_and_unicode() {
        let mut bindings = reviewers("@alice");
        bindings.insert("number".to_string(), "42".to_string());
        let out = render("👋 ${reviewers} → #${number} (${reviewers})", &bindings).unwrap();
        assert_eq!(out, "👋 @alice → #42 (@alice)");
    }

    #[test]
    fn test_render_one() {
        assert_eq!(render_one("[${x}]", "x", "y").unwrap(), "[y]");
    }
}

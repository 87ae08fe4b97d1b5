//! Line-oriented template rendering
//!
//! Templates understand three directives:
//! - `%%{IF KEY%%` starts a block kept only when `KEY` is in the mapping
//! - `%%}IF%%` ends the block
//! - `%%KEY%%` is replaced by the mapping value for `KEY`
//!
//! Directive lines are removed from the output. Blocks do not nest: a single
//! flag tracks whether lines are being skipped, and any end directive clears it.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Values available to a template, by key
pub type TemplateMapping = BTreeMap<String, String>;

static VAR_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%(\w+)%%").expect("valid variable pattern"));
static IF_START_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%\{IF (\w+)%%").expect("valid block start pattern"));
static IF_END_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%\}IF%%").expect("valid block end pattern"));

/// Render `template` against `mapping`, keeping line endings as they are
pub fn render(template: &str, mapping: &TemplateMapping) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut skip_line = false;

    for line in template.split_inclusive('\n') {
        if IF_END_ENTRY.is_match(line) {
            skip_line = false;
            continue;
        }

        if let Some(caps) = IF_START_ENTRY.captures(line) {
            if !mapping.contains_key(&caps[1]) {
                skip_line = true;
            }
            continue;
        }

        if skip_line {
            continue;
        }

        rendered.push_str(&interpolate(line, mapping));
    }

    rendered
}

fn interpolate<'a>(line: &'a str, mapping: &TemplateMapping) -> std::borrow::Cow<'a, str> {
    VAR_ENTRY.replace_all(line, |caps: &Captures| match mapping.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            tracing::warn!(
                "Template warning: found key in template file that does not have a value: {}",
                &caps[1]
            );
            String::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> TemplateMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "#!/bin/sh\necho 50% done\n\n  indented\r\nno newline at end";
        assert_eq!(render(text, &TemplateMapping::new()), text);
        assert_eq!(render(text, &mapping(&[("A", "1")])), text);
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(render("", &mapping(&[("A", "1")])), "");
    }

    #[test]
    fn test_interpolation() {
        let m = mapping(&[("a", "1"), ("b", "2")]);
        assert_eq!(render("%%a%%-%%b%%", &m), "1-2");
    }

    #[test]
    fn test_missing_keys_leave_no_text() {
        assert_eq!(render("%%a%%-%%b%%", &TemplateMapping::new()), "-");
    }

    #[test]
    fn test_interpolation_repeated_key() {
        let m = mapping(&[("NAME", "foo")]);
        assert_eq!(
            render("install %%NAME%% /usr/bin/%%NAME%%\n", &m),
            "install foo /usr/bin/foo\n"
        );
    }

    #[test]
    fn test_value_is_not_reinterpreted() {
        let m = mapping(&[("A", "%%B%%"), ("B", "nope")]);
        assert_eq!(render("x=%%A%%\n", &m), "x=%%B%%\n");
    }

    #[test]
    fn test_lone_delimiters_kept() {
        let m = mapping(&[("A", "1")]);
        assert_eq!(render("100%% sure %%A\n", &m), "100%% sure %%A\n");
        assert_eq!(render("%%%A%%\n", &m), "%1\n");
    }

    #[test]
    fn test_block_with_key_present() {
        let body = "line one %%X%%\nline two\n";
        let template = format!("before\n%%{{IF HAS_X%%\n{}%%}}IF%%\nafter\n", body);
        let m = mapping(&[("HAS_X", ""), ("X", "x")]);

        assert_eq!(render(&template, &m), "before\nline one x\nline two\nafter\n");
    }

    #[test]
    fn test_block_with_key_absent() {
        let bodies = ["anything\n", "%%X%%\n%%Y%%\n", "\n\n", "%%{IF OTHER%%\n"];
        for body in bodies {
            let template = format!("%%{{IF HAS_X%%\n{}%%}}IF%%\n", body);
            assert_eq!(render(&template, &mapping(&[("X", "x")])), "");
        }
    }

    #[test]
    fn test_blocks_do_not_nest() {
        let template = "%%{IF A%%\na\n%%{IF B%%\nb\n%%}IF%%\nafter inner\n%%}IF%%\nend\n";

        // Outer block suppressed: the inner end clears the single flag
        let m = mapping(&[("B", "")]);
        assert_eq!(render(template, &m), "after inner\nend\n");

        // Inner block suppressed inside a kept outer block
        let m = mapping(&[("A", "")]);
        assert_eq!(render(template, &m), "a\nafter inner\nend\n");
    }

    #[test]
    fn test_stray_end_is_dropped() {
        assert_eq!(render("a\n%%}IF%%\nb\n", &TemplateMapping::new()), "a\nb\n");
    }

    #[test]
    fn test_directive_anywhere_on_line() {
        let template = "# %%{IF README%% start\nreadme\n  # %%}IF%%\n";
        assert_eq!(render(template, &TemplateMapping::new()), "");
        assert_eq!(render(template, &mapping(&[("README", "")])), "readme\n");
    }
}

/// Make `input` safe inside a double-quoted shell string.
///
/// Backslash has to go first, otherwise the backslashes added for the other
/// characters would be escaped a second time.
pub fn escape_shell_string(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
        .replace('!', "\\!")
}

/// Flatten text that ends up in a `#` comment so it cannot break out of it.
pub fn comment_safe(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_each_special_character() {
        assert_eq!(escape_shell_string(r#"Hello "World""#), r#"Hello \"World\""#);
        assert_eq!(escape_shell_string("$HOME"), r"\$HOME");
        assert_eq!(escape_shell_string("`command`"), r"\`command\`");
        assert_eq!(escape_shell_string(r"path\to\file"), r"path\\to\\file");
        assert_eq!(escape_shell_string("Hello!"), r"Hello\!");
    }

    #[test]
    fn mixed_input() {
        assert_eq!(
            escape_shell_string(r#"App "$NAME" costs $10!"#),
            r#"App \"\$NAME\" costs \$10\!"#
        );
    }

    #[test]
    fn backslash_is_not_escaped_twice() {
        assert_eq!(escape_shell_string(r#"\""#), r#"\\\""#);
        assert_eq!(escape_shell_string(r"\$"), r"\\\$");
    }

    #[test]
    fn safe_strings_unchanged() {
        for name in ["Firefox", "VS Code", "GIMP 2.10"] {
            assert_eq!(escape_shell_string(name), name);
        }
    }

    #[test]
    fn comment_text_stays_on_one_line() {
        assert_eq!(comment_safe("Arch\nrm -rf /"), "Arch rm -rf /");
    }
}

//! Environment variable expansion for configured paths

use std::path::PathBuf;

/// Expand `$NAME` and `${NAME}` from the process environment.
///
/// Unset variables expand to the empty string. A `$` that does not start a
/// variable reference is kept as-is, as is an unterminated `${`.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand a configured path string into a `PathBuf`
pub fn expand_path(input: &str) -> PathBuf {
    PathBuf::from(expand_env(input))
}

fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    result.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    result.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 {
            result.push('$');
        } else {
            result.push_str(&lookup(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

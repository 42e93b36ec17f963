/// Splits a command line into program and arguments.
#[cfg(not(target_os = "windows"))]
pub(crate) fn split_command(cmd: &str) -> Option<Vec<String>> {
    shlex::split(cmd)
}

/// Windows paths use backslashes, which POSIX shlex would treat as escapes.
/// Only double-quote grouping and whitespace splitting are applied.
#[cfg(target_os = "windows")]
pub(crate) fn split_command(cmd: &str) -> Option<Vec<String>> {
    let mut parts = Vec::<String>::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in cmd.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return None;
    }
    if !current.is_empty() {
        parts.push(current);
    }
    Some(parts)
}

//! Minimal string surgery on JS-like config sources.
//!
//! These helpers edit one field of an object literal without parsing the
//! language: a character scanner tracks strings and comments so brace
//! counting is not fooled by them. Callers keep a full-text snapshot, so
//! a wrong edit is always recoverable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Single,
    Double,
    Template,
    LineComment,
    BlockComment,
}

/// State transition for one character. The returned flag asks the caller
/// to consume the following character as well ("//", "/*", "*/", escapes).
fn advance(state: ScanState, c: char, next: Option<char>) -> (ScanState, bool) {
    match state {
        ScanState::Code => match c {
            '\'' => (ScanState::Single, false),
            '"' => (ScanState::Double, false),
            '`' => (ScanState::Template, false),
            '/' if next == Some('/') => (ScanState::LineComment, true),
            '/' if next == Some('*') => (ScanState::BlockComment, true),
            _ => (ScanState::Code, false),
        },
        ScanState::Single => match c {
            '\\' => (ScanState::Single, true),
            '\'' | '\n' => (ScanState::Code, false),
            _ => (ScanState::Single, false),
        },
        ScanState::Double => match c {
            '\\' => (ScanState::Double, true),
            '"' | '\n' => (ScanState::Code, false),
            _ => (ScanState::Double, false),
        },
        ScanState::Template => match c {
            '\\' => (ScanState::Template, true),
            '`' => (ScanState::Code, false),
            _ => (ScanState::Template, false),
        },
        ScanState::LineComment => match c {
            '\n' => (ScanState::Code, false),
            _ => (ScanState::LineComment, false),
        },
        ScanState::BlockComment => match c {
            '*' if next == Some('/') => (ScanState::Code, true),
            _ => (ScanState::BlockComment, false),
        },
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Index of the `}` matching the `{` at byte offset `open`.
pub fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    if !text[open..].starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut state = ScanState::Code;
    let mut chars = text[open..].char_indices().peekable();
    while let Some((off, c)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        if state == ScanState::Code {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + off);
                    }
                }
                _ => {}
            }
        }
        let (new_state, skip_next) = advance(state, c, next);
        state = new_state;
        if skip_next {
            chars.next();
        }
    }
    None
}

/// End of the value starting at byte offset `start`: the offset of the
/// first top-level `,` or unbalanced closing bracket after it.
pub(crate) fn value_end(text: &str, start: usize) -> usize {
    let mut depth = 0usize;
    let mut state = ScanState::Code;
    let mut chars = text[start..].char_indices().peekable();
    while let Some((off, c)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        if state == ScanState::Code {
            match c {
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => {
                    if depth == 0 {
                        return start + off;
                    }
                    depth -= 1;
                }
                ',' if depth == 0 => return start + off,
                _ => {}
            }
        }
        let (new_state, skip_next) = advance(state, c, next);
        state = new_state;
        if skip_next {
            chars.next();
        }
    }
    text.len()
}

/// Locate a bare `key:` directly inside the object literal (depth one,
/// outside strings and comments). Returns (key_start, value_start).
fn find_top_level_key(object: &str, key: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut state = ScanState::Code;
    let mut chars = object.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        if state == ScanState::Code {
            match c {
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth = depth.saturating_sub(1),
                _ => {
                    if depth == 1 && object[pos..].starts_with(key) {
                        let before_ok = object[..pos]
                            .chars()
                            .next_back()
                            .is_none_or(|prev| !is_ident_char(prev));
                        let after = &object[pos + key.len()..];
                        let after_ok = !after.starts_with(is_ident_char);
                        if before_ok && after_ok {
                            let colon_off = after.len() - after.trim_start().len();
                            if after[colon_off..].starts_with(':') {
                                let value_start = pos + key.len() + colon_off + 1;
                                return Some((pos, value_start));
                            }
                        }
                    }
                }
            }
        }
        let (new_state, skip_next) = advance(state, c, next);
        state = new_state;
        if skip_next {
            chars.next();
        }
    }
    None
}

/// Replace the value of `key` in an object literal, or add the field if
/// it is not present at the top level.
pub fn set_field(object: &str, key: &str, value: &str) -> String {
    match find_top_level_key(object, key) {
        Some((key_start, value_start)) => {
            let end = value_end(object, value_start);
            format!("{}{key}: {value}{}", &object[..key_start], &object[end..])
        }
        None => insert_field(object, key, value),
    }
}

/// Add a field right before the closing brace, placing the separating
/// comma after the last real token so a trailing comment cannot swallow
/// it. Returns the text unchanged when no closing brace exists.
pub(crate) fn insert_field(object: &str, key: &str, value: &str) -> String {
    let Some(close) = object.rfind('}') else {
        return object.to_string();
    };

    let body = &object[..close];
    let mut last_code: Option<char> = None;
    let mut last_code_end = 0usize;
    let mut state = ScanState::Code;
    let mut chars = body.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        let in_comment = matches!(state, ScanState::LineComment | ScanState::BlockComment);
        let starts_comment =
            state == ScanState::Code && c == '/' && matches!(next, Some('/') | Some('*'));
        if !in_comment && !starts_comment && !c.is_whitespace() {
            last_code = Some(c);
            last_code_end = pos + c.len_utf8();
        }
        let (new_state, skip_next) = advance(state, c, next);
        state = new_state;
        if skip_next {
            chars.next();
        }
    }

    let comma = match last_code {
        None | Some('{') | Some(',') => "",
        _ => ",",
    };
    let tail = body[last_code_end..].trim_end();
    format!(
        "{}{comma}{tail}\n  {key}: {value},\n{}",
        &body[..last_code_end],
        &object[close..]
    )
}

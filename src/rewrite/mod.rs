use tracing::debug;

mod scanner;

use scanner::{State, is_ident_part, is_ident_start};

use crate::error::SqlRebindError;

/// Result of rewriting named parameters into positional placeholders.
///
/// Immutable once constructed. The Nth `?` in [`sql`](Self::sql) corresponds
/// to the Nth entry of [`occurrences`](Self::occurrences); names that appear
/// more than once in the source are recorded once per appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    sql: String,
    occurrences: Vec<String>,
}

impl ParsedQuery {
    /// The rewritten SQL text, with every named parameter replaced by `?`.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names in source order, duplicates preserved.
    #[must_use]
    pub fn occurrences(&self) -> &[String] {
        &self.occurrences
    }
}

/// Rewrite `:name` parameters in `src` into positional `?` placeholders.
///
/// Text inside single-quoted literals (with `''` escapes), `--` line
/// comments, and `/* */` block comments is copied verbatim and never
/// rewritten. A parameter name starts with an alphabetic character or `_`
/// and continues with alphanumerics or `_`.
///
/// # Errors
///
/// Returns [`SqlRebindError::SqlParse`] if a `:` outside a string or comment
/// is not followed by an identifier-start character (including at end of
/// input).
pub fn parse_named_sql(src: &str) -> Result<ParsedQuery, SqlRebindError> {
    let mut state = State::Initial;
    let mut sql = String::with_capacity(src.len());
    let mut name = String::new();
    let mut occurrences: Vec<String> = Vec::new();

    for ch in src.chars() {
        match state {
            State::Initial => match ch {
                ':' => state = State::Colon,
                '-' => {
                    state = State::LineCommentStart;
                    sql.push(ch);
                }
                '/' => {
                    state = State::BlockCommentStart;
                    sql.push(ch);
                }
                '\'' => {
                    state = State::InString;
                    sql.push(ch);
                }
                _ => sql.push(ch),
            },
            State::Colon => {
                if is_ident_start(ch) {
                    name.clear();
                    name.push(ch);
                    state = State::InParameter;
                } else {
                    return Err(SqlRebindError::missing_identifier());
                }
            }
            State::InParameter => {
                if is_ident_part(ch) {
                    name.push(ch);
                } else {
                    occurrences.push(std::mem::take(&mut name));
                    sql.push('?');
                    // The terminating character is emitted literally, not
                    // re-dispatched.
                    sql.push(ch);
                    state = State::Initial;
                }
            }
            State::LineCommentStart => {
                state = if ch == '-' {
                    State::InLineComment
                } else {
                    State::Initial
                };
                sql.push(ch);
            }
            State::InLineComment => {
                if ch == '\n' {
                    state = State::Initial;
                }
                sql.push(ch);
            }
            State::BlockCommentStart => {
                state = if ch == '*' {
                    State::InBlockComment
                } else {
                    State::Initial
                };
                sql.push(ch);
            }
            State::InBlockComment => {
                if ch == '*' {
                    state = State::BlockCommentEnd;
                }
                sql.push(ch);
            }
            State::BlockCommentEnd => {
                // A run of stars keeps the close pending; anything else
                // returns to the comment body.
                match ch {
                    '/' => state = State::Initial,
                    '*' => {}
                    _ => state = State::InBlockComment,
                }
                sql.push(ch);
            }
            State::InString => {
                if ch == '\'' {
                    state = State::StringEnd;
                }
                sql.push(ch);
            }
            State::StringEnd => {
                if ch == '\'' {
                    // Doubled quote: still inside the literal.
                    state = State::InString;
                    sql.push(ch);
                } else {
                    // The closing quote stood; this character is dispatched
                    // exactly as in the initial state.
                    match ch {
                        ':' => state = State::Colon,
                        '-' => {
                            state = State::LineCommentStart;
                            sql.push(ch);
                        }
                        '/' => {
                            state = State::BlockCommentStart;
                            sql.push(ch);
                        }
                        _ => {
                            state = State::Initial;
                            sql.push(ch);
                        }
                    }
                }
            }
        }
    }

    match state {
        State::Colon => return Err(SqlRebindError::missing_identifier()),
        State::InParameter => {
            occurrences.push(name);
            sql.push('?');
        }
        _ => {}
    }

    debug!(occurrences = occurrences.len(), "rewrote named parameters");
    Ok(ParsedQuery { sql, occurrences })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    Initial,
    Colon,
    InParameter,
    LineCommentStart,
    InLineComment,
    BlockCommentStart,
    InBlockComment,
    BlockCommentEnd,
    InString,
    StringEnd,
}

pub(super) fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub(super) fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

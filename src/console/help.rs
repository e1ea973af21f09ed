//! Contextual help listing

use super::format::Arg;
use super::grammar::Keyword;
use super::output::OutputStream;
use super::token::CommandId;

/// Column width of the keyword field
const KEYWORD_WIDTH: usize = 16;

/// True if `kw` belongs in a listing filtered by `prefix`.
///
/// Wildcards accept any word so they always qualify; `<cr>` only
/// qualifies before a word has been started.
pub fn is_listed(kw: &Keyword<'_>, prefix: Option<&str>) -> bool {
    match prefix {
        None | Some("") => true,
        Some(_) if kw.id == CommandId::OPTIONAL => false,
        Some(_) if kw.is_wildcard() => true,
        Some(p) => kw.keyword.starts_with(p),
    }
}

/// List the keywords at `node` with their help text.
///
/// With a prefix, only keywords starting with it are listed.
/// Returns the number of lines printed.
pub fn print_help(node: &[Keyword<'_>], prefix: Option<&str>, out: &mut dyn OutputStream) -> usize {
    let mut count = 0;
    for kw in node.iter().filter(|kw| is_listed(kw, prefix)) {
        out.printf("  %-16s %s\n", &[Arg::Str(kw.keyword), Arg::Str(kw.help)]);
        count += 1;
    }
    count
}

/// Listing for a position where the command is already complete
pub fn print_end_of_command(out: &mut dyn OutputStream) {
    out.put_str("  ");
    out.write_padded("<cr>", KEYWORD_WIDTH, b' ', false);
    out.put_str(" end of command\n");
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::VideoInfo;

pub const BLOCK_TAG: &str = "vidy";

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((https*://)|(www\.))+\S*$").expect("bare url pattern"));

/// True when there are at least two lines and each one, trimmed, is a bare URL.
pub fn has_many_urls<S: AsRef<str>>(lines: &[S]) -> bool {
    lines.len() > 1 && lines.iter().all(|line| BARE_URL.is_match(line.as_ref().trim()))
}

/// The smallest block that renders `url`.
pub fn minimal_block(url: &str) -> String {
    format!("```{}\n{}\n```", BLOCK_TAG, url)
}

pub fn escape_link_text(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            '[' | ']' => vec!['\\', c],
            '\n' | '\r' => vec![' '],
            c => vec![c],
        })
        .collect()
}

/// `[title](url)` for pasting into a note.
pub fn title_link(info: &VideoInfo) -> String {
    format!("[{}]({})", escape_link_text(&info.title), info.url)
}

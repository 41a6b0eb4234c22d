//! `vidy` fenced blocks inside a markdown note.
//!
//! A block holds one video URL. Older notes may also carry metadata lines
//! under the URL; those blocks are rewritten back to the bare URL.

use futures::future::join_all;

use crate::config::Config;
use crate::core::metadata::{Availability, VideoInfo};
use crate::core::resolver::Resolver;
use crate::utils::{escape_link_text, has_many_urls, minimal_block, BLOCK_TAG};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VidyBlock {
    /// Line of the opening fence, zero-based.
    pub start_line: usize,
    /// Line of the closing fence, inclusive.
    pub end_line: usize,
    pub source: String,
}

impl VidyBlock {
    pub fn lines(&self) -> Vec<&str> {
        self.source.trim().split('\n').collect()
    }

    pub fn url(&self) -> &str {
        self.source.trim().split('\n').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Video { info: VideoInfo, needs_rewrite: bool },
    NotFound(VideoInfo),
    Unavailable(VideoInfo),
    MultipleUrls,
}

fn opening_fence() -> String {
    format!("```{}", BLOCK_TAG)
}

pub fn find_blocks(text: &str) -> Vec<VidyBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let fence = opening_fence();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim() != fence {
            i += 1;
            continue;
        }

        let close = lines[i + 1..]
            .iter()
            .position(|line| line.trim_start().starts_with("```"))
            .map(|offset| i + 1 + offset);

        match close {
            Some(end) => {
                blocks.push(VidyBlock {
                    start_line: i,
                    end_line: end,
                    source: lines[i + 1..end].join("\n"),
                });
                i = end + 1;
            }
            // Unterminated fence: nothing after it is a block.
            None => break,
        }
    }

    blocks
}

pub async fn process_block(resolver: &Resolver, block: &VidyBlock, config: &Config) -> BlockOutcome {
    let lines = block.lines();
    if has_many_urls(lines.as_slice()) {
        tracing::debug!("Block at line {} lists {} URLs", block.start_line, lines.len());
        return BlockOutcome::MultipleUrls;
    }

    let info = resolver.resolve(block.url(), config).await;
    match info.availability() {
        Availability::Found => BlockOutcome::Video {
            info,
            needs_rewrite: lines.len() > 1,
        },
        Availability::NotFound => BlockOutcome::NotFound(info),
        Availability::Unavailable => BlockOutcome::Unavailable(info),
    }
}

/// Resolves every block independently and concurrently, in block order.
pub async fn process_document(resolver: &Resolver, blocks: &[VidyBlock], config: &Config) -> Vec<BlockOutcome> {
    join_all(blocks.iter().map(|block| process_block(resolver, block, config))).await
}

pub fn render_outcome(outcome: &BlockOutcome) -> String {
    match outcome {
        BlockOutcome::Video { info, .. } => render_card(info),
        BlockOutcome::NotFound(info) => format!(">[!WARNING] Cannot find video\n>{}", info.url),
        BlockOutcome::Unavailable(info) => {
            format!(">[!WARNING] Video temporarily unavailable\n>{}", info.url)
        }
        BlockOutcome::MultipleUrls => ">[!WARNING] Cannot accept multiple URLs yet".to_string(),
    }
}

/// Thumbnail linking to the video, then the title and a link to the author.
pub fn render_card(info: &VideoInfo) -> String {
    let title = escape_link_text(&info.title);
    format!(
        "[![{title}]({thumbnail})]({url})\n**{title}**\n[{author}]({author_url})",
        title = title,
        thumbnail = info.thumbnail,
        url = info.url,
        author = escape_link_text(&info.author),
        author_url = info.author_url,
    )
}

/// Lines keep their own terminators, so untouched text (CRLF included) is
/// copied through unchanged. Replacements take the closing fence's ending.
fn splice<F>(text: &str, blocks: &[VidyBlock], outcomes: &[BlockOutcome], mut replacement: F) -> String
where
    F: FnMut(&BlockOutcome) -> Option<String>,
{
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut next = 0;

    for (block, outcome) in blocks.iter().zip(outcomes) {
        let Some(new_text) = replacement(outcome) else {
            continue;
        };
        out.extend(lines[next..block.start_line].iter().copied());

        let closing = lines[block.end_line];
        if closing.ends_with("\r\n") {
            out.push_str(&new_text.replace('\n', "\r\n"));
            out.push_str("\r\n");
        } else {
            out.push_str(&new_text);
            if closing.ends_with('\n') {
                out.push('\n');
            }
        }
        next = block.end_line + 1;
    }
    out.extend(lines[next..].iter().copied());
    out
}

/// The note with each block replaced by its rendering.
pub fn render_document(text: &str, blocks: &[VidyBlock], outcomes: &[BlockOutcome]) -> String {
    splice(text, blocks, outcomes, |outcome| Some(render_outcome(outcome)))
}

/// The note with blocks that carry stored metadata reduced to their URL.
/// Everything else is left as written.
pub fn rewrite_document(text: &str, blocks: &[VidyBlock], outcomes: &[BlockOutcome]) -> String {
    splice(text, blocks, outcomes, |outcome| match outcome {
        BlockOutcome::Video {
            info,
            needs_rewrite: true,
        } => Some(minimal_block(&info.url)),
        _ => None,
    })
}

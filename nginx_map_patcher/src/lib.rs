mod model;
mod templates;

pub use crate::model::{PatchError, PatchOptions, PatchReport, RemovedBlock};
pub use crate::templates::UPGRADE_MAP_BLOCK;

use regex::Regex;
use std::sync::LazyLock;

static RE_MAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*map\s+\S*\s+\S*\s*\{").unwrap());
static RE_BARE_MAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*map\s+\{\s*$").unwrap());
static RE_HTTP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bhttp\s+\{").unwrap());

/// `map <selector> <result> {` or a bare `map {`
pub fn is_map_header(line: &str) -> bool {
    let line = line.trim_end_matches(['\n', '\r']);
    RE_MAP.is_match(line) || RE_BARE_MAP.is_match(line)
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// 扫描并删除所有 map 块，返回剩余文本和被删除块的位置
///
/// Lines keep their own terminators, so everything outside a removed block
/// comes out byte-for-byte. A block whose braces never balance swallows the
/// rest of the input and is reported with `terminated == false`.
pub fn scan_map_blocks(text: &str) -> (String, Vec<RemovedBlock>) {
    let mut kept = String::with_capacity(text.len());
    let mut removed = Vec::new();
    let mut lines = text.split_inclusive('\n').enumerate();

    while let Some((idx, line)) = lines.next() {
        if !is_map_header(line) {
            kept.push_str(line);
            continue;
        }

        let mut depth = brace_delta(line);
        let mut end = idx;
        while depth > 0 {
            match lines.next() {
                Some((i, l)) => {
                    depth += brace_delta(l);
                    end = i;
                }
                None => break,
            }
        }

        removed.push(RemovedBlock {
            start_line: idx + 1,
            end_line: end + 1,
            header: line.trim().to_string(),
            terminated: depth <= 0,
        });
    }

    (kept, removed)
}

pub fn remove_map_blocks(text: &str) -> String {
    scan_map_blocks(text).0
}

/// Puts [`UPGRADE_MAP_BLOCK`] on the line after the first `http {`.
pub fn insert_upgrade_map(text: &str) -> Result<String, PatchError> {
    splice_upgrade_map(text).map(|(out, _)| out)
}

fn splice_upgrade_map(text: &str) -> Result<(String, usize), PatchError> {
    let anchor = RE_HTTP.find(text).ok_or(PatchError::MissingHttpBlock)?;
    let anchor_line = text[..anchor.end()].matches('\n').count() + 1;

    let (head, tail) = match text[anchor.end()..].find('\n') {
        Some(offset) => text.split_at(anchor.end() + offset + 1),
        None => (text, ""),
    };
    let eol = if head.ends_with("\r\n") { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(text.len() + UPGRADE_MAP_BLOCK.len() + 2 * eol.len());
    out.push_str(head);
    if !head.ends_with('\n') {
        out.push_str(eol);
    }
    if eol == "\n" {
        out.push_str(UPGRADE_MAP_BLOCK);
    } else {
        out.push_str(&UPGRADE_MAP_BLOCK.replace('\n', eol));
    }
    // reuse a blank line left behind by a previous run
    if !starts_with_blank_line(tail) {
        out.push_str(eol);
    }
    out.push_str(tail);

    Ok((out, anchor_line))
}

fn starts_with_blank_line(text: &str) -> bool {
    text.split_inclusive('\n')
        .next()
        .is_some_and(|line| line.trim().is_empty())
}

/// Strips every map block, then inserts the upgrade map under `http {`.
pub fn patch_text(text: &str, options: &PatchOptions) -> Result<PatchReport, PatchError> {
    let (stripped, removed) = scan_map_blocks(text);

    if let Some(block) = removed.iter().find(|b| options.strict && !b.terminated) {
        return Err(PatchError::UnterminatedMapBlock {
            line: block.start_line,
        });
    }

    let (text, inserted_after_line) = splice_upgrade_map(&stripped)?;
    Ok(PatchReport {
        text,
        removed,
        inserted_after_line,
    })
}

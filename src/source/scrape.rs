use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::source::SourceText;

/// Some sites refuse requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Below this, the focused extraction probably missed the content and the
/// paragraph harvest takes over.
const MIN_EXTRACTED_CHARS: usize = 500;

/// Elements whose entire subtree is noise for a reading exercise.
const NOISE_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "svg"];

/// Fetch a web page and reduce it to readable plain text.
pub fn fetch_article(url: &str) -> Result<SourceText> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("only http(s) URLs are supported");
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("could not reach {url}"))?;
    if !response.status().is_success() {
        bail!("{url} answered {}", response.status());
    }
    let html = response.text()?;

    let body = extract_text(&html);
    if body.trim().is_empty() {
        bail!("no readable text found at {url}");
    }
    Ok(SourceText {
        title: extract_title(&html),
        body,
    })
}

/// HTML-to-text reduction without a DOM: drop noise subtrees, prefer the
/// article/main region, turn block tags into paragraph breaks, decode the
/// common entities, and normalize whitespace. Falls back to harvesting
/// individual `<p>` elements when the focused pass comes up short.
pub fn extract_text(html: &str) -> String {
    let mut document = html.to_string();
    for element in NOISE_ELEMENTS {
        document = strip_element(&document, element);
    }

    let region = slice_element(&document, "article")
        .or_else(|| slice_element(&document, "main"))
        .or_else(|| slice_element(&document, "body"))
        .unwrap_or(&document);

    let text = normalize_whitespace(&flatten_markup(region));
    if text.chars().count() >= MIN_EXTRACTED_CHARS {
        return text;
    }

    // Thin result: collect every paragraph element long enough to be prose.
    let paragraphs: Vec<String> = each_element(&document, "p")
        .map(|fragment| normalize_whitespace(&flatten_markup(fragment)))
        .filter(|p| p.chars().count() > 20)
        .collect();
    if paragraphs.is_empty() {
        text
    } else {
        paragraphs.join("\n\n")
    }
}

pub fn extract_title(html: &str) -> Option<String> {
    let inner = slice_element(html, "title")?;
    let title = normalize_whitespace(&flatten_markup(inner));
    (!title.is_empty()).then_some(title)
}

/// Byte offset of `<tag` (as a real tag open, not a prefix of a longer name)
/// at or after `from`.
fn find_open_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut search = from;
    while let Some(pos) = lower[search..].find(&needle).map(|p| p + search) {
        let after = lower[pos + needle.len()..].chars().next();
        match after {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('/') | None => {
                return Some(pos);
            }
            _ => search = pos + needle.len(),
        }
    }
    None
}

/// Remove every `<tag ...>...</tag>` subtree. An unclosed tag swallows the
/// rest of the document, which is the safe direction for script/style.
fn strip_element(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let close = format!("</{tag}");
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(open) = find_open_tag(&lower, tag, cursor) {
        out.push_str(&html[cursor..open]);
        match lower[open..].find(&close).map(|p| p + open) {
            Some(end) => {
                cursor = match lower[end..].find('>') {
                    Some(gt) => end + gt + 1,
                    None => html.len(),
                };
            }
            None => {
                cursor = html.len();
            }
        }
    }
    out.push_str(&html[cursor..]);
    out
}

/// Inner HTML of the first `<tag ...>...</tag>` occurrence.
fn slice_element<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let open = find_open_tag(&lower, tag, 0)?;
    let content_start = lower[open..].find('>').map(|p| open + p + 1)?;
    let close = lower[content_start..]
        .find(&format!("</{tag}"))
        .map(|p| content_start + p)?;
    Some(&html[content_start..close])
}

/// Iterator over the inner HTML of every `<tag>...</tag>` occurrence.
fn each_element<'a>(html: &'a str, tag: &'a str) -> impl Iterator<Item = &'a str> {
    let lower = html.to_ascii_lowercase();
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let open = find_open_tag(&lower, tag, cursor)?;
        let content_start = lower[open..].find('>').map(|p| open + p + 1)?;
        let close = lower[content_start..]
            .find(&format!("</{tag}"))
            .map(|p| content_start + p)?;
        cursor = close + 1;
        Some(&html[content_start..close])
    })
}

/// Replace tags with paragraph breaks (block-level) or nothing (inline), and
/// decode entities along the way.
fn flatten_markup(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(lt) = rest.find('<') {
        push_decoded(&mut out, &rest[..lt]);
        match rest[lt..].find('>') {
            Some(gt) => {
                let tag = &rest[lt + 1..lt + gt];
                if is_block_tag(tag) {
                    out.push('\n');
                }
                rest = &rest[lt + gt + 1..];
            }
            None => {
                // Truncated tag at end of input; nothing left to keep.
                rest = "";
            }
        }
    }
    push_decoded(&mut out, rest);
    out
}

fn is_block_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(
        name.as_str(),
        "p" | "br" | "div" | "li" | "ul" | "ol" | "tr" | "table" | "blockquote" | "section"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

/// Append `text` with the handful of entities that matter decoded; unknown
/// entities pass through literally.
fn push_decoded(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail.char_indices().take(10).find(|&(_, ch)| ch == ';');
        match semi {
            Some((len, _)) => {
                let entity = &tail[1..len];
                match decode_entity(entity) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&tail[..=len]),
                }
                rest = &tail[len + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        _ => {
            let code = entity.strip_prefix("#x").map_or_else(
                || entity.strip_prefix('#')?.parse::<u32>().ok(),
                |hex| u32::from_str_radix(hex, 16).ok(),
            )?;
            char::from_u32(code)
        }
    }
}

/// Trim each line, squeeze runs of spaces, and cap blank runs at one empty
/// line so the segmenter sees clean paragraph breaks.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let mut squeezed = String::with_capacity(line.len());
        let mut last_space = false;
        for ch in line.trim().chars() {
            if ch == ' ' || ch == '\t' {
                if !last_space {
                    squeezed.push(' ');
                }
                last_space = true;
            } else {
                squeezed.push(ch);
                last_space = false;
            }
        }

        if squeezed.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(&squeezed);
    }
    out
}

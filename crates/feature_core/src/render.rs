//! View-model serialisers: HTML fragments for pages, plain text for terminals.

use shared::view::{Block, Image, ImageStyle, Span, View};

pub fn to_html(view: &View) -> String {
    match view {
        View::Loading(message) => format!("<p class=\"small\">{}</p>", escape(message)),
        View::Error(message) => format!("<p class=\"error\">{}</p>", escape(message)),
        View::Content(blocks) => blocks
            .iter()
            .map(block_html)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn to_text(view: &View) -> String {
    match view {
        View::Loading(message) => message.clone(),
        View::Error(message) => format!("error: {message}"),
        View::Content(blocks) => {
            let mut lines = Vec::new();
            for block in blocks {
                block_text(block, &mut lines);
            }
            lines.join("\n")
        }
    }
}

/// Escapes text for use both in element content and in quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn image_style(style: ImageStyle) -> &'static str {
    match style {
        ImageStyle::Banner => "width:100%; border-radius:12px;",
        ImageStyle::Thumbnail => {
            "width:70px; height:70px; border-radius:12px; object-fit:cover;"
        }
        ImageStyle::Avatar => "width:70px; height:70px; border-radius:50%;",
    }
}

fn image_html(image: &Image) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" style=\"{}\" />",
        escape(&image.src),
        escape(&image.alt),
        image_style(image.style)
    )
}

fn spans_html(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Plain(text) => escape(text),
            Span::Strong(text) => format!("<strong>{}</strong>", escape(text)),
            Span::Emphasis(text) => format!("<em>{}</em>", escape(text)),
            Span::Small(text) => format!("<span class=\"small\">{}</span>", escape(text)),
        })
        .collect()
}

fn block_html(block: &Block) -> String {
    match block {
        Block::Paragraph { spans, small: true } => {
            format!("<p class=\"small\">{}</p>", spans_html(spans))
        }
        Block::Paragraph { spans, small: false } => format!("<p>{}</p>", spans_html(spans)),
        Block::Image(image) => image_html(image),
        Block::Audio { src } => format!(
            "<audio controls src=\"{}\" style=\"width:100%;\"></audio>",
            escape(src)
        ),
        Block::Link { href, label } => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
            escape(href),
            escape(label)
        ),
        Block::List { items } => {
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", spans_html(item)))
                .collect();
            format!("<ul style=\"margin:8px 0 0 18px;\">{items}</ul>")
        }
        Block::Card { image, body } => {
            let image = image.as_ref().map(image_html).unwrap_or_default();
            let body = body.iter().map(block_html).collect::<Vec<_>>().join("\n");
            format!(
                "<div style=\"display:flex; gap:12px; align-items:center;\">{image}<div>{body}</div></div>"
            )
        }
    }
}

fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

fn block_text(block: &Block, lines: &mut Vec<String>) {
    match block {
        Block::Paragraph { spans, .. } => lines.push(spans_text(spans)),
        Block::Image(image) => lines.push(format!("[image: {}] {}", image.alt, image.src)),
        Block::Audio { src } => lines.push(format!("[audio] {src}")),
        Block::Link { href, label } => lines.push(format!("{label}: {href}")),
        Block::List { items } => {
            lines.extend(items.iter().map(|item| format!("- {}", spans_text(item))));
        }
        Block::Card { image, body } => {
            if let Some(image) = image {
                lines.push(format!("[image: {}] {}", image.alt, image.src));
            }
            for block in body {
                block_text(block, lines);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

//! Markdown parsing and rendering for summary text.
//!
//! The service answers with markdown-flavored prose. Each result is parsed
//! once into a small block model, and the blocks are laid out as styled
//! text. Only the constructs that show up in summaries are modeled;
//! anything exotic falls back to plain paragraph text.

use eframe::egui;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::ui::theme::Palette;

const BODY_TEXT_SIZE: f32 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct InlineSpan {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownBlock {
    Heading { level: u8, spans: Vec<InlineSpan> },
    Paragraph { spans: Vec<InlineSpan> },
    ListItem {
        depth: u8,
        marker: String,
        spans: Vec<InlineSpan>,
    },
    CodeBlock { text: String },
    Rule,
}

#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle {
    strong: bool,
    emphasis: bool,
    strikethrough: bool,
}

enum PendingBlock {
    Heading(u8),
    Paragraph,
    ListItem { depth: u8, marker: String },
}

enum ListKind {
    Bullet,
    Ordered(u64),
}

pub fn parse_markdown(text: &str) -> Vec<MarkdownBlock> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);

    let mut blocks = Vec::new();
    let mut spans: Vec<InlineSpan> = Vec::new();
    let mut pending: Option<PendingBlock> = None;
    let mut style = InlineStyle::default();
    let mut link: Option<String> = None;
    let mut lists: Vec<ListKind> = Vec::new();
    let mut code_text: Option<String> = None;

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    flush_block(&mut blocks, &mut pending, &mut spans);
                    pending = Some(PendingBlock::Heading(heading_rank(level)));
                }
                Tag::Paragraph => {
                    // Inside a list item the paragraph content stays part of
                    // the item; elsewhere it opens a paragraph block.
                    if pending.is_none() {
                        pending = Some(PendingBlock::Paragraph);
                    }
                }
                Tag::List(start) => {
                    lists.push(match start {
                        Some(index) => ListKind::Ordered(index),
                        None => ListKind::Bullet,
                    });
                }
                Tag::Item => {
                    flush_block(&mut blocks, &mut pending, &mut spans);
                    let depth = lists.len().saturating_sub(1) as u8;
                    let marker = match lists.last_mut() {
                        Some(ListKind::Ordered(index)) => {
                            let marker = format!("{index}.");
                            *index += 1;
                            marker
                        }
                        _ => "•".to_string(),
                    };
                    pending = Some(PendingBlock::ListItem { depth, marker });
                }
                Tag::CodeBlock(_) => {
                    flush_block(&mut blocks, &mut pending, &mut spans);
                    code_text = Some(String::new());
                }
                Tag::Emphasis => style.emphasis = true,
                Tag::Strong => style.strong = true,
                Tag::Strikethrough => style.strikethrough = true,
                Tag::Link { dest_url, .. } => link = Some(dest_url.to_string()),
                _ => {}
            },
            Event::End(end) => match end {
                TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::Item => {
                    flush_block(&mut blocks, &mut pending, &mut spans);
                }
                TagEnd::List(_) => {
                    lists.pop();
                }
                TagEnd::CodeBlock => {
                    if let Some(text) = code_text.take() {
                        blocks.push(MarkdownBlock::CodeBlock {
                            text: text.trim_end_matches('\n').to_string(),
                        });
                    }
                }
                TagEnd::Emphasis => style.emphasis = false,
                TagEnd::Strong => style.strong = false,
                TagEnd::Strikethrough => style.strikethrough = false,
                TagEnd::Link => link = None,
                _ => {}
            },
            Event::Text(text) => {
                if let Some(code) = code_text.as_mut() {
                    code.push_str(&text);
                } else {
                    push_span(&mut spans, &text, style, &link, false);
                }
            }
            Event::Code(text) => push_span(&mut spans, &text, style, &link, true),
            Event::SoftBreak => push_span(&mut spans, " ", style, &link, false),
            Event::HardBreak => push_span(&mut spans, "\n", style, &link, false),
            Event::Rule => {
                flush_block(&mut blocks, &mut pending, &mut spans);
                blocks.push(MarkdownBlock::Rule);
            }
            _ => {}
        }
    }
    flush_block(&mut blocks, &mut pending, &mut spans);
    blocks
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Appends inline text, merging into the previous span when the styling is
/// identical so the block model stays compact.
fn push_span(
    spans: &mut Vec<InlineSpan>,
    text: &str,
    style: InlineStyle,
    link: &Option<String>,
    code: bool,
) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.strong == style.strong
            && last.emphasis == style.emphasis
            && last.strikethrough == style.strikethrough
            && last.code == code
            && last.link == *link
        {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(InlineSpan {
        text: text.to_string(),
        strong: style.strong,
        emphasis: style.emphasis,
        strikethrough: style.strikethrough,
        code,
        link: link.clone(),
    });
}

fn flush_block(
    blocks: &mut Vec<MarkdownBlock>,
    pending: &mut Option<PendingBlock>,
    spans: &mut Vec<InlineSpan>,
) {
    if spans.is_empty() {
        *pending = None;
        return;
    }
    let kind = pending.take().unwrap_or(PendingBlock::Paragraph);
    let spans = std::mem::take(spans);
    blocks.push(match kind {
        PendingBlock::Heading(level) => MarkdownBlock::Heading { level, spans },
        PendingBlock::Paragraph => MarkdownBlock::Paragraph { spans },
        PendingBlock::ListItem { depth, marker } => MarkdownBlock::ListItem {
            depth,
            marker,
            spans,
        },
    });
}

pub fn render_markdown(ui: &mut egui::Ui, palette: &Palette, blocks: &[MarkdownBlock]) {
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            ui.add_space(6.0);
        }
        match block {
            MarkdownBlock::Heading { level, spans } => {
                if index > 0 {
                    ui.add_space(4.0);
                }
                let job = layout_job(spans, palette, heading_text_size(*level), true);
                ui.add(egui::Label::new(job).wrap());
            }
            MarkdownBlock::Paragraph { spans } => {
                let job = layout_job(spans, palette, BODY_TEXT_SIZE, false);
                ui.add(egui::Label::new(job).wrap());
            }
            MarkdownBlock::ListItem {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal_top(|ui| {
                    ui.add_space(12.0 + f32::from(*depth) * 16.0);
                    ui.label(
                        egui::RichText::new(marker)
                            .color(palette.hint_text)
                            .size(BODY_TEXT_SIZE),
                    );
                    let job = layout_job(spans, palette, BODY_TEXT_SIZE, false);
                    ui.add(egui::Label::new(job).wrap());
                });
            }
            MarkdownBlock::CodeBlock { text } => {
                egui::Frame::new()
                    .fill(palette.code_background)
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(text)
                                .monospace()
                                .color(palette.body_text),
                        );
                    });
            }
            MarkdownBlock::Rule => {
                ui.separator();
            }
        }
    }
}

fn heading_text_size(level: u8) -> f32 {
    match level {
        1 => 24.0,
        2 => 20.0,
        3 => 17.0,
        _ => 15.5,
    }
}

fn layout_job(
    spans: &[InlineSpan],
    palette: &Palette,
    size: f32,
    heading: bool,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    for span in spans {
        let font_id = if span.code {
            egui::FontId::monospace(size * 0.92)
        } else {
            egui::FontId::proportional(size)
        };
        let color = if heading || span.strong {
            palette.title_text
        } else if span.link.is_some() {
            palette.accent
        } else {
            palette.body_text
        };
        let underline = if span.link.is_some() {
            egui::Stroke::new(1.0, palette.accent)
        } else {
            egui::Stroke::NONE
        };
        let strikethrough = if span.strikethrough {
            egui::Stroke::new(1.0, color)
        } else {
            egui::Stroke::NONE
        };
        let background = if span.code {
            palette.code_background
        } else {
            egui::Color32::TRANSPARENT
        };
        job.append(
            &span.text,
            0.0,
            egui::TextFormat {
                font_id,
                color,
                background,
                italics: span.emphasis,
                underline,
                strikethrough,
                ..Default::default()
            },
        );
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(spans: &[InlineSpan]) -> String {
        spans.iter().map(|span| span.text.as_str()).collect()
    }

    #[test]
    fn parses_heading_followed_by_paragraph() {
        let blocks = parse_markdown("# Summary\n\nThe report covers three topics.");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            MarkdownBlock::Heading { level, spans } => {
                assert_eq!(*level, 1);
                assert_eq!(plain(spans), "Summary");
            }
            other => panic!("expected heading, got {other:?}"),
        }
        match &blocks[1] {
            MarkdownBlock::Paragraph { spans } => {
                assert_eq!(plain(spans), "The report covers three topics.");
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn parses_bullet_and_ordered_lists() {
        let blocks = parse_markdown("- alpha\n- beta\n\n1. first\n2. second");
        let items: Vec<_> = blocks
            .iter()
            .filter_map(|block| match block {
                MarkdownBlock::ListItem { marker, spans, .. } => {
                    Some((marker.clone(), plain(spans)))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            items,
            vec![
                ("•".to_string(), "alpha".to_string()),
                ("•".to_string(), "beta".to_string()),
                ("1.".to_string(), "first".to_string()),
                ("2.".to_string(), "second".to_string()),
            ]
        );
    }

    #[test]
    fn nested_list_items_record_their_depth() {
        let blocks = parse_markdown("- outer\n  - inner");
        let depths: Vec<u8> = blocks
            .iter()
            .filter_map(|block| match block {
                MarkdownBlock::ListItem { depth, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn tracks_inline_styles() {
        let blocks = parse_markdown("plain **bold** and *leaning* plus `code`");
        let MarkdownBlock::Paragraph { spans } = &blocks[0] else {
            panic!("expected paragraph");
        };
        let bold = spans.iter().find(|span| span.text == "bold").expect("bold");
        assert!(bold.strong && !bold.emphasis);
        let leaning = spans
            .iter()
            .find(|span| span.text == "leaning")
            .expect("emphasis");
        assert!(leaning.emphasis && !leaning.strong);
        let code = spans.iter().find(|span| span.text == "code").expect("code");
        assert!(code.code);
    }

    #[test]
    fn keeps_fenced_code_blocks_verbatim() {
        let blocks = parse_markdown("```\nlet x = 1;\nlet y = 2;\n```");
        assert_eq!(
            blocks,
            vec![MarkdownBlock::CodeBlock {
                text: "let x = 1;\nlet y = 2;".to_string()
            }]
        );
    }

    #[test]
    fn links_carry_their_destination() {
        let blocks = parse_markdown("see [the docs](https://example.com/doc)");
        let MarkdownBlock::Paragraph { spans } = &blocks[0] else {
            panic!("expected paragraph");
        };
        let link = spans.iter().find(|span| span.link.is_some()).expect("link");
        assert_eq!(link.text, "the docs");
        assert_eq!(link.link.as_deref(), Some("https://example.com/doc"));
    }

    #[test]
    fn soft_breaks_join_lines_with_spaces() {
        let blocks = parse_markdown("first line\nsecond line");
        let MarkdownBlock::Paragraph { spans } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(plain(spans), "first line second line");
    }

    #[test]
    fn empty_input_produces_no_blocks() {
        assert!(parse_markdown("").is_empty());
    }
}

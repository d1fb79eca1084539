//! # Markdown Rendering
//!
//! Converts assistant replies from Markdown into styled ratatui lines.
//!
//! Supported: paragraphs, headings, bold, italics, strikethrough, inline
//! code, fenced and indented code blocks, nested bullet and numbered lists,
//! horizontal rules and GitHub-style tables. Tables are drawn as box-drawing grids with each
//! column padded to its widest cell and the header row in bold. Anything else
//! (links, images, raw HTML) falls back to its text.

use crate::ui::theme::Theme;
use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::mem;

/// Render `source` into owned lines styled with `theme`.
pub fn markdown_lines(source: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = Renderer::new(theme);
    for event in Parser::new_ext(source, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_head: bool,
}

struct Renderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    table: Option<TableState>,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![Style::default().fg(theme.fg)],
            lists: Vec::new(),
            in_code_block: false,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let next = f(self.style());
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn code_style(&self) -> Style {
        Style::default().fg(self.theme.secondary)
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            let spans = mem::take(&mut self.spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
            return;
        }
        if self.in_code_block {
            let style = self.code_style();
            for line in text.lines() {
                self.lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(line.to_string(), style),
                ]));
            }
            return;
        }
        let style = self.style();
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Html(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push_str(&code);
                } else {
                    let style = self.code_style();
                    self.spans.push(Span::styled(code.to_string(), style));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push(' ');
                } else {
                    self.flush();
                }
            }
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(self.theme.fg_dim),
                )));
                self.lines.push(Line::default());
            }
            Event::TaskListMarker(done) => {
                self.text(if done { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, _, _) => {
                self.flush();
                let accent = self.theme.accent;
                self.push_style(|s| {
                    let s = s.fg(accent).add_modifier(Modifier::BOLD);
                    if level == HeadingLevel::H1 {
                        s.add_modifier(Modifier::UNDERLINED)
                    } else {
                        s
                    }
                });
            }
            Tag::Strong => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Tag::Emphasis => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Tag::Strikethrough => self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
            Tag::BlockQuote => {
                self.flush();
                let dim = self.theme.fg_dim;
                self.push_style(|s| s.fg(dim).add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(depth);
                self.spans.push(Span::styled(
                    format!("{indent}{marker}"),
                    Style::default().fg(self.theme.accent),
                ));
            }
            Tag::Table(alignments) => {
                self.flush();
                self.table = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                    table.row.clear();
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.blank(),
            Tag::Heading(..) => {
                self.pop_style();
                self.blank();
            }
            Tag::Strong | Tag::Emphasis | Tag::Strikethrough => self.pop_style(),
            Tag::BlockQuote => {
                self.pop_style();
                self.blank();
            }
            Tag::CodeBlock(_) => {
                self.in_code_block = false;
                self.blank();
            }
            Tag::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Tag::Item => self.flush(),
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    if !table.row.is_empty() {
                        table.header = mem::take(&mut table.row);
                    }
                    table.in_head = false;
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = mem::take(&mut table.row);
                    if table.in_head {
                        table.header = row;
                    } else {
                        table.rows.push(row);
                    }
                }
            }
            Tag::Table(_) => {
                if let Some(table) = self.table.take() {
                    self.render_table(&table);
                    self.blank();
                }
            }
            _ => {}
        }
    }

    fn render_table(&mut self, table: &TableState) {
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.header.len()))
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }

        let border = Style::default().fg(self.theme.fg_dim);
        let header_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let body_style = Style::default().fg(self.theme.fg);

        let mut grid = vec![Line::from(Span::styled(rule(&widths, '┌', '┬', '┐'), border))];
        if !table.header.is_empty() {
            grid.push(self.table_row(&table.header, &widths, &table.alignments, header_style));
            grid.push(Line::from(Span::styled(rule(&widths, '├', '┼', '┤'), border)));
        }
        for row in &table.rows {
            grid.push(self.table_row(row, &widths, &table.alignments, body_style));
        }
        grid.push(Line::from(Span::styled(rule(&widths, '└', '┴', '┘'), border)));
        self.lines.extend(grid);
    }

    fn table_row(
        &self,
        cells: &[String],
        widths: &[usize],
        alignments: &[Alignment],
        style: Style,
    ) -> Line<'static> {
        let border = Style::default().fg(self.theme.fg_dim);
        let mut spans = vec![Span::styled("│", border)];
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let align = alignments.get(i).copied().unwrap_or(Alignment::None);
            spans.push(Span::styled(
                format!(" {} ", pad(cell, *width, align)),
                style,
            ));
            spans.push(Span::styled("│", border));
        }
        Line::from(spans)
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let gap = width.saturating_sub(display_width(text));
    match align {
        Alignment::Right => format!("{}{text}", " ".repeat(gap)),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
        Alignment::Left | Alignment::None => format!("{text}{}", " ".repeat(gap)),
    }
}

use crate::session::{Message, Module, Role, Screen};
use crate::ui::app::{App, InputMode};
use crate::ui::markdown::markdown_lines;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the whole UI. Returns how far the transcript can be scrolled up so the
/// caller can clamp [`App::transcript_scroll`].
pub fn render(frame: &mut Frame, app: &App) -> u16 {
    let theme = Theme::hygieai();

    // Main layout: Header + Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, theme, main_chunks[0]);

    let max_scroll = match app.session.screen {
        Screen::Home => {
            render_home(frame, app, theme, main_chunks[1]);
            0
        }
        Screen::Chat => render_chat(frame, app, theme, main_chunks[1]),
    };

    render_footer(frame, app, theme, main_chunks[2]);
    max_scroll
}

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let language = app.session.language.code().to_uppercase();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " ✚ HygieAI ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" [{language}]"), Style::default().fg(theme.fg_dim)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    )
    .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

// ---------------------------------------------------------------------------
// Landing screen
// ---------------------------------------------------------------------------

fn render_home(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let strings = app.strings();
    let width = area.width.min(80);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Greeting
            Constraint::Length(1), // Subtitle
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Prompt
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Modules
        ])
        .split(column);

    let greeting = Paragraph::new(Span::styled(
        strings.greeting,
        Style::default()
            .fg(theme.fg)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(greeting, chunks[1]);

    let subtitle = Paragraph::new(Span::styled(
        strings.greeting_subtitle,
        Style::default().fg(theme.fg_dim),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[2]);

    render_input(
        frame,
        app,
        theme,
        chunks[4],
        &app.input,
        strings.prompt_placeholder,
        None,
    );
    render_modules(frame, app, theme, chunks[6]);
}

fn render_modules(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let strings = app.strings();
    let selected = app.selected_module();

    let items: Vec<ListItem> = Module::ALL
        .iter()
        .map(|&module| {
            let is_selected = module == selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let icon = match module {
                Module::Analysis => "🩸",
                Module::Triage => "🩺",
            };
            let title_style = if is_selected {
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.secondary)),
                    Span::styled(format!("{icon} {}", module.title(strings)), title_style),
                ]),
                Line::from(Span::styled(
                    format!("     {}", module.description(strings)),
                    Style::default().fg(theme.fg_dim),
                )),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", strings.modules_title))
            .border_style(Style::default().fg(theme.fg_dim)),
    );

    frame.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Conversation screen
// ---------------------------------------------------------------------------

fn render_chat(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) -> u16 {
    let strings = app.strings();
    let notice_height = u16::from(app.notice.is_some());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Transcript
            Constraint::Length(notice_height), // Notice
            Constraint::Length(3),             // Input
        ])
        .split(area);

    let max_scroll = render_transcript(frame, app, theme, chunks[0]);

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(Span::styled(
            format!(" ⚠ {notice}"),
            Style::default().fg(theme.error),
        ));
        frame.render_widget(notice, chunks[1]);
    }

    match app.mode {
        InputMode::Prompt => render_input(
            frame,
            app,
            theme,
            chunks[2],
            &app.input,
            strings.reply_placeholder,
            None,
        ),
        InputMode::FilePath => render_input(
            frame,
            app,
            theme,
            chunks[2],
            &app.file_input,
            "~/Downloads/results.pdf",
            Some(strings.file_prompt_title),
        ),
    }

    max_scroll
}

fn render_transcript(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) -> u16 {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" 💬 {} ", app.conversation_title()))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(transcript_lines(app, theme)).wrap(Wrap { trim: false });

    // Pin to the newest line unless the user has scrolled up.
    let total = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner.height);
    let offset = max_scroll.saturating_sub(app.transcript_scroll.min(max_scroll));

    frame.render_widget(paragraph.scroll((offset, 0)).block(block), area);
    max_scroll
}

/// Every transcript row, including the synthetic "thinking" row while a
/// request is outstanding.
pub fn transcript_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let strings = app.strings();
    let mut lines = Vec::new();

    for message in app.messages() {
        lines.extend(message_lines(message, app, theme));
        lines.push(Line::default());
    }

    if app.is_pending() {
        lines.push(Line::from(Span::styled(
            strings.assistant,
            Style::default().fg(theme.bot).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            strings.thinking,
            Style::default()
                .fg(theme.fg_dim)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn message_lines(message: &Message, app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let strings = app.strings();
    let time = message.sent_at.format("%H:%M").to_string();
    let (name, color, alignment) = match message.role {
        Role::User => (strings.you, theme.user, Alignment::Right),
        Role::Bot => (strings.assistant, theme.bot, Alignment::Left),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" · {time}"), Style::default().fg(theme.fg_dim)),
    ])
    .alignment(alignment)];

    match message.role {
        Role::User => lines.extend(message.text.lines().map(|line| {
            Line::from(Span::styled(line.to_string(), Style::default().fg(theme.fg)))
                .alignment(alignment)
        })),
        Role::Bot => lines.extend(markdown_lines(&message.text, theme)),
    }

    if let Some(attachment) = &message.attachment {
        lines.push(
            Line::from(Span::styled(
                format!("📎 {}", attachment.name),
                Style::default().fg(theme.secondary),
            ))
            .alignment(alignment),
        );
    }

    lines
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

fn render_input(
    frame: &mut Frame,
    app: &App,
    theme: &Theme,
    area: Rect,
    value: &str,
    placeholder: &str,
    title: Option<&str>,
) {
    let disabled = app.is_pending();
    let border_color = if disabled { theme.fg_dim } else { theme.accent };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(title) = title {
        block = block.title(format!(" {title} "));
    }

    let inner_width = usize::from(area.width.saturating_sub(4));
    let visible = tail_fitting(value, inner_width);
    let content = if value.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(placeholder.to_string(), Style::default().fg(theme.fg_dim)),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(visible.to_string(), Style::default().fg(theme.fg)),
        ])
    };

    let arrow = Span::styled(" ➤", Style::default().fg(border_color));
    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);

    if area.width > 4 {
        let arrow_area = Rect {
            x: area.x + area.width - 4,
            y: area.y + 1,
            width: 2,
            height: 1,
        };
        frame.render_widget(Paragraph::new(arrow), arrow_area);
    }

    if !disabled {
        let typed = u16::try_from(Span::raw(visible).width()).unwrap_or(u16::MAX);
        frame.set_cursor_position((area.x + 2 + typed, area.y + 1));
    }
}

/// The longest suffix of `value` no wider than `width` columns.
fn tail_fitting(value: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = value.len();
    for (idx, c) in value.char_indices().rev() {
        let w = Span::raw(c.to_string()).width();
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &value[start..]
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let strings = app.strings();
    let help_text = match (app.session.screen, app.mode) {
        (Screen::Home, _) => strings.home_help,
        (Screen::Chat, InputMode::FilePath) => strings.file_prompt_help,
        (Screen::Chat, InputMode::Prompt) if app.can_upload() => strings.analysis_help,
        (Screen::Chat, InputMode::Prompt) => strings.chat_help,
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(theme.fg_dim))
        .block(Block::default());

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::session::FileRef;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    /// Draw `app` on a 40x20 test terminal; returns the screen rows and the
    /// reported scroll limit.
    fn draw(app: &App) -> (Vec<String>, u16) {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("test terminal");
        let mut max_scroll = 0;
        terminal
            .draw(|f| max_scroll = render(f, app))
            .expect("draw");

        let buffer = terminal.backend().buffer();
        let rows = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect();
        (rows, max_scroll)
    }

    fn long_transcript() -> App {
        let mut app = App::new(Language::En);
        app.select_module(Module::Triage);
        for i in 1..=20 {
            app.session
                .transcript
                .push(Message::user(format!("msg-{i:02}")));
        }
        app
    }

    fn shows(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn test_thinking_row_only_while_pending() {
        let mut app = App::new(Language::En);
        app.select_module(Module::Triage);
        let _request = app.begin_send("I feel dizzy").expect("issued");

        let lines = transcript_lines(&app, Theme::hygieai());
        let last = lines.last().map(line_text).unwrap_or_default();
        assert_eq!(last, "Thinking...");
        assert_eq!(app.messages().len(), 1);
    }

    #[test]
    fn test_attachment_indicator() {
        let mut app = App::new(Language::En);
        app.select_module(Module::Analysis);
        let _request = app
            .begin_upload(FileRef::new("cbc.pdf", b"%PDF".to_vec()))
            .expect("issued");

        let texts: Vec<String> = transcript_lines(&app, Theme::hygieai())
            .iter()
            .map(line_text)
            .collect();
        assert!(texts.contains(&"Uploaded: cbc.pdf".to_string()));
        assert!(texts.contains(&"📎 cbc.pdf".to_string()));
    }

    #[test]
    fn test_user_text_not_formatted_as_markdown() {
        let mut app = App::new(Language::En);
        let _request = app.begin_send("**not bold**").expect("issued");

        let texts: Vec<String> = transcript_lines(&app, Theme::hygieai())
            .iter()
            .map(line_text)
            .collect();
        assert!(texts.contains(&"**not bold**".to_string()));
    }

    #[test]
    fn test_long_transcript_pinned_to_newest() {
        let app = long_transcript();
        let (rows, max_scroll) = draw(&app);

        assert!(max_scroll > 0);
        assert!(shows(&rows, "msg-20"));
        assert!(!shows(&rows, "msg-01"));
    }

    #[test]
    fn test_scrolled_up_shows_earlier_lines() {
        let mut app = long_transcript();
        let (_, max_scroll) = draw(&app);

        app.scroll_up(max_scroll);
        let (rows, _) = draw(&app);
        assert!(shows(&rows, "msg-01"));
        assert!(!shows(&rows, "msg-20"));

        // Past the top stays at the top
        app.scroll_up(100);
        let (rows, _) = draw(&app);
        assert!(shows(&rows, "msg-01"));
    }

    #[test]
    fn test_pending_row_visible_at_bottom() {
        let mut app = long_transcript();
        let _request = app.begin_send("msg-21").expect("issued");
        let (rows, _) = draw(&app);

        assert!(shows(&rows, "msg-21"));
        assert!(shows(&rows, "Thinking..."));
        assert!(!shows(&rows, "msg-01"));
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(tail_fitting("hello", 10), "hello");
        assert_eq!(tail_fitting("hello world", 5), "world");
        assert_eq!(tail_fitting("", 5), "");
    }
}

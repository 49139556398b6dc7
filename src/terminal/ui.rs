use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::terminal::state::{ReviewScreen, StatusKind};

pub fn render(f: &mut Frame, state: &ReviewScreen<'_>) {
    let [header, main, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let review = &state.review;
    let pages = review.total_pages().max(1);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                " Flagged Emails ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " Found {} emails. Showing page {}/{}",
                review.len(),
                review.page_index() + 1,
                pages
            )),
        ])),
        header,
    );

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);

    // LEFT: current page with check boxes
    let all = if review.all_page_selected() { "[x]" } else { "[ ]" };
    let list_block = Block::default()
        .title(format!(" {all} Select all (a) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = review
        .page_items()
        .iter()
        .map(|e| {
            let mark = if review.is_selected(&e.id) { "[x] " } else { "[ ] " };
            let subj = Span::styled(
                format!("{mark}{}", e.subject),
                Style::default().add_modifier(Modifier::BOLD),
            );
            let from = Span::styled(format!("    {}", e.sender), Style::default().fg(Color::Gray));
            ListItem::new(Text::from(vec![Line::from(subj), Line::from(from)]))
        })
        .collect();

    let list = List::new(items)
        .block(list_block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));
    f.render_stateful_widget(list, left, &mut state.list_state.clone());

    // RIGHT: highlighted email
    let body_block = Block::default()
        .title(" Email ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let body = match state.highlighted() {
        Some(e) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("From: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(e.sender.as_str()),
                ]),
                Line::from(""),
            ];
            if e.body.is_empty() {
                lines.push(Line::styled("(no plain-text body)", Style::default().fg(Color::Gray)));
            } else {
                lines.extend(e.body.lines().map(Line::from));
            }
            Text::from(lines)
        }
        None => Text::from("No flagged emails left."),
    };
    f.render_widget(
        Paragraph::new(body)
            .block(body_block)
            .wrap(Wrap { trim: false })
            .scroll((state.body_scroll, 0)),
        right,
    );

    if let Some(st) = &state.status {
        let color = match st.kind {
            StatusKind::Info => Color::Gray,
            StatusKind::Success => Color::Green,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        f.render_widget(
            Paragraph::new(st.text.as_str()).style(Style::default().fg(color)),
            status,
        );
    }

    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let hint = Paragraph::new(Line::from(vec![
        key("j/k"),
        Span::raw(" move  "),
        key("space"),
        Span::raw(" select  "),
        key("a"),
        Span::raw(" all  "),
        key("n/p"),
        Span::raw(" page  "),
        key("t"),
        Span::raw(" trash  "),
        key("D"),
        Span::raw(" delete forever  "),
        key("q"),
        Span::raw(" quit"),
    ]));
    f.render_widget(hint, footer);
}

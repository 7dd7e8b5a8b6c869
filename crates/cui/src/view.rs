use crate::app::{phase_label, App};
use chipputt_core::{Phase, PlayerId};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(root[1]);

    draw_scoreboard(frame, middle[0], app);
    draw_phase_panel(frame, middle[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
    if app.prompt.is_some() {
        draw_prompt(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let round = if state.phase == Phase::Idle {
        "-".to_string()
    } else {
        state.round_number.to_string()
    };
    let mut summary = format!(
        "Round {round} | {} | to {} by {}",
        phase_label(state.phase),
        state.rules.target_score,
        state.rules.required_lead
    );
    if let Some(remaining) = app.clock_remaining {
        summary.push_str(&format!(" | clock {}s", remaining.as_secs()));
    }
    let lines = vec![
        Line::from(format!("Chip & Putt | Hint: {}", app.next_hint()).bold()),
        Line::from(summary),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Match");
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_scoreboard(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let last_winner = state.last_round_winner();
    let items: Vec<ListItem<'_>> = if state.scores.is_empty() {
        vec![ListItem::new("no match running")]
    } else {
        state
            .standings()
            .into_iter()
            .map(|score| {
                let mut text = format!("{:>3}  {}", score.total, score.name);
                if state.rules.use_handicap {
                    if let Some(hcp) = state.player(&score.player_id).and_then(|p| p.handicap) {
                        text.push_str(&format!(" (hcp {hcp:+})"));
                    }
                }
                if Some(&score.player_id) == last_winner {
                    text.push_str(" *");
                }
                if state.match_winner_id.as_ref() == Some(&score.player_id) {
                    return ListItem::new(text)
                        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
                }
                ListItem::new(text)
            })
            .collect()
    };
    let block = Block::default().borders(Borders::ALL).title("Scoreboard");
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_phase_panel(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let rows = app.cursor_rows();
    let (title, items): (String, Vec<ListItem<'_>>) = match state.phase {
        Phase::Idle | Phase::Finished => {
            let title = match &state.match_winner_id {
                Some(winner) => format!("Winner: {} | Roster", state.player_name(winner)),
                None => format!(
                    "Roster {}/{}",
                    state.players.len(),
                    state.rules.max_players
                ),
            };
            let items: Vec<ListItem<'_>> = state
                .players
                .iter()
                .map(|player| {
                    let mut spans = vec![
                        Span::styled("■ ", Style::default().fg(parse_color(&player.color))),
                        Span::raw(player.name.clone()),
                    ];
                    if state.rules.use_handicap {
                        spans.push(Span::raw(format!(
                            "  hcp {}",
                            player
                                .handicap
                                .map(|hcp| format!("{hcp:+}"))
                                .unwrap_or_else(|| "-".to_string())
                        )));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();
            (title, items)
        }
        Phase::StartLocation => {
            let chooser = state
                .last_round_winner()
                .map(|id| state.player_name(id).to_string())
                .unwrap_or_else(|| "anyone".to_string());
            let items = vec![
                ListItem::new(format!("{chooser} picks the start location")),
                ListItem::new("press l to enter it"),
            ];
            ("Start Location".to_string(), items)
        }
        Phase::OrderConfirm => (
            format!("Turn Order | from {}", state.draft.start_location),
            order_items(app, &rows, |_| String::new()),
        ),
        Phase::Chipping => {
            let closest = state
                .draft
                .closest_winner()
                .map(|id| state.player_name(&id).to_string())
                .unwrap_or_else(|| "-".to_string());
            (
                format!("Chipping | closest: {closest}"),
                order_items(app, &rows, |id| app.chip_label(id)),
            )
        }
        Phase::Putting => (
            "Putting".to_string(),
            order_items(app, &rows, |id| app.putt_label(id).to_string()),
        ),
        Phase::RoundSummary => {
            let items = match state.rounds.last() {
                Some(round) => {
                    let mut items = vec![ListItem::new(format!(
                        "winner: {} | from {}",
                        state.player_name(&round.winner_id),
                        round.start_location
                    ))];
                    items.extend(round.deltas.iter().map(|delta| {
                        ListItem::new(format!(
                            "  +{} {} ({:?})",
                            delta.delta,
                            state.player_name(&delta.player_id),
                            delta.kind
                        ))
                    }));
                    items
                }
                None => vec![ListItem::new("no rounds yet")],
            };
            (format!("Round {} Summary", state.rounds.len()), items)
        }
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    let mut list_state = ListState::default();
    if state.phase != Phase::RoundSummary && state.phase != Phase::StartLocation && !rows.is_empty()
    {
        list_state.select(Some(app.cursor.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn order_items<'a>(
    app: &App,
    rows: &[PlayerId],
    detail: impl Fn(&PlayerId) -> String,
) -> Vec<ListItem<'a>> {
    rows.iter()
        .enumerate()
        .map(|(idx, id)| {
            let total = app.state.score(id).map(|s| s.total).unwrap_or(0);
            ListItem::new(format!(
                "{}. {} ({total})  {}",
                idx + 1,
                app.state.player_name(id),
                detail(id)
            ))
        })
        .collect()
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Events");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("q quit | ? help | Esc close | up/down or j/k move"),
        Line::from("Enter context action"),
        Line::from("a add | Del remove | e rename | c color | +/- handicap"),
        Line::from("g handicaps on/off | t shot clock on/off | [ ] clock -/+5s | r restart"),
        Line::from("s start match | l start location"),
        Line::from("d distance | o hole-out | space judge closest | z reset chips"),
        Line::from("m made | x missed | f finish step | n next round"),
        Line::from("u undo round | y redo round | E end match"),
        Line::from("Shift+S/Ctrl+S save | Shift+L/Ctrl+L load | Shift+X/Ctrl+E export"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_prompt(frame: &mut Frame, app: &App) {
    let Some(prompt) = app.prompt.as_ref() else {
        return;
    };
    let area = centered_rect(60, 28, frame.area());
    frame.render_widget(Clear, area);
    let mut lines = vec![Line::from("Enter=confirm  Esc=cancel")];
    if prompt.mode.takes_path() {
        lines.push(Line::from("Leave empty to use:"));
        lines.push(Line::from(format!("  {}", app.prompt_default_path_hint())));
    }
    if let Some(target) = prompt.target.as_ref() {
        lines.push(Line::from(format!("Player: {}", app.state.player_name(target))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("> {}", prompt.input)));
    let block = Block::default()
        .title(prompt.mode.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn parse_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::White;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

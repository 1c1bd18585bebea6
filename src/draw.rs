use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::BannerTheme;
use crate::components::bracket::{BracketGrid, BracketView, scroll_to_show};
use crate::state::app_settings::{EDIT_ENV, LOG_ENV, ROSTER_ENV};
use crate::state::app_state::{EditorField, ScoreEditor};
use crate::state::roster::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, centered_popup};
use bracket_engine::Bracket;

static TABS: &[&str; 3] = &["Bracket", "Standings", "Help"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        if app.state.show_intro {
            draw_intro(f, f.area(), app);
            return;
        }

        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if let Some(editor) = app.state.editor.as_ref() {
            draw_score_editor(f, f.area(), editor);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Tourney ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let bracket_state = &app.state.bracket;
    let title = bracket_state
        .tournament
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("Loading tournament...");
    let mut caption: Vec<String> = bracket_state
        .tournament
        .iter()
        .flat_map(|t| [t.sport.clone(), t.host.clone()])
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(round) = bracket_state
        .bracket
        .as_ref()
        .and_then(|b| b.round_name(bracket_state.view_round).ok())
    {
        caption.push(round.banner());
    }

    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            title,
            caption: caption.join(" · "),
        },
        banner_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to view bracket")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Standings => 1,
        MenuItem::Help => 2,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Bracket tab
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let state = &app.state.bracket;
    let (Some(tournament), Some(bracket)) = (state.tournament.as_ref(), state.bracket.as_ref())
    else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Roster load failed:\n{err}\n\nPress R to retry")
        } else {
            "Seeding bracket...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header, status_line, key_legend, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let mut header_spans = vec![Span::styled(
        tournament.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for part in [&tournament.sport, &tournament.host] {
        if !part.is_empty() {
            header_spans.push(Span::raw(format!(" | {part}")));
        }
    }
    if app.state.edit_mode {
        header_spans.push(Span::raw("  "));
        header_spans.push(Span::styled(
            " EDIT ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header);

    let status = match (app.state.last_error.as_deref(), app.state.status.as_deref()) {
        (Some(err), _) => Span::styled(err, Style::default().fg(Color::Red)),
        (None, Some(status)) => Span::styled(status, Style::default().fg(Color::Yellow)),
        (None, None) => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_line);

    let legend = if app.state.edit_mode {
        "Keys: h/l=round  j/k=match  Enter=record result  e=lock  R=reseed  ?=help  q=quit"
    } else {
        "Keys: h/l=round  j/k=match  e=edit results  R=reseed  ?=help  q=quit"
    };
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let mut bracket_area = content;
    let mut side_area: Option<Rect> = None;
    if content.width >= 90 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(68), Constraint::Percentage(32)]).areas(content);
        bracket_area = left;
        side_area = Some(right);
    }

    draw_bracket_tree(f, bracket_area, bracket, app);

    if let Some(side) = side_area {
        let [podium, activity] =
            Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(side);
        draw_podium(f, podium, bracket);
        draw_activity(f, activity, app);
    }
}

fn draw_bracket_tree(f: &mut Frame, area: Rect, bracket: &Bracket, app: &App) {
    let sizes: Vec<u32> = bracket
        .rounds()
        .iter()
        .map(|r| r.matches.len() as u32)
        .collect();
    let grid = BracketGrid::compute(area.width, &sizes, app.state.bracket.view_round);
    if grid.cells.is_empty() {
        return;
    }

    let selected = app.state.bracket.selected();
    let scroll_offset = selected
        .and_then(|m| grid.cell(m.round, m.position))
        .map(|cell| scroll_to_show(cell.center_row, area.height.saturating_sub(2), grid.total_height))
        .unwrap_or(0);

    let pad = area.width.saturating_sub(grid.total_width) / 2;
    let view_area = Rect::new(area.x + pad, area.y, area.width - pad, area.height);

    f.render_widget(
        BracketView {
            bracket,
            grid: &grid,
            selected: selected.map(|m| m.id),
            scroll_offset,
            theme: BannerTheme::Dark,
        },
        view_area,
    );
}

fn draw_podium(f: &mut Frame, area: Rect, bracket: &Bracket) {
    let block = default_border(Color::DarkGray).title(" Podium ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    match bracket.champion() {
        Some(champion) => {
            lines.push(Line::from(vec![
                Span::styled("Champion   ", Style::default().fg(Color::Gray)),
                Span::styled(
                    champion.name.as_str(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(runner_up) = bracket_engine::runner_up(bracket) {
                lines.push(Line::from(vec![
                    Span::styled("Runner-up  ", Style::default().fg(Color::Gray)),
                    Span::raw(runner_up.name.as_str()),
                ]));
            }
        }
        None => {
            let remaining = bracket.matches().filter(|m| !m.is_decided()).count();
            lines.push(Line::from(Span::styled(
                "Champion   TBD",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(format!("{remaining} matches to play")));
        }
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_activity(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Results ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if app.state.activity.entries.is_empty() {
        f.render_widget(
            Paragraph::new("No results recorded yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let width = inner.width.saturating_sub(1) as usize;
    let lines: Vec<Line> = app
        .state
        .activity
        .entries
        .iter()
        .rev()
        .take(inner.height as usize)
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let text: String = format!("{} {}", entry.at, entry.summary)
                .chars()
                .take(width)
                .collect();
            Line::from(Span::styled(text, style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Standings tab
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bracket) = app.state.bracket.bracket.as_ref() else {
        f.render_widget(
            Paragraph::new("No tournament loaded. Return to Bracket tab.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let mut lines = Vec::with_capacity(bracket.team_count() + 2);
    lines.push(Line::from(Span::styled(
        format!("{:>4}  {:<24} {:>3} {:>3}  {}", "Seed", "Team", "W", "L", "Status"),
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for record in bracket.standings() {
        let (status, style) = if record.champion {
            ("Champion".to_string(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else if let Some(round) = record.eliminated_in {
            let label = bracket
                .round_name(round)
                .map(|n| n.label())
                .unwrap_or_else(|_| format!("Round {round}"));
            (format!("Out in {label}"), Style::default().fg(Color::DarkGray))
        } else {
            ("Alive".to_string(), Style::default().fg(Color::White))
        };
        let name: String = record.team.name.chars().take(24).collect();
        lines.push(Line::from(Span::styled(
            format!(
                "{:>4}  {:<24} {:>3} {:>3}  {status}",
                record.seed, name, record.wins, record.losses
            ),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Help tab
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), Style::default().fg(Color::Yellow)),
            Span::raw(what),
        ])
    };
    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
    };

    let lines = vec![
        heading("Navigation"),
        key("1 / 2 / ?", "Bracket, Standings, Help"),
        key("h l ← →", "previous / next round"),
        key("j k ↑ ↓", "move between matches"),
        key("Esc", "leave help"),
        Line::from(""),
        heading("Results"),
        key("e", "toggle edit mode"),
        key("Enter", "record the highlighted match"),
        key("Tab", "switch score field in the popup"),
        key("R", "reseed from the roster, dropping all results"),
        Line::from(""),
        heading("Display"),
        key("f", "full screen"),
        key("\"", "log pane"),
        key("q Ctrl-C", "quit"),
        Line::from(""),
        heading("Environment"),
        Line::from(format!("  {ROSTER_ENV:<22}path to a roster JSON file")),
        Line::from(format!("  {EDIT_ENV:<22}start in edit mode (1/true/yes/on)")),
        Line::from(format!("  {LOG_ENV:<22}log level: error, warn, info, debug, trace")),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn draw_score_editor(f: &mut Frame, area: Rect, editor: &ScoreEditor) {
    let popup = centered_popup(area, 46, 9);
    f.render_widget(Clear, popup);

    let block = default_border(Color::Cyan).title(format!(" {} ", editor.title));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let field = |label: &str, value: &str, focused: bool| {
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let cursor = if focused { "_" } else { " " };
        let name: String = label.chars().take(28).collect();
        Line::from(vec![
            Span::raw(format!(" {name:<28} ")),
            Span::styled(format!(" {value:>3}{cursor}"), value_style),
        ])
    };

    let mut lines = vec![
        field(&editor.team_a, &editor.score_a, editor.focus == EditorField::ScoreA),
        field(&editor.team_b, &editor.score_b, editor.focus == EditorField::ScoreB),
        Line::from(""),
    ];
    match editor.error.as_deref() {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab switch  Enter save  Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

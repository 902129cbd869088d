pub mod screen;
pub mod target_stats;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use oche::{
    session::{ThrowResult, THROWS_PER_ROUND},
    stats::{format_median, SessionStats},
    targets::label,
};

use crate::{ui::target_stats::target_table, App};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Rounds kept visible in the log panel
const ROUND_LOG_LEN: usize = 20;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let config = session.config();
        let mode = config.mode;
        let stats = SessionStats::from_session(session);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(3), // current target
                Constraint::Length(1), // session stats
                Constraint::Length(1), // pending darts
                Constraint::Min(3),    // targets table + round log
                Constraint::Length(1), // legend
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(config.title(), bold_style.fg(Color::Cyan)),
            Span::styled(
                format!(
                    "   {}   bell {}",
                    config.end_option.describe(mode),
                    if self.config.sound { "on" } else { "off" }
                ),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        title.render(chunks[0], buf);

        let target_text = match session.current_target() {
            Some(target) => format!("Target: {}", label(target, mode)),
            None => format!("Finished in {} darts", session.darts_thrown()),
        };
        let panel_style = match self.flash {
            Some(flash) => Style::default().bg(flash.kind.color()).fg(Color::White),
            None => Style::default(),
        };
        Paragraph::new(Span::styled(target_text, bold_style))
            .style(panel_style)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let summary = format!(
            "Darts {}   Hits {}   Misses {}   Hit rate {}   Median darts/round {}   Skipped {}",
            stats.darts_thrown,
            stats.hits,
            stats.misses,
            stats.hit_rate.with_percent(),
            format_median(stats.median_round_length),
            stats.skipped.len(),
        );
        Paragraph::new(Span::styled(summary, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let mut pending = Vec::with_capacity(THROWS_PER_ROUND * 2);
        for slot in 0..THROWS_PER_ROUND {
            if slot > 0 {
                pending.push(Span::raw("  "));
            }
            pending.push(match session.pending().get(slot) {
                Some(throw) => Span::styled(
                    format!("[{}]", throw.describe(mode)),
                    match throw.result {
                        ThrowResult::Hit => green_bold_style,
                        ThrowResult::Miss => red_bold_style,
                    },
                ),
                None => Span::styled("[ dart ]", dim_style),
            });
        }
        Paragraph::new(Line::from(pending))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(37), Constraint::Min(10)])
            .split(chunks[4]);

        target_table(
            &stats.targets,
            mode,
            session.current_target(),
            session.skipped(),
        )
        .render(body[0], buf);

        let rounds = session.rounds();
        let log: Vec<Line> = rounds
            .iter()
            .enumerate()
            .rev()
            .take(ROUND_LOG_LEN)
            .map(|(idx, round)| {
                Line::from(vec![
                    Span::styled(format!("{:>3}  ", idx + 1), dim_style),
                    Span::raw(round.iter().map(|t| t.describe(mode)).join(", ")),
                ])
            })
            .collect();
        Paragraph::new(log)
            .block(Block::default().borders(Borders::ALL).title("Rounds"))
            .wrap(Wrap { trim: true })
            .render(body[1], buf);

        let legend = if session.rules().multiplier_enabled {
            "(h)it (d)ouble (t)reble (m)iss (s)kip (enter) submit (bksp) undo (l)eaderboard (b)ell (n)ew (q)uit"
        } else {
            "(h)it (m)iss (s)kip (enter) submit (bksp) undo (l)eaderboard (b)ell (n)ew (q)uit"
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[5], buf);
    }
}

/// Asks for a name once the last target is hit
pub struct NamePromptOverlay<'a>(pub &'a App);

impl Widget for NamePromptOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let popup = centered_rect(area, 44, 7);
        Clear.render(popup, buf);

        let lines = vec![
            Line::from(Span::styled(
                format!("Session complete: {} darts", app.session.darts_thrown()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Enter your name for the leaderboard:"),
            Line::from(Span::styled(
                format!("> {}_", app.name_input),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(
                "(enter) save / (esc) skip",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Well thrown"))
            .alignment(Alignment::Center)
            .render(popup, buf);
    }
}

/// Best results for the current mode, end option and skip setting
pub struct LeaderboardOverlay<'a>(pub &'a App);

impl Widget for LeaderboardOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let config = app.session.config();
        let height = app.board.len().max(1) as u16 + 5;
        let popup = centered_rect(area, 44, height);
        Clear.render(popup, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                config.end_option.describe(config.mode),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::default(),
        ];
        if app.board.is_empty() {
            lines.push(Line::from("No scores yet"));
        }
        lines.extend(app.board.iter().enumerate().map(|(pos, entry)| {
            Line::from(format!(
                "{:>2}. {:<20} {:>4} darts",
                pos + 1,
                entry.name,
                entry.darts_thrown
            ))
        }));
        lines.push(Line::from(Span::styled(
            "(l) back / (n)ew / (q)uit",
            Style::default().add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Leaderboard - {}", config.title())),
            )
            .alignment(Alignment::Center)
            .render(popup, buf);
    }
}

/// Rect of at most `width` x `height` centred in `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

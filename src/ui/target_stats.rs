use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use oche::{
    stats::{attempts_color, rate_color, Rgb, TargetStat},
    targets::{label, GameMode, Target},
};

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Cell text for one row: target, attempts, hit rate, cumulative attempts
pub fn row_text(stat: &TargetStat, mode: GameMode) -> [String; 4] {
    let dash_if_zero = |n: usize| {
        if n == 0 {
            "-".to_string()
        } else {
            n.to_string()
        }
    };
    [
        label(stat.target, mode),
        dash_if_zero(stat.attempts),
        stat.rate.to_string(),
        dash_if_zero(stat.cumulative),
    ]
}

/// Per-target table with the attempts heat column and rate colouring
pub fn target_table(
    stats: &[TargetStat],
    mode: GameMode,
    current: Option<Target>,
    skipped: &[Target],
) -> Table<'static> {
    let header = Row::new(vec!["Target", "Darts", "Hit %", "Total"])
        .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));

    let rows = stats.iter().map(|stat| {
        let [target, attempts, rate, cumulative] = row_text(stat, mode);

        let target_style = if Some(stat.target) == current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if skipped.contains(&stat.target) {
            Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(target).style(target_style),
            Cell::from(attempts).style(
                Style::default()
                    .fg(Color::Black)
                    .bg(to_color(attempts_color(stat.attempts))),
            ),
            Cell::from(rate).style(Style::default().fg(to_color(rate_color(stat.rate)))),
            Cell::from(cumulative),
        ])
    });

    Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(Block::default().borders(Borders::ALL).title("Targets"))
}

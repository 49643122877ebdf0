use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_dim_style = Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM);

        if engine.is_loading() {
            let banner = Paragraph::new(Span::styled(
                "Loading quote...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

            banner.render(area, buf);
            return;
        }

        let session = engine.session();

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let mut quote_occupied_lines =
            ((session.text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

        if session.text.width() <= max_chars_per_line as usize {
            quote_occupied_lines = 1;
        }

        let body_lines = quote_occupied_lines + 4;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(area.height.saturating_sub(body_lines) / 2),
                    Constraint::Length(quote_occupied_lines),
                    Constraint::Length(1), // padding
                    Constraint::Length(1), // stat readouts
                    Constraint::Length(1), // key hints
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let input_chars: Vec<char> = session.input.chars().collect();
        let mut spans = Vec::new();

        for (idx, expected) in session.text.chars().enumerate() {
            let span = if idx < session.current_index {
                let typed = input_chars[idx];
                if typed == expected {
                    Span::styled(expected.to_string(), green_bold_style)
                } else {
                    Span::styled(
                        match typed {
                            ' ' => "·".to_owned(),
                            c => c.to_string(),
                        },
                        red_bold_style,
                    )
                }
            } else if idx == session.current_index {
                Span::styled(expected.to_string(), underlined_dim_bold_style)
            } else {
                Span::styled(expected.to_string(), dim_bold_style)
            };
            spans.push(span);
        }

        let quote = Paragraph::new(Line::from(spans))
            .alignment(if quote_occupied_lines == 1 {
                // when the quote fits on one line centering it
                // gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });

        quote.render(chunks[1], buf);

        let metrics = engine.metrics();
        let wpm_text = metrics
            .wpm
            .map(|v| v.to_string())
            .unwrap_or_else(|| "--".to_string());
        let accuracy_text = metrics
            .accuracy
            .map(|v| v.to_string())
            .unwrap_or_else(|| "--".to_string());

        let stat_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ]
                .as_ref(),
            )
            .split(chunks[3]);

        Paragraph::new(Span::styled(format!("{} wpm", wpm_text), bold_style))
            .alignment(Alignment::Center)
            .render(stat_chunks[0], buf);

        Paragraph::new(Span::styled(format!("{}% acc", accuracy_text), bold_style))
            .alignment(Alignment::Center)
            .render(stat_chunks[1], buf);

        let progress_span = if session.has_finished() {
            Span::styled("complete", green_bold_style)
        } else {
            Span::styled(format!("{}%", metrics.progress), bold_style)
        };
        Paragraph::new(progress_span)
            .alignment(Alignment::Center)
            .render(stat_chunks[2], buf);

        let hints = if session.has_finished() {
            "(tab) new quote / (esc) quit"
        } else {
            "type the quote / (tab) new quote / (esc) quit"
        };
        Paragraph::new(Span::styled(hints, italic_dim_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

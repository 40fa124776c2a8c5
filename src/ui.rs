use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use flowtimer::{countdown::EngineState, store::Field};

use crate::{App, FileAction, Mode};

const HORIZONTAL_MARGIN: u16 = 2;
const CLOCK_HEIGHT: u16 = 5;
const STATUS_HEIGHT: u16 = 1;
const HELP_HEIGHT: u16 = 2;
const PROMPT_MIN_WIDTH: u16 = 40;

const HELP_TEXT: &str = "(space)select (x)deselect (s)tart (t)stop | (a)dd (d)elete (enter)edit ←/→ ↑/↓\n(l)oad (w)rite | (q)uit";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(CLOCK_HEIGHT),
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(HELP_HEIGHT),
            ])
            .split(area);

        let clock_color = match self.session.state() {
            EngineState::Running => Color::Green,
            EngineState::Expired => Color::Red,
            EngineState::Armed => Color::Cyan,
            EngineState::Idle => Color::Gray,
        };
        let title = match self.session.current_file() {
            Some(path) => format!("flowtimer · {}", path.display()),
            None => "flowtimer".to_string(),
        };
        let clock = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                self.session.sink().text.clone(),
                Style::default().patch(bold_style).fg(clock_color),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        clock.render(chunks[0], buf);

        render_status(self, chunks[1], buf);
        render_rows(self, chunks[2], buf);

        Paragraph::new(HELP_TEXT)
            .style(
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Mode::PathPrompt { action, buffer } = &self.mode {
            render_path_prompt(*action, buffer, area, buf);
        }
    }
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![Span::styled(
        app.session.state().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if let Some(row) = app.session.selected().and_then(|id| app.session.store().get(id)) {
        let name = if row.name.is_empty() { "(unnamed)" } else { row.name.as_str() };
        spans.push(Span::raw(format!("  {}", name)));
    }

    if let Some(err) = app.session.sink().last_error() {
        spans.push(Span::styled(
            format!("  {}", err),
            Style::default().fg(Color::Red),
        ));
    }

    Paragraph::new(Line::from(spans)).render(area, buf);
}

fn render_rows(app: &App, area: Rect, buf: &mut Buffer) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(Field::ALL.iter().map(|f| Cell::from(f.to_string())))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let selected = app.session.selected();
    let focus_style = Style::default().add_modifier(Modifier::REVERSED);

    let rows: Vec<Row> = app
        .session
        .store()
        .rows()
        .enumerate()
        .map(|(idx, (id, row))| {
            let marker = if selected == Some(id) { "(•)" } else { "( )" };
            let mut cells = vec![Cell::from(marker)];

            for field in Field::ALL {
                let focused = idx == app.cursor_row && field == app.cursor_field;
                let cell = match (&app.mode, focused) {
                    (Mode::Editing { buffer }, true) => {
                        Cell::from(format!("{}▏", buffer)).style(focus_style)
                    }
                    (_, true) => Cell::from(row.field(field).to_string()).style(focus_style),
                    (_, false) => Cell::from(row.field(field).to_string()),
                };
                cells.push(cell);
            }
            Row::new(cells)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(28),
            Constraint::Percentage(36),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Timers"))
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_selected(Some(app.cursor_row));
    StatefulWidget::render(table, area, buf, &mut state);
}

fn render_path_prompt(action: FileAction, buffer: &str, area: Rect, buf: &mut Buffer) {
    let title = match action {
        FileAction::Load => "Load Timers",
        FileAction::Save => "Save Timers",
    };
    let width = (buffer.width() as u16 + 4)
        .max(PROMPT_MIN_WIDTH)
        .min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: 3.min(area.height),
    };

    Clear.render(popup, buf);
    Paragraph::new(format!("{}▏", buffer))
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(popup, buf);
}

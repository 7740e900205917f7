use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use veelo_core::wizard::{Step, WizardState};

use crate::app::{App, DateField, NameField, WHEEL_OPTIONS};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header with step progress
    let header_text = match app.wizard.state() {
        WizardState::Collecting(step) => format!(
            "veelo – vehicle rental booking · step {} of {}",
            step.number(),
            Step::COUNT
        ),
        WizardState::Submitting | WizardState::Done(_) | WizardState::Failed(_) => {
            "veelo – vehicle rental booking".to_owned()
        }
    };
    let header =
        Paragraph::new(header_text).block(Block::default().borders(Borders::ALL).title("Veelo"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.wizard.state() {
        WizardState::Collecting(Step::Identity) => draw_identity(frame, app, *content_area),
        WizardState::Collecting(Step::Wheels) => draw_wheels(frame, app, *content_area),
        WizardState::Collecting(Step::VehicleType) => draw_vehicle_types(frame, app, *content_area),
        WizardState::Collecting(Step::Model) => draw_models(frame, app, *content_area),
        WizardState::Collecting(Step::Dates) => draw_dates(frame, app, *content_area),
        WizardState::Submitting => draw_notice(
            frame,
            *content_area,
            "Submitting",
            "Sending your booking request…",
        ),
        WizardState::Done(confirmation) => {
            let text = match &confirmation.booking_id {
                Some(id) => format!("Booking successful! Reference: {id}"),
                None => "Booking successful!".to_owned(),
            };
            draw_notice(frame, *content_area, "Done", &text);
        }
        WizardState::Failed(message) => draw_notice(
            frame,
            *content_area,
            "Booking failed",
            &format!("{message}\n\nPress Enter to try again."),
        ),
    }

    // Status bar
    let nav_hint = match app.wizard.state() {
        WizardState::Collecting(Step::Identity) => {
            "Type to edit · Tab switch field · Enter next · Ctrl-C quit"
        }
        WizardState::Collecting(Step::Wheels | Step::VehicleType | Step::Model) => {
            "↑/↓ select · Enter next · q/Ctrl-C quit"
        }
        WizardState::Collecting(Step::Dates) => {
            "Type YYYY-MM-DD · Tab switch field · Enter submit · Ctrl-C quit"
        }
        WizardState::Submitting => "Submitting · please wait",
        WizardState::Done(_) => "q/Ctrl-C quit",
        WizardState::Failed(_) => "Enter retry · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_identity(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [first_area, last_area, rest] = chunks else {
        return;
    };

    let answers = app.wizard.answers();
    frame.render_widget(
        text_input(
            "First name",
            &answers.first_name,
            app.name_focus == NameField::First,
        ),
        *first_area,
    );
    frame.render_widget(
        text_input(
            "Last name",
            &answers.last_name,
            app.name_focus == NameField::Last,
        ),
        *last_area,
    );

    let prompt = Paragraph::new("What is your name?")
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, *rest);
}

fn draw_wheels(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.wizard.answers().wheel_count;
    let items = WHEEL_OPTIONS
        .iter()
        .map(|wheels| {
            let marker = if selected == Some(*wheels) {
                "(x)"
            } else {
                "( )"
            };
            ListItem::new(format!("{marker} {} wheeler", wheels.count()))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Number of wheels (↑/↓)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(app.wheel_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_vehicle_types(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.wizard.answers().vehicle_type.clone();
    let options = app.wizard.vehicle_type_options();

    let items = if options.is_empty() {
        vec![ListItem::new("No vehicle types available.")]
    } else {
        options
            .iter()
            .map(|ty| {
                let marker = if selected.as_ref() == Some(&ty.id) {
                    "(x)"
                } else {
                    "( )"
                };
                ListItem::new(format!("{marker} {}", ty.label))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Type of vehicle (↑/↓)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !options.is_empty() {
        state.select(Some(app.type_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_models(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.wizard.answers().model.clone();
    let options = app.wizard.model_options();

    let items = if options.is_empty() {
        vec![ListItem::new("No models available for this vehicle type.")]
    } else {
        options
            .iter()
            .map(|model| {
                let marker = if selected.as_ref() == Some(&model.id) {
                    "(x)"
                } else {
                    "( )"
                };
                ListItem::new(format!("{marker} {}", model.name))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Specific model (↑/↓)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !options.is_empty() {
        state.select(Some(app.model_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_dates(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, booked_area] = chunks else {
        return;
    };

    let input_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(*input_area);

    let inputs = input_chunks.as_ref();
    let [start_area, end_area, hint_area] = inputs else {
        return;
    };

    frame.render_widget(
        text_input(
            "Start date",
            &app.start_input,
            app.date_focus == DateField::Start,
        ),
        *start_area,
    );
    frame.render_widget(
        text_input("End date", &app.end_input, app.date_focus == DateField::End),
        *end_area,
    );

    let hint = Paragraph::new(format!(
        "Both days are inclusive. The rental can start today ({}) or later.",
        app.wizard.today().format("%Y-%m-%d")
    ))
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    frame.render_widget(hint, *hint_area);

    let booked = app.wizard.disabled_days();
    let items = if booked.is_empty() {
        vec![ListItem::new("No booked days for this model.")]
    } else {
        booked
            .iter()
            .map(|day| ListItem::new(day.format("%Y-%m-%d").to_string()))
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Already booked"),
    );
    frame.render_widget(list, *booked_area);
}

fn draw_notice(frame: &mut Frame<'_>, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(text.to_owned())
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn text_input<'text>(title: &'text str, value: &'text str, focused: bool) -> Paragraph<'text> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Paragraph::new(value)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(style)
}

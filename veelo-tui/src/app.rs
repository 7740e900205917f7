use std::sync::Arc;

use chrono::NaiveDate;
use veelo_core::{
    model::WheelCount,
    service::RentalService,
    wizard::{Step, Wizard},
};

pub(crate) const WHEEL_OPTIONS: [WheelCount; 2] = [WheelCount::Two, WheelCount::Four];
pub(crate) const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameField {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateField {
    Start,
    End,
}

pub(crate) struct App {
    pub service: Arc<RentalService>,
    pub wizard: Wizard,

    pub name_focus: NameField,
    pub wheel_cursor: usize,
    pub type_cursor: usize,
    pub model_cursor: usize,
    pub date_focus: DateField,
    pub start_input: String,
    pub end_input: String,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<RentalService>, today: NaiveDate) -> Self {
        Self {
            service,
            wizard: Wizard::new(today),
            name_focus: NameField::First,
            wheel_cursor: 0,
            type_cursor: 0,
            model_cursor: 0,
            date_focus: DateField::Start,
            start_input: String::new(),
            end_input: String::new(),
            is_loading: false,
            error_message: None,
        }
    }

    /// Reset per-screen cursors when a step is entered.
    pub(crate) fn on_entered(&mut self, step: Step) {
        match step {
            Step::VehicleType => self.type_cursor = 0,
            Step::Model => self.model_cursor = 0,
            Step::Dates => self.date_focus = DateField::Start,
            Step::Identity | Step::Wheels => {}
        }
    }

    pub(crate) fn toggle_name_focus(&mut self) {
        self.name_focus = match self.name_focus {
            NameField::First => NameField::Last,
            NameField::Last => NameField::First,
        };
    }

    pub(crate) fn push_name_char(&mut self, character: char) {
        let mut name = self.focused_name().to_owned();
        name.push(character);
        self.set_focused_name(name);
    }

    pub(crate) fn pop_name_char(&mut self) {
        let mut name = self.focused_name().to_owned();
        name.pop();
        self.set_focused_name(name);
    }

    fn focused_name(&self) -> &str {
        match self.name_focus {
            NameField::First => &self.wizard.answers().first_name,
            NameField::Last => &self.wizard.answers().last_name,
        }
    }

    fn set_focused_name(&mut self, name: String) {
        match self.name_focus {
            NameField::First => self.wizard.set_first_name(name),
            NameField::Last => self.wizard.set_last_name(name),
        }
    }

    pub(crate) fn select_wheel_at_cursor(&mut self) {
        if let Some(wheels) = WHEEL_OPTIONS.get(self.wheel_cursor) {
            self.wizard.set_wheel_count(*wheels);
        }
    }

    pub(crate) fn select_type_at_cursor(&mut self) {
        let id = self
            .wizard
            .vehicle_type_options()
            .get(self.type_cursor)
            .map(|ty| ty.id.clone());
        if let Some(id) = id {
            self.wizard.set_vehicle_type(id);
        }
    }

    pub(crate) fn select_model_at_cursor(&mut self) {
        let id = self
            .wizard
            .model_options()
            .get(self.model_cursor)
            .map(|model| model.id.clone());
        if let Some(id) = id {
            self.wizard.set_model(id);
        }
    }

    pub(crate) fn toggle_date_focus(&mut self) {
        self.date_focus = match self.date_focus {
            DateField::Start => DateField::End,
            DateField::End => DateField::Start,
        };
    }

    pub(crate) fn push_date_char(&mut self, character: char) {
        match self.date_focus {
            DateField::Start => self.start_input.push(character),
            DateField::End => self.end_input.push(character),
        }
        self.sync_dates();
    }

    pub(crate) fn pop_date_char(&mut self) {
        match self.date_focus {
            DateField::Start => self.start_input.pop(),
            DateField::End => self.end_input.pop(),
        };
        self.sync_dates();
    }

    // Re-parse both buffers; half-typed input simply leaves the answer unset.
    fn sync_dates(&mut self) {
        self.wizard.set_start(parse_date(&self.start_input));
        self.wizard.set_end(parse_date(&self.end_input));
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT).ok()
}

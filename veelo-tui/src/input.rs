use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use veelo_core::wizard::{Step, WizardState};

use crate::app::{App, WHEEL_OPTIONS};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Validate the current step and move forward (Next / Submit / retry).
    Advance,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Tab, Up};

    // Global quit shortcuts; plain 'q' only outside text-entry steps.
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    let in_text_entry = matches!(
        app.wizard.state(),
        WizardState::Collecting(Step::Identity | Step::Dates)
    );
    if key.code == Char('q') && key.modifiers.is_empty() && !in_text_entry {
        return Action::Quit;
    }

    let state = app.wizard.state().clone();
    match state {
        WizardState::Collecting(Step::Identity) => match key.code {
            Tab => app.toggle_name_focus(),
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.push_name_char(character);
                }
            }
            Backspace => app.pop_name_char(),
            Enter => return Action::Advance,
            _ => {}
        },

        WizardState::Collecting(Step::Wheels) => match key.code {
            Up | Char('k') => {
                if app.wheel_cursor > 0 {
                    app.wheel_cursor -= 1;
                }
                app.select_wheel_at_cursor();
            }
            Down | Char('j') => {
                if app.wheel_cursor + 1 < WHEEL_OPTIONS.len() {
                    app.wheel_cursor += 1;
                }
                app.select_wheel_at_cursor();
            }
            Char(' ') => app.select_wheel_at_cursor(),
            Enter => return Action::Advance,
            _ => {}
        },

        WizardState::Collecting(Step::VehicleType) => match key.code {
            Up | Char('k') => {
                if app.type_cursor > 0 {
                    app.type_cursor -= 1;
                }
                app.select_type_at_cursor();
            }
            Down | Char('j') => {
                if app.type_cursor + 1 < app.wizard.vehicle_type_options().len() {
                    app.type_cursor += 1;
                }
                app.select_type_at_cursor();
            }
            Char(' ') => app.select_type_at_cursor(),
            Enter => return Action::Advance,
            _ => {}
        },

        WizardState::Collecting(Step::Model) => match key.code {
            Up | Char('k') => {
                if app.model_cursor > 0 {
                    app.model_cursor -= 1;
                }
                app.select_model_at_cursor();
            }
            Down | Char('j') => {
                if app.model_cursor + 1 < app.wizard.model_options().len() {
                    app.model_cursor += 1;
                }
                app.select_model_at_cursor();
            }
            Char(' ') => app.select_model_at_cursor(),
            Enter => return Action::Advance,
            _ => {}
        },

        WizardState::Collecting(Step::Dates) => match key.code {
            Tab => app.toggle_date_focus(),
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.push_date_char(character);
                }
            }
            Backspace => app.pop_date_char(),
            Enter => return Action::Advance,
            _ => {}
        },

        WizardState::Failed(_) => {
            if key.code == Enter {
                return Action::Advance;
            }
        }

        // Nothing to do but wait (Submitting) or quit (Done).
        WizardState::Submitting | WizardState::Done(_) => {}
    }

    Action::None
}

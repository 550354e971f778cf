use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use trashify_core::model::Coordinate;

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `nearby.on_location_selected`(...) for the typed coordinate
    SelectLocation,
    /// Feed the configured device position to `nearby.on_device_location`(...)
    UseDeviceLocation,
    ToggleRecenter,
    ClearPins,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    match key.code {
        Char('c') if ctrl => return Action::Quit,
        Char('q') if key.modifiers.is_empty() => return Action::Quit,
        Char('r') if ctrl => return Action::ToggleRecenter,
        Char('l') if ctrl => return Action::UseDeviceLocation,
        Char('x') if ctrl => return Action::ClearPins,
        _ => {}
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Nearby => match key.code {
            Up => {
                app.list_index = app.list_index.saturating_sub(1);
            }
            Down => {
                if app.list_index + 1 < app.snapshot.annotations.len() {
                    app.list_index += 1;
                }
            }
            Char(character) if !ctrl && is_coordinate_char(character) => {
                app.coordinate_input.push(character);
            }
            Backspace => {
                app.coordinate_input.pop();
            }
            Enter => {
                action = Action::SelectLocation;
            }
            Right | Tab => {
                app.open_current_point();
            }
            Esc => {
                action = Action::Quit;
            }
            _ => {}
        },

        Screen::PointDetail => match key.code {
            Left | Esc | Char('b') => {
                app.screen = Screen::Nearby;
            }
            _ => {}
        },
    }
    action
}

fn is_coordinate_char(character: char) -> bool {
    character.is_ascii_digit() || matches!(character, '.' | '-' | ',' | ' ')
}

/// Parse `"lat, lon"` or `"lat lon"` into a coordinate.
pub(crate) fn parse_coordinate_input(input: &str) -> Result<Coordinate> {
    let parts: Vec<&str> = input
        .split(|sep: char| sep == ',' || sep.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    let [latitude, longitude] = parts.as_slice() else {
        bail!("Type a latitude and a longitude, e.g. 52.52, 13.405");
    };

    let coordinate = Coordinate::new(latitude.parse()?, longitude.parse()?)?;
    Ok(coordinate)
}

// UI layer: the interactive loop built on `dialoguer`. Each selection is one
// event that runs to completion (fetch included) before the next prompt.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::MenuApi;
use crate::dates;
use crate::render::{self, Screen};
use crate::state::Controller;
use crate::storage::KeyValueStore;
use crate::theme::{Theme, ThemeSetting};

enum Action {
    ChooseRestaurant,
    PreviousDay,
    Today,
    NextDay,
    EnterDate,
    ToggleTheme,
    Exit,
}

const ACTIONS: [Action; 7] = [
    Action::ChooseRestaurant,
    Action::PreviousDay,
    Action::Today,
    Action::NextDay,
    Action::EnterDate,
    Action::ToggleTheme,
    Action::Exit,
];

fn terminal_width() -> u16 {
    terminal::size().map(|(w, _)| w).unwrap_or(80)
}

/// Run `f` while a spinner with `message` is shown.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = f();
    spinner.finish_and_clear();
    Ok(out)
}

fn draw<A, S>(controller: &Controller<A>, theme: &ThemeSetting<S>) -> Result<()>
where
    A: MenuApi,
    S: KeyValueStore,
{
    let width = terminal_width();
    let screen = Screen::project(controller.state(), theme.theme(), width);
    let mut out = io::stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    render::paint(&screen, theme.theme(), true, width, &mut out).context("Failed to draw menu")?;
    writeln!(out)?;
    Ok(())
}

/// Fetch once and print the menu without any prompts. Colors are only
/// written when `color` is set.
pub fn print_once<A, S, W>(
    controller: &mut Controller<A>,
    theme: &ThemeSetting<S>,
    color: bool,
    out: &mut W,
) -> Result<()>
where
    A: MenuApi,
    S: KeyValueStore,
    W: Write,
{
    controller.start();
    let width = terminal_width();
    let screen = Screen::project(controller.state(), theme.theme(), width);
    render::paint(&screen, theme.theme(), color, width, out).context("Failed to print menu")?;
    Ok(())
}

/// Main interactive loop. Loads restaurants and the first menu, then
/// redraws after every action until the user chooses "Exit".
pub fn run<A, S>(controller: &mut Controller<A>, theme: &mut ThemeSetting<S>) -> Result<()>
where
    A: MenuApi,
    S: KeyValueStore,
{
    with_spinner("Loading menu...", || controller.start())?;
    loop {
        draw(controller, theme)?;
        let labels: Vec<String> = ACTIONS
            .iter()
            .map(|a| match a {
                Action::ChooseRestaurant => "Choose restaurant".to_string(),
                Action::PreviousDay => "- Previous day".to_string(),
                Action::Today => "Heute".to_string(),
                Action::NextDay => "+ Next day".to_string(),
                Action::EnterDate => "Enter date".to_string(),
                Action::ToggleTheme => theme.theme().toggle_label().to_string(),
                Action::Exit => "Exit".to_string(),
            })
            .collect();
        let selection = Select::new().items(&labels).default(0).interact()?;
        match ACTIONS[selection] {
            Action::ChooseRestaurant => choose_restaurant(controller)?,
            Action::PreviousDay => step(controller, -1)?,
            Action::Today => with_spinner("Loading menu...", || controller.reset_to_today())?,
            Action::NextDay => step(controller, 1)?,
            Action::EnterDate => enter_date(controller)?,
            Action::ToggleTheme => {
                let switched = theme.toggle();
                tracing::debug!(theme = %switched, "theme switched");
            }
            Action::Exit => break,
        }
    }
    Ok(())
}

fn step<A: MenuApi>(controller: &mut Controller<A>, offset: i64) -> Result<()> {
    if let Err(e) = with_spinner("Loading menu...", || controller.step_day(offset))? {
        tracing::warn!(error = %e, offset, "cannot move date");
    }
    Ok(())
}

fn choose_restaurant<A: MenuApi>(controller: &mut Controller<A>) -> Result<()> {
    // Theme and width do not matter for the entry list.
    let screen = Screen::project(controller.state(), Theme::Light, 80);
    let entries: Vec<_> = screen.nav_entries().cloned().collect();
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    let current = entries.iter().position(|e| e.selected).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Restaurant")
        .items(&labels)
        .default(current)
        .interact()?;
    let filter = entries[selection].filter;
    with_spinner("Loading menu...", || controller.select_restaurant(filter))
}

fn enter_date<A: MenuApi>(controller: &mut Controller<A>) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .with_initial_text(dates::format_iso(controller.state().date()))
        .validate_with(|s: &String| dates::parse_iso(s).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    let date = dates::parse_iso(&input)?;
    with_spinner("Loading menu...", || controller.select_date(date))
}

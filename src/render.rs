// Render layer: a pure projection of `ViewState` into a `Screen`, and a
// painter that writes a `Screen` to the terminal.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::api::Dish;
use crate::dates;
use crate::state::{MenuStatus, RestaurantFilter, ViewState};
use crate::theme::Theme;

pub const EMPTY_MESSAGE: &str = "No menu available for this day.";
pub const ALL_RESTAURANTS: &str = "All restaurants";
pub const DAY_CONTROLS: &str = "[-] previous day   [Heute] today   [+] next day";

/// Price with two decimals and a euro sign, e.g. `7.50 €`.
pub fn format_price(price: f64) -> String {
    format!("{price:.2} €")
}

/// Grid columns for a terminal `width`: one, two or three cards per row.
pub fn columns_for_width(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        _ => 3,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub label: String,
    pub filter: RestaurantFilter,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub date: String,
    pub restaurant: Option<String>,
    pub price: String,
}

impl Card {
    fn from_dish(dish: &Dish) -> Self {
        Card {
            name: dish.name.clone(),
            date: dates::format_iso(dish.date),
            restaurant: dish.restaurant_name.clone(),
            price: format_price(dish.price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Loading,
    Empty(&'static str),
    Cards(Vec<Card>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub all_entry: NavEntry,
    pub restaurants: Vec<NavEntry>,
    pub date: String,
    pub theme_toggle: &'static str,
    pub columns: usize,
    pub body: Body,
}

impl Screen {
    pub fn project(state: &ViewState, theme: Theme, width: u16) -> Self {
        let filter = state.filter();
        let restaurants = state
            .restaurants()
            .iter()
            .map(|r| NavEntry {
                label: r.name.clone(),
                filter: RestaurantFilter::Only(r.id),
                selected: filter == RestaurantFilter::Only(r.id),
            })
            .collect();
        let cards: Vec<Card> = state.visible_dishes().map(Card::from_dish).collect();
        let body = match state.status() {
            MenuStatus::Loading => Body::Loading,
            _ if cards.is_empty() => Body::Empty(EMPTY_MESSAGE),
            _ => Body::Cards(cards),
        };
        Screen {
            all_entry: NavEntry {
                label: ALL_RESTAURANTS.to_string(),
                filter: RestaurantFilter::All,
                selected: filter == RestaurantFilter::All,
            },
            restaurants,
            date: dates::format_iso(state.date()),
            theme_toggle: theme.toggle_label(),
            columns: columns_for_width(width),
            body,
        }
    }

    /// Every selectable restaurant entry, "all" first.
    pub fn nav_entries(&self) -> impl Iterator<Item = &NavEntry> {
        std::iter::once(&self.all_entry).chain(self.restaurants.iter())
    }
}

fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Lay cards out as text rows of `columns` boxes, each `cell` characters
/// wide including its border.
pub fn grid_lines(cards: &[Card], columns: usize, cell: usize) -> Vec<String> {
    let inner = cell.saturating_sub(4).max(1);
    let border = format!("+{}+", "-".repeat(inner + 2));
    let mut lines = Vec::new();
    for row in cards.chunks(columns.max(1)) {
        let boxes: Vec<[String; 5]> = row
            .iter()
            .map(|c| {
                let detail = match &c.restaurant {
                    Some(r) => format!("{} · {}", c.date, r),
                    None => c.date.clone(),
                };
                [
                    border.clone(),
                    format!("| {} |", fit(&c.name, inner)),
                    format!("| {} |", fit(&detail, inner)),
                    format!("| {} |", fit(&c.price, inner)),
                    border.clone(),
                ]
            })
            .collect();
        for i in 0..5 {
            let line: Vec<&str> = boxes.iter().map(|b| b[i].as_str()).collect();
            lines.push(line.join(" "));
        }
    }
    lines
}

struct Palette {
    heading: Color,
    text: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                heading: Color::Black,
                text: Color::DarkGrey,
                muted: Color::Grey,
                accent: Color::DarkBlue,
            },
            Theme::Dark => Palette {
                heading: Color::White,
                text: Color::Grey,
                muted: Color::DarkGrey,
                accent: Color::Cyan,
            },
        }
    }
}

/// Writes lines, colored only when a palette is set.
struct Pen<'a, W> {
    out: &'a mut W,
    palette: Option<Palette>,
}

impl<W: Write> Pen<'_, W> {
    fn line(&mut self, color: fn(&Palette) -> Color, bold: bool, text: &str) -> io::Result<()> {
        let Some(p) = &self.palette else {
            return queue!(self.out, Print(text), Print("\n"));
        };
        queue!(self.out, SetForegroundColor(color(p)))?;
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(self.out, Print(text), Print("\n"))?;
        if bold {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

/// Write `screen` to `out`. With `color` set the palette of `theme` is
/// used, otherwise plain text is written.
pub fn paint<W: Write>(
    screen: &Screen,
    theme: Theme,
    color: bool,
    width: u16,
    out: &mut W,
) -> io::Result<()> {
    let mut pen = Pen {
        out,
        palette: color.then(|| Palette::for_theme(theme)),
    };

    pen.line(|p| p.heading, true, "Restaurants")?;
    for entry in screen.nav_entries() {
        if entry.selected {
            pen.line(|p| p.accent, true, &format!("> {}", entry.label))?;
        } else {
            pen.line(|p| p.text, false, &format!("  {}", entry.label))?;
        }
    }
    pen.line(|p| p.text, false, "")?;
    pen.line(|p| p.heading, false, &format!("Date: {}", screen.date))?;
    pen.line(|p| p.muted, false, &format!("{DAY_CONTROLS}   [{}]\n", screen.theme_toggle))?;

    match &screen.body {
        Body::Loading => pen.line(|p| p.muted, false, "Loading...")?,
        Body::Empty(message) => pen.line(|p| p.muted, false, message)?,
        Body::Cards(cards) => {
            let cell = (width as usize / screen.columns).max(12) - 1;
            for line in grid_lines(cards, screen.columns, cell) {
                pen.line(|p| p.text, false, &line)?;
            }
        }
    }
    if pen.palette.is_some() {
        queue!(pen.out, ResetColor)?;
    }
    pen.out.flush()
}

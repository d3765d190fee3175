//! View module
//!
//! Turns snapshots into timer cards, user input into API calls, and both
//! into text frames for the terminal.

pub mod card;
pub mod command;
pub mod composer;
pub mod input;
pub mod screen;

pub use card::Card;
pub use command::{CardRef, Command};
pub use composer::{Flow, PanelView};
pub use input::LineInput;
pub use screen::Screen;

// Numbered menus. Input comes through the `Prompt` trait so menus can be
// driven from a script in tests; `Terminal` is the dialoguer-backed one.

use crate::error::InputError;
use crate::render;
use dialoguer::{Input, Password};
use std::io;

/// Line-oriented source of operator input.
pub trait Prompt {
    fn line(&mut self, label: &str) -> io::Result<String>;

    /// Like `line`, but hidden where the terminal allows it.
    fn secret(&mut self, label: &str) -> io::Result<String> {
        self.line(label)
    }
}

/// Reads from the real terminal via `dialoguer`.
pub struct Terminal;

impl Prompt for Terminal {
    fn line(&mut self, label: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    }

    fn secret(&mut self, label: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
    }
}

/// Result of reading one menu selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// 1-based index into the options.
    Selected(usize),
    NotANumber,
    OutOfRange,
}

pub fn parse_choice(raw: &str, count: usize) -> Choice {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Choice::Selected(n as usize),
        Ok(_) => Choice::OutOfRange,
        Err(_) => Choice::NotANumber,
    }
}

/// Print `options` as a numbered list and keep asking until a valid
/// selection is typed. Returns the 1-based index.
pub fn choose(prompt: &mut dyn Prompt, title: &str, options: &[&str]) -> io::Result<usize> {
    render::info(title);
    for (i, option) in options.iter().enumerate() {
        println!("{}. {}", i + 1, option);
    }
    loop {
        let raw = prompt.line("Select option")?;
        match parse_choice(&raw, options.len()) {
            Choice::Selected(n) => return Ok(n),
            Choice::NotANumber => render::error("Please enter a number."),
            Choice::OutOfRange => render::error("Invalid selection. Try again."),
        }
    }
}

/// Coerce a typed field (an id, a duration) to an integer.
pub fn parse_int(field: &'static str, raw: &str) -> Result<i64, InputError> {
    raw.trim().parse().map_err(|_| InputError::NotAnInteger {
        field,
        value: raw.to_string(),
    })
}

//! Choosing catalog options and date bounds, interactively or from preset answers.

use std::{
    collections::HashMap,
    io::{self, BufRead, Write},
};

use chrono::NaiveDate;

use crate::{catalog::CatalogLevel, catalog::CatalogOption, error::SelectionError};

/// Date format accepted for the download range
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which end of the download range a date prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

impl DateBound {
    fn prompt(&self) -> &'static str {
        match self {
            DateBound::Start => "Enter Start Date",
            DateBound::End => "Enter End Date",
        }
    }
}

/// Picks one option per catalog level and supplies validated dates.
pub trait SelectionProvider {
    fn choose(
        &mut self,
        level: CatalogLevel,
        options: &[CatalogOption],
    ) -> Result<CatalogOption, SelectionError>;

    fn input_date(&mut self, bound: DateBound) -> Result<NaiveDate, SelectionError>;
}

pub fn parse_date(text: &str) -> Result<NaiveDate, SelectionError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| SelectionError::InvalidDate(text.trim().to_string()))
}

/// Numbered-menu prompts over any reader and writer, re-asking until the
/// answer is valid.
pub struct InteractiveSelector<R, W> {
    input: R,
    output: W,
}

impl InteractiveSelector<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        InteractiveSelector::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        InteractiveSelector { input, output }
    }

    fn read_line(&mut self) -> Result<String, SelectionError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SelectionError::InputClosed);
        }

        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> SelectionProvider for InteractiveSelector<R, W> {
    fn choose(
        &mut self,
        level: CatalogLevel,
        options: &[CatalogOption],
    ) -> Result<CatalogOption, SelectionError> {
        if options.is_empty() {
            return Err(SelectionError::NothingToChoose(level));
        }

        writeln!(self.output, "\n--- SELECT {} ---", level.to_string().to_uppercase())?;
        for (idx, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, option.name)?;
        }

        loop {
            write!(self.output, "\nEnter number (1-{}): ", options.len())?;
            self.output.flush()?;

            match self.read_line()?.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1].clone()),
                Ok(_) => writeln!(self.output, "Invalid number. Try again.")?,
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    fn input_date(&mut self, bound: DateBound) -> Result<NaiveDate, SelectionError> {
        loop {
            write!(self.output, "{} (YYYY-MM-DD): ", bound.prompt())?;
            self.output.flush()?;

            let line = self.read_line()?;
            match parse_date(&line) {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(
                    self.output,
                    "Invalid format. Please use YYYY-MM-DD (e.g., 2023-11-01)"
                )?,
            }
        }
    }
}

/// Preset answers for headless runs. Anything not preset goes to the
/// fallback provider, or fails when there is none.
#[derive(Default)]
pub struct ScriptedSelector {
    answers: HashMap<CatalogLevel, String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fallback: Option<Box<dyn SelectionProvider>>,
}

impl ScriptedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches an option name case-insensitively, or its code exactly.
    pub fn answer(mut self, level: CatalogLevel, wanted: impl Into<String>) -> Self {
        self.answers.insert(level, wanted.into());
        self
    }

    pub fn dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_fallback(mut self, fallback: Box<dyn SelectionProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl SelectionProvider for ScriptedSelector {
    fn choose(
        &mut self,
        level: CatalogLevel,
        options: &[CatalogOption],
    ) -> Result<CatalogOption, SelectionError> {
        let Some(wanted) = self.answers.get(&level) else {
            return match self.fallback.as_mut() {
                Some(fallback) => fallback.choose(level, options),
                None => Err(SelectionError::Unanswered(level)),
            };
        };

        let wanted = wanted.trim();
        options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(wanted))
            .or_else(|| options.iter().find(|o| o.code == wanted))
            .cloned()
            .ok_or_else(|| SelectionError::NoMatchingOption {
                level,
                wanted: wanted.to_string(),
            })
    }

    fn input_date(&mut self, bound: DateBound) -> Result<NaiveDate, SelectionError> {
        let preset = match bound {
            DateBound::Start => self.start,
            DateBound::End => self.end,
        };

        match (preset, self.fallback.as_mut()) {
            (Some(date), _) => Ok(date),
            (None, Some(fallback)) => fallback.input_date(bound),
            (None, None) => Err(SelectionError::InputClosed),
        }
    }
}

// -- Tests -------------------------------------------------------------------

//! Textual vehicle controls, one command per line.

use std::str::FromStr;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ToggleLights,
    Lights(bool),
    ToggleDoors,
    OpenDoors,
    CloseDoors,
    /// Raw control value, 0..100.
    Speed(f64),
    /// Raw control value, -100..100.
    Steer(f64),
    MainColor(String),
    WheelColor(String),
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCommand(line.trim().to_string());
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let number = |rest: &str| rest.parse::<f64>().ok().filter(|v| v.is_finite());

        let command = match (word.to_ascii_lowercase().as_str(), rest) {
            ("lights", "") => Command::ToggleLights,
            ("lights", "on") => Command::Lights(true),
            ("lights", "off") => Command::Lights(false),
            ("doors", "") => Command::ToggleDoors,
            ("doors", "open") => Command::OpenDoors,
            ("doors", "close") => Command::CloseDoors,
            ("speed", value) => Command::Speed(number(value).ok_or_else(invalid)?),
            ("steer", value) => Command::Steer(number(value).ok_or_else(invalid)?),
            ("main-color", style) if !style.is_empty() => Command::MainColor(style.to_string()),
            ("wheel-color", style) if !style.is_empty() => Command::WheelColor(style.to_string()),
            ("status", "") => Command::Status,
            ("quit" | "exit", "") => Command::Quit,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

//! Parsing of protocol lines into commands.
//!
//! A line is a verb, optionally followed by a single space and an argument.
//! Verbs are case-insensitive. `LOGIN` and `REGISTER` take a JSON object,
//! `BOOK_SLOT` and `CANCEL_BOOKING` a numeric slot id.

use gymbook_core::models::user::{LoginRequest, NewUser, RegisterRequest};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum Command {
    Login(LoginRequest),
    Register(NewUser),
    ListSlots,
    BookSlot(i64),
    MyBookings,
    CancelBooking(i64),
    Logout,
}

/// A line that could not be turned into a [`Command`]. The `Display` text is
/// what goes back to the client after `ERROR: `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command")]
    Unknown,

    #[error("LOGIN requires username and password")]
    MissingCredentials,

    #[error("REGISTER requires username, password, and email")]
    MissingRegistration,

    #[error("{0} requires a slot ID")]
    MissingSlotId(&'static str),

    #[error("Invalid slot ID format")]
    InvalidSlotId,

    #[error("Invalid JSON format")]
    InvalidJson,
}

impl CommandError {
    /// Malformed `LOGIN`/`REGISTER` lines are reported to anyone; every other
    /// failure is hidden behind the login check.
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            CommandError::MissingCredentials
                | CommandError::MissingRegistration
                | CommandError::InvalidJson
        )
    }
}

fn slot_id(verb: &'static str, argument: Option<&str>) -> Result<i64, CommandError> {
    argument
        .ok_or(CommandError::MissingSlotId(verb))?
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidSlotId)
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (verb, argument) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, Some(rest).filter(|rest| !rest.trim().is_empty())),
            None => (line, None),
        };

        match verb.to_ascii_uppercase().as_str() {
            "LOGIN" => {
                let json = argument.ok_or(CommandError::MissingCredentials)?;
                let request =
                    serde_json::from_str(json).map_err(|_| CommandError::InvalidJson)?;
                Ok(Command::Login(request))
            }
            "REGISTER" => {
                let json = argument.ok_or(CommandError::MissingRegistration)?;
                let request: RegisterRequest =
                    serde_json::from_str(json).map_err(|_| CommandError::InvalidJson)?;
                Ok(Command::Register(NewUser::from(request)))
            }
            "LIST_SLOTS" => Ok(Command::ListSlots),
            "BOOK_SLOT" => Ok(Command::BookSlot(slot_id("BOOK_SLOT", argument)?)),
            "MY_BOOKINGS" => Ok(Command::MyBookings),
            "CANCEL_BOOKING" => Ok(Command::CancelBooking(slot_id("CANCEL_BOOKING", argument)?)),
            "LOGOUT" => Ok(Command::Logout),
            _ => Err(CommandError::Unknown),
        }
    }

    pub fn requires_login(&self) -> bool {
        !matches!(self, Command::Login(_) | Command::Register(_))
    }
}

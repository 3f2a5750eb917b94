use chrono::Utc;
use gymbook_core::{
    errors::GymError,
    models::{
        DATE_FORMAT, TIME_FORMAT,
        booking::{BookingResponse, MyBookingsResponse},
        slot::{ListSlotsResponse, SlotResponse},
    },
};
use gymbook_db::Stores;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::commands::Command;

const AUTH_REQUIRED: &str = "ERROR: Authentication required. Please LOGIN first.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// State of one client connection. Owned by the task serving that
/// connection and dropped with it, so logging out or disconnecting can never
/// affect another client.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

fn error_reply(err: GymError) -> String {
    match &err {
        GymError::Storage(report) => error!("Command failed: {:?}", report),
        GymError::LockTimeout { .. } => warn!("{}", err),
        _ => {}
    }
    format!("ERROR: {}", err.client_message())
}

fn json_reply<T: Serialize>(body: &T) -> String {
    match serde_json::to_string(body) {
        Ok(json) => json,
        Err(err) => error_reply(GymError::Storage(err.into())),
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Handles one protocol line and returns the single reply line (without
    /// its trailing newline).
    pub async fn process(&mut self, stores: &Stores, line: &str) -> String {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) if err.requires_login() && self.user.is_none() => {
                return AUTH_REQUIRED.to_string();
            }
            Err(err) => return format!("ERROR: {}", err),
        };

        if command.requires_login() && self.user.is_none() {
            return AUTH_REQUIRED.to_string();
        }

        match self.execute(stores, command).await {
            Ok(reply) => reply,
            Err(err) => error_reply(err),
        }
    }

    async fn execute(&mut self, stores: &Stores, command: Command) -> Result<String, GymError> {
        let user_id = self.user.as_ref().map(|user| user.id).unwrap_or_default();

        match command {
            Command::Login(request) => {
                let user = stores
                    .users
                    .authenticate(&request.username, &request.password)
                    .await?;
                info!("Socket session logged in as {}", user.username);
                let reply = format!("SUCCESS: Logged in as {}", user.username);
                self.user = Some(SessionUser {
                    id: user.id,
                    username: user.username,
                });
                Ok(reply)
            }
            Command::Register(new_user) => {
                let user = stores.users.register(new_user).await?;
                Ok(format!(
                    "SUCCESS: User {} registered successfully",
                    user.username
                ))
            }
            Command::ListSlots => {
                let slots = stores.slots.list_upcoming(Utc::now().date_naive()).await?;
                Ok(json_reply(&ListSlotsResponse {
                    slots: slots.iter().map(SlotResponse::from).collect(),
                }))
            }
            Command::BookSlot(slot_id) => {
                let receipt = stores.slots.book(user_id, slot_id).await?;
                let slot = receipt.slot;
                Ok(format!(
                    "SUCCESS: Booked slot on {} from {} to {}",
                    slot.date.format(DATE_FORMAT),
                    slot.start_time.format(TIME_FORMAT),
                    slot.end_time.format(TIME_FORMAT)
                ))
            }
            Command::MyBookings => {
                let bookings = stores.slots.bookings_for_user(user_id).await?;
                Ok(json_reply(&MyBookingsResponse {
                    bookings: bookings.iter().map(BookingResponse::from).collect(),
                }))
            }
            Command::CancelBooking(slot_id) => {
                let slot = stores.slots.cancel_booking(user_id, slot_id).await?;
                Ok(format!(
                    "SUCCESS: Cancelled booking for slot {}, {} places available",
                    slot_id, slot.available
                ))
            }
            Command::Logout => {
                if let Some(user) = self.user.take() {
                    info!("Socket session for {} logged out", user.username);
                }
                Ok("SUCCESS: Logged out successfully".to_string())
            }
        }
    }
}

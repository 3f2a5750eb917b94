use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};

use gymbook_core::errors::GymError;
use gymbook_core::models::{
    booking::{Booking, BookingDetail, BookingResponse},
    class::{ClassSlot, ClassSlotDetail, ClassSlotResponse, NewClassSlot},
    slot::{BookSlotRequest, NewSlot, Slot, SlotResponse},
    user::{NewUser, RegisterRequest, User},
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn sample_slot() -> Slot {
    Slot {
        id: 12,
        date: date(19),
        start_time: time(8),
        end_time: time(9),
        capacity: 10,
        available: 4,
    }
}

#[test]
fn test_slot_response_formatting() {
    let response = SlotResponse::from(&sample_slot());

    assert_eq!(
        to_value(&response).unwrap(),
        json!({
            "id": 12,
            "date": "2026-10-19",
            "start_time": "08:00",
            "end_time": "09:00",
            "available": 4,
            "capacity": 10,
        })
    );
}

#[test]
fn test_slot_label() {
    assert_eq!(sample_slot().label(), "2026-10-19 08:00-09:00");
}

#[test]
fn test_booking_response_formatting() {
    let booked_at = Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 5).unwrap();
    let booking = Booking {
        id: 5,
        user_id: 1,
        slot_id: 12,
        booked_at,
    };
    let detail = BookingDetail::new(&booking, &sample_slot());
    let response = BookingResponse::from(&detail);

    assert_eq!(response.id, 5);
    assert_eq!(response.slot_id, 12);
    assert_eq!(response.date, "2026-10-19");
    assert_eq!(response.start_time, "08:00");
    assert_eq!(response.booked_at, "2026-10-18 14:30:05");
}

#[test]
fn test_new_slot_defaults_capacity() {
    let new_slot: NewSlot = from_str(
        r#"{"date": "2026-10-19", "start_time": "08:00:00", "end_time": "09:00:00"}"#,
    )
    .unwrap();

    assert_eq!(new_slot.capacity, 10);
    assert!(new_slot.validate().is_ok());
}

#[rstest]
#[case(time(8), time(9), 0)]
#[case(time(8), time(9), -3)]
#[case(time(9), time(9), 10)]
#[case(time(10), time(9), 10)]
fn test_new_slot_rejects_invalid_windows(
    #[case] start: NaiveTime,
    #[case] end: NaiveTime,
    #[case] capacity: i32,
) {
    let new_slot = NewSlot::new(date(19), start, end, capacity);
    assert!(matches!(new_slot.validate(), Err(GymError::Validation(_))));
}

#[test]
fn test_book_request_tolerates_missing_id() {
    let request: BookSlotRequest = from_str("{}").unwrap();
    assert_eq!(request.slot_id, None);

    let request: BookSlotRequest = from_str(r#"{"slot_id": 3}"#).unwrap();
    assert_eq!(request.slot_id, Some(3));
}

fn class_slot(start: u32, end: u32) -> ClassSlot {
    ClassSlot {
        id: 1,
        date: date(19),
        start_time: time(start),
        end_time: time(end),
        class_type_id: 1,
        trainer_id: 4,
        capacity: 10,
        available: 10,
    }
}

#[rstest]
#[case(8, 9, true)]
#[case(8, 10, true)]
#[case(7, 9, true)]
#[case(9, 10, false)]
#[case(6, 8, false)]
fn test_class_slot_overlap(#[case] start: u32, #[case] end: u32, #[case] overlaps: bool) {
    let existing = class_slot(8, 9);
    let candidate = NewClassSlot::new(date(19), time(start), time(end), 2, 4);

    assert_eq!(existing.overlaps(&candidate), overlaps);
}

#[test]
fn test_overlap_ignores_other_trainers_and_days() {
    let existing = class_slot(8, 9);

    let other_trainer = NewClassSlot::new(date(19), time(8), time(9), 1, 5);
    assert!(!existing.overlaps(&other_trainer));

    let other_day = NewClassSlot::new(date(20), time(8), time(9), 1, 4);
    assert!(!existing.overlaps(&other_day));
}

#[test]
fn test_check_trainer_free() {
    let existing = vec![class_slot(8, 9), class_slot(16, 17)];

    let clash = NewClassSlot::new(date(19), time(16), time(18), 1, 4);
    assert!(matches!(
        clash.check_trainer_free(&existing),
        Err(GymError::TrainerConflict { trainer_id: 4 })
    ));

    let free = NewClassSlot::new(date(19), time(10), time(11), 1, 4);
    assert!(free.check_trainer_free(&existing).is_ok());
}

#[test]
fn test_class_slot_response() {
    let detail = ClassSlotDetail {
        slot: class_slot(17, 18),
        trainer_name: "Neha Verma".to_string(),
        class_name: "Zumba".to_string(),
    };
    let response = ClassSlotResponse::from(&detail);

    assert_eq!(response.class_name, "Zumba");
    assert_eq!(response.trainer_name, "Neha Verma");
    assert_eq!(response.start_time, "17:00");
    assert_eq!(response.end_time, "18:00");
}

#[test]
fn test_user_serialization_hides_password_hash() {
    let user = User {
        id: 1,
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: "$argon2id$secret".to_string(),
        is_staff: false,
        created_at: Utc::now(),
    };

    let value = to_value(&user).unwrap();
    assert!(value.get("password_hash").is_none());
    assert_eq!(value["username"], "alice");
}

#[rstest]
#[case(None, Some("pw"))]
#[case(Some("alice"), None)]
#[case(Some("   "), Some("pw"))]
fn test_registration_requires_username_and_password(
    #[case] username: Option<&str>,
    #[case] password: Option<&str>,
) {
    let request = RegisterRequest {
        username: username.map(str::to_string),
        password: password.map(str::to_string),
        email: None,
    };

    let new_user = NewUser::from(request);
    assert!(matches!(new_user.validate(), Err(GymError::Validation(_))));
}

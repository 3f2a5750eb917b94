use gymbook_socket::commands::{Command, CommandError};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("LIST_SLOTS")]
#[case("list_slots")]
#[case("  List_Slots  ")]
fn test_verbs_are_case_insensitive(#[case] line: &str) {
    assert!(matches!(Command::parse(line), Ok(Command::ListSlots)));
}

#[rstest]
#[case("BOOK_SLOT 12", 12)]
#[case("book_slot  7 ", 7)]
fn test_book_slot(#[case] line: &str, #[case] expected: i64) {
    assert!(matches!(Command::parse(line), Ok(Command::BookSlot(id)) if id == expected));
}

#[test]
fn test_cancel_booking() {
    assert!(matches!(
        Command::parse("CANCEL_BOOKING 3"),
        Ok(Command::CancelBooking(3))
    ));
}

#[rstest]
#[case("BOOK_SLOT abc", CommandError::InvalidSlotId)]
#[case("BOOK_SLOT 1.5", CommandError::InvalidSlotId)]
#[case("BOOK_SLOT", CommandError::MissingSlotId("BOOK_SLOT"))]
#[case("CANCEL_BOOKING", CommandError::MissingSlotId("CANCEL_BOOKING"))]
#[case("LOGIN", CommandError::MissingCredentials)]
#[case("LOGIN {not json", CommandError::InvalidJson)]
#[case("REGISTER", CommandError::MissingRegistration)]
#[case("DANCE", CommandError::Unknown)]
#[case("", CommandError::Unknown)]
fn test_parse_errors(#[case] line: &str, #[case] expected: CommandError) {
    assert_eq!(Command::parse(line).unwrap_err(), expected);
}

#[test]
fn test_error_messages() {
    assert_eq!(CommandError::InvalidSlotId.to_string(), "Invalid slot ID format");
    assert_eq!(
        CommandError::MissingSlotId("BOOK_SLOT").to_string(),
        "BOOK_SLOT requires a slot ID"
    );
    assert_eq!(CommandError::Unknown.to_string(), "Unknown command");
}

#[test]
fn test_login_payload() {
    let command = Command::parse(r#"LOGIN {"username": "alice", "password": "pw"}"#).unwrap();

    match command {
        Command::Login(request) => {
            assert_eq!(request.username, "alice");
            assert_eq!(request.password, "pw");
        }
        other => panic!("expected LOGIN, got {:?}", other),
    }
}

#[test]
fn test_register_payload_without_email() {
    let command = Command::parse(r#"register {"username": "bob", "password": "pw"}"#).unwrap();

    match command {
        Command::Register(new_user) => {
            assert_eq!(new_user.username, "bob");
            assert_eq!(new_user.email, "");
        }
        other => panic!("expected REGISTER, got {:?}", other),
    }
}

#[test]
fn test_only_login_and_register_are_public() {
    assert!(!Command::parse("LOGIN {\"username\":\"a\",\"password\":\"b\"}")
        .unwrap()
        .requires_login());
    assert!(Command::parse("LOGOUT").unwrap().requires_login());
    assert!(CommandError::Unknown.requires_login());
    assert!(!CommandError::InvalidJson.requires_login());
}

use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Postgres rejects several commands in one prepared statement, so each index
/// is created by its own query.
const INDEXES: [&str; 7] = [
    "CREATE INDEX IF NOT EXISTS idx_slots_date_start ON slots(date, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_slot_id ON bookings(slot_id)",
    "CREATE INDEX IF NOT EXISTS idx_class_slots_date_start ON class_slots(date, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_class_slots_trainer_date ON class_slots(trainer_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_class_bookings_user_id ON class_bookings(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_class_bookings_class_slot_id ON class_bookings(class_slot_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(150) NOT NULL UNIQUE,
            email VARCHAR(254) NOT NULL DEFAULT '',
            password_hash VARCHAR(255) NOT NULL,
            is_staff BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id BIGSERIAL PRIMARY KEY,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 10,
            available INTEGER NOT NULL DEFAULT 10,
            CONSTRAINT slots_unique_window UNIQUE (date, start_time, end_time),
            CONSTRAINT slots_valid_time_range CHECK (end_time > start_time),
            CONSTRAINT slots_valid_capacity CHECK (capacity > 0),
            CONSTRAINT slots_available_bounds CHECK (available >= 0 AND available <= capacity)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            slot_id BIGINT NOT NULL REFERENCES slots(id) ON DELETE CASCADE,
            booked_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT bookings_unique_user_slot UNIQUE (user_id, slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create trainers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trainers (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            specialization VARCHAR(100) NOT NULL,
            bio TEXT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create class_types table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_types (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE,
            description TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 60
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create class_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_slots (
            id BIGSERIAL PRIMARY KEY,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            class_type_id BIGINT NOT NULL REFERENCES class_types(id) ON DELETE CASCADE,
            trainer_id BIGINT NOT NULL REFERENCES trainers(id) ON DELETE CASCADE,
            capacity INTEGER NOT NULL DEFAULT 10,
            available INTEGER NOT NULL DEFAULT 10,
            CONSTRAINT class_slots_unique_trainer_start UNIQUE (date, start_time, trainer_id),
            CONSTRAINT class_slots_valid_time_range CHECK (end_time > start_time),
            CONSTRAINT class_slots_valid_capacity CHECK (capacity > 0),
            CONSTRAINT class_slots_available_bounds CHECK (available >= 0 AND available <= capacity)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create class_bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_bookings (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            class_slot_id BIGINT NOT NULL REFERENCES class_slots(id) ON DELETE CASCADE,
            booked_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT class_bookings_unique_user_slot UNIQUE (user_id, class_slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use gymbook_db::{DEFAULT_LOCK_TIMEOUT, Stores, seed};
use rand::{SeedableRng, rngs::StdRng};

/// Fills a Postgres database with the demo timetable. Safe to run repeatedly.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL must be set to seed a database")?;

    let stores = Stores::connect(Some(database_url.as_str()), DEFAULT_LOCK_TIMEOUT).await?;
    let today = Utc::now().date_naive();

    println!("Creating gym slots, trainers and classes...");
    let report = seed::seed_all(&stores, today, &mut StdRng::from_entropy()).await?;

    println!("Created {} new gym slots.", report.slots);
    println!("Created {} new trainers.", report.trainers);
    println!("Created {} new class types.", report.class_types);
    println!("Created {} new class slots.", report.class_slots);

    if let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        let admin = seed::ensure_staff_user(&stores, &username, &password).await?;
        println!("Staff account {} is ready.", admin.username);
    }

    Ok(())
}

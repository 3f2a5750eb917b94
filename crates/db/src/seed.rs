//! Demo data: a three-week grid of general slots, the trainer roster, the
//! class catalogue, and a week of trainer-led classes.
//!
//! Every step is idempotent. Records that already exist are left alone, so
//! running the seeder twice creates nothing the second time.

use chrono::{Days, NaiveDate, NaiveTime};
use gymbook_core::{
    errors::{GymError, GymResult},
    models::{
        class::{ClassType, NewClassSlot, NewClassType, NewTrainer, Trainer},
        slot::{DEFAULT_CAPACITY, NewSlot},
        user::{NewUser, User},
    },
};
use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};
use tracing::{debug, info};

use crate::Stores;

/// Daily one-hour windows, as (start hour, end hour).
pub const DAILY_WINDOWS: [(u32, u32); 6] = [(8, 9), (9, 10), (10, 11), (16, 17), (17, 18), (18, 19)];

pub const SLOT_DAYS: u64 = 21;
pub const CLASS_DAYS: u64 = 7;
pub const CLASS_CAPACITY: i32 = 8;

const TRAINERS: [(&str, &str, &str); 5] = [
    (
        "Aditya Sharma",
        "Yoga",
        "Certified yoga instructor with over 5 years of experience across several styles.",
    ),
    (
        "Priya Patel",
        "HIIT",
        "Specialises in high-intensity interval training and weight loss programmes.",
    ),
    (
        "Rohit Singh",
        "Strength Training",
        "Helps members build muscle and improve overall strength.",
    ),
    (
        "Neha Verma",
        "Zumba",
        "Brings energy and fun to dance fitness.",
    ),
    (
        "Vikram Mehta",
        "CrossFit",
        "Certified CrossFit coach focused on peak performance.",
    ),
];

const CLASS_TYPES: [(&str, &str, i32); 5] = [
    (
        "Yoga",
        "Postures and breathing exercises for body and mind.",
        60,
    ),
    (
        "HIIT",
        "Short bursts of intense exercise alternated with recovery periods.",
        45,
    ),
    (
        "Strength Training",
        "Muscle strength and endurance with weights and resistance equipment.",
        60,
    ),
    (
        "Zumba",
        "Dance fitness set to Latin and international music.",
        50,
    ),
    (
        "Pilates",
        "Exercises for strength, flexibility and posture.",
        55,
    ),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub slots: usize,
    pub trainers: usize,
    pub class_types: usize,
    pub class_slots: usize,
}

fn window(start: u32, end: u32) -> GymResult<(NaiveTime, NaiveTime)> {
    let start_time = NaiveTime::from_hms_opt(start, 0, 0)
        .ok_or_else(|| GymError::Validation(format!("Invalid hour {}", start)))?;
    let end_time = NaiveTime::from_hms_opt(end, 0, 0)
        .ok_or_else(|| GymError::Validation(format!("Invalid hour {}", end)))?;
    Ok((start_time, end_time))
}

fn days_from(today: NaiveDate, count: u64) -> impl Iterator<Item = NaiveDate> {
    (0..count).filter_map(move |offset| today.checked_add_days(Days::new(offset)))
}

/// `Ok(true)` if created, `Ok(false)` if it already existed.
fn created<T>(result: GymResult<T>) -> GymResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(GymError::Conflict(_) | GymError::TrainerConflict { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Creates the general slot grid for `SLOT_DAYS` days starting at `today`.
pub async fn seed_slots(stores: &Stores, today: NaiveDate) -> GymResult<usize> {
    let mut count = 0;
    for date in days_from(today, SLOT_DAYS) {
        for (start, end) in DAILY_WINDOWS {
            let (start_time, end_time) = window(start, end)?;
            let new_slot = NewSlot::new(date, start_time, end_time, DEFAULT_CAPACITY);
            if created(stores.slots.create_slot(new_slot).await)? {
                count += 1;
            }
        }
    }

    debug!("Seeded {} slots", count);
    Ok(count)
}

async fn seed_trainers(stores: &Stores) -> GymResult<(Vec<Trainer>, usize)> {
    let mut count = 0;
    for (name, specialization, bio) in TRAINERS {
        let trainer = NewTrainer {
            name: name.to_string(),
            specialization: specialization.to_string(),
            bio: Some(bio.to_string()),
        };
        if created(stores.classes.create_trainer(trainer).await)? {
            count += 1;
        }
    }

    let roster = stores
        .classes
        .list_trainers()
        .await?
        .into_iter()
        .filter(|trainer| TRAINERS.iter().any(|(name, _, _)| *name == trainer.name))
        .collect();
    Ok((roster, count))
}

async fn seed_class_types(stores: &Stores) -> GymResult<(Vec<ClassType>, usize)> {
    let mut count = 0;
    for (name, description, duration_minutes) in CLASS_TYPES {
        let class_type = NewClassType {
            name: name.to_string(),
            description: description.to_string(),
            duration_minutes,
        };
        if created(stores.classes.create_class_type(class_type).await)? {
            count += 1;
        }
    }

    Ok((stores.classes.list_class_types().await?, count))
}

/// The class a trainer teaches: the one named after their specialization,
/// or a random one when nothing matches.
pub fn class_for<'a, R: Rng>(
    trainer: &Trainer,
    class_types: &'a [ClassType],
    rng: &mut R,
) -> Option<&'a ClassType> {
    class_types
        .iter()
        .find(|class_type| class_type.name.eq_ignore_ascii_case(&trainer.specialization))
        .or_else(|| class_types.choose(rng))
}

/// Seeds everything. Class times are picked at random, one or two per
/// trainer per day.
pub async fn seed_all<R: Rng>(stores: &Stores, today: NaiveDate, rng: &mut R) -> GymResult<SeedReport> {
    let slots = seed_slots(stores, today).await?;
    let (trainers, trainer_count) = seed_trainers(stores).await?;
    let (class_types, class_type_count) = seed_class_types(stores).await?;

    let mut class_slots = 0;
    for date in days_from(today, CLASS_DAYS) {
        for trainer in &trainers {
            let Some(class_type) = class_for(trainer, &class_types, rng) else {
                continue;
            };
            let per_day = rng.gen_range(1..=2);
            for (start, end) in DAILY_WINDOWS.iter().copied().choose_multiple(rng, per_day) {
                let (start_time, end_time) = window(start, end)?;
                let new_slot =
                    NewClassSlot::new(date, start_time, end_time, class_type.id, trainer.id)
                        .with_capacity(CLASS_CAPACITY);
                if created(stores.classes.create_class_slot(new_slot).await)? {
                    class_slots += 1;
                }
            }
        }
    }

    let report = SeedReport {
        slots,
        trainers: trainer_count,
        class_types: class_type_count,
        class_slots,
    };
    info!(
        "Seeded {} slots, {} trainers, {} class types and {} class slots",
        report.slots, report.trainers, report.class_types, report.class_slots
    );
    Ok(report)
}

/// Makes sure a staff account with these credentials exists, creating or
/// promoting it as needed.
pub async fn ensure_staff_user(stores: &Stores, username: &str, password: &str) -> GymResult<User> {
    let user = match stores.users.register(NewUser::new(username, password)).await {
        Ok(user) => user,
        Err(GymError::Conflict(_)) => stores.users.authenticate(username, password).await?,
        Err(err) => return Err(err),
    };

    if user.is_staff {
        return Ok(user);
    }
    info!("Granting staff access to {}", user.username);
    stores.users.set_staff(user.id, true).await
}

//! # Seed Data Generator
//!
//! Populates the database with a small barbershop for development.
//!
//! ## Usage
//! ```bash
//! # Four weeks of history ending today (default)
//! cargo run -p barberia-db --bin seed
//!
//! # Custom number of weeks
//! cargo run -p barberia-db --bin seed -- --weeks 8
//!
//! # Specify database path
//! cargo run -p barberia-db --bin seed -- --db ./data/barberia.db
//! ```
//!
//! ## Generated Data
//! - One admin (PIN 0000, no payment plan)
//! - Four barbers, one per payment plan (PINs 1111..4444)
//! - Monday to Saturday: a handful of tickets per barber, mixed methods
//! - Weekly supply and tax expenses
//! - An occasional cash advance
//!
//! No salaries or cashbox closes are written; those are for the
//! back-office to produce.

use chrono::{Duration, Local, NaiveDate, Utc};
use std::env;
use barberia_core::{
    Expense, ExpenseType, Money, PaymentMethod, PaymentPlan, Rate, Role, Service, ServiceItem,
    User, WeekDefinition,
};
use barberia_db::{Database, DbConfig};
use uuid::Uuid;

/// Service catalogue: kind and price in guaraníes
const SERVICE_TYPES: &[(&str, i64)] = &[
    ("corte", 40_000),
    ("barba", 25_000),
    ("corte + barba", 60_000),
    ("degradado", 50_000),
    ("cejas", 10_000),
    ("lavado", 15_000),
];

/// Payment methods, weighted towards cash
const METHODS: &[PaymentMethod] = &[
    PaymentMethod::Cash,
    PaymentMethod::Cash,
    PaymentMethod::Cash,
    PaymentMethod::Transfer,
    PaymentMethod::Pos,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut weeks: i64 = 4;
    let mut db_path = String::from("./barberia_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--weeks" | "-w" => {
                if i + 1 < args.len() {
                    weeks = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Barbería Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -w, --weeks <N>    Weeks of history to generate (default: 4)");
                println!("  -d, --db <PATH>    Database file path (default: ./barberia_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Barbería Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Weeks:    {}", weeks);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Users
    let admin = user("Dueño", "0000", Role::Admin, PaymentPlan::Undefined);
    db.users().insert(&admin).await?;

    let barbers = vec![
        user(
            "Carlos",
            "1111",
            Role::User,
            PaymentPlan::Commission { rate: Rate::from_bps(5_000) },
        ),
        user(
            "Diego",
            "2222",
            Role::User,
            PaymentPlan::BasePlusCommission {
                base: Money::from_gs(300_000),
                rate: Rate::from_bps(3_000),
            },
        ),
        user(
            "Matías",
            "3333",
            Role::User,
            PaymentPlan::FixedWeekly { amount: Money::from_gs(700_000) },
        ),
        user(
            "Lucas",
            "4444",
            Role::User,
            PaymentPlan::MinimumOrPercentage {
                minimum: Money::from_gs(500_000),
                rate: Rate::from_bps(4_500),
            },
        ),
    ];
    for barber in &barbers {
        db.users().insert(barber).await?;
    }
    println!("✓ Created {} users", barbers.len() + 1);

    // Services, expenses and advances, week by week
    let today = Local::now().date_naive();
    let this_week = WeekDefinition::SALARY_DEFAULT.range_containing(today);
    let first_monday = this_week.start - Duration::weeks(weeks - 1);

    let start = std::time::Instant::now();
    let mut tickets = 0usize;
    let mut expenses = 0usize;
    let mut advances = 0usize;
    let mut seed = 0usize;

    for week in 0..weeks {
        let monday = first_monday + Duration::weeks(week);

        for offset in 0..6 {
            let date = monday + Duration::days(offset);
            if date > today {
                break;
            }

            for (b, barber) in barbers.iter().enumerate() {
                let count = 3 + (seed + b) % 5;
                for _ in 0..count {
                    let (service, items) = ticket(&barber.id, date, seed);
                    db.services().insert(&service, &items).await?;
                    tickets += 1;
                    seed += 1;
                }
            }
        }

        if monday <= today {
            db.expenses()
                .insert(&expense("Navajas y talco", ExpenseType::Supply, 85_000, monday))
                .await?;
            db.expenses()
                .insert(&expense("Patente municipal", ExpenseType::Tax, 40_000, monday))
                .await?;
            expenses += 2;

            let barber = &barbers[(week as usize) % barbers.len()];
            db.advances()
                .record_cash_advance(
                    &barber.id,
                    Money::from_gs(50_000),
                    PaymentMethod::Cash,
                    monday,
                    monday,
                )
                .await?;
            advances += 1;
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} tickets, {} expenses, {} advances in {:?}", tickets, expenses, advances, elapsed);

    println!();
    println!("This week's production:");
    for barber in &barbers {
        let total = db
            .services()
            .weekly_total(&barber.id, this_week.start, this_week.end)
            .await?;
        println!("  {:<10} {}", barber.name, total);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn user(name: &str, pin: &str, role: Role, plan: PaymentPlan) -> User {
    User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        role,
        pin: pin.to_string(),
        plan,
        active: true,
        created_at: Utc::now(),
    }
}

/// One ticket with one or two items.
fn ticket(user_id: &str, date: NaiveDate, seed: usize) -> (Service, Vec<ServiceItem>) {
    let id = Uuid::new_v4().to_string();

    let mut items = Vec::new();
    let (kind, price) = SERVICE_TYPES[seed % SERVICE_TYPES.len()];
    items.push(item(&id, kind, price));
    if seed % 4 == 0 {
        let (kind, price) = SERVICE_TYPES[(seed / 4 + 1) % SERVICE_TYPES.len()];
        items.push(item(&id, kind, price));
    }

    let service = Service {
        id,
        user_id: user_id.to_string(),
        date,
        payment_method: METHODS[(seed * 7) % METHODS.len()],
        total_gs: items.iter().map(|i| i.price_gs).sum(),
        notes: None,
        created_at: Utc::now(),
    };
    (service, items)
}

fn item(service_id: &str, kind: &str, price: i64) -> ServiceItem {
    ServiceItem {
        id: Uuid::new_v4().to_string(),
        service_id: service_id.to_string(),
        service_type: kind.to_string(),
        price_gs: price,
    }
}

fn expense(description: &str, expense_type: ExpenseType, gs: i64, date: NaiveDate) -> Expense {
    Expense {
        id: Uuid::new_v4().to_string(),
        description: description.to_string(),
        amount_gs: gs,
        date,
        expense_type,
        payment_method: PaymentMethod::Cash,
        user_id: None,
        created_at: Utc::now(),
    }
}

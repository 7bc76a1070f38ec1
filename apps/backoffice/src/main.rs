//! # Barbería Console
//!
//! Drives the back-office commands from a terminal: closing the day,
//! looking at and paying the weekly payroll, and backing up the database.
//!
//! ## Usage
//! ```bash
//! # First run: create the owner account
//! barberia init --name "Dueño" --pin 0000
//!
//! # Close today's register (or a given day)
//! barberia close-day --pin 0000
//! barberia close-day 2024-06-08 --pin 0000
//!
//! # Weekly payroll table for the week containing a date
//! barberia payroll 2024-06-05 --pin 0000
//!
//! # Pay one barber (id or name), with an optional bonus
//! barberia pay --pin 0000 --user Carlos --method cash --bonus 50000
//!
//! # Cashbox week view, manual backup
//! barberia week --pin 0000
//! barberia backup --pin 0000
//! ```
//!
//! `--config PATH` reads a specific config file; `--json` prints command
//! results as JSON instead of tables.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing::error;

use barberia_backoffice::commands::{cashbox, payroll, session, users};
use barberia_backoffice::state::ConfigState;
use barberia_backoffice::{init_tracing, BackOffice};
use barberia_core::{Money, PaymentMethod};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    command: Option<String>,
    date: Option<NaiveDate>,
    pin: Option<String>,
    name: Option<String>,
    user: Option<String>,
    method: Option<String>,
    bonus: i64,
    config: Option<PathBuf>,
    json: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let args = parse_args(env::args().skip(1).collect())?;
    let Some(command) = args.command.clone() else {
        print_help();
        return Ok(());
    };

    let config = ConfigState::load(args.config.as_deref())?;
    let app = BackOffice::open(config).await?;

    if command == "init" {
        let name = args.name.as_deref().ok_or("init needs --name")?;
        let pin = args.pin.as_deref().ok_or("init needs --pin")?;
        let admin = users::bootstrap_admin(&app.db, name, pin).await?;
        println!("Created admin {} ({})", admin.name, admin.id);
        return Ok(());
    }

    let pin = args.pin.as_deref().ok_or("--pin is required")?;
    let who = session::login(&app.db, &app.session, pin).await?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    match command.as_str() {
        "close-day" => {
            let closed = cashbox::close_day(&app.db, &app.session, &app.config, date).await?;
            if args.json {
                return print_json(&closed);
            }
            let day = &closed.day;
            let fmt = |gs: i64| app.config.format_money(Money::from_gs(gs));
            println!("{} closed {} by {}", app.config.shop_name, day.date, who.user_name);
            println!("  income    {:>16}", fmt(day.income_total_gs));
            println!("  expenses  {:>16}", fmt(day.expense_total_gs));
            println!("  balance   {:>16}", fmt(day.balance_gs));
            println!("  cash      {:>16}", fmt(day.cash_gs));
            println!("  transfer  {:>16}", fmt(day.transfer_gs));
            println!("  pos       {:>16}", fmt(day.pos_gs));
            match closed.backup {
                cashbox::BackupOutcome::Written { path, .. } => {
                    println!("Backup written to {}", path.display())
                }
                cashbox::BackupOutcome::Failed { message } => {
                    println!("Backup FAILED: {message}")
                }
                cashbox::BackupOutcome::Disabled => {}
            }
        }
        "payroll" => {
            let table =
                payroll::weekly_salary_rows(&app.db, &app.session, &app.config, date).await?;
            if args.json {
                return print_json(&table);
            }
            println!("Payroll {}", table.week);
            println!(
                "{:<20} {:<28} {:>14} {:>14} {:>14}  {}",
                "Name", "Plan", "Production", "Advances", "Net", "Paid"
            );
            for row in &table.rows {
                println!(
                    "{:<20} {:<28} {:>14} {:>14} {:>14}  {}",
                    row.user_name,
                    row.plan_label,
                    app.config.format_money(row.production),
                    app.config.format_money(row.advances),
                    app.config.format_money(row.net_preview),
                    row.amount_paid
                        .map(|m| app.config.format_money(m))
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            println!(
                "Paid {} · {} pending",
                app.config.format_money(table.total_paid),
                table.pending
            );
        }
        "pay" => {
            let user = args.user.as_deref().ok_or("pay needs --user")?;
            let method: PaymentMethod = args.method.as_deref().unwrap_or("cash").parse()?;
            let user_id = resolve_user(&app, user).await?;
            let paid = payroll::pay_salary(
                &app.db,
                &app.session,
                &app.config,
                payroll::PaySalaryRequest {
                    user_id,
                    date,
                    payment_method: method,
                    bonus: args.bonus,
                },
            )
            .await?;
            if args.json {
                return print_json(&paid);
            }
            println!(
                "Paid {} for week {} .. {}",
                app.config.format_money(paid.salary.amount_paid()),
                paid.salary.week_start,
                paid.salary.week_end
            );
            if let Some(carry) = paid.carryover {
                println!(
                    "Deficit of {} carried to {}",
                    app.config.format_money(carry.amount()),
                    carry.date
                );
            }
        }
        "week" => {
            let week = cashbox::cashbox_week(&app.db, &app.session, &app.config, date).await?;
            if args.json {
                return print_json(&week);
            }
            println!("Cashbox {}", week.range);
            for day in &week.days {
                println!(
                    "  {}  income {:>14}  expenses {:>14}  balance {:>14}",
                    day.date,
                    app.config.format_money(Money::from_gs(day.income_total_gs)),
                    app.config.format_money(Money::from_gs(day.expense_total_gs)),
                    app.config.format_money(day.balance()),
                );
            }
            println!(
                "Total income {} · expenses {} · pos {}",
                app.config.format_money(week.income_total),
                app.config.format_money(week.expense_total),
                app.config.format_money(week.pos_total)
            );
        }
        "backup" => {
            let info = cashbox::backup_now(&app.db, &app.session, &app.config).await?;
            if args.json {
                return print_json(&info);
            }
            println!("Backup written to {} ({} bytes)", info.path.display(), info.size_bytes);
        }
        other => {
            session::logout(&app.session);
            return Err(format!("Unknown command '{other}'; try --help").into());
        }
    }

    session::logout(&app.session);
    Ok(())
}

fn parse_args(raw: Vec<String>) -> CliResult<Args> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pin" | "-p" => args.pin = iter.next(),
            "--name" | "-n" => args.name = iter.next(),
            "--user" | "-u" => args.user = iter.next(),
            "--method" | "-m" => args.method = iter.next(),
            "--bonus" | "-b" => {
                let value = iter.next().ok_or("--bonus needs an amount")?;
                args.bonus = value.parse()?;
            }
            "--config" | "-c" => args.config = iter.next().map(PathBuf::from),
            "--json" => args.json = true,
            "--help" | "-h" => {
                args.command = None;
                return Ok(args);
            }
            _ if args.command.is_none() => args.command = Some(arg),
            _ => args.date = Some(arg.parse()?),
        }
    }
    Ok(args)
}

/// Accepts a user id or a (case-insensitive) name.
async fn resolve_user(app: &BackOffice, user: &str) -> CliResult<String> {
    let all = users::list_users(&app.db, &app.session, false).await?;
    all.iter()
        .find(|u| u.id == user || u.name.eq_ignore_ascii_case(user))
        .map(|u| u.id.clone())
        .ok_or_else(|| format!("No active user '{user}'").into())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_help() {
    println!("Barbería Back-Office");
    println!();
    println!("Usage: barberia <COMMAND> [DATE] [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  init                First admin (--name, --pin); empty database only");
    println!("  close-day [DATE]    Close the register for DATE (default: today)");
    println!("  payroll [DATE]      Salary table for the week containing DATE");
    println!("  pay [DATE]          Pay --user with --method [--bonus N]");
    println!("  week [DATE]         Cashbox closes for the week containing DATE");
    println!("  backup              Write a database backup now");
    println!();
    println!("Options:");
    println!("  -p, --pin <PIN>       Log in with this PIN");
    println!("  -n, --name <NAME>     Admin name for init");
    println!("  -u, --user <USER>     User id or name for pay");
    println!("  -m, --method <M>      cash | transfer | pos (default: cash)");
    println!("  -b, --bonus <GS>      Bonus in guaraníes (default: 0)");
    println!("  -c, --config <PATH>   Config file (default: platform config dir)");
    println!("      --json            Print results as JSON");
    println!("  -h, --help            Show this help message");
    println!();
    println!("Environment: BARBERIA_DB_PATH, BARBERIA_BACKUP_DIR, BARBERIA_SALARY_WEEK, ...");
}

//! # Repository Module
//!
//! Database repository implementations for the back-office ledgers.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Back-office command                                                   │
//! │       │                                                                 │
//! │       │  db.services().weekly_total(user, mon, sat)                    │
//! │       ▼                                                                 │
//! │  ServiceRepository ── SQL ──► SQLite                                   │
//! │                                                                         │
//! │  Multi-row writes open one transaction inside the repository:          │
//! │                                                                         │
//! │  SalaryRepository::record_payment                                      │
//! │    BEGIN                                                               │
//! │    ├── duplicate check (user, week_start)                              │
//! │    ├── ExpenseRepository::record_salary_expense(&mut tx, ..)           │
//! │    ├── INSERT salaries                                                 │
//! │    └── INSERT advances (carry-over, if any)                            │
//! │    COMMIT                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Users, PIN lookup, payment plans
//! - [`service::ServiceRepository`] - Service tickets and production sums
//! - [`expense::ExpenseRepository`] - Expenses, including payroll-linked ones
//! - [`advance::AdvanceRepository`] - Advances and their expenses
//! - [`salary::SalaryRepository`] - Paid salaries
//! - [`cashbox::CashboxRepository`] - Daily cashbox closes

pub mod advance;
pub mod cashbox;
pub mod expense;
pub mod salary;
pub mod service;
pub mod user;

//! Thin line-oriented front end over the ledger services. The desktop and
//! web GUIs sit on the same contract; this shell exists so the core is
//! drivable end to end without either toolkit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Datelike;
use colored::Colorize;

use crate::app::{reduce, AppEvent, AppState};
use crate::config::ConfigManager;
use crate::core::services::{AccountService, MovementService, SummaryService};
use crate::currency::format_currency;
use crate::domain::movement::{parse_amount, parse_date, DATE_FORMAT};
use crate::domain::MovementDraft;
use crate::errors::{CliError, LedgerError};
use crate::report;
use crate::store::LedgerStore;
use crate::utils::build_info;

enum Outcome {
    Continue,
    Quit,
}

pub fn run_cli() -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let store = LedgerStore::open(&manager.database_path(&config))?;
    AccountService::bootstrap(&store)?;

    let today = chrono::Local::now().date_naive();
    let mut state = AppState::at(today.month(), today.year());
    let currency = config.currency.clone();

    println!("expense_core {} - type `help` for commands", build_info::CLI_VERSION);
    let stdin = io::stdin();
    loop {
        print!("{:04}-{:02}> ", state.year, state.month);
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match dispatch(&store, &mut state, &currency, line.trim()) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue) => {}
            Err(err) => report_error(&err),
        }
    }
    Ok(())
}

/// Every failure is surfaced with its kind; nothing is swallowed.
fn report_error(err: &CliError) {
    match err {
        CliError::Core(LedgerError::Validation(msg)) => eprintln!("Invalid input: {msg}"),
        CliError::Core(LedgerError::NotFound(id)) => eprintln!("No movement with id {id}"),
        CliError::Core(LedgerError::AccountNotFound(name)) => eprintln!("No account `{name}`"),
        CliError::Core(LedgerError::Export(msg)) => eprintln!("Export failed: {msg}"),
        CliError::Core(LedgerError::Storage(msg)) => eprintln!("Storage failure: {msg}"),
        CliError::Input(msg) => eprintln!("Invalid input: {msg}"),
        CliError::Io(err) => eprintln!("IO error: {err}"),
    }
}

fn dispatch(
    store: &LedgerStore,
    state: &mut AppState,
    currency: &str,
    line: &str,
) -> Result<Outcome, CliError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(Outcome::Continue);
    };
    match command {
        "help" => print_help(),
        "quit" | "exit" => return Ok(Outcome::Quit),
        "version" => print_version(),
        "next" => *state = reduce(*state, AppEvent::NextMonth),
        "prev" => *state = reduce(*state, AppEvent::PrevMonth),
        "goto" => {
            let (month, year) = parse_month_year(args)?;
            *state = reduce(*state, AppEvent::JumpTo { month, year });
        }
        "add" => {
            let draft = parse_draft(args)?;
            let id = MovementService::add(store, draft)?;
            println!("Added movement {id}");
        }
        "update" => {
            let (&id_token, rest) = args
                .split_first()
                .ok_or_else(|| CliError::Input("usage: update <id> <kind> <amount> <date> [category] [description...]".into()))?;
            let id = parse_id(id_token)?;
            *state = reduce(*state, AppEvent::BeginEdit(id));
            let draft = parse_draft(rest)?;
            MovementService::update(store, id, draft)?;
            *state = reduce(*state, AppEvent::CancelEdit);
            println!("Updated movement {id}");
        }
        "delete" => {
            let (&id_token, _) = args
                .split_first()
                .ok_or_else(|| CliError::Input("usage: delete <id>".into()))?;
            let id = parse_id(id_token)?;
            MovementService::delete(store, id)?;
            println!("Deleted movement {id} (if it existed)");
        }
        "list" => print_movements(store, state, false)?,
        "all" => print_movements(store, state, true)?,
        "summary" => print_summary(store, state, currency)?,
        "breakdown" => print_breakdown(store, state, currency)?,
        "export" => run_export(store, state, args)?,
        "user" => run_user_command(store, args)?,
        "login" => {
            let [username, password] = args else {
                return Err(CliError::Input("usage: login <username> <password>".into()));
            };
            match AccountService::login(store, username, password)? {
                Some(grant) if grant.is_admin => println!("Welcome, {} (administrator)", grant.username),
                Some(grant) => println!("Welcome, {}", grant.username),
                None => eprintln!("Access denied"),
            }
        }
        other => return Err(CliError::Input(format!("unknown command `{other}`"))),
    }
    Ok(Outcome::Continue)
}

fn parse_id(token: &str) -> Result<i64, CliError> {
    token
        .parse()
        .map_err(|_| CliError::Input(format!("`{token}` is not a movement id")))
}

fn parse_month_year(args: &[&str]) -> Result<(u32, i32), CliError> {
    let [month, year] = args else {
        return Err(CliError::Input("usage: goto <month> <year>".into()));
    };
    let month: u32 = month
        .parse()
        .map_err(|_| CliError::Input(format!("`{month}` is not a month")))?;
    let year: i32 = year
        .parse()
        .map_err(|_| CliError::Input(format!("`{year}` is not a year")))?;
    Ok((month, year))
}

/// `<kind> <amount> <date> [category] [description...]`; `-` stands for an
/// empty category.
fn parse_draft(args: &[&str]) -> Result<MovementDraft, CliError> {
    let [kind, amount, date, rest @ ..] = args else {
        return Err(CliError::Input(
            "expected <kind> <amount> <date> [category] [description...]".into(),
        ));
    };
    let kind = kind.parse().map_err(CliError::Core)?;
    let amount = parse_amount(amount).map_err(CliError::Core)?;
    let date = parse_date(date).map_err(CliError::Core)?;
    let category = match rest.first() {
        Some(&"-") | None => String::new(),
        Some(&value) => value.to_string(),
    };
    let description = if rest.len() > 1 {
        rest[1..].join(" ")
    } else {
        String::new()
    };
    Ok(MovementDraft::new(kind, amount, description, category, date))
}

fn print_movements(store: &LedgerStore, state: &AppState, everything: bool) -> Result<(), CliError> {
    let movements = if everything {
        MovementService::list_all(store)?
    } else {
        MovementService::list_month(store, state.month, state.year)?
    };
    if movements.is_empty() {
        println!("No movements.");
        return Ok(());
    }
    println!(
        "{:>5}  {:<8} {:>12}  {:<30} {:<20} {}",
        "Id", "Kind", "Amount", "Description", "Category", "Date"
    );
    for m in &movements {
        println!(
            "{:>5}  {:<8} {:>12}  {:<30} {:<20} {}",
            m.id,
            m.kind.label(),
            crate::currency::format_amount(m.amount),
            m.description,
            m.category,
            m.date.format(DATE_FORMAT),
        );
    }
    Ok(())
}

fn print_summary(store: &LedgerStore, state: &AppState, currency: &str) -> Result<(), CliError> {
    let view = MovementService::month_view(store, state.month, state.year)?;
    println!("{}", state.period_label());
    println!("  Income:  {}", format_currency(view.summary.total_income, currency));
    println!("  Expense: {}", format_currency(view.summary.total_expense, currency));
    let balance = format_currency(view.summary.balance, currency);
    if view.summary.balance < rust_decimal::Decimal::ZERO {
        println!("  Balance: {}", balance.red().bold());
    } else {
        println!("  Balance: {}", balance.green());
    }
    Ok(())
}

fn print_breakdown(store: &LedgerStore, state: &AppState, currency: &str) -> Result<(), CliError> {
    let movements = MovementService::list_month(store, state.month, state.year)?;
    let breakdown = SummaryService::category_breakdown(&movements);
    if breakdown.is_empty() {
        println!("No expenses in {}.", state.period_label());
        return Ok(());
    }
    for row in &breakdown {
        println!("{:<24} {}", row.category, format_currency(row.total, currency));
    }
    Ok(())
}

fn run_export(store: &LedgerStore, state: &AppState, args: &[&str]) -> Result<(), CliError> {
    let [format, path] = args else {
        return Err(CliError::Input("usage: export <csv|pdf> <path>".into()));
    };
    let path = PathBuf::from(path);
    let view = MovementService::month_view(store, state.month, state.year)?;
    match *format {
        "csv" => report::export_csv(&view.movements, &path)?,
        "pdf" => report::export_pdf(
            &view.movements,
            &view.summary,
            &state.period_label(),
            &path,
        )?,
        other => return Err(CliError::Input(format!("unknown export format `{other}`"))),
    }
    println!("Exported {} rows to {}", view.movements.len(), path.display());
    Ok(())
}

fn run_user_command(store: &LedgerStore, args: &[&str]) -> Result<(), CliError> {
    match args {
        ["add", username, password] => {
            AccountService::register(store, username, password, false)?;
            println!("Account `{username}` created");
        }
        ["add", username, password, "admin"] => {
            AccountService::register(store, username, password, true)?;
            println!("Administrator `{username}` created");
        }
        ["passwd", username, password] => {
            AccountService::change_password(store, username, password)?;
            println!("Credential for `{username}` changed");
        }
        ["list"] => {
            for name in AccountService::usernames(store)? {
                println!("{name}");
            }
        }
        _ => {
            return Err(CliError::Input(
                "usage: user <add <name> <password> [admin] | passwd <name> <password> | list>".into(),
            ))
        }
    }
    Ok(())
}

fn print_version() {
    let build = build_info::current();
    println!(
        "expense_core {} ({} {}, {}, {} {})",
        build.version, build.git_hash, build.git_status, build.timestamp, build.target, build.profile
    );
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 add <income|expense> <amount> <YYYY-MM-DD> [category|-] [description...]\n\
         \x20 update <id> <kind> <amount> <date> [category|-] [description...]\n\
         \x20 delete <id>\n\
         \x20 list | all | summary | breakdown\n\
         \x20 next | prev | goto <month> <year>\n\
         \x20 export <csv|pdf> <path>\n\
         \x20 user add <name> <password> [admin] | user passwd <name> <password> | user list\n\
         \x20 login <username> <password>\n\
         \x20 version | help | quit"
    );
}

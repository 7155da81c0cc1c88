//! The interactive shell: a thin controller loop around the session.
//!
//! Each input line becomes one spec change (or one render request); the
//! engine runs synchronously per change and the loop prints whatever the
//! resulting view holds. All analytics live behind the session boundary;
//! this layer only parses lines and formats text.

pub mod commands;
pub mod render;

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::data::export;
use crate::session::Session;
use commands::Command;

/// Run the controller loop until `quit` or end of input.
pub fn run(mut session: Session) -> Result<()> {
    println!(
        "{} employees loaded. Type 'help' for commands.",
        session.dataset().len()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // end of input
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match commands::parse(trimmed) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(&mut session, command),
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}

fn execute(session: &mut Session, command: Command) {
    match command {
        Command::Help => println!("{}", commands::HELP),
        Command::Show => print!("{}", render::view_block(session.view())),
        Command::Table(limit) => {
            print!("{}", render::table_block(&session.view().records, limit))
        }
        Command::Describe => print!("{}", render::describe_block(&session.view().records)),
        Command::Filters => {
            print!("{}", render::filters_block(session.dataset(), session.spec()))
        }
        Command::Toggle(column, value) => {
            if !column.distinct(session.dataset()).contains(&value) {
                println!("no such value '{value}'");
                return;
            }
            session.toggle(column, &value);
            println!("{} employees match", session.view().metrics.count);
        }
        Command::SelectAll(column) => {
            session.select_all(column);
            println!("{} employees match", session.view().metrics.count);
        }
        Command::SelectNone(column) => {
            session.select_none(column);
            println!("{} employees match", session.view().metrics.count);
        }
        Command::AgeRange(min, max) => match session.set_age_range(min, max) {
            Ok(()) => println!("{} employees match", session.view().metrics.count),
            Err(err) => println!("{err}; keeping the previous view"),
        },
        Command::SalaryRange(min, max) => match session.set_salary_range(min, max) {
            Ok(()) => println!("{} employees match", session.view().metrics.count),
            Err(err) => println!("{err}; keeping the previous view"),
        },
        Command::Reset => {
            session.reset();
            println!("{} employees match", session.view().metrics.count);
        }
        Command::Export(path) => {
            let records = &session.view().records;
            match export::export_to_path(&path, session.dataset(), records) {
                Ok(()) => println!("wrote {} rows to {}", records.len(), path.display()),
                Err(err) => println!("export failed: {err}"),
            }
        }
        Command::Json => match render::json_summary(session.view()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("serialization failed: {err}"),
        },
        Command::Quit => unreachable!("handled by the loop"),
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::data::filter::CategoricalColumn;

// ---------------------------------------------------------------------------
// Command grammar of the interactive shell
// ---------------------------------------------------------------------------

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    /// Metrics plus all three charts.
    Show,
    /// First N rows of the filtered records.
    Table(usize),
    /// Numeric summary of the filtered set.
    Describe,
    /// Current selection per column.
    Filters,
    Toggle(CategoricalColumn, String),
    SelectAll(CategoricalColumn),
    SelectNone(CategoricalColumn),
    AgeRange(u32, u32),
    SalaryRange(f64, f64),
    Reset,
    Export(PathBuf),
    /// Machine-readable view summary.
    Json,
    Quit,
}

pub const HELP: &str = "\
commands:
  show                     metrics, gender split, salary by department, tenure
  table [N]                first N filtered rows (default 20)
  describe                 numeric summary of the filtered set
  filters                  current selection
  dept|country|unit VALUE  toggle one value in that column's selection
  dept|country|unit all    select every value (likewise 'none')
  age MIN MAX              inclusive age range
  salary MIN MAX           inclusive salary range
  reset                    back to the full dataset
  export PATH              write the filtered rows as CSV
  json                     view summary as JSON
  quit";

/// Parse one trimmed, non-empty input line.
pub fn parse(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let rest: Vec<&str> = parts.collect();

    let command = match verb {
        "help" | "?" => Command::Help,
        "show" => Command::Show,
        "table" => {
            let limit = match rest.first() {
                Some(n) => n.parse().with_context(|| format!("'{n}' is not a row count"))?,
                None => 20,
            };
            Command::Table(limit)
        }
        "describe" => Command::Describe,
        "filters" => Command::Filters,
        "dept" | "department" => categorical(CategoricalColumn::Department, &rest)?,
        "country" => categorical(CategoricalColumn::Country, &rest)?,
        "unit" | "bu" => categorical(CategoricalColumn::BusinessUnit, &rest)?,
        "age" => {
            let (min, max) = range_args(&rest)?;
            Command::AgeRange(
                min.parse().with_context(|| format!("'{min}' is not an age"))?,
                max.parse().with_context(|| format!("'{max}' is not an age"))?,
            )
        }
        "salary" => {
            let (min, max) = range_args(&rest)?;
            Command::SalaryRange(
                min.parse().with_context(|| format!("'{min}' is not a salary"))?,
                max.parse().with_context(|| format!("'{max}' is not a salary"))?,
            )
        }
        "reset" => Command::Reset,
        "export" => match rest.as_slice() {
            [path] => Command::Export(PathBuf::from(path)),
            _ => bail!("usage: export PATH"),
        },
        "json" => Command::Json,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(command)
}

fn categorical(column: CategoricalColumn, rest: &[&str]) -> Result<Command> {
    match rest {
        ["all"] => Ok(Command::SelectAll(column)),
        ["none"] => Ok(Command::SelectNone(column)),
        [] => bail!("usage: <column> VALUE | all | none"),
        // Values may contain spaces ("Human Resources").
        words => Ok(Command::Toggle(column, words.join(" "))),
    }
}

fn range_args<'a>(rest: &[&'a str]) -> Result<(&'a str, &'a str)> {
    match rest {
        [min, max] => Ok((min, max)),
        _ => bail!("usage: age|salary MIN MAX"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_verbs() {
        assert_eq!(parse("show").unwrap(), Command::Show);
        assert_eq!(parse("table").unwrap(), Command::Table(20));
        assert_eq!(parse("table 5").unwrap(), Command::Table(5));
        assert_eq!(parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn parses_categorical_commands() {
        assert_eq!(
            parse("dept Sales").unwrap(),
            Command::Toggle(CategoricalColumn::Department, "Sales".into())
        );
        assert_eq!(
            parse("dept Human Resources").unwrap(),
            Command::Toggle(CategoricalColumn::Department, "Human Resources".into())
        );
        assert_eq!(
            parse("country all").unwrap(),
            Command::SelectAll(CategoricalColumn::Country)
        );
        assert_eq!(
            parse("unit none").unwrap(),
            Command::SelectNone(CategoricalColumn::BusinessUnit)
        );
    }

    #[test]
    fn parses_ranges() {
        assert_eq!(parse("age 25 50").unwrap(), Command::AgeRange(25, 50));
        assert_eq!(
            parse("salary 50000 100000").unwrap(),
            Command::SalaryRange(50_000.0, 100_000.0)
        );
        assert!(parse("age 25").is_err());
        assert!(parse("age x y").is_err());
    }

    #[test]
    fn rejects_unknown_verbs() {
        assert!(parse("frobnicate").is_err());
    }
}

//! Line commands typed into the panel

use std::str::FromStr;

/// How a command names a card: its 1-based position or its timer id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRef {
    Index(usize),
    Id(String),
}

impl FromStr for CardRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Missing card number".to_string());
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            let index = s
                .parse::<usize>()
                .map_err(|_| format!("Invalid card number '{}'", s))?;
            Ok(CardRef::Index(index))
        } else {
            Ok(CardRef::Id(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { name: String, minutes: u32, seconds: u32 },
    Adjust { card: CardRef, delta: i32 },
    Restart(CardRef),
    Delete(CardRef),
    Confirm,
    Cancel,
    Refresh,
    Dismiss,
    Help,
    Quit,
}

pub const USAGE: &str = "new <min> <sec> <name> | new <mm:ss> <name> | + <n> | - <n> | \
adjust <n> <secs> | restart <n> | delete <n> | refresh | dismiss | help | quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "new" | "add" | "create" => parse_create(rest),
            "+" => Ok(Command::Adjust { card: rest.parse()?, delta: 1 }),
            "-" => Ok(Command::Adjust { card: rest.parse()?, delta: -1 }),
            "adjust" => {
                let (card, delta) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Usage: adjust <n> <seconds>".to_string())?;
                let delta = delta
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| format!("Invalid adjustment '{}'", delta.trim()))?;
                Ok(Command::Adjust { card: card.parse()?, delta })
            }
            "restart" => Ok(Command::Restart(rest.parse()?)),
            "delete" | "del" | "rm" => Ok(Command::Delete(rest.parse()?)),
            "y" | "yes" => Ok(Command::Confirm),
            "n" | "no" => Ok(Command::Cancel),
            "refresh" => Ok(Command::Refresh),
            "dismiss" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. {}", other, USAGE)),
        }
    }
}

/// `<min> <sec> <name...>` or `<mm:ss> <name...>`. The name may be empty
/// here; the creation draft decides whether it is acceptable.
fn parse_create(rest: &str) -> Result<Command, String> {
    let number = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| format!("Invalid number '{}'. Usage: new <min> <sec> <name>", s))
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default();
    if first.is_empty() {
        return Err("Usage: new <min> <sec> <name>".to_string());
    }

    if let Some((minutes, seconds)) = first.split_once(':') {
        let name = parts.next().unwrap_or_default().trim().to_string();
        return Ok(Command::Create {
            name,
            minutes: number(minutes)?,
            seconds: number(seconds)?,
        });
    }

    let minutes = number(first)?;
    let rest = parts.next().unwrap_or_default().trim();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let seconds = number(parts.next().unwrap_or_default())?;
    let name = parts.next().unwrap_or_default().trim().to_string();
    Ok(Command::Create { name, minutes, seconds })
}

//! The interactive session: line tokenizing, command parsing and dispatch.
//!
//! Each line is split shell-style and parsed with clap, so every session
//! command gets the same `--help`, validation and error messages as the
//! top-level binary.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::areas::Coordinates;
use crate::commands;
use crate::commands::create::ReportInput;
use crate::escalation::FlagReason;
use crate::models::{Department, Designation, User};
use crate::session::Session;
use crate::submission::{IssueCategory, RoadSubtype};

/// What the loop should do after a line has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Parser, Debug)]
#[command(name = "civic", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Log in as a citizen or an official
    Login {
        #[command(subcommand)]
        role: LoginRole,
    },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Citizen: your details and reported issues
    Profile,

    /// Citizen: report a new issue
    Report {
        /// Issue type (Sanitation, Road Issue, Water)
        #[arg(long = "type")]
        issue_type: Option<IssueCategory>,
        /// Road issue subtype (Pothole, Streetlight, Obstacle)
        #[arg(long, default_value = "Pothole")]
        subtype: RoadSubtype,
        /// Photo file, or an http(s)/data URL
        #[arg(long)]
        photo: Option<String>,
        /// Locality, see `areas`
        #[arg(long)]
        area: Option<String>,
        /// Street address or landmark
        #[arg(long)]
        address: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Latitude of the problem
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the problem
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Look up the address for --lat/--lng
        #[arg(long)]
        locate: bool,
    },

    /// Citizen: follow an issue's progress
    Track {
        /// Issue ID
        id: Option<String>,
    },

    /// Citizen: show one issue in full
    View {
        /// Issue ID
        id: String,
    },

    /// Citizen: edit an issue's details
    Edit {
        /// Issue ID
        id: String,
        #[arg(long = "type")]
        issue_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Official: issues for your department and level
    Dashboard,

    /// Official: mark an issue resolved
    Resolve {
        /// Issue ID
        id: String,
    },

    /// Official: flag an issue for time or budget escalation
    Flag {
        /// Issue ID
        id: String,
        /// Reason (time, budget)
        #[arg(short, long)]
        reason: FlagReason,
    },

    /// Official: push an issue one level up
    Escalate {
        /// Issue ID
        id: String,
    },

    /// Official: unresolved issues as map markers
    Map {
        /// Print a GeoJSON FeatureCollection instead of a listing
        #[arg(long)]
        geojson: bool,
    },

    /// List known localities
    Areas,

    /// Show or move the session clock
    Clock {
        /// Move the clock forward (or back, if negative) by whole days
        #[arg(long, allow_negative_numbers = true)]
        advance_days: Option<i64>,
        /// Set the clock to an RFC 3339 time
        #[arg(long)]
        set: Option<String>,
    },

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum LoginRole {
    /// Demo citizen account
    Citizen {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Any official; no password
    Official {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Ward, Zone, City or IAS
        #[arg(long)]
        designation: Designation,
        /// Road, Sanitation or Water
        #[arg(long)]
        department: Department,
    },
}

/// Split a line into words. Double and single quotes group words; inside
/// double quotes and bare words a backslash escapes the next character.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => bail!("Unterminated single quote"),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => current.push(c),
                            None => bail!("Unterminated double quote"),
                        },
                        Some(c) => current.push(c),
                        None => bail!("Unterminated double quote"),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one tokenized line. `Ok(None)` means clap printed help and nothing should run.
pub fn parse(words: &[String]) -> Result<Option<ShellCommand>> {
    match ShellLine::try_parse_from(words) {
        Ok(line) => Ok(Some(line.command)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{}", e.render());
                Ok(None)
            }
            _ => {
                let rendered = e.render().to_string();
                let message = rendered.trim().trim_start_matches("error: ");
                bail!("{}", message)
            }
        },
    }
}

pub fn dispatch(session: &mut Session, command: ShellCommand) -> Result<Flow> {
    match command {
        ShellCommand::Login { role } => match role {
            LoginRole::Citizen { email, password } => {
                commands::login::citizen(session, &email, &password)?
            }
            LoginRole::Official {
                name,
                email,
                designation,
                department,
            } => commands::login::official(session, &name, &email, designation, department)?,
        },
        ShellCommand::Logout => commands::login::logout(session)?,
        ShellCommand::Whoami => commands::login::whoami(session)?,
        ShellCommand::Profile => commands::list::run(session)?,
        ShellCommand::Report {
            issue_type,
            subtype,
            photo,
            area,
            address,
            description,
            lat,
            lng,
            locate,
        } => {
            let position = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
                _ => None,
            };
            let input = ReportInput {
                issue_type,
                subtype,
                photo,
                area,
                address,
                description,
                position,
                locate,
            };
            commands::create::run(session, &input)?;
        }
        ShellCommand::Track { id } => commands::track::run(session, id.as_deref())?,
        ShellCommand::View { id } => commands::show::run(session, &id)?,
        ShellCommand::Edit {
            id,
            issue_type,
            location,
            description,
        } => commands::update::run(
            session,
            &id,
            issue_type.as_deref(),
            location.as_deref(),
            description.as_deref(),
        )?,
        ShellCommand::Dashboard => commands::dashboard::run(session)?,
        ShellCommand::Resolve { id } => commands::status::resolve(session, &id)?,
        ShellCommand::Flag { id, reason } => commands::status::flag(session, &id, reason)?,
        ShellCommand::Escalate { id } => commands::status::escalate(session, &id)?,
        ShellCommand::Map { geojson } => commands::map::run(session, geojson)?,
        ShellCommand::Areas => commands::create::list_areas()?,
        ShellCommand::Clock { advance_days, set } => {
            commands::clock::run(session, advance_days, set.as_deref())?
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Tokenize, parse and run one line.
pub fn execute_line(session: &mut Session, line: &str) -> Result<Flow> {
    let words = split_line(line)?;
    if words.is_empty() {
        return Ok(Flow::Continue);
    }
    match parse(&words)? {
        Some(command) => dispatch(session, command),
        None => Ok(Flow::Continue),
    }
}

fn prompt(session: &Session) -> String {
    match session.user() {
        None => "civic> ".to_string(),
        Some(User::Citizen(_)) => "civic[citizen]> ".to_string(),
        Some(User::Official(o)) => format!("civic[{}/{}]> ", o.designation, o.department),
    }
}

/// Read lines until EOF or `quit`. Command failures are printed and the session goes on.
pub fn run_interactive<R: BufRead>(session: &mut Session, input: R) -> Result<()> {
    println!("Civic issue reporter. Type 'help' for commands, 'quit' to leave.");
    let mut lines = input.lines();
    loop {
        print!("{}", prompt(session));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        match execute_line(session, &line?) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("Error: {:#}", e),
        }
    }
    Ok(())
}

/// How a replayed script went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub commands: usize,
    pub failures: usize,
}

/// Replay a script: blank lines and `#` comments are skipped, each command is echoed.
pub fn run_script(session: &mut Session, script: &str) -> ScriptSummary {
    let mut summary = ScriptSummary::default();

    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        println!("> {}", trimmed);
        summary.commands += 1;

        match execute_line(session, trimmed) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                summary.failures += 1;
                tracing::debug!(line = trimmed, error = %e, "script command failed");
                println!("Error: {:#}", e);
            }
        }
    }

    summary
}

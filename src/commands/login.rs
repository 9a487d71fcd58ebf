use anyhow::{bail, Result};

use crate::login;
use crate::models::{Department, Designation, User};
use crate::session::Session;

fn ensure_signed_out(session: &Session) -> Result<()> {
    if let Some(user) = session.user() {
        bail!("Already logged in as {}. Run 'logout' first.", user.name());
    }
    Ok(())
}

pub fn citizen(session: &mut Session, email: &str, password: &str) -> Result<()> {
    ensure_signed_out(session)?;
    let user = login::login_citizen(email, password)?;
    println!("Welcome, {}.", user.name());
    println!("Commands: profile, report, track, view, edit, logout");
    session.sign_in(user);
    Ok(())
}

pub fn official(
    session: &mut Session,
    name: &str,
    email: &str,
    designation: Designation,
    department: Department,
) -> Result<()> {
    ensure_signed_out(session)?;
    let user = login::login_official(name, email, designation, department)?;
    println!(
        "Welcome, {} ({} - {}).",
        user.name(),
        designation,
        department
    );
    println!("Commands: dashboard, resolve, flag, escalate, map, logout");
    session.sign_in(user);
    Ok(())
}

pub fn logout(session: &mut Session) -> Result<()> {
    match session.sign_out() {
        Some(user) => println!("Signed out {}.", user.name()),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
    match session.user() {
        None => println!("Not logged in."),
        Some(User::Citizen(c)) => println!("{} <{}> (citizen)", c.name, c.email),
        Some(User::Official(o)) => println!(
            "{} <{}> ({} - {})",
            o.name, o.email, o.designation, o.department
        ),
    }
    Ok(())
}

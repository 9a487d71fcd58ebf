pub mod areas;
pub mod capture;
pub mod commands;
pub mod db;
pub mod escalation;
pub mod geocode;
pub mod login;
pub mod map;
pub mod models;
pub mod session;
pub mod shell;
pub mod submission;
pub mod track;

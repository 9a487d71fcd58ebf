use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::areas;
use crate::models::Issue;

const ISSUE_COLUMNS: &str = "id, lat, lng, date, issue_type, location, status, current_level, department, due_date, flag, image, description";

/// Session issue list. Lives in an in-memory SQLite database, so nothing
/// outlives the process.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// A fresh session preloaded with the demo issues.
    pub fn seeded(now: DateTime<Utc>) -> Result<Self> {
        let db = Self::open_in_memory()?;
        db.seed(now)?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- `seq` orders the list: highest first, so new submissions land on top
            CREATE TABLE IF NOT EXISTS issues (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                date TEXT NOT NULL,
                issue_type TEXT NOT NULL,
                location TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'New at Ward',
                current_level TEXT NOT NULL DEFAULT 'Ward',
                department TEXT NOT NULL,
                due_date TEXT NOT NULL,
                flag TEXT NOT NULL DEFAULT 'None',
                image TEXT NOT NULL,
                description TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_issues_department ON issues(department);
            "#,
        )?;
        Ok(())
    }

    /// Insert the demo issues so that they list in display order.
    pub fn seed(&self, now: DateTime<Utc>) -> Result<()> {
        for issue in areas::initial_issues(now).iter().rev() {
            self.insert_issue(issue)?;
        }
        Ok(())
    }

    /// Add an issue at the front of the list.
    pub fn insert_issue(&self, issue: &Issue) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO issues (id, lat, lng, date, issue_type, location, status, current_level, department, due_date, flag, image, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    issue.id,
                    issue.lat,
                    issue.lng,
                    issue.date,
                    issue.issue_type,
                    issue.location,
                    issue.status,
                    issue.current_level.as_str(),
                    issue.department.as_str(),
                    issue.due_date.to_rfc3339(),
                    issue.flag.as_str(),
                    issue.image,
                    issue.description,
                ],
            )
            .with_context(|| format!("Failed to insert issue {}", issue.id))?;
        Ok(())
    }

    pub fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM issues WHERE id = ?1", ISSUE_COLUMNS))?;

        match stmt.query_row([id], issue_from_row) {
            Ok(issue) => Ok(Some(issue)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to read issue {}", id))),
        }
    }

    pub fn list_issues(&self) -> Result<Vec<Issue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM issues ORDER BY seq DESC", ISSUE_COLUMNS))?;

        let issues = stmt
            .query_map([], issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    /// Overwrite every mutable field of the stored issue with the same id.
    pub fn replace_issue(&self, issue: &Issue) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE issues SET lat = ?1, lng = ?2, date = ?3, issue_type = ?4, location = ?5, status = ?6,
                current_level = ?7, due_date = ?8, flag = ?9, image = ?10, description = ?11
             WHERE id = ?12",
            params![
                issue.lat,
                issue.lng,
                issue.date,
                issue.issue_type,
                issue.location,
                issue.status,
                issue.current_level.as_str(),
                issue.due_date.to_rfc3339(),
                issue.flag.as_str(),
                issue.image,
                issue.description,
                issue.id,
            ],
        )?;
        Ok(rows > 0)
    }

    /// Citizen edit form: only type, location and description are editable.
    pub fn update_details(
        &self,
        id: &str,
        issue_type: Option<&str>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(t) = issue_type {
            updates.push(format!("issue_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(t.to_string()));
        }

        if let Some(l) = location {
            updates.push(format!("location = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(l.to_string()));
        }

        if let Some(d) = description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(d.to_string()));
        }

        if updates.is_empty() {
            return Ok(self.get_issue(id)?.is_some());
        }

        params_vec.push(Box::new(id.to_string()));
        let sql = format!(
            "UPDATE issues SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = self.conn.execute(&sql, params_refs.as_slice())?;
        Ok(rows > 0)
    }
}

fn issue_from_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        lat: row.get(1)?,
        lng: row.get(2)?,
        date: row.get(3)?,
        issue_type: row.get(4)?,
        location: row.get(5)?,
        status: row.get(6)?,
        current_level: parse_column(row, 7)?,
        department: parse_column(row, 8)?,
        due_date: parse_datetime(row, 9)?,
        flag: parse_column(row, 10)?,
        image: row.get(11)?,
        description: row.get(12)?,
    })
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })
}

fn parse_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

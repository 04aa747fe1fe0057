//! SQLite storage for Memory System.
//!
//! One connection guarded by a `Mutex`; every operation takes the lock for
//! its duration. The schema is applied on open and is idempotent.

pub use crate::types::*;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{debug, info, warn};

use crate::auth::{hash_password_with_cost, verify_password, Principal, Role, DEFAULT_COST};
use crate::error::{Error, Result};

const SCHEMA: &str = include_str!("schema.sql");

/// Database connection wrapper.
///
/// Thread-safe via internal Mutex. All database operations acquire the lock.
pub struct Database {
    conn: Mutex<Connection>,
    /// bcrypt cost for new password hashes
    hash_cost: u32,
    /// Hash verified against when the email is unknown
    dummy_hash: OnceLock<String>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (tests, throwaway servers)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            hash_cost: DEFAULT_COST,
            dummy_hash: OnceLock::new(),
        })
    }

    /// Use a different bcrypt cost for new password hashes
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Check database connectivity
    pub fn ping(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Row counts for the admin dashboard
    pub fn table_counts(&self) -> Result<TableCounts> {
        let conn = self.lock()?;
        let count = |table: &str| -> Result<u32> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        };

        Ok(TableCounts {
            users: count("users")?,
            locations: count("locations")?,
            events: count("events")?,
            participant_feedback: count("participant_feedback")?,
            organizer_feedback: count("organizer_feedback")?,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List all users ordered by name
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, role, created_at FROM users ORDER BY name COLLATE NOCASE",
        )?;
        let users = stmt
            .query_map([], Self::map_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Get user by ID
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, email, role, created_at FROM users WHERE id = ?1")?;
        Ok(stmt.query_row(params![user_id], Self::map_user).optional()?)
    }

    /// Get a user and stored password hash by email (case-insensitive)
    pub fn get_user_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, role, created_at, password_hash FROM users WHERE email = ?1",
        )?;
        Ok(stmt
            .query_row(params![email.trim()], |row| {
                Ok(UserCredentials {
                    user: Self::map_user(row)?,
                    password_hash: row.get(5)?,
                })
            })
            .optional()?)
    }

    fn map_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role: Option<String> = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: Role::normalize_opt(role.as_deref()),
            created_at: row.get(4)?,
        })
    }

    /// Create a user, hashing the password
    pub fn create_user(&self, input: &NewUser) -> Result<User> {
        let name = input.name.trim();
        let email = input.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(Error::validation("name and email are required"));
        }
        if input.password.is_empty() {
            return Err(Error::validation("password is required"));
        }

        let password_hash = hash_password_with_cost(&input.password, self.hash_cost)?;

        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            params![email],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: input.role,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        conn.execute(
            "INSERT INTO users (id, name, email, role, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.name,
                user.email,
                user.role.as_str(),
                password_hash,
                user.created_at,
            ],
        )?;

        info!("Created user {} with role {}", user.email, user.role);
        Ok(user)
    }

    /// Delete a user; returns whether a row was removed
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        Ok(deleted > 0)
    }

    /// Number of registered users
    pub fn count_users(&self) -> Result<u32> {
        let conn = self.lock()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    /// Verify email and password, returning the principal to log in.
    ///
    /// Unknown email, wrong password and unreadable stored hashes all yield
    /// [`Error::InvalidCredentials`]. An unknown email still costs one hash
    /// verification, so response time does not reveal registered addresses.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Principal> {
        let Some(credentials) = self.get_user_credentials(email)? else {
            debug!("Login attempt for unknown email");
            let _ = verify_password(password, self.dummy_hash()?);
            return Err(Error::InvalidCredentials);
        };

        match verify_password(password, &credentials.password_hash) {
            Ok(true) => Ok(credentials.user.to_principal()),
            Ok(false) => Err(Error::InvalidCredentials),
            Err(e) => {
                warn!("Stored credential for {} unusable: {}", credentials.user.email, e);
                Err(Error::InvalidCredentials)
            }
        }
    }

    fn dummy_hash(&self) -> Result<&str> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }
        let hash = hash_password_with_cost("memsys-unknown-account", self.hash_cost)?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Location Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List all locations ordered by name
    pub fn list_locations(&self) -> Result<Vec<Location>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, address, created_at FROM locations ORDER BY name COLLATE NOCASE",
        )?;
        let locations = stmt
            .query_map([], Self::map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    /// Get location by ID
    pub fn get_location(&self, location_id: &str) -> Result<Option<Location>> {
        let conn = self.lock()?;
        Self::fetch_location(&conn, location_id)
    }

    fn fetch_location(conn: &Connection, location_id: &str) -> Result<Option<Location>> {
        let mut stmt =
            conn.prepare("SELECT id, name, address, created_at FROM locations WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![location_id], Self::map_location)
            .optional()?)
    }

    fn map_location(row: &rusqlite::Row) -> rusqlite::Result<Location> {
        Ok(Location {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn validate_location(input: &NewLocation) -> Result<()> {
        if input.name.trim().is_empty() || input.address.trim().is_empty() {
            return Err(Error::validation("name and address are required"));
        }
        Ok(())
    }

    /// Create a location
    pub fn create_location(&self, input: &NewLocation) -> Result<Location> {
        Self::validate_location(input)?;
        let conn = self.lock()?;
        let location = Location {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        conn.execute(
            "INSERT INTO locations (id, name, address, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![location.id, location.name, location.address, location.created_at],
        )?;
        Ok(location)
    }

    /// Replace a location's name and address
    pub fn update_location(&self, location_id: &str, input: &NewLocation) -> Result<Location> {
        Self::validate_location(input)?;
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE locations SET name = ?1, address = ?2 WHERE id = ?3",
            params![input.name.trim(), input.address.trim(), location_id],
        )?;
        if updated == 0 {
            return Err(Error::not_found("Location", location_id));
        }
        Self::fetch_location(&conn, location_id)?
            .ok_or_else(|| Error::not_found("Location", location_id))
    }

    /// Delete a location; events referencing it keep their free-text location
    pub fn delete_location(&self, location_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM locations WHERE id = ?1", params![location_id])?;
        Ok(deleted > 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List all events, most recent first
    pub fn list_events(&self) -> Result<Vec<Event>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, start_date, end_date, location_id, location, created_at
             FROM events ORDER BY start_date DESC",
        )?;
        let events = stmt
            .query_map([], Self::map_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Event ids and titles, most recent first
    pub fn list_event_titles(&self) -> Result<Vec<EventTitle>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, title FROM events ORDER BY start_date DESC")?;
        let titles = stmt
            .query_map([], |row| {
                Ok(EventTitle {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    /// Events with their participant response counts, most recent first
    pub fn list_events_with_response_counts(&self) -> Result<Vec<(Event, u32)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT e.id, e.title, e.description, e.start_date, e.end_date, e.location_id,
                    e.location, e.created_at, COUNT(f.id)
             FROM events e
             LEFT JOIN participant_feedback f ON f.event_id = e.id
             GROUP BY e.id
             ORDER BY e.start_date DESC",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((Self::map_event(row)?, row.get(8)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Get event by ID
    pub fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        let conn = self.lock()?;
        Self::fetch_event(&conn, event_id)
    }

    fn fetch_event(conn: &Connection, event_id: &str) -> Result<Option<Event>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, start_date, end_date, location_id, location, created_at
             FROM events WHERE id = ?1",
        )?;
        Ok(stmt.query_row(params![event_id], Self::map_event).optional()?)
    }

    fn event_exists(conn: &Connection, event_id: &str) -> Result<bool> {
        Ok(conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)",
            params![event_id],
            |row| row.get(0),
        )?)
    }

    fn map_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
        Ok(Event {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            location_id: row.get(5)?,
            location: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn validate_event(conn: &Connection, input: &NewEvent) -> Result<()> {
        if input.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if input.start_date.trim().is_empty() {
            return Err(Error::validation("start_date is required"));
        }
        if let Some(location_id) = input.location_id.as_deref() {
            if Self::fetch_location(conn, location_id)?.is_none() {
                return Err(Error::validation(format!("unknown location: {location_id}")));
            }
        }
        Ok(())
    }

    /// Create an event; a missing end date defaults to the start date
    pub fn create_event(&self, input: &NewEvent) -> Result<Event> {
        let conn = self.lock()?;
        Self::validate_event(&conn, input)?;

        let start_date = input.start_date.trim().to_string();
        let event = Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            end_date: input
                .end_date
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .unwrap_or_else(|| start_date.clone()),
            start_date,
            location_id: input.location_id.clone(),
            location: input.location.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        conn.execute(
            "INSERT INTO events (id, title, description, start_date, end_date, location_id, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                event.id,
                event.title,
                event.description,
                event.start_date,
                event.end_date,
                event.location_id,
                event.location,
                event.created_at,
            ],
        )?;

        info!("Created event '{}' ({})", event.title, event.id);
        Ok(event)
    }

    /// Replace an event's editable fields
    pub fn update_event(&self, event_id: &str, input: &NewEvent) -> Result<Event> {
        let conn = self.lock()?;
        Self::validate_event(&conn, input)?;

        let start_date = input.start_date.trim();
        let end_date = input
            .end_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(start_date);

        let updated = conn.execute(
            "UPDATE events SET title = ?1, description = ?2, start_date = ?3, end_date = ?4,
                    location_id = ?5, location = ?6
             WHERE id = ?7",
            params![
                input.title.trim(),
                input.description,
                start_date,
                end_date,
                input.location_id,
                input.location,
                event_id,
            ],
        )?;
        if updated == 0 {
            return Err(Error::not_found("Event", event_id));
        }
        Self::fetch_event(&conn, event_id)?.ok_or_else(|| Error::not_found("Event", event_id))
    }

    /// Delete an event and its feedback
    pub fn delete_event(&self, event_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM events WHERE id = ?1", params![event_id])?;
        Ok(deleted > 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feedback Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a participant's ratings after range and event checks
    pub fn create_participant_feedback(
        &self,
        input: &NewParticipantFeedback,
    ) -> Result<ParticipantFeedback> {
        input.submission.validate().map_err(Error::Validation)?;

        let conn = self.lock()?;
        if !Self::event_exists(&conn, &input.submission.event_id)? {
            return Err(Error::validation(format!(
                "unknown event: {}",
                input.submission.event_id
            )));
        }

        let feedback = ParticipantFeedback {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            submission: input.submission.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        let s = &feedback.submission;
        conn.execute(
            "INSERT INTO participant_feedback
             (id, event_id, name, email, enjoyed_art, enjoyed_food, enjoyed_group,
              enjoyed_conversations, comments, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                feedback.id,
                s.event_id,
                feedback.name,
                feedback.email,
                s.art,
                s.food,
                s.group,
                s.conversations,
                s.comments,
                feedback.created_at,
            ],
        )?;

        debug!("Stored participant feedback for event {}", s.event_id);
        Ok(feedback)
    }

    /// All participant feedback for an event, oldest first
    pub fn list_participant_feedback(&self, event_id: &str) -> Result<Vec<ParticipantFeedback>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, event_id, name, email, enjoyed_art, enjoyed_food, enjoyed_group,
                    enjoyed_conversations, comments, created_at
             FROM participant_feedback WHERE event_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt
            .query_map(params![event_id], |row| {
                Ok(ParticipantFeedback {
                    id: row.get(0)?,
                    name: row.get(2)?,
                    email: row.get(3)?,
                    submission: crate::report::RatingSubmission {
                        event_id: row.get(1)?,
                        art: row.get(4)?,
                        food: row.get(5)?,
                        group: row.get(6)?,
                        conversations: row.get(7)?,
                        comments: row.get(8)?,
                    },
                    created_at: row.get(9)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Store an organizer's report; blank volunteer names are dropped
    pub fn create_organizer_feedback(
        &self,
        input: &NewOrganizerFeedback,
    ) -> Result<OrganizerFeedback> {
        if input.organizer_name.trim().is_empty() {
            return Err(Error::validation("organizer_name is required"));
        }
        if !input.total_expenses.is_finite() || input.total_expenses < 0.0 {
            return Err(Error::validation("total_expenses must be a non-negative amount"));
        }

        let conn = self.lock()?;
        if !Self::event_exists(&conn, &input.event_id)? {
            return Err(Error::validation(format!("unknown event: {}", input.event_id)));
        }

        let feedback = OrganizerFeedback {
            id: uuid::Uuid::new_v4().to_string(),
            event_id: input.event_id.clone(),
            organizer_name: input.organizer_name.trim().to_string(),
            total_expenses: input.total_expenses,
            volunteers: input
                .volunteers
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
            challenges: input.challenges.clone(),
            suggestions: input.suggestions.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        conn.execute(
            "INSERT INTO organizer_feedback
             (id, event_id, organizer_name, total_expenses, volunteers_json, challenges,
              suggestions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                feedback.id,
                feedback.event_id,
                feedback.organizer_name,
                feedback.total_expenses,
                serde_json::to_string(&feedback.volunteers)?,
                feedback.challenges,
                feedback.suggestions,
                feedback.created_at,
            ],
        )?;

        debug!("Stored organizer feedback for event {}", feedback.event_id);
        Ok(feedback)
    }

    /// All organizer feedback for an event, oldest first
    pub fn list_organizer_feedback(&self, event_id: &str) -> Result<Vec<OrganizerFeedback>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, event_id, organizer_name, total_expenses, volunteers_json, challenges,
                    suggestions, created_at
             FROM organizer_feedback WHERE event_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt
            .query_map(params![event_id], |row| {
                let volunteers_json: String = row.get(4)?;
                Ok((
                    OrganizerFeedback {
                        id: row.get(0)?,
                        event_id: row.get(1)?,
                        organizer_name: row.get(2)?,
                        total_expenses: row.get(3)?,
                        volunteers: Vec::new(),
                        challenges: row.get(5)?,
                        suggestions: row.get(6)?,
                        created_at: row.get(7)?,
                    },
                    volunteers_json,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let feedback = rows
            .into_iter()
            .map(|(mut fb, volunteers_json)| {
                fb.volunteers = serde_json::from_str(&volunteers_json).unwrap_or_else(|e| {
                    warn!("Unreadable volunteer list on {}: {}", fb.id, e);
                    Vec::new()
                });
                fb
            })
            .collect();
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MIN_COST;
    use crate::report::RatingSubmission;

    fn db() -> Database {
        Database::open_in_memory()
            .unwrap()
            .with_hash_cost(MIN_COST)
    }

    fn new_event(title: &str, start: &str) -> NewEvent {
        NewEvent {
            title: title.into(),
            description: "Monthly gathering".into(),
            start_date: start.into(),
            end_date: None,
            location_id: None,
            location: Some("Main hall".into()),
        }
    }

    fn ratings(event_id: &str, value: i32) -> NewParticipantFeedback {
        NewParticipantFeedback {
            name: "Guest".into(),
            email: "guest@example.org".into(),
            submission: RatingSubmission {
                event_id: event_id.into(),
                art: value,
                food: value,
                group: value,
                conversations: value,
                comments: "Lovely".into(),
            },
        }
    }

    #[test]
    fn test_ping_and_empty_counts() {
        let db = db();
        db.ping().unwrap();
        assert_eq!(db.table_counts().unwrap(), TableCounts::default());
    }

    #[test]
    fn test_create_user_and_authenticate() {
        let db = db();
        let user = db
            .create_user(&NewUser {
                name: "Ana".into(),
                email: "ana@example.org".into(),
                role: Role::Secretary,
                password: "s3cret".into(),
            })
            .unwrap();

        let principal = db.authenticate("ANA@example.org", "s3cret").unwrap();
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.role, Role::Secretary);

        assert!(matches!(
            db.authenticate("ana@example.org", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            db.authenticate("nobody@example.org", "s3cret"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let db = db();
        db.create_user(&NewUser {
            name: "Bo".into(),
            email: "bo@example.org".into(),
            role: Role::User,
            password: "plain".into(),
        })
        .unwrap();

        let creds = db.get_user_credentials("bo@example.org").unwrap().unwrap();
        assert_ne!(creds.password_hash, "plain");
        assert!(creds.password_hash.starts_with("$2b$04$"));
    }

    #[test]
    fn test_unknown_email_still_verifies_a_hash() {
        let db = db();
        assert!(db.dummy_hash.get().is_none());

        assert!(matches!(
            db.authenticate("nobody@example.org", "guess"),
            Err(Error::InvalidCredentials)
        ));

        let dummy = db.dummy_hash.get().expect("unknown email should hit the verifier");
        assert!(dummy.starts_with("$2b$04$"));
        assert!(!verify_password("guess", dummy).unwrap());
    }

    #[test]
    fn test_default_hash_cost() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.hash_cost, DEFAULT_COST);
    }

    #[test]
    fn test_plaintext_stored_password_cannot_log_in() {
        let db = db();
        {
            let conn = db.lock().unwrap();
            conn.execute(
                "INSERT INTO users (id, name, email, role, password_hash, created_at)
                 VALUES ('u-1', 'Legacy', 'legacy@example.org', 'Admin', 'pw', 0)",
                [],
            )
            .unwrap();
        }
        assert!(matches!(
            db.authenticate("legacy@example.org", "pw"),
            Err(Error::InvalidCredentials)
        ));
        // Stored mixed-case role is normalized on read
        assert_eq!(db.get_user("u-1").unwrap().unwrap().role, Role::Admin);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = db();
        let input = NewUser {
            name: "Cy".into(),
            email: "cy@example.org".into(),
            role: Role::User,
            password: "pw".into(),
        };
        db.create_user(&input).unwrap();
        assert!(matches!(db.create_user(&input), Err(Error::DuplicateEmail(_))));
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn test_delete_user() {
        let db = db();
        let user = db
            .create_user(&NewUser {
                name: "Di".into(),
                email: "di@example.org".into(),
                role: Role::User,
                password: "pw".into(),
            })
            .unwrap();
        assert!(db.delete_user(&user.id).unwrap());
        assert!(!db.delete_user(&user.id).unwrap());
        assert!(db.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_location_crud() {
        let db = db();
        assert!(matches!(
            db.create_location(&NewLocation {
                name: "".into(),
                address: "x".into()
            }),
            Err(Error::Validation(_))
        ));

        let loc = db
            .create_location(&NewLocation {
                name: "Library".into(),
                address: "1 Main St".into(),
            })
            .unwrap();
        let updated = db
            .update_location(
                &loc.id,
                &NewLocation {
                    name: "Old Library".into(),
                    address: "1 Main St".into(),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Old Library");

        assert!(matches!(
            db.update_location(
                "missing",
                &NewLocation {
                    name: "x".into(),
                    address: "y".into()
                }
            ),
            Err(Error::NotFound { .. })
        ));
        assert!(db.delete_location(&loc.id).unwrap());
        assert!(db.get_location(&loc.id).unwrap().is_none());
    }

    #[test]
    fn test_event_crud_and_ordering() {
        let db = db();
        let older = db.create_event(&new_event("Spring fair", "2024-03-01T10:00")).unwrap();
        let newer = db.create_event(&new_event("Summer fair", "2024-06-01T10:00")).unwrap();
        assert_eq!(older.end_date, older.start_date);

        let events = db.list_events().unwrap();
        assert_eq!(events[0].id, newer.id);
        assert_eq!(events[1].id, older.id);

        let mut edit = new_event("Spring fair (moved)", "2024-03-02T10:00");
        edit.end_date = Some("2024-03-03T18:00".into());
        let updated = db.update_event(&older.id, &edit).unwrap();
        assert_eq!(updated.title, "Spring fair (moved)");
        assert_eq!(updated.end_date, "2024-03-03T18:00");

        assert!(db.delete_event(&older.id).unwrap());
        assert_eq!(db.list_event_titles().unwrap().len(), 1);
    }

    #[test]
    fn test_event_with_unknown_location_rejected() {
        let db = db();
        let mut input = new_event("Talk", "2024-01-01");
        input.location_id = Some("nope".into());
        assert!(matches!(db.create_event(&input), Err(Error::Validation(_))));
        assert!(matches!(db.create_event(&new_event(" ", "2024-01-01")), Err(Error::Validation(_))));
    }

    #[test]
    fn test_participant_feedback_roundtrip_and_counts() {
        let db = db();
        let event = db.create_event(&new_event("Concert", "2024-05-01")).unwrap();
        db.create_participant_feedback(&ratings(&event.id, 5)).unwrap();
        db.create_participant_feedback(&ratings(&event.id, 1)).unwrap();

        let feedback = db.list_participant_feedback(&event.id).unwrap();
        assert_eq!(feedback.len(), 2);
        assert_eq!(feedback[0].submission.comments, "Lovely");

        let counts = db.list_events_with_response_counts().unwrap();
        assert_eq!(counts[0].1, 2);

        let report = crate::report::aggregate(feedback.iter().map(|f| &f.submission)).unwrap();
        assert_eq!(report.overall_average, 3.0);
    }

    #[test]
    fn test_participant_feedback_validation() {
        let db = db();
        let event = db.create_event(&new_event("Concert", "2024-05-01")).unwrap();
        assert!(matches!(
            db.create_participant_feedback(&ratings(&event.id, 0)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.create_participant_feedback(&ratings("missing", 3)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_organizer_feedback_drops_blank_volunteers() {
        let db = db();
        let event = db.create_event(&new_event("Workshop", "2024-07-01")).unwrap();
        let stored = db
            .create_organizer_feedback(&NewOrganizerFeedback {
                event_id: event.id.clone(),
                organizer_name: "Eva".into(),
                total_expenses: 120.5,
                volunteers: vec!["Fay".into(), "  ".into(), "Gus".into()],
                challenges: "Rain".into(),
                suggestions: "Tent".into(),
            })
            .unwrap();
        assert_eq!(stored.volunteers, vec!["Fay", "Gus"]);

        let listed = db.list_organizer_feedback(&event.id).unwrap();
        assert_eq!(listed, vec![stored]);
    }

    #[test]
    fn test_organizer_feedback_rejects_negative_expenses() {
        let db = db();
        let event = db.create_event(&new_event("Workshop", "2024-07-01")).unwrap();
        let result = db.create_organizer_feedback(&NewOrganizerFeedback {
            event_id: event.id,
            organizer_name: "Eva".into(),
            total_expenses: -1.0,
            volunteers: vec![],
            challenges: String::new(),
            suggestions: String::new(),
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_deleting_event_cascades_feedback() {
        let db = db();
        let event = db.create_event(&new_event("Concert", "2024-05-01")).unwrap();
        db.create_participant_feedback(&ratings(&event.id, 4)).unwrap();
        db.delete_event(&event.id).unwrap();
        assert_eq!(db.table_counts().unwrap().participant_feedback, 0);
    }

    #[test]
    fn test_open_path_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("memsys.db");
        {
            let db = Database::open_path(&path).unwrap();
            db.create_location(&NewLocation {
                name: "Hall".into(),
                address: "2 Side St".into(),
            })
            .unwrap();
        }
        let db = Database::open_path(&path).unwrap();
        assert_eq!(db.list_locations().unwrap().len(), 1);
    }
}

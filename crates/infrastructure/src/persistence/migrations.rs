//! Database migrations
//!
//! Manages schema versioning. Migrations are embedded and applied in order;
//! each one is idempotent so a partially applied database can be re-run.
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vX` function
//! 3. Call it from `run_migrations`

use domain::RecommendationTable;
use rusqlite::{Connection, params};
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Locations seeded on first start: name, latitude, longitude
const SEED_LOCATIONS: [(&str, f64, f64); 5] = [
    ("Whitefield", 12.9698, 77.7500),
    ("Electronic City", 12.8452, 77.6602),
    ("Koramangala", 12.9352, 77.6245),
    ("MG Road", 12.9756, 77.6066),
    ("Jayanagar", 12.9250, 77.5938),
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (initial schema) failed");
                return Err(e);
            }
        }

        if current_version < 2 {
            if let Err(e) = migrate_v2(conn) {
                error!(version = 2, error = %e, "Migration V002 (seed data) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations completed");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version, creating the version table if needed
pub fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Version 1: locations, readings and recommendations
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: initial schema");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS air_quality_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            aqi REAL NOT NULL,
            pm25 REAL,
            pm10 REAL,
            o3 REAL,
            no2 REAL,
            so2 REAL,
            co REAL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_air_quality_location_time
            ON air_quality_data(location_id, timestamp DESC);

        CREATE TABLE IF NOT EXISTS health_recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            aqi_min INTEGER NOT NULL,
            aqi_max INTEGER,
            message TEXT NOT NULL,
            activity_guidance TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}

/// Version 2: seed locations and the standard recommendation table
///
/// Recommendations are only seeded into an empty table so operator edits
/// survive.
fn migrate_v2(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V002: seed data");

    let tx = conn.unchecked_transaction()?;

    {
        let mut insert_location = tx.prepare(
            "INSERT OR IGNORE INTO locations (name, latitude, longitude) VALUES (?1, ?2, ?3)",
        )?;
        for (name, latitude, longitude) in SEED_LOCATIONS {
            insert_location.execute(params![name, latitude, longitude])?;
        }

        let existing: i64 =
            tx.query_row("SELECT COUNT(*) FROM health_recommendations", [], |row| {
                row.get(0)
            })?;

        if existing == 0 {
            let mut insert_recommendation = tx.prepare(
                "INSERT INTO health_recommendations (aqi_min, aqi_max, message, activity_guidance)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in RecommendationTable::standard().records() {
                insert_recommendation.execute(params![
                    record.aqi_min,
                    record.aqi_max,
                    record.message,
                    record.activity_guidance,
                ])?;
            }
        }
    }

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn run_migrations_creates_tables() {
        let conn = create_test_connection();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert!(tables.contains(&"locations".to_string()));
        assert!(tables.contains(&"air_quality_data".to_string()));
        assert!(tables.contains(&"health_recommendations".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = create_test_connection();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert_eq!(count(&conn, "locations"), 5);
        assert_eq!(
            count(&conn, "health_recommendations"),
            i64::try_from(RecommendationTable::standard().len()).unwrap()
        );
    }

    #[test]
    fn seeds_bengaluru_locations() {
        let conn = create_test_connection();
        run_migrations(&conn).unwrap();

        let names: Vec<String> = conn
            .prepare("SELECT name FROM locations ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(
            names,
            vec![
                "Whitefield",
                "Electronic City",
                "Koramangala",
                "MG Road",
                "Jayanagar"
            ]
        );
    }

    #[test]
    fn existing_recommendations_are_kept() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        migrate_v1(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        conn.execute(
            "INSERT INTO health_recommendations (aqi_min, aqi_max, message, activity_guidance)
             VALUES (0, NULL, 'Custom', 'Custom guidance')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        assert_eq!(count(&conn, "health_recommendations"), 1);
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn fresh_database_reports_version_zero() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }
}

//! SQL DDL and seed data for the device table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `name` UNIQUE, the identifier used by the HTTP API
/// - `checked_out_date` stored as RFC3339 text
/// - a CHECK tying `status` to the presence of `borrower` and `checked_out_date`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    borrower TEXT NULL,
    checked_out_date TEXT NULL,
    status TEXT NOT NULL DEFAULT 'available',
    CHECK (
        (status = 'available' AND borrower IS NULL AND checked_out_date IS NULL)
        OR (status = 'checked_out' AND borrower IS NOT NULL AND checked_out_date IS NOT NULL)
    )
);
"#;

/// Devices inserted the first time the table is found empty.
pub const SEED_DEVICES: [&str; 7] = [
    "iPhone 15",
    "iPhone 14",
    "Pixel 8",
    "Samsung Galaxy S24",
    "iPad Air",
    "Galaxy Tab S9",
    "Pixel Tablet",
];

//! SQLite schema definition.

/// Complete database schema for the local DocBook store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    role TEXT NOT NULL CHECK (role IN ('doctor', 'patient')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    specialty TEXT NOT NULL,
    timings TEXT NOT NULL,                       -- e.g. "10:00AM-4:00PM"
    consultation_fee REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_doctors_specialty ON doctors(specialty);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    doctor_id TEXT NOT NULL REFERENCES doctors(id),
    patient_id TEXT NOT NULL,
    date TEXT NOT NULL,                          -- YYYY-MM-DD
    slot_minute INTEGER NOT NULL,                -- minutes since midnight
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'completed', 'cancelled')),
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- One live appointment per doctor/date/slot; cancelled rows stay for audit
CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_live_slot
    ON appointments(doctor_id, date, slot_minute)
    WHERE status != 'cancelled';

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id, date);
CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id, date);

-- ============================================================================
-- Medication Reminders
-- ============================================================================

CREATE TABLE IF NOT EXISTS medication_reminders (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    medicine TEXT NOT NULL,
    times TEXT NOT NULL DEFAULT '[]',            -- JSON array of "HH:MM:SS"
    start_date TEXT NOT NULL,
    end_date TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reminders_patient ON medication_reminders(patient_id, active);
"#;

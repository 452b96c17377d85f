use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::errors::ApiError;
use crate::models::{
    Booking, Conference, ConferenceChanges, ConferenceInput, ConferenceUpdate, Employee,
    EmployeeChanges, EmployeeInput, EmployeeUpdate, NewConference, NewEmployee,
};

// Booking rows cascade away with either parent. The conference_bookings audit
// table is retained from earlier deployments; nothing reads or writes it.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS conferences (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    date DATE NOT NULL,
    location VARCHAR(255) NOT NULL,
    description TEXT,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE,
    department VARCHAR(100) NOT NULL,
    position VARCHAR(100) NOT NULL,
    phone VARCHAR(20),
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS employee_conference (
    employee_id INTEGER NOT NULL REFERENCES employees (id) ON DELETE CASCADE,
    conference_id INTEGER NOT NULL REFERENCES conferences (id) ON DELETE CASCADE,
    PRIMARY KEY (employee_id, conference_id)
);

CREATE TABLE IF NOT EXISTS conference_bookings (
    id SERIAL PRIMARY KEY,
    conference_id INTEGER NOT NULL,
    employee_id INTEGER NOT NULL,
    booking_date TIMESTAMP NOT NULL
);
";

/// Idempotent DDL run at boot, before the server accepts requests.
pub fn ensure_schema(conn: &mut PgConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA_SQL)
}

pub fn list_conferences(conn: &mut PgConnection) -> Result<Vec<Conference>, ApiError> {
    use crate::schema::conferences::dsl::{conferences, id};

    let rows = conferences
        .order(id.asc())
        .select(Conference::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn create_conference(
    conn: &mut PgConnection,
    input: ConferenceInput,
) -> Result<Conference, ApiError> {
    use crate::schema::conferences::dsl::conferences;

    let now = Utc::now().naive_utc();
    let new_conference = NewConference {
        name: input.name,
        date: input.date,
        location: input.location,
        description: input.description,
        created_at: now,
        updated_at: now,
    };

    let created = diesel::insert_into(conferences)
        .values(&new_conference)
        .get_result::<Conference>(conn)?;
    Ok(created)
}

pub fn find_conference(
    conn: &mut PgConnection,
    conference_id: i32,
) -> Result<Option<Conference>, ApiError> {
    use crate::schema::conferences::dsl::conferences;

    let conference = conferences
        .find(conference_id)
        .select(Conference::as_select())
        .first(conn)
        .optional()?;
    Ok(conference)
}

pub fn update_conference(
    conn: &mut PgConnection,
    conference_id: i32,
    update: ConferenceUpdate,
) -> Result<Conference, ApiError> {
    use crate::schema::conferences::dsl::conferences;

    let changes = ConferenceChanges {
        name: update.name,
        date: update.date,
        location: update.location,
        description: update.description,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::update(conferences.find(conference_id))
        .set(&changes)
        .get_result::<Conference>(conn)
        .optional()?
        .ok_or(ApiError::not_found("Conference"))
}

pub fn delete_conference(conn: &mut PgConnection, conference_id: i32) -> Result<(), ApiError> {
    use crate::schema::conferences::dsl::conferences;

    let deleted = diesel::delete(conferences.find(conference_id)).execute(conn)?;
    if deleted == 0 {
        return Err(ApiError::not_found("Conference"));
    }
    Ok(())
}

pub fn list_employees(conn: &mut PgConnection) -> Result<Vec<Employee>, ApiError> {
    use crate::schema::employees::dsl::{employees, id};

    let rows = employees
        .order(id.asc())
        .select(Employee::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn create_employee(
    conn: &mut PgConnection,
    input: EmployeeInput,
) -> Result<Employee, ApiError> {
    use crate::schema::employees::dsl::employees;

    let now = Utc::now().naive_utc();
    let new_employee = NewEmployee {
        name: input.name,
        email: input.email,
        department: input.department,
        position: input.position,
        phone: input.phone,
        created_at: now,
        updated_at: now,
    };

    diesel::insert_into(employees)
        .values(&new_employee)
        .get_result::<Employee>(conn)
        .map_err(email_conflict)
}

pub fn find_employee(
    conn: &mut PgConnection,
    employee_id: i32,
) -> Result<Option<Employee>, ApiError> {
    use crate::schema::employees::dsl::employees;

    let employee = employees
        .find(employee_id)
        .select(Employee::as_select())
        .first(conn)
        .optional()?;
    Ok(employee)
}

pub fn update_employee(
    conn: &mut PgConnection,
    employee_id: i32,
    update: EmployeeUpdate,
) -> Result<Employee, ApiError> {
    use crate::schema::employees::dsl::employees;

    let changes = EmployeeChanges {
        name: update.name,
        email: update.email,
        department: update.department,
        position: update.position,
        phone: update.phone,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::update(employees.find(employee_id))
        .set(&changes)
        .get_result::<Employee>(conn)
        .optional()
        .map_err(email_conflict)?
        .ok_or(ApiError::not_found("Employee"))
}

pub fn delete_employee(conn: &mut PgConnection, employee_id: i32) -> Result<(), ApiError> {
    use crate::schema::employees::dsl::employees;

    let deleted = diesel::delete(employees.find(employee_id)).execute(conn)?;
    if deleted == 0 {
        return Err(ApiError::not_found("Employee"));
    }
    Ok(())
}

/// The conference is checked before the employee; error reporting depends on
/// this order. A concurrent insert of the same pair loses against the
/// composite primary key and surfaces as the same conflict as the pre-check.
pub fn create_booking(
    conn: &mut PgConnection,
    conference_id: i32,
    employee_id: i32,
) -> Result<Booking, ApiError> {
    conn.transaction(|conn| {
        if find_conference(conn, conference_id)?.is_none() {
            return Err(ApiError::not_found("Conference"));
        }
        if find_employee(conn, employee_id)?.is_none() {
            return Err(ApiError::not_found("Employee"));
        }

        use crate::schema::employee_conference::dsl::employee_conference;

        let existing = employee_conference
            .find((employee_id, conference_id))
            .select(Booking::as_select())
            .first(conn)
            .optional()?;
        if existing.is_some() {
            return Err(duplicate_booking());
        }

        let booking = Booking {
            employee_id,
            conference_id,
        };
        diesel::insert_into(employee_conference)
            .values(&booking)
            .execute(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    duplicate_booking()
                }
                other => ApiError::from(other),
            })?;
        Ok(booking)
    })
}

pub fn cancel_booking(
    conn: &mut PgConnection,
    conference_id: i32,
    employee_id: i32,
) -> Result<(), ApiError> {
    use crate::schema::employee_conference::dsl::employee_conference;

    let deleted =
        diesel::delete(employee_conference.find((employee_id, conference_id))).execute(conn)?;
    if deleted == 0 {
        return Err(ApiError::not_found("Booking"));
    }
    Ok(())
}

pub fn list_bookings(conn: &mut PgConnection) -> Result<Vec<Booking>, ApiError> {
    use crate::schema::employee_conference;

    let rows = employee_conference::table
        .order(employee_conference::conference_id.asc())
        .select(Booking::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn conferences_for_employee(
    conn: &mut PgConnection,
    employee_id: i32,
) -> Result<Vec<Conference>, ApiError> {
    use crate::schema::{conferences, employee_conference};

    if find_employee(conn, employee_id)?.is_none() {
        return Err(ApiError::not_found("Employee"));
    }

    let rows = employee_conference::table
        .inner_join(conferences::table)
        .filter(employee_conference::employee_id.eq(employee_id))
        .select(Conference::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn attendees_for_conference(
    conn: &mut PgConnection,
    conference_id: i32,
) -> Result<Vec<Employee>, ApiError> {
    use crate::schema::{employee_conference, employees};

    if find_conference(conn, conference_id)?.is_none() {
        return Err(ApiError::not_found("Conference"));
    }

    let rows = employee_conference::table
        .inner_join(employees::table)
        .filter(employee_conference::conference_id.eq(conference_id))
        .select(Employee::as_select())
        .load(conn)?;
    Ok(rows)
}

fn duplicate_booking() -> ApiError {
    ApiError::conflict("employee is already booked into this conference")
}

fn email_conflict(e: DieselError) -> ApiError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::conflict("an employee with this email already exists")
        }
        other => ApiError::from(other),
    }
}

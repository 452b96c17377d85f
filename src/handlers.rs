use actix_web::{delete, error, get, post, put, web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use crate::actions;
use crate::errors::ApiError;
use crate::models::{BookParams, ConferenceInput, ConferenceUpdate, EmployeeInput, EmployeeUpdate};
use crate::DbPool;

#[derive(Debug, Serialize)]
struct Res {
    message: String,
}

#[get("/conferences")]
async fn list_conferences(pool: web::Data<DbPool>) -> Result<impl Responder, ApiError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        actions::list_conferences(&mut conn)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows))
}

#[post("/conferences")]
async fn add_conference(
    pool: web::Data<DbPool>,
    form: web::Json<ConferenceInput>,
) -> Result<impl Responder, ApiError> {
    let form = form.into_inner();
    form.validate()?;

    let conference = web::block(move || {
        let mut conn = pool.get()?;
        actions::create_conference(&mut conn, form)
    })
    .await??;

    Ok(HttpResponse::Created().json(conference))
}

#[get("/conferences/{id}")]
async fn get_conference(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let conference_id = path.into_inner();

    let conference = web::block(move || {
        let mut conn = pool.get()?;
        actions::find_conference(&mut conn, conference_id)
    })
    .await??
    .ok_or(ApiError::not_found("Conference"))?;

    Ok(HttpResponse::Ok().json(conference))
}

#[put("/conferences/{id}")]
async fn update_conference(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<ConferenceUpdate>,
) -> Result<impl Responder, ApiError> {
    let conference_id = path.into_inner();
    let form = form.into_inner();
    form.validate()?;

    let conference = web::block(move || {
        let mut conn = pool.get()?;
        actions::update_conference(&mut conn, conference_id, form)
    })
    .await??;

    Ok(HttpResponse::Ok().json(conference))
}

#[delete("/conferences/{id}")]
async fn delete_conference(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let conference_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        actions::delete_conference(&mut conn, conference_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(Res {
        message: format!("Conference with id {} deleted successfully", conference_id),
    }))
}

#[get("/employees")]
async fn list_employees(pool: web::Data<DbPool>) -> Result<impl Responder, ApiError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        actions::list_employees(&mut conn)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows))
}

#[post("/employees")]
async fn add_employee(
    pool: web::Data<DbPool>,
    form: web::Json<EmployeeInput>,
) -> Result<impl Responder, ApiError> {
    let form = form.into_inner();
    form.validate()?;

    let employee = web::block(move || {
        let mut conn = pool.get()?;
        actions::create_employee(&mut conn, form)
    })
    .await??;

    Ok(HttpResponse::Created().json(employee))
}

#[get("/employees/{id}")]
async fn get_employee(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    let employee = web::block(move || {
        let mut conn = pool.get()?;
        actions::find_employee(&mut conn, employee_id)
    })
    .await??
    .ok_or(ApiError::not_found("Employee"))?;

    Ok(HttpResponse::Ok().json(employee))
}

#[put("/employees/{id}")]
async fn update_employee(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<EmployeeUpdate>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();
    let form = form.into_inner();
    form.validate()?;

    let employee = web::block(move || {
        let mut conn = pool.get()?;
        actions::update_employee(&mut conn, employee_id, form)
    })
    .await??;

    Ok(HttpResponse::Ok().json(employee))
}

#[delete("/employees/{id}")]
async fn delete_employee(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        actions::delete_employee(&mut conn, employee_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(Res {
        message: format!("Employee with id {} deleted successfully", employee_id),
    }))
}

#[post("/conferences/{id}/book")]
async fn book_conference(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    params: web::Query<BookParams>,
) -> Result<impl Responder, ApiError> {
    let conference_id = path.into_inner();
    let employee_id = params.employee_id;

    let booking = web::block(move || {
        let mut conn = pool.get()?;
        actions::create_booking(&mut conn, conference_id, employee_id)
    })
    .await??;

    Ok(HttpResponse::Created().json(booking))
}

#[get("/conferences/bookings")]
async fn list_bookings(pool: web::Data<DbPool>) -> Result<impl Responder, ApiError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        actions::list_bookings(&mut conn)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows))
}

#[get("/employees/{id}/conferences")]
async fn get_employee_conferences(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        actions::conferences_for_employee(&mut conn, employee_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows))
}

#[get("/conferences/{id}/attendees")]
async fn get_conference_attendees(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let conference_id = path.into_inner();

    let rows = web::block(move || {
        let mut conn = pool.get()?;
        actions::attendees_for_conference(&mut conn, conference_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows))
}

#[delete("/conferences/{id}/bookings/{employee_id}")]
async fn cancel_booking(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, ApiError> {
    let (conference_id, employee_id) = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        actions::cancel_booking(&mut conn, conference_id, employee_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(Res {
        message: "Booking cancelled successfully".to_string(),
    }))
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    let response = match &err {
        error::JsonPayloadError::ContentType => {
            HttpResponse::UnsupportedMediaType().body("Unsupported Media Type")
        }
        error::JsonPayloadError::Deserialize(e) => {
            HttpResponse::UnprocessableEntity().json(Res {
                message: e.to_string(),
            })
        }
        _ => HttpResponse::BadRequest().json(Res { message: detail }),
    };
    error::InternalError::from_response(err, response).into()
}

/// Register every route and the JSON error mapping on an `App` or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // `/conferences/bookings` must be registered before `/conferences/{id}`;
        // actix matches routes in registration order.
        .service(list_bookings)
        .service(list_conferences)
        .service(add_conference)
        .service(get_conference)
        .service(update_conference)
        .service(delete_conference)
        .service(list_employees)
        .service(add_employee)
        .service(get_employee)
        .service(update_employee)
        .service(delete_employee)
        .service(book_conference)
        .service(get_employee_conferences)
        .service(get_conference_attendees)
        .service(cancel_booking);
}

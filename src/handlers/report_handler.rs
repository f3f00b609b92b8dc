use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::ReportCardQuery};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn workbook_response(filename: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes)
}

#[get("/api/reports/students/{student_id}")]
async fn individual_report(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let bytes = state.report_service.individual_report(&student_id).await?;
    Ok(workbook_response(
        &format!("{}_report.xlsx", student_id),
        bytes,
    ))
}

#[get("/api/reports/quizzes/{quiz_id}")]
async fn group_report(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let bytes = state.report_service.group_report(&quiz_id).await?;
    Ok(workbook_response(
        &format!("{}_submissions.xlsx", quiz_id),
        bytes,
    ))
}

#[get("/api/reports/report-card")]
async fn report_card(
    state: web::Data<AppState>,
    query: web::Query<ReportCardQuery>,
) -> Result<HttpResponse, AppError> {
    let student_ids = query.parsed_ids();
    let bytes = state.report_service.report_card(&student_ids).await?;
    Ok(workbook_response("report_card.xlsx", bytes))
}

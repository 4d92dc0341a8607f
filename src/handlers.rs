use crate::errors::AppError;
use crate::export::{export_file_name, write_xlsx, XLSX_CONTENT_TYPE};
use crate::form::{parse_query, RangeError};
use crate::gate::{AccessGate, GateState};
use crate::models::{LoginForm, QueryParams};
use crate::session::{session_cookie, session_id};
use crate::state::AppState;
use crate::ui::{render_dashboard, render_login, FormValues, Notice};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let session = state.sessions.get(session_id(&headers)).await;
    if !session.is_authenticated() {
        return Html(render_login(session.password_incorrect()));
    }

    Html(render_dashboard(&FormValues::defaults(today()), None, None))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let gate = AccessGate::new(&state.config.login_password);
    let (id, outcome) = state
        .sessions
        .update(session_id(&headers), |session| gate.submit(session, form.password))
        .await;

    match (outcome, id) {
        (GateState::Authenticated, Some(id)) => {
            info!("login successful");
            ([(header::SET_COOKIE, session_cookie(id))], Redirect::to("/")).into_response()
        }
        _ => {
            warn!("login rejected: incorrect password");
            (StatusCode::UNAUTHORIZED, Html(render_login(true))).into_response()
        }
    }
}

pub async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Response {
    if !is_authenticated(&state, &headers).await {
        return Redirect::to("/").into_response();
    }

    let form = FormValues::from_params(&params, today());
    let range = match parse_query(&params) {
        Ok(range) => range,
        Err(err) => return invalid_input(&form, err),
    };

    match state.client.fetch(&range).await {
        Ok(table) => {
            let notice = Notice::query_summary(&range);
            Html(render_dashboard(&form, Some(&notice), Some((&range, &table)))).into_response()
        }
        Err(err) => {
            let error = AppError::from(err);
            let notice = Notice::Error(error.message);
            let page = render_dashboard(&form, Some(&notice), None);
            (error.status, Html(page)).into_response()
        }
    }
}

pub async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Response, AppError> {
    if !is_authenticated(&state, &headers).await {
        return Ok(Redirect::to("/").into_response());
    }

    let range = match parse_query(&params) {
        Ok(range) => range,
        Err(err) => return Ok(invalid_input(&FormValues::from_params(&params, today()), err)),
    };
    let table = state.client.fetch(&range).await?;
    let file_name = export_file_name(&range);
    let workbook = write_xlsx(&table).map_err(|err| {
        error!(
            category = range.category.as_str(),
            rows = table.len(),
            file_name = %file_name,
            error = %err,
            "failed to build export"
        );
        AppError::from(err)
    })?;

    info!(
        category = range.category.as_str(),
        rows = table.len(),
        bytes = workbook.len(),
        file_name = %file_name,
        "exported applications"
    );

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, workbook).into_response())
}

pub async fn healthz() -> &'static str {
    "ok"
}

async fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    state
        .sessions
        .get(session_id(headers))
        .await
        .is_authenticated()
}

fn invalid_input(form: &FormValues, err: RangeError) -> Response {
    let error = AppError::from(err);
    let notice = Notice::Error(error.message);
    let page = render_dashboard(form, Some(&notice), None);
    (error.status, Html(page)).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

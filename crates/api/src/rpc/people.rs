//! `people.PeopleService`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use peoplebridge_domain::Person;
use serde::Serialize;

use super::{GetByIdRequest, ListRequest};
use crate::context::AppContext;

pub const GET_PEOPLE_PATH: &str = "/people.PeopleService/GetPeople";
pub const LIST_PEOPLE_PATH: &str = "/people.PeopleService/ListPeople";

#[derive(Debug, Serialize)]
pub struct ListPeopleResponse {
    pub people: Vec<Person>,
}

/// `GetPeople`: one person by id
pub async fn get_people(
    State(context): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Result<Json<GetByIdRequest>, JsonRejection>,
) -> Response {
    super::get_by_id(&context.people, &headers, body).await
}

/// `ListPeople`: every person known to the active upstream
pub async fn list_people(
    State(context): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Result<Json<ListRequest>, JsonRejection>,
) -> Response {
    super::list_all(&context.people, &headers, body, |people| ListPeopleResponse { people }).await
}

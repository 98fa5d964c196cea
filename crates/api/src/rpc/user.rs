//! `user.UserService`
//!
//! Same lookups as `people.PeopleService`, served by a separately
//! labelled lookup service so logs and spans tell the two apart.

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

pub const GET_USER_PATH: &str = "/user.UserService/GetUser";
pub const LIST_USERS_PATH: &str = "/user.UserService/ListUsers";

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<Person>,
}

pub async fn get_user(
    State(context): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Result<Json<GetByIdRequest>, JsonRejection>,
) -> Response {
    super::get_by_id(&context.users, &headers, body).await
}

pub async fn list_users(
    State(context): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Result<Json<ListRequest>, JsonRejection>,
) -> Response {
    super::list_all(&context.users, &headers, body, |users| ListUsersResponse { users }).await
}

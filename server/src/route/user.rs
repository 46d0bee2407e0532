use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{CreateUserRequest, GetUserRequest, UserTransformer};
use crate::response::UserPresenter;
use application::service::{CreateUserService, GetUserService};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl<D> UserRouter for Router<AppModule<D>>
where
    D: GetUserService + CreateUserService,
{
    fn route_user(self) -> Self {
        self.route(
            "/users",
            post(
                |State(handler): State<AppModule<D>>,
                 req: Result<Json<CreateUserRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(req)
                        .handle(|dto| handler.create_user(dto))
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(GetUserRequest::new(id))
                        .handle(|dto| handler.get_user(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    ApproveBookingRequest, BookingTransformer, CancelBookingRequest, CompleteBookingRequest,
    CreateBookingRequest, DeleteBookingRequest, FindBookingsRequest, GetBookingRequest,
    GetBookingTimerRequest, RateBookingRequest, UpdateBookingRequest, UserBookingsRequest,
};
use crate::response::BookingPresenter;
use application::service::{
    ApproveBookingService, CancelBookingService, CompleteBookingService, CreateBookingService,
    DeleteBookingService, GetBookingService, GetBookingTimerService, RateBookingService,
    UpdateBookingService,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait BookingRouter {
    fn route_booking(self) -> Self;
}

impl<D> BookingRouter for Router<AppModule<D>>
where
    D: GetBookingService
        + GetBookingTimerService
        + CreateBookingService
        + ApproveBookingService
        + CompleteBookingService
        + CancelBookingService
        + UpdateBookingService
        + DeleteBookingService
        + RateBookingService,
{
    fn route_booking(self) -> Self {
        self.route(
            "/bookings",
            get(
                |State(handler): State<AppModule<D>>,
                 req: Result<Query<FindBookingsRequest>, QueryRejection>| async move {
                    let Query(req) = req?;
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(req)
                        .handle(|dto| handler.find_bookings(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(handler): State<AppModule<D>>,
                 req: Result<Json<CreateBookingRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(req)
                        .handle(|dto| handler.create_booking(dto))
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(GetBookingRequest::new(id))
                        .handle(|dto| handler.get_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(handler): State<AppModule<D>>,
                 Path(id): Path<Uuid>,
                 req: Result<Json<UpdateBookingRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake((id, req))
                        .handle(|dto| handler.update_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(DeleteBookingRequest::new(id))
                        .handle(|dto| handler.delete_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id/approve",
            post(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(ApproveBookingRequest::new(id))
                        .handle(|dto| handler.approve_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id/complete",
            post(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(CompleteBookingRequest::new(id))
                        .handle(|dto| handler.complete_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id/cancel",
            post(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(CancelBookingRequest::new(id))
                        .handle(|dto| handler.cancel_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id/status",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(GetBookingTimerRequest::new(id))
                        .handle(|dto| handler.get_booking_timer(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/:id/rating",
            post(
                |State(handler): State<AppModule<D>>,
                 Path(id): Path<Uuid>,
                 req: Result<Json<RateBookingRequest>, JsonRejection>| async move {
                    let Json(req) = req?;
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake((id, req))
                        .handle(|dto| handler.rate_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/bookings/active",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(UserBookingsRequest::new(id))
                        .handle(|dto| handler.get_active_booking(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/bookings/completed",
            get(
                |State(handler): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookingTransformer, BookingPresenter)
                        .intake(UserBookingsRequest::new(id))
                        .handle(|dto| handler.get_completed_bookings(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

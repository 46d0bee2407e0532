use crate::handler::AppModule;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod booking;
mod machine;
mod user;

pub use self::{booking::*, machine::*, user::*};

pub fn app<D>(database: D) -> Router
where
    D: 'static + Sync + Send,
    Router<AppModule<D>>: BookingRouter + MachineRouter + UserRouter,
{
    Router::new()
        .route_booking()
        .route_machine()
        .route_user()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new())
        .with_state(AppModule::new(database))
}

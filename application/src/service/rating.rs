use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookingQuery, DependOnBookingQuery};
use kernel::interface::update::{BookingModifier, DependOnBookingModifier};
use kernel::prelude::entity::{BookingId, BookingRating, RatingRejection, UserId};
use kernel::KernelError;

use crate::service::{not_found, required};
use crate::transfer::{BookingDto, RateBookingDto};

#[async_trait::async_trait]
pub trait RateBookingService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookingQuery + DependOnBookingModifier
{
    /// Accepts one score per completed booking, from the user who made it.
    async fn rate_booking(&self, dto: RateBookingDto) -> error_stack::Result<BookingDto, KernelError> {
        let user_id = UserId::new(required(dto.user_id, "userId")?);
        let rating = BookingRating::new(required(dto.score, "rating")?);

        let mut con = self.database_connection().transact().await?;
        let mut booking = self
            .booking_query()
            .find_by_id_for_update(&mut con, &BookingId::new(dto.id))
            .await?
            .ok_or_else(|| not_found("Booking", dto.id))?;

        booking
            .rate(&user_id, rating, OffsetDateTime::now_utc())
            .map_err(|rejection| {
                tracing::warn!(booking_id = %dto.id, %rejection, "Rating rejected");
                RatingRejection::into_report(rejection)
            })?;
        self.booking_modifier().update(&mut con, &booking).await?;
        con.commit().await?;

        tracing::info!(booking_id = %dto.id, score = i16::from(rating), "Booking rated");
        Ok(booking.into())
    }
}

impl<T> RateBookingService for T where
    T: DependOnDatabaseConnection + DependOnBookingQuery + DependOnBookingModifier
{
}

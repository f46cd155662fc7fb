//! src/routes/medicine.rs
use crate::clock::Clock;
use crate::domain::{MedicineReminder, ValidationError};
use crate::messaging::{Ack, DeliveryError, MessagingGateway};
use crate::routes::error_chain_fmt;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOTIFICATION_SENT: &str = "Notification sent!";
pub const NOT_DUE: &str = "The medicine is not due to expire in the next 15 days.";
const INTERNAL_ERROR: &str = "Internal server error";

/// Request body of `POST /api/medicine`.
///
/// Every field is optional on the wire so that an absent field is reported
/// with the same message as an empty one.
#[derive(Deserialize)]
pub struct MedicineForm {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    pub medicine: Option<String>,
    pub expiry: Option<String>,
}

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorMessage {
    error: String,
}

#[derive(thiserror::Error)]
pub enum MedicineError {
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("Failed to send the medicine reminder")]
    DeliveryError(#[from] DeliveryError),
}

impl std::fmt::Debug for MedicineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for MedicineError {
    fn status_code(&self) -> StatusCode {
        match self {
            MedicineError::ValidationError(_) => StatusCode::BAD_REQUEST,
            MedicineError::DeliveryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            MedicineError::ValidationError(e) => e.to_string(),
            MedicineError::DeliveryError(_) => INTERNAL_ERROR.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorMessage { error })
    }
}

/// A body that cannot be read as a medicine form is answered like one with missing fields.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected an unreadable medicine payload");
    MedicineError::from(ValidationError::MissingFields).into()
}

#[tracing::instrument(
    name = "Registering a medicine reminder",
    skip(payload, gateway, clock),
    fields(
        request_id = %Uuid::new_v4(),
        medicine = ?payload.medicine,
        expiry = ?payload.expiry
    )
)]
pub async fn register_medicine(
    payload: web::Json<MedicineForm>,
    gateway: web::Data<dyn MessagingGateway>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, MedicineError> {
    let medicine = MedicineReminder::try_from(payload.into_inner())?;

    let today = clock.today();
    let reminder = medicine.evaluate(today);
    tracing::info!(
        reminder_date = %reminder.reminder_date,
        %today,
        due = reminder.due,
        "Evaluated the medicine reminder"
    );

    if !reminder.due {
        return Ok(HttpResponse::Ok().json(Message { message: NOT_DUE }));
    }

    send_reminder(gateway.get_ref(), &medicine).await?;

    Ok(HttpResponse::Ok().json(Message {
        message: NOTIFICATION_SENT,
    }))
}

#[tracing::instrument(name = "Sending a medicine reminder", skip(gateway, medicine))]
async fn send_reminder(
    gateway: &dyn MessagingGateway,
    medicine: &MedicineReminder,
) -> Result<Ack, DeliveryError> {
    gateway
        .send(&medicine.handle, &medicine.notification_text())
        .await
        .map_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,
                "Failed to send the medicine reminder to {}", medicine.handle
            );
            e
        })
}

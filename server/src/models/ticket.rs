use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{FieldKind, Payload};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub seat_section: String,
    pub seat_row: String,
    pub seat_number: String,
    pub qr_code: String,
    pub is_used: bool,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub seat_section: String,
    pub seat_row: String,
    pub seat_number: String,
    pub qr_code: String,
}

/// Purchase payload. `isUsed` and `purchasedAt` are always set server-side.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketRequest {
    #[validate(required(message = "user id is required"))]
    pub user_id: Option<Uuid>,
    #[validate(required(message = "match id is required"))]
    pub match_id: Option<Uuid>,
    #[validate(
        required(message = "seat section is required"),
        length(min = 1, message = "seat section is required")
    )]
    pub seat_section: Option<String>,
    #[validate(
        required(message = "seat row is required"),
        length(min = 1, message = "seat row is required")
    )]
    pub seat_row: Option<String>,
    #[validate(
        required(message = "seat number is required"),
        length(min = 1, message = "seat number is required")
    )]
    pub seat_number: Option<String>,
    #[validate(
        required(message = "qr code is required"),
        length(min = 1, message = "qr code is required")
    )]
    pub qr_code: Option<String>,
}

impl Payload for PurchaseTicketRequest {
    type Output = NewTicket;

    const LABEL: &'static str = "ticket";

    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("userId", FieldKind::Uuid),
        ("matchId", FieldKind::Uuid),
        ("seatSection", FieldKind::Text),
        ("seatRow", FieldKind::Text),
        ("seatNumber", FieldKind::Text),
        ("qrCode", FieldKind::Text),
    ];

    fn into_output(self) -> Option<NewTicket> {
        Some(NewTicket {
            user_id: self.user_id?,
            match_id: self.match_id?,
            seat_section: self.seat_section?,
            seat_row: self.seat_row?,
            seat_number: self.seat_number?,
            qr_code: self.qr_code?,
        })
    }
}

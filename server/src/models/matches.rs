use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{FieldKind, Payload};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub match_date: DateTime<Utc>,
    pub stadium: String,
    pub stadium_address: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub home_team: String,
    pub away_team: String,
    pub match_date: DateTime<Utc>,
    pub stadium: String,
    pub stadium_address: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[validate(
        required(message = "home team is required"),
        length(min = 1, message = "home team is required")
    )]
    pub home_team: Option<String>,
    #[validate(
        required(message = "away team is required"),
        length(min = 1, message = "away team is required")
    )]
    pub away_team: Option<String>,
    #[validate(required(message = "match date is required"))]
    pub match_date: Option<DateTime<Utc>>,
    #[validate(
        required(message = "stadium is required"),
        length(min = 1, message = "stadium is required")
    )]
    pub stadium: Option<String>,
    #[validate(
        required(message = "stadium address is required"),
        length(min = 1, message = "stadium address is required")
    )]
    pub stadium_address: Option<String>,
}

impl Payload for CreateMatchRequest {
    type Output = NewMatch;

    const LABEL: &'static str = "match";

    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("homeTeam", FieldKind::Text),
        ("awayTeam", FieldKind::Text),
        ("matchDate", FieldKind::DateTime),
        ("stadium", FieldKind::Text),
        ("stadiumAddress", FieldKind::Text),
    ];

    fn into_output(self) -> Option<NewMatch> {
        Some(NewMatch {
            home_team: self.home_team?,
            away_team: self.away_team?,
            match_date: self.match_date?,
            stadium: self.stadium?,
            stadium_address: self.stadium_address?,
        })
    }
}

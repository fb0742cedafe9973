use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Storage, StorageError, StorageResult};
use crate::models::user::DEFAULT_LANGUAGE;
use crate::models::{Match, NewMatch, NewTicket, NewUser, Ticket, User};

/// Process-local store. Each entity type lives in its own map behind its own
/// lock.
#[derive(Default)]
pub struct MemStorage {
    users: RwLock<HashMap<Uuid, User>>,
    matches: RwLock<HashMap<Uuid, Match>>,
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the opening fixture shown on the home screen.
    pub fn with_sample_data() -> Self {
        let id = Uuid::new_v4();
        let sample = Match {
            id,
            home_team: "México".to_string(),
            away_team: "Alemania".to_string(),
            match_date: Utc.with_ymd_and_hms(2026, 6, 15, 19, 0, 0).single().unwrap_or_else(Utc::now),
            stadium: "Estadio BBVA".to_string(),
            stadium_address:
                "Av. José Eleuterio González 2601, Del Paseo Residencial, 64920 Monterrey, N.L."
                    .to_string(),
            is_active: true,
        };

        Self {
            matches: RwLock::new(HashMap::from([(id, sample)])),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> StorageResult<User> {
        // Check and insert under the same write guard so two concurrent
        // signups for the same name cannot both land.
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(StorageError::Conflict { field: "username" });
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(StorageError::Conflict { field: "email" });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            preferred_language: new_user
                .preferred_language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_matches(&self) -> StorageResult<Vec<Match>> {
        let mut active: Vec<Match> = self
            .matches
            .read()
            .await
            .values()
            .filter(|m| m.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|m| m.match_date);
        Ok(active)
    }

    async fn get_match(&self, id: Uuid) -> StorageResult<Option<Match>> {
        Ok(self.matches.read().await.get(&id).cloned())
    }

    async fn create_match(&self, new_match: NewMatch) -> StorageResult<Match> {
        let created = Match {
            id: Uuid::new_v4(),
            home_team: new_match.home_team,
            away_team: new_match.away_team,
            match_date: new_match.match_date,
            stadium: new_match.stadium,
            stadium_address: new_match.stadium_address,
            is_active: true,
        };
        self.matches
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_user_tickets(&self, user_id: Uuid) -> StorageResult<Vec<Ticket>> {
        let mut owned: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.purchased_at);
        Ok(owned)
    }

    async fn get_ticket(&self, id: Uuid) -> StorageResult<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn create_ticket(&self, new_ticket: NewTicket) -> StorageResult<Ticket> {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            user_id: new_ticket.user_id,
            match_id: new_ticket.match_id,
            seat_section: new_ticket.seat_section,
            seat_row: new_ticket.seat_row,
            seat_number: new_ticket.seat_number,
            qr_code: new_ticket.qr_code,
            is_used: false,
            purchased_at: Utc::now(),
        };
        self.tickets
            .write()
            .await
            .insert(ticket.id, ticket.clone());
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn signup(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "secret".to_string(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            email: email.to_string(),
            preferred_language: None,
        }
    }

    fn fixture(home: &str, away: &str, day: u32) -> NewMatch {
        NewMatch {
            home_team: home.to_string(),
            away_team: away.to_string(),
            match_date: Utc.with_ymd_and_hms(2026, 6, day, 18, 0, 0).unwrap(),
            stadium: "Estadio Azteca".to_string(),
            stadium_address: "Calz. de Tlalpan 3465, CDMX".to_string(),
        }
    }

    fn purchase(user_id: Uuid, match_id: Uuid) -> NewTicket {
        NewTicket {
            user_id,
            match_id,
            seat_section: "102".to_string(),
            seat_row: "F".to_string(),
            seat_number: "14".to_string(),
            qr_code: "QR-102-F-14".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lookup_of_unknown_id_is_none() {
        let storage = MemStorage::new();
        assert!(storage.get_user(Uuid::new_v4()).await.unwrap().is_none());
        assert!(storage.get_match(Uuid::new_v4()).await.unwrap().is_none());
        assert!(storage.get_ticket(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_fills_defaults() {
        let storage = MemStorage::new();
        let before = Utc::now();
        let user = storage
            .create_user(signup("ana", "ana@example.com"))
            .await
            .unwrap();

        assert_eq!(user.preferred_language, "es");
        assert!(user.created_at >= before);
        let by_name = storage.get_user_by_username("ana").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
    }

    #[tokio::test]
    async fn test_explicit_language_is_kept() {
        let storage = MemStorage::new();
        let mut payload = signup("tom", "tom@example.com");
        payload.preferred_language = Some("en".to_string());

        let user = storage.create_user(payload).await.unwrap();
        assert_eq!(user.preferred_language, "en");
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_rejected() {
        let storage = MemStorage::new();
        storage
            .create_user(signup("ana", "ana@example.com"))
            .await
            .unwrap();

        let err = storage
            .create_user(signup("ana", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { field: "username" }));

        let err = storage
            .create_user(signup("ana2", "ANA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { field: "email" }));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signup_admits_one() {
        let storage = Arc::new(MemStorage::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .create_user(signup("racer", "racer@example.com"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let storage = MemStorage::new();
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let created = storage
                .create_match(fixture("Canadá", "Japón", 12))
                .await
                .unwrap();
            assert!(ids.insert(created.id));
        }
    }

    #[tokio::test]
    async fn test_get_matches_returns_only_active_sorted_by_date() {
        let storage = MemStorage::new();
        let late = storage
            .create_match(fixture("USA", "Gales", 20))
            .await
            .unwrap();
        let early = storage
            .create_match(fixture("México", "Polonia", 11))
            .await
            .unwrap();
        assert!(late.is_active && early.is_active);

        // Retire one fixture directly; there is no API for this.
        storage
            .matches
            .write()
            .await
            .get_mut(&late.id)
            .unwrap()
            .is_active = false;

        let listed = storage.get_matches().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, early.id);
    }

    #[tokio::test]
    async fn test_sample_data_has_one_active_match() {
        let storage = MemStorage::with_sample_data();
        let listed = storage.get_matches().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].home_team, "México");
        assert_eq!(listed[0].stadium, "Estadio BBVA");
    }

    #[tokio::test]
    async fn test_tickets_are_filtered_by_owner() {
        let storage = MemStorage::new();
        let ana = storage
            .create_user(signup("ana", "ana@example.com"))
            .await
            .unwrap();
        let leo = storage
            .create_user(signup("leo", "leo@example.com"))
            .await
            .unwrap();
        let game = storage
            .create_match(fixture("Brasil", "Serbia", 14))
            .await
            .unwrap();

        let first = storage.create_ticket(purchase(ana.id, game.id)).await.unwrap();
        storage.create_ticket(purchase(leo.id, game.id)).await.unwrap();
        let second = storage.create_ticket(purchase(ana.id, game.id)).await.unwrap();

        assert!(!first.is_used);
        let owned = storage.get_user_tickets(ana.id).await.unwrap();
        let ids: Vec<Uuid> = owned.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.id) && ids.contains(&second.id));
        assert!(storage.get_user_tickets(Uuid::new_v4()).await.unwrap().is_empty());
    }
}

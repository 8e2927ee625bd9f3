//! Persistence gateway: remote-first with local fallback.
//!
//! The gateway owns no data; it mediates between the caller's ephemeral
//! view and the durable store. Policy, per operation:
//!
//! - Authenticated session: attempt the remote operation first. Remote
//!   success is authoritative and returns the server's canonical
//!   collection, which callers must adopt wholesale.
//! - A 401 invalidates the session and surfaces [`Outcome::SessionExpired`];
//!   the caller handles re-authentication.
//! - Any other remote failure silently retries against the local store
//!   for that single operation and surfaces [`Outcome::RemoteFailed`]
//!   carrying the local data plus an advisory reason. Never a hard error.
//! - Anonymous session: local store only, no remote attempt.

use crate::{
    HistoryRecord, LocalStore, ProgressEntry, RemoteApi, RemoteError, Result, SessionContext,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-operation result of a gateway call
#[derive(Debug)]
pub enum Outcome<T> {
    /// Operation succeeded against its primary backend
    Ok(T),
    /// Remote failed (non-401); the local fallback succeeded and its data
    /// is returned, with a reason suitable for an advisory banner
    RemoteFailed { data: T, reason: String },
    /// The credential was rejected with a 401 and the session invalidated
    SessionExpired,
}

impl<T> Outcome<T> {
    /// The usable collection, if the operation produced one
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Ok(data) | Outcome::RemoteFailed { data, .. } => Some(data),
            Outcome::SessionExpired => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Ok(data) | Outcome::RemoteFailed { data, .. } => Some(data),
            Outcome::SessionExpired => None,
        }
    }
}

/// Marker tying an in-flight request to the moment it started
///
/// Callers snapshot a generation before awaiting and check it before
/// applying the response, discarding anything stale instead of relying on
/// caller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestGeneration(u64);

/// Dual-backend persistence gateway
pub struct PersistenceGateway {
    remote: RemoteApi,
    local: LocalStore,
    generation: AtomicU64,
}

impl PersistenceGateway {
    pub fn new(remote: RemoteApi, local: LocalStore) -> Self {
        Self {
            remote,
            local,
            generation: AtomicU64::new(0),
        }
    }

    pub fn remote(&self) -> &RemoteApi {
        &self.remote
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Start a request and get its generation marker
    pub fn begin_request(&self) -> RequestGeneration {
        RequestGeneration(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has started since this marker
    pub fn is_current(&self, generation: RequestGeneration) -> bool {
        self.generation.load(Ordering::SeqCst) == generation.0
    }

    // ------------------------------------------------------------------
    // Progress entries
    // ------------------------------------------------------------------

    /// Persist a progress entry and return the collection to display
    pub async fn save_progress(
        &self,
        entry: ProgressEntry,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<ProgressEntry>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            self.local.append_progress(&entry)?;
            return Ok(Outcome::Ok(self.local.load_progress()?));
        };

        match self.remote.push_progress(&token, &entry).await {
            Ok(collection) => Ok(Outcome::Ok(collection)),
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote progress save failed ({}), keeping entry locally", e);
                self.local.append_progress(&entry)?;
                Ok(Outcome::RemoteFailed {
                    data: self.local.load_progress()?,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Load the progress collection for the dashboard
    pub async fn load_progress(
        &self,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<ProgressEntry>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            return Ok(Outcome::Ok(self.local.load_progress()?));
        };

        match self.remote.fetch_progress(&token).await {
            Ok(collection) => Ok(Outcome::Ok(collection)),
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote progress load failed ({}), using local log", e);
                Ok(Outcome::RemoteFailed {
                    data: self.local.load_progress()?,
                    reason: e.to_string(),
                })
            }
        }
    }

    // ------------------------------------------------------------------
    // Nutrition history
    // ------------------------------------------------------------------

    /// Persist a calculation and return the collection to display
    ///
    /// The remote path posts the record, then re-fetches the canonical
    /// collection so server-side ordering and ids flow back to the caller.
    pub async fn save_history(
        &self,
        record: HistoryRecord,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<HistoryRecord>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            return Ok(Outcome::Ok(self.local.push_history(record)?));
        };

        let remote_result = async {
            self.remote.push_nutrition_goal(&token, &record).await?;
            self.remote.fetch_nutrition_goals(&token).await
        }
        .await;

        match remote_result {
            Ok(collection) => Ok(Outcome::Ok(collection)),
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote history save failed ({}), keeping record locally", e);
                Ok(Outcome::RemoteFailed {
                    data: self.local.push_history(record)?,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Load the nutrition history collection
    pub async fn load_history(
        &self,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<HistoryRecord>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            return Ok(Outcome::Ok(self.local.load_history()?));
        };

        match self.remote.fetch_nutrition_goals(&token).await {
            Ok(collection) => Ok(Outcome::Ok(collection)),
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote history load failed ({}), using local copy", e);
                Ok(Outcome::RemoteFailed {
                    data: self.local.load_history()?,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Delete one history record by id and return the remaining collection
    pub async fn delete_history(
        &self,
        id: &str,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<HistoryRecord>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            return Ok(Outcome::Ok(self.local.delete_history(id)?));
        };

        let remote_result = async {
            self.remote.delete_nutrition_goal(&token, id).await?;
            self.remote.fetch_nutrition_goals(&token).await
        }
        .await;

        match remote_result {
            Ok(collection) => Ok(Outcome::Ok(collection)),
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote history delete failed ({}), deleting locally", e);
                Ok(Outcome::RemoteFailed {
                    data: self.local.delete_history(id)?,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Delete the entire history
    ///
    /// The contract has no bulk route, so the remote path deletes each
    /// record by id. The local copy is cleared in every path; fallback
    /// saves may have left records behind.
    pub async fn delete_all_history(
        &self,
        session: &mut SessionContext,
    ) -> Result<Outcome<Vec<HistoryRecord>>> {
        let Some(token) = session.token().map(str::to_owned) else {
            self.local.clear_history()?;
            return Ok(Outcome::Ok(Vec::new()));
        };

        let remote_result = async {
            let records = self.remote.fetch_nutrition_goals(&token).await?;
            for id in records.iter().filter_map(|r| r.id.as_deref()) {
                self.remote.delete_nutrition_goal(&token, id).await?;
            }
            Ok::<_, RemoteError>(())
        }
        .await;

        match remote_result {
            Ok(()) => {
                self.local.clear_history()?;
                Ok(Outcome::Ok(Vec::new()))
            }
            Err(RemoteError::Unauthorized) => {
                session.expire();
                Ok(Outcome::SessionExpired)
            }
            Err(e) => {
                tracing::warn!("Remote history clear failed ({}), clearing locally", e);
                self.local.clear_history()?;
                Ok(Outcome::RemoteFailed {
                    data: Vec::new(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BodyType, Gender, Goal, NutritionProfile, NutritionResult, SessionState, UserProfile,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer, dir: &std::path::Path) -> PersistenceGateway {
        PersistenceGateway::new(RemoteApi::new(server.uri()), LocalStore::new(dir))
    }

    fn authed_session() -> SessionContext {
        SessionContext::authenticated(
            UserProfile {
                name: "Dana".into(),
                email: "dana@example.com".into(),
            },
            "tok-abc",
        )
    }

    fn entry() -> ProgressEntry {
        ProgressEntry {
            date: "2026-08-29".into(),
            calories_in: 2000.0,
            calories_out: 2500.0,
            weight_kg: 82.0,
            target_weight_kg: 78.0,
        }
    }

    fn record(calories: u32) -> HistoryRecord {
        HistoryRecord::new(
            NutritionProfile {
                age: 30,
                weight_kg: 80.0,
                height_cm: 180.0,
                gender: Gender::Male,
                activity_multiplier: 1.55,
                body_type: BodyType::Mesomorph,
                goal: Goal::Cut,
            },
            NutritionResult {
                calories,
                carbs_grams: 222,
                protein_grams: 167,
                fats_grams: 74,
            },
        )
    }

    fn entry_json(e: &ProgressEntry) -> serde_json::Value {
        serde_json::to_value(e).unwrap()
    }

    #[tokio::test]
    async fn test_authenticated_save_then_load_roundtrip() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let collection = serde_json::json!({ "progress": [entry_json(&entry())] });

        Mock::given(method("POST"))
            .and(path("/progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(collection.clone()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(collection))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = authed_session();

        let saved = gateway.save_progress(entry(), &mut session).await.unwrap();
        let saved = match saved {
            Outcome::Ok(data) => data,
            other => panic!("expected Ok, got {:?}", other),
        };
        assert_eq!(saved, vec![entry()]);

        let loaded = gateway.load_progress(&mut session).await.unwrap();
        assert_eq!(loaded.into_data().unwrap(), vec![entry()]);

        // Remote success never mirrors into the local log
        assert!(gateway.local().load_progress().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_falls_back_to_local_on_server_error() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/progress"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = authed_session();

        let outcome = gateway.save_progress(entry(), &mut session).await.unwrap();
        match outcome {
            Outcome::RemoteFailed { data, reason } => {
                assert_eq!(data, vec![entry()]);
                assert!(reason.contains("500"), "reason was {:?}", reason);
            }
            other => panic!("expected RemoteFailed, got {:?}", other),
        }

        // The record landed durably in the local store
        assert_eq!(gateway.local().load_progress().unwrap(), vec![entry()]);
        // A transient failure does not cost the credential
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_local_on_server_error() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nutrition/goals"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = SessionContext::anonymous();

        // Seed the local store through anonymous saves
        gateway.save_progress(entry(), &mut session).await.unwrap();
        gateway.save_history(record(2223), &mut session).await.unwrap();

        let mut session = authed_session();

        let progress = gateway.load_progress(&mut session).await.unwrap();
        match progress {
            Outcome::RemoteFailed { data, reason } => {
                assert_eq!(data, vec![entry()]);
                assert!(reason.contains("500"), "reason was {:?}", reason);
            }
            other => panic!("expected RemoteFailed, got {:?}", other),
        }

        let history = gateway.load_history(&mut session).await.unwrap();
        match history {
            Outcome::RemoteFailed { data, .. } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].result.calories, 2223);
            }
            other => panic!("expected RemoteFailed, got {:?}", other),
        }

        // Read-side fallback does not cost the credential either
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_401_expires_session() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/progress"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = authed_session();

        let outcome = gateway.save_progress(entry(), &mut session).await.unwrap();
        assert!(matches!(outcome, Outcome::SessionExpired));
        assert_eq!(*session.state(), SessionState::Expired);
        // Nothing was written locally for the expired credential
        assert!(gateway.local().load_progress().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_session_never_touches_remote() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/progress"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = SessionContext::anonymous();

        let outcome = gateway.save_progress(entry(), &mut session).await.unwrap();
        assert_eq!(outcome.into_data().unwrap(), vec![entry()]);
    }

    #[tokio::test]
    async fn test_history_save_returns_canonical_collection() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let mut created = record(2223);
        created.id = Some("42".into());

        Mock::given(method("POST"))
            .and(path("/nutrition/goals"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::to_value(&created).unwrap()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nutrition/goals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nutritionGoals": [serde_json::to_value(&created).unwrap()]
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = authed_session();

        let outcome = gateway.save_history(record(2223), &mut session).await.unwrap();
        let collection = outcome.into_data().unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].id.as_deref(), Some("42"));
        // Server-backed history is never mirrored locally
        assert!(gateway.local().load_history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_history_respects_local_cap() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_for(&server, dir.path());
        let mut session = SessionContext::anonymous();

        let mut last = Vec::new();
        for calories in [2000, 2100, 2200, 2300, 2400, 2500] {
            let outcome = gateway
                .save_history(record(calories), &mut session)
                .await
                .unwrap();
            last = outcome.into_data().unwrap();
        }
        assert_eq!(last.len(), 5);
        assert_eq!(last[0].result.calories, 2500);
    }

    #[tokio::test]
    async fn test_delete_all_walks_remote_ids() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let mut first = record(2000);
        first.id = Some("1".into());
        let mut second = record(2100);
        second.id = Some("2".into());

        Mock::given(method("GET"))
            .and(path("/nutrition/goals"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nutritionGoals": [
                    serde_json::to_value(&first).unwrap(),
                    serde_json::to_value(&second).unwrap()
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/nutrition/goals/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/nutrition/goals/2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, dir.path());
        let mut session = authed_session();

        let outcome = gateway.delete_all_history(&mut session).await.unwrap();
        assert!(outcome.into_data().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_counter_flags_stale_requests() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway_for(&server, dir.path());

        let first = gateway.begin_request();
        assert!(gateway.is_current(first));

        let second = gateway.begin_request();
        assert!(!gateway.is_current(first));
        assert!(gateway.is_current(second));
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::LeagueResult;
use crate::models::fixture::{Match, MatchResult};
use crate::models::report::LeagueSnapshot;

pub mod helpers;
pub mod match_queries;
pub mod memory;
pub mod registry_queries;
pub mod report_queries;
pub mod result_queries;

pub use memory::InMemoryStore;

/// Persistence of scheduled fixtures.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create(&self, fixture: &Match) -> LeagueResult<()>;

    /// Active fixture by id, `NotFound` otherwise.
    async fn find_by_id(&self, id: Uuid) -> LeagueResult<Match>;

    /// Active fixtures, latest kick-off first.
    async fn find_all(&self) -> LeagueResult<Vec<Match>>;

    /// Soft-delete the fixture together with its result and goals as one unit.
    async fn delete(&self, id: Uuid) -> LeagueResult<()>;
}

/// Persistence of reported results and their goal events.
#[async_trait]
pub trait MatchResultRepository: Send + Sync {
    /// Store the result and all its goals atomically.
    ///
    /// Fails with `Duplicate` when an active result already exists for the
    /// fixture, even if a concurrent caller passed `exists_by_match_id` first.
    async fn create(&self, result: &MatchResult) -> LeagueResult<()>;

    /// Active result for a fixture with goals in minute order.
    async fn find_by_match_id(&self, match_id: Uuid) -> LeagueResult<MatchResult>;

    async fn exists_by_match_id(&self, match_id: Uuid) -> LeagueResult<bool>;
}

/// Loads the active corpus that read-side reports are derived from.
#[async_trait]
pub trait LeagueSnapshotSource: Send + Sync {
    async fn load_snapshot(&self) -> LeagueResult<LeagueSnapshot>;

    /// The part of the corpus one match report needs, `None` when the match
    /// is not active.
    ///
    /// Holds the fixture, every active match either of its teams played with
    /// those matches' active results, the two teams, and the players who
    /// scored in the fixture. Goals are loaded for the fixture's result only.
    async fn load_match_snapshot(&self, match_id: Uuid) -> LeagueResult<Option<LeagueSnapshot>>;
}

/// Existence lookups served by the club registry.
#[async_trait]
pub trait TeamRegistry: Send + Sync {
    async fn team_exists(&self, id: Uuid) -> LeagueResult<bool>;

    async fn player_exists(&self, id: Uuid) -> LeagueResult<bool>;
}

/// Storage ports wired to one concrete backend.
#[derive(Clone)]
pub struct Repositories {
    pub matches: Arc<dyn MatchRepository>,
    pub results: Arc<dyn MatchResultRepository>,
    pub snapshots: Arc<dyn LeagueSnapshotSource>,
    pub registry: Arc<dyn TeamRegistry>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            matches: Arc::new(match_queries::PgMatchRepository::new(pool.clone())),
            results: Arc::new(result_queries::PgMatchResultRepository::new(pool.clone())),
            snapshots: Arc::new(report_queries::PgSnapshotSource::new(pool.clone())),
            registry: Arc::new(registry_queries::PgTeamRegistry::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            matches: store.clone(),
            results: store.clone(),
            snapshots: store.clone(),
            registry: store,
        }
    }
}

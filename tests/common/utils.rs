use chrono::{Duration, Local, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;

use football_league_backend::config::jwt::JwtSettings;
use football_league_backend::config::settings::{get_config, DatabaseSettings};
use football_league_backend::db::{InMemoryStore, Repositories};
use football_league_backend::middleware::auth::Claims;
use football_league_backend::models::team::{Player, Team};
use football_league_backend::run;
use football_league_backend::telemetry::{get_subscriber, init_subscriber};

const TEST_JWT_SECRET: &str = "test-jwt-secret";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
}

/// Two registered clubs with one striker each.
pub struct TestClubs {
    pub home: Team,
    pub away: Team,
    pub home_striker: Player,
    pub away_striker: Player,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    let server = run(
        listener,
        Repositories::in_memory(store.clone()),
        JwtSettings::new(TEST_JWT_SECRET.to_string(), 1),
        Vec::new(),
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp { address, store }
}

/// Creates a fresh database named after a random UUID and migrates it.
pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Pool on a database of its own, built from the local configuration.
pub async fn spawn_test_db() -> PgPool {
    Lazy::force(&TRACING);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    // An explicit URL would point every test at the same database
    configuration.database.db_url = None;
    configure_db(&configuration.database).await
}

/// Inserts the clubs into the registry tables.
pub async fn insert_clubs(pool: &PgPool, clubs: &TestClubs) {
    for team in [&clubs.home, &clubs.away] {
        sqlx::query("INSERT INTO teams (id, name) VALUES ($1, $2)")
            .bind(team.id)
            .bind(&team.name)
            .execute(pool)
            .await
            .expect("Failed to insert team");
    }
    for (jersey, player) in [(9, &clubs.home_striker), (10, &clubs.away_striker)] {
        sqlx::query("INSERT INTO players (id, team_id, name, jersey_number) VALUES ($1, $2, $3, $4)")
            .bind(player.id)
            .bind(player.team_id)
            .bind(&player.name)
            .bind(jersey)
            .execute(pool)
            .await
            .expect("Failed to insert player");
    }
}

/// Builds a home and an away club without registering them anywhere.
pub fn new_clubs() -> TestClubs {
    let home = Team::new(Uuid::new_v4(), format!("Home FC {}", &Uuid::new_v4().to_string()[..8]));
    let away = Team::new(Uuid::new_v4(), format!("Away United {}", &Uuid::new_v4().to_string()[..8]));
    let home_striker = Player::new(Uuid::new_v4(), home.id, "Alex Home");
    let away_striker = Player::new(Uuid::new_v4(), away.id, "Sam Away");
    TestClubs { home, away, home_striker, away_striker }
}

/// Registers a home and an away club directly in the store.
pub fn register_clubs(store: &InMemoryStore) -> TestClubs {
    let clubs = new_clubs();
    store.add_team(clubs.home.clone());
    store.add_team(clubs.away.clone());
    store.add_player(clubs.home_striker.clone());
    store.add_player(clubs.away_striker.clone());
    clubs
}

pub fn issue_token() -> String {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        username: format!("manager{}", Uuid::new_v4()),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn days_from_today(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn match_payload(clubs: &TestClubs, days_ahead: i64) -> Value {
    json!({
        "home_team_id": clubs.home.id.to_string(),
        "away_team_id": clubs.away.id.to_string(),
        "match_date": days_from_today(days_ahead),
        "match_time": "19:30",
        "venue": "Riverside Stadium"
    })
}

pub async fn make_authenticated_request(
    client: &Client,
    method: reqwest::Method,
    url: &str,
    token: &str,
    body: Option<Value>,
) -> Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(body) = body {
        request = request.json(&body);
    }

    request.send().await.expect("Failed to execute request.")
}

/// Schedules a match through the API and returns its id.
pub async fn create_match_via_api(app: &TestApp, token: &str, clubs: &TestClubs) -> String {
    let client = Client::new();
    let response = make_authenticated_request(
        &client,
        reqwest::Method::POST,
        &format!("{}/matches", app.address),
        token,
        Some(match_payload(clubs, 1)),
    )
    .await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Cannot turn into a json.");
    body["data"]["id"].as_str().expect("Missing match id").to_string()
}

// Test data inserted straight into the database.
use sqlx::PgPool;
use uuid::Uuid;

use bloodbowl_league::auth::jwt::generate_token;
use bloodbowl_league::models::user::UserRole;

use super::utils::TestApp;

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

pub async fn create_user(app: &TestApp, role: UserRole, treasury: i64) -> TestUser {
    let username = format!("coach{}", &Uuid::new_v4().simple().to_string()[..12]);
    let role_name = match role {
        UserRole::Coach => "coach",
        UserRole::Commissioner => "commissioner",
        UserRole::Admin => "admin",
    };

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, role, treasury) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&username)
    .bind(format!("{}@example.com", username))
    .bind(role_name)
    .bind(treasury)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to insert user");

    let token = generate_token(id, &username, role, &app.jwt_settings)
        .expect("Failed to generate token")
        .token;

    TestUser { id, username, token }
}

pub async fn create_league(pool: &PgPool, commissioner_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO leagues (name, commissioner_id) VALUES ($1, $2) RETURNING id")
        .bind("Old World League")
        .bind(commissioner_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert league")
}

pub async fn create_season(pool: &PgPool, league_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO seasons (league_id, name) VALUES ($1, $2) RETURNING id")
        .bind(league_id)
        .bind("Season 1")
        .fetch_one(pool)
        .await
        .expect("Failed to insert season")
}

pub async fn create_team(pool: &PgPool, coach_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO teams (name, coach_id, race) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(coach_id)
        .bind("Human")
        .fetch_one(pool)
        .await
        .expect("Failed to insert team")
}

pub async fn create_player(pool: &PgPool, team_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO players (team_id, name) VALUES ($1, $2) RETURNING id")
        .bind(team_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to insert player")
}

pub async fn create_match(pool: &PgPool, season_id: Uuid, home_team_id: Uuid, away_team_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO matches (season_id, home_team_id, away_team_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(season_id)
    .bind(home_team_id)
    .bind(away_team_id)
    .fetch_one(pool)
    .await
    .expect("Failed to insert match")
}

/// A league with one season, two coached teams and one scheduled match between them
pub struct LeagueFixture {
    pub commissioner: TestUser,
    pub home_coach: TestUser,
    pub away_coach: TestUser,
    pub league_id: Uuid,
    pub season_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_id: Uuid,
}

pub async fn setup_league(app: &TestApp) -> LeagueFixture {
    let commissioner = create_user(app, UserRole::Commissioner, 1_000_000).await;
    let home_coach = create_user(app, UserRole::Coach, 1_000_000).await;
    let away_coach = create_user(app, UserRole::Coach, 1_000_000).await;

    let league_id = create_league(&app.db_pool, commissioner.id).await;
    let season_id = create_season(&app.db_pool, league_id).await;
    let home_team_id = create_team(&app.db_pool, home_coach.id, "Reikland Reavers").await;
    let away_team_id = create_team(&app.db_pool, away_coach.id, "Gouged Eye").await;
    let match_id = create_match(&app.db_pool, season_id, home_team_id, away_team_id).await;

    LeagueFixture {
        commissioner,
        home_coach,
        away_coach,
        league_id,
        season_id,
        home_team_id,
        away_team_id,
        match_id,
    }
}

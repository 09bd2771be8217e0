use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use bloodbowl_league::models::user::UserRole;
use common::fixtures::{create_match, create_player, create_team, create_user, setup_league};
use common::utils::spawn_app;

fn standing_of<'a>(standings: &'a Value, team_id: Uuid) -> &'a Value {
    standings["data"]["standings"]
        .as_array()
        .expect("standings array")
        .iter()
        .find(|s| s["team_id"] == json!(team_id))
        .expect("team in standings")
}

#[tokio::test]
async fn test_high_scoring_brutal_win_awards_bonus_points() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({
                "home_score": 3,
                "away_score": 1,
                "home_casualties": 4,
                "away_casualties": 0
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["match"]["status"], "completed");
    assert_eq!(body["data"]["match"]["is_resolved"], true);
    assert_eq!(body["data"]["corrected"], false);

    let home = &body["data"]["home_standing"];
    assert_eq!(home["points"], 3);
    assert_eq!(home["bonus_points"], 2);
    assert_eq!(home["bonus_high_scoring"], 1);
    assert_eq!(home["bonus_casualties"], 1);
    assert_eq!(home["wins"], 1);
    assert_eq!(home["position"], 1);

    let away = &body["data"]["away_standing"];
    assert_eq!(away["points"], 0);
    assert_eq!(away["bonus_points"], 1);
    assert_eq!(away["bonus_opponent_high_scoring"], 1);
    assert_eq!(away["losses"], 1);
    assert_eq!(away["position"], 2);

    let (status, standings) = app
        .get(&format!("/leagues/seasons/{}/standings", league.season_id), &league.away_coach.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(standings["data"]["standings"][0]["team_name"], "Reikland Reavers");
    assert_eq!(standing_of(&standings, league.away_team_id)["touchdowns_against"], 3);
    assert_eq!(standings["data"]["scoring"]["win_points"], 3);

    // Career records follow the standings
    let (games_played, wins, casualties) = sqlx::query_as::<_, (i32, i32, i32)>(
        "SELECT games_played, wins, casualties_inflicted FROM teams WHERE id = $1",
    )
    .bind(league.home_team_id)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!((games_played, wins, casualties), (1, 1, 4));
}

#[tokio::test]
async fn test_resubmission_by_coach_is_rejected_without_changes() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let result = json!({ "home_score": 2, "away_score": 2, "home_casualties": 1, "away_casualties": 3 });
    let path = format!("/matches/{}/result", league.match_id);

    let (status, first) = app.put(&path, &league.home_coach.token, &result).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = app.put(&path, &league.away_coach.token, &result).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["success"], false);
    assert_eq!(second["error"], "validation_error");

    let (_, standings) = app
        .get(&format!("/leagues/seasons/{}/standings", league.season_id), &league.home_coach.token)
        .await;
    let away = standing_of(&standings, league.away_team_id);
    assert_eq!(away["played"], 1);
    assert_eq!(away["points"], first["data"]["away_standing"]["points"]);
    assert_eq!(away["bonus_points"], first["data"]["away_standing"]["bonus_points"]);
}

#[tokio::test]
async fn test_admin_correction_replaces_previous_result() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let admin = create_user(&app, UserRole::Admin, 1_000_000).await;
    let thrower = create_player(&app.db_pool, league.home_team_id, "Griff").await;
    let path = format!("/matches/{}/result", league.match_id);

    let (status, _) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({
                "home_score": 3,
                "away_score": 0,
                "home_casualties": 3,
                "away_casualties": 0,
                "player_stats": [{ "player_id": thrower, "touchdowns": 2, "is_mvp": true }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let corrected = json!({
        "home_score": 1,
        "away_score": 1,
        "home_casualties": 0,
        "away_casualties": 0,
        "player_stats": [{ "player_id": thrower, "touchdowns": 1, "completions": 2 }]
    });

    let (status, body) = app.put(&path, &admin.token, &corrected).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["corrected"], true);
    assert_eq!(body["data"]["bets"]["resolved_count"], 0);

    let home = &body["data"]["home_standing"];
    assert_eq!(home["played"], 1);
    assert_eq!(home["wins"], 0);
    assert_eq!(home["draws"], 1);
    assert_eq!(home["points"], 1);
    assert_eq!(home["bonus_points"], 0);
    assert_eq!(home["bonus_high_scoring"], 0);
    assert_eq!(home["bonus_casualties"], 0);
    assert_eq!(body["data"]["away_standing"]["bonus_opponent_high_scoring"], 0);

    // Same correction again leaves everything as it was
    let (status, again) = app.put(&path, &admin.token, &corrected).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["data"]["home_standing"]["points"], 1);
    assert_eq!(again["data"]["home_standing"]["played"], 1);

    let (spp, touchdowns, games_played, mvp_awards) = sqlx::query_as::<_, (i32, i32, i32, i32)>(
        "SELECT spp, touchdowns, games_played, mvp_awards FROM players WHERE id = $1",
    )
    .bind(thrower)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    // 1 TD * 3 + 2 completions
    assert_eq!((spp, touchdowns, games_played, mvp_awards), (5, 1, 1, 0));

    let (team_games, team_draws, team_wins) = sqlx::query_as::<_, (i32, i32, i32)>(
        "SELECT games_played, draws, wins FROM teams WHERE id = $1",
    )
    .bind(league.home_team_id)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!((team_games, team_draws, team_wins), (1, 1, 0));
}

#[tokio::test]
async fn test_player_stats_are_recorded_with_spp() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let blitzer = create_player(&app.db_pool, league.away_team_id, "Varag").await;

    let (status, _) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.commissioner.token,
            &json!({
                "home_score": 0,
                "away_score": 2,
                "home_casualties": 0,
                "away_casualties": 2,
                "player_stats": [{
                    "player_id": blitzer,
                    "touchdowns": 2,
                    "casualties": 1,
                    "interceptions": 1,
                    "is_mvp": true
                }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, details) = app
        .get(&format!("/matches/{}", league.match_id), &league.home_coach.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let line = &details["data"]["player_stats"][0];
    assert_eq!(line["player_id"], json!(blitzer));
    assert_eq!(line["team_id"], json!(league.away_team_id));
    // 6 + 2 + 2 + 4
    assert_eq!(line["spp_earned"], 14);
}

#[tokio::test]
async fn test_outsider_cannot_record_result() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let outsider = create_user(&app, UserRole::Coach, 1_000_000).await;

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &outsider.token,
            &json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_cancelled_match_is_rejected() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    sqlx::query("UPDATE matches SET status = 'cancelled' WHERE id = $1")
        .bind(league.match_id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_invalid_stat_line_rolls_back_everything() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let stranger_coach = create_user(&app, UserRole::Coach, 1_000_000).await;
    let other_team = create_team(&app.db_pool, stranger_coach.id, "Skavenblight Scramblers").await;
    let ringer = create_player(&app.db_pool, other_team, "Ringer").await;

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({
                "home_score": 2,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "player_stats": [{ "player_id": ringer, "touchdowns": 2 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);

    let (match_status, is_resolved) = sqlx::query_as::<_, (String, bool)>(
        "SELECT status, is_resolved FROM matches WHERE id = $1",
    )
    .bind(league.match_id)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(match_status, "scheduled");
    assert!(!is_resolved);

    let standings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM standings")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(standings, 0);
}

#[tokio::test]
async fn test_two_mvps_on_one_team_are_rejected() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let first = create_player(&app.db_pool, league.home_team_id, "Mighty Zug").await;
    let second = create_player(&app.db_pool, league.home_team_id, "Griff").await;

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({
                "home_score": 1,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "player_stats": [
                    { "player_id": first, "is_mvp": true },
                    { "player_id": second, "is_mvp": true }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_out_of_range_scores_are_rejected() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;

    let (status, _) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({ "home_score": 51, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/matches/{}/result", league.match_id),
            &league.home_coach.token,
            &json!({ "home_score": 1, "away_score": 0, "home_casualties": -1, "away_casualties": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_match_is_not_found() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;

    let (status, body) = app
        .put(
            &format!("/matches/{}/result", Uuid::new_v4()),
            &league.home_coach.token,
            &json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;

    let response = app
        .client
        .put(format!("{}/matches/{}/result", app.address, league.match_id))
        .json(&json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_later_matches_accumulate_in_standings() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let rematch = create_match(&app.db_pool, league.season_id, league.away_team_id, league.home_team_id).await;

    for (match_id, result) in [
        (league.match_id, json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 })),
        (rematch, json!({ "home_score": 0, "away_score": 3, "home_casualties": 0, "away_casualties": 0 })),
    ] {
        let (status, _) = app
            .put(&format!("/matches/{}/result", match_id), &league.commissioner.token, &result)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, standings) = app
        .get(&format!("/leagues/{}/standings", league.league_id), &league.home_coach.token)
        .await;
    let home = standing_of(&standings, league.home_team_id);
    assert_eq!(home["played"], 2);
    assert_eq!(home["wins"], 2);
    assert_eq!(home["points"], 6);
    assert_eq!(home["bonus_high_scoring"], 1);
    assert_eq!(home["touchdowns_for"], 4);
    assert_eq!(home["position"], 1);
}

#[tokio::test]
async fn test_concurrent_recordings_resolve_the_match_once() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let bettor = create_user(&app, UserRole::Coach, 10_000).await;

    let (status, _) = app
        .post(
            &format!("/bets/matches/{}", league.match_id),
            &bettor.token,
            &json!({ "team_id": league.home_team_id, "bet_type": "win", "bet_amount": 1_000 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let path = format!("/matches/{}/result", league.match_id);
    let result = json!({ "home_score": 2, "away_score": 1, "home_casualties": 1, "away_casualties": 0 });
    let ((home_status, _), (away_status, _)) = tokio::join!(
        app.put(&path, &league.home_coach.token, &result),
        app.put(&path, &league.away_coach.token, &result),
    );

    let mut statuses = vec![home_status, away_status];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let (_, standings) = app
        .get(&format!("/leagues/seasons/{}/standings", league.season_id), &league.home_coach.token)
        .await;
    assert_eq!(standing_of(&standings, league.home_team_id)["played"], 1);
    assert_eq!(standing_of(&standings, league.away_team_id)["played"], 1);
    assert_eq!(standing_of(&standings, league.home_team_id)["points"], 3);

    // One settlement: stake back doubled, one notification
    assert_eq!(app.treasury(bettor.id).await, 10_000 - 1_000 + 2_000);
    let notifications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bet_notifications WHERE user_id = $1")
        .bind(bettor.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(notifications, 1);
}

#[tokio::test]
async fn test_correction_reverses_with_the_rules_it_was_scored_under() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let admin = create_user(&app, UserRole::Admin, 1_000_000).await;
    let path = format!("/matches/{}/result", league.match_id);

    let (status, _) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({ "home_score": 1, "away_score": 0, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The league changes its scoring after the result went in
    sqlx::query("UPDATE leagues SET win_points = 2, draw_points = 2 WHERE id = $1")
        .bind(league.league_id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let (status, body) = app
        .put(
            &path,
            &admin.token,
            &json!({ "home_score": 1, "away_score": 1, "home_casualties": 0, "away_casualties": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    // 3 for the original win comes out, 2 for the draw goes in
    assert_eq!(body["data"]["home_standing"]["points"], 2);
    assert_eq!(body["data"]["home_standing"]["wins"], 0);
    assert_eq!(body["data"]["away_standing"]["points"], 2);
    assert_eq!(body["data"]["match"]["applied_win_points"], 2);
    assert_eq!(body["data"]["match"]["applied_draw_points"], 2);
}

#[tokio::test]
async fn test_level_up_follows_spp_total() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let admin = create_user(&app, UserRole::Admin, 1_000_000).await;
    let catcher = create_player(&app.db_pool, league.home_team_id, "Dieter").await;
    let lineman = create_player(&app.db_pool, league.home_team_id, "Hans").await;
    let path = format!("/matches/{}/result", league.match_id);

    // 2 TDs and the MVP make 10 SPP, enough for level 2
    let (status, body) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({
                "home_score": 2,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "player_stats": [
                    { "player_id": catcher, "touchdowns": 2, "is_mvp": true },
                    { "player_id": lineman, "completions": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let level_ups = body["data"]["level_ups"].as_array().unwrap();
    assert_eq!(level_ups.len(), 1);
    assert_eq!(level_ups[0]["player_id"], json!(catcher));
    assert_eq!(level_ups[0]["name"], "Dieter");
    assert_eq!(level_ups[0]["previous_level"], 1);
    assert_eq!(level_ups[0]["level"], 2);

    let level: i32 = sqlx::query_scalar("SELECT level FROM players WHERE id = $1")
        .bind(catcher)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(level, 2);

    // Corrected down to a single TD, the catcher drops back to level 1
    let (status, body) = app
        .put(
            &path,
            &admin.token,
            &json!({
                "home_score": 1,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "player_stats": [{ "player_id": catcher, "touchdowns": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert!(body["data"]["level_ups"].as_array().unwrap().is_empty());

    let (spp, level): (i32, i32) = sqlx::query_as("SELECT spp, level FROM players WHERE id = $1")
        .bind(catcher)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!((spp, level), (3, 1));
}

#[tokio::test]
async fn test_injuries_apply_and_are_undone_by_correction() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let admin = create_user(&app, UserRole::Admin, 1_000_000).await;
    let blocker = create_player(&app.db_pool, league.home_team_id, "Ogre").await;
    let thrower = create_player(&app.db_pool, league.home_team_id, "Griff").await;
    let runner = create_player(&app.db_pool, league.away_team_id, "Snitch").await;
    let bruiser = create_player(&app.db_pool, league.away_team_id, "Varag").await;
    let worn = create_player(&app.db_pool, league.away_team_id, "Old Grumbler").await;
    sqlx::query("UPDATE players SET armor = 1 WHERE id = $1")
        .bind(worn)
        .execute(&app.db_pool)
        .await
        .unwrap();
    let path = format!("/matches/{}/result", league.match_id);

    let (status, body) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({
                "home_score": 1,
                "away_score": 1,
                "home_casualties": 3,
                "away_casualties": 2,
                "player_stats": [
                    { "player_id": blocker, "injury": "-1av" },
                    { "player_id": thrower, "injury": "badly_hurt" },
                    { "player_id": runner, "injury": "dead" },
                    { "player_id": bruiser, "injury": "niggling" },
                    { "player_id": worn, "injury": "-1av" }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    // Badly hurt leaves no record
    assert_eq!(body["data"]["injuries"].as_array().unwrap().len(), 4);

    let (armor,): (i32,) = sqlx::query_as("SELECT armor FROM players WHERE id = $1")
        .bind(blocker)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(armor, 7);
    let (worn_armor,): (i32,) = sqlx::query_as("SELECT armor FROM players WHERE id = $1")
        .bind(worn)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(worn_armor, 1);
    let (is_dead, is_active): (bool, bool) = sqlx::query_as("SELECT is_dead, is_active FROM players WHERE id = $1")
        .bind(runner)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert!(is_dead);
    assert!(!is_active);

    let (status, details) = app
        .get(&format!("/matches/{}", league.match_id), &league.away_coach.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let permanent = details["data"]["injuries"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|injury| injury["is_permanent"] == true)
        .count();
    assert_eq!(permanent, 4);

    // The runner only missed the next game after all
    let (status, body) = app
        .put(
            &path,
            &admin.token,
            &json!({
                "home_score": 1,
                "away_score": 1,
                "home_casualties": 1,
                "away_casualties": 0,
                "player_stats": [{ "player_id": runner, "injury": "miss_next_game" }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let injuries = body["data"]["injuries"].as_array().unwrap();
    assert_eq!(injuries.len(), 1);
    assert_eq!(injuries[0]["injury_type"], "miss_next_game");
    assert_eq!(injuries[0]["is_permanent"], false);

    let (is_dead, is_active, miss_next_game): (bool, bool, bool) =
        sqlx::query_as("SELECT is_dead, is_active, miss_next_game FROM players WHERE id = $1")
            .bind(runner)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(!is_dead);
    assert!(is_active);
    assert!(miss_next_game);

    let (armor,): (i32,) = sqlx::query_as("SELECT armor FROM players WHERE id = $1")
        .bind(blocker)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(armor, 8);
    let (worn_armor,): (i32,) = sqlx::query_as("SELECT armor FROM players WHERE id = $1")
        .bind(worn)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(worn_armor, 1);
    let (niggling,): (i32,) = sqlx::query_as("SELECT niggling_injuries FROM players WHERE id = $1")
        .bind(bruiser)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(niggling, 0);
}

#[tokio::test]
async fn test_winnings_go_to_team_treasury() {
    let app = spawn_app().await;
    let league = setup_league(&app).await;
    let admin = create_user(&app, UserRole::Admin, 1_000_000).await;
    let path = format!("/matches/{}/result", league.match_id);
    let home_start = app.team_treasury(league.home_team_id).await;
    let away_start = app.team_treasury(league.away_team_id).await;

    let (status, body) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({
                "home_score": 1,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "home_winnings": -10_000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = app
        .put(
            &path,
            &league.home_coach.token,
            &json!({
                "home_score": 1,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "home_winnings": 60_000,
                "away_winnings": 20_000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.team_treasury(league.home_team_id).await, home_start + 60_000);
    assert_eq!(app.team_treasury(league.away_team_id).await, away_start + 20_000);

    // A correction moves each treasury by the difference only
    let (status, _) = app
        .put(
            &path,
            &admin.token,
            &json!({
                "home_score": 1,
                "away_score": 0,
                "home_casualties": 0,
                "away_casualties": 0,
                "home_winnings": 40_000,
                "away_winnings": 50_000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.team_treasury(league.home_team_id).await, home_start + 40_000);
    assert_eq!(app.team_treasury(league.away_team_id).await, away_start + 50_000);

    let (_, details) = app
        .get(&format!("/matches/{}", league.match_id), &league.home_coach.token)
        .await;
    assert_eq!(details["data"]["match"]["home_winnings"], 40_000);
    assert_eq!(details["data"]["home_team"]["treasury"], home_start + 40_000);
}

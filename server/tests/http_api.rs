use core::time::Duration;

use serde_json::Value;
use sweeper_server::{GameService, HttpRequest, HttpResponse, Method, ServerConfig};
use web_time::Instant;

struct Client {
    service: GameService,
    cookie: Option<String>,
    now: Instant,
}

impl Client {
    fn new(config: ServerConfig) -> Self {
        Self {
            service: GameService::new(config, 77),
            cookie: None,
            now: Instant::now(),
        }
    }

    fn send(&mut self, method: Method, path: &str, body: &str) -> (HttpResponse, Value) {
        let response = self.service.handle(
            &HttpRequest {
                method,
                path,
                cookie: self.cookie.as_deref(),
                body,
            },
            self.now,
        );
        if let Some(set_cookie) = &response.set_cookie {
            let pair = set_cookie.split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        let json = serde_json::from_str(&response.body).unwrap();
        (response, json)
    }

    fn new_game(&mut self, difficulty: &str) -> String {
        let (response, json) = self.send(
            Method::Post,
            "/games",
            &format!(r#"{{"difficulty": "{difficulty}"}}"#),
        );
        assert_eq!(response.status, 201, "{json}");
        json["game_id"].as_str().unwrap().to_string()
    }

    fn click(&mut self, game_id: &str, row: u32, col: u32, action: &str) -> (HttpResponse, Value) {
        let body = format!(r#"{{"game_id": "{game_id}", "row": {row}, "col": {col}, "action": "{action}"}}"#);
        self.send(Method::Post, "/click", &body)
    }
}

#[test]
fn create_game_sets_session_cookie_once() {
    let mut client = Client::new(ServerConfig::default());

    let (response, json) = client.send(Method::Post, "/games", "");
    assert_eq!(response.status, 201);
    let cookie = response.set_cookie.expect("new session cookie");
    assert!(cookie.starts_with("sweeper_session="));
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(json["difficulty"], "Easy");
    assert_eq!(json["board_state"].as_array().unwrap().len(), 9);
    assert_eq!(json["remaining_mines"], 10);
    assert_eq!(json["game_over"], false);

    let (response, _) = client.send(Method::Post, "/games", r#"{"difficulty": "Normal"}"#);
    assert_eq!(response.status, 201);
    assert_eq!(response.set_cookie, None);

    let (response, json) = client.send(Method::Get, "/games", "");
    assert_eq!(response.status, 200);
    assert_eq!(json["games"].as_array().unwrap().len(), 2);
}

#[test]
fn playing_until_the_end_freezes_the_game() {
    let mut client = Client::new(ServerConfig {
        redact_hidden: false,
        ..Default::default()
    });
    let game_id = client.new_game("Hard");

    let (response, json) = client.click(&game_id, 4, 4, "reveal");
    assert_eq!(response.status, 200);
    assert_eq!(json["board_state"][4][4]["value"], 0);

    // with redaction off the mine positions are visible, so step on one
    let board = json["board_state"].as_array().unwrap();
    let (row, col) = board
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .as_array()
                .unwrap()
                .iter()
                .enumerate()
                .map(move |(col, cell)| (row, col, cell["value"].as_i64()))
        })
        .find(|&(_, _, value)| value == Some(-1))
        .map(|(row, col, _)| (row as u32, col as u32))
        .unwrap();

    let (_, json) = client.click(&game_id, row, col, "reveal");
    assert_eq!(json["game_over"], true);
    assert_eq!(json["state"], "Lost");
    let frozen = json.clone();

    let (response, json) = client.click(&game_id, 0, 0, "flag");
    assert_eq!(response.status, 200);
    assert_eq!(json, frozen);
}

#[test]
fn redacted_board_hides_unrevealed_values() {
    let mut client = Client::new(ServerConfig::default());
    let game_id = client.new_game("Hard");

    let (_, json) = client.click(&game_id, 8, 15, "reveal");

    for row in json["board_state"].as_array().unwrap() {
        for cell in row.as_array().unwrap() {
            assert_eq!(cell["revealed"].as_bool().unwrap(), !cell["value"].is_null());
        }
    }
}

#[test]
fn errors_map_to_statuses() {
    let mut client = Client::new(ServerConfig::default());

    let (response, json) = client.send(Method::Get, "/games", "");
    assert_eq!(response.status, 404);
    assert_eq!(json["error"], "not_found");

    let game_id = client.new_game("Easy");

    let (response, json) = client.click(&game_id, 9, 0, "reveal");
    assert_eq!(response.status, 400);
    assert_eq!(json["error"], "out_of_bounds");

    let (response, json) = client.send(Method::Post, "/click", "{not json");
    assert_eq!(response.status, 400);
    assert_eq!(json["error"], "bad_request");

    let (response, _) = client.send(Method::Get, "/games/00000000000000aa", "");
    assert_eq!(response.status, 404);

    let (response, json) = client.send(Method::Post, "/difficulties", "");
    assert_eq!(response.status, 405);
    assert_eq!(json["error"], "method_not_allowed");

    let (response, _) = client.send(Method::Get, "/nowhere", "");
    assert_eq!(response.status, 404);
}

#[test]
fn game_limit_is_reported() {
    let mut client = Client::new(ServerConfig {
        max_games_per_session: 1,
        ..Default::default()
    });
    client.new_game("Easy");

    let (response, json) = client.send(Method::Post, "/games", "");

    assert_eq!(response.status, 429);
    assert_eq!(json["error"], "too_many_games");
}

#[test]
fn reset_and_delete_round_trip() {
    let mut client = Client::new(ServerConfig::default());
    let game_id = client.new_game("Easy");
    client.click(&game_id, 0, 0, "reveal");

    let (response, json) = client.send(
        Method::Post,
        "/reset",
        &format!(r#"{{"game_id": "{game_id}"}}"#),
    );
    assert_eq!(response.status, 200);
    assert_eq!(json["game_id"], game_id.as_str());
    assert_eq!(json["difficulty"], "Easy");
    assert!(json.get("elapsed_secs").is_none());

    let path = format!("/games/{game_id}");
    let (response, json) = client.send(Method::Delete, &path, "");
    assert_eq!(response.status, 200);
    assert_eq!(json["status"], "ok");

    let (response, _) = client.send(Method::Get, &path, "");
    assert_eq!(response.status, 404);
}

#[test]
fn idle_sessions_expire() {
    let mut client = Client::new(ServerConfig {
        session_ttl_secs: 30,
        ..Default::default()
    });
    let game_id = client.new_game("Easy");

    client.now += Duration::from_secs(31);
    let (response, json) = client.click(&game_id, 0, 0, "reveal");

    assert_eq!(response.status, 404);
    assert_eq!(json["error"], "not_found");
    assert_eq!(client.service.store().session_count(), 0);
}

#[test]
fn difficulties_are_listed() {
    let mut client = Client::new(ServerConfig::default());

    let (response, json) = client.send(Method::Get, "/difficulties", "");

    assert_eq!(response.status, 200);
    assert_eq!(json["difficulties"][1]["name"], "Normal");
    assert_eq!(json["difficulties"][2]["cols"], 30);
}

use serde_json::json;

mod common;
use common::utils::spawn_app;

#[tokio::test]
async fn create_match_derives_winner_and_applies_stats() {
    let test_app = spawn_app(&["a1", "a2", "b1", "b2"]).await;

    let response = test_app
        .post_json("/matches", &json!({
            "date": "2025-03-08T19:00:00Z",
            "teamA": ["a1", "a2"],
            "teamB": ["b1", "b2"],
            "teamAScore": 1,
            "teamBScore": 4,
            "playerOfTheMatch": "b2",
            "goalOfTheMatch": "a1"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["match"]["winner"], "teamB");
    assert_eq!(body["match"]["hasBeenProcessed"], true);
    assert_eq!(body["increments"], 10);

    let b2 = test_app.player("b2").await;
    assert_eq!((b2.attended, b2.win, b2.motm), (1, 1, 1));
    let a1 = test_app.player("a1").await;
    assert_eq!((a1.attended, a1.loss, a1.gotm), (1, 1, 1));

    // Replaying the stored match by id is a no-op
    let match_id = body["match"]["id"].as_str().unwrap().to_string();
    let replay = test_app.post_json("/update-players", &json!({"_id": match_id})).await;
    assert_eq!(replay.status().as_u16(), 200);
    assert_eq!(test_app.player("b2").await.win, 1);
}

#[tokio::test]
async fn list_and_get_matches() {
    let test_app = spawn_app(&["a", "b"]).await;
    for (date, score_a) in [("2025-01-04", 1), ("2025-02-01", 0)] {
        let response = test_app
            .post_json("/matches", &json!({
                "date": date,
                "teamA": ["a"],
                "teamB": ["b"],
                "teamAScore": score_a,
                "teamBScore": 0
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = test_app.get("/matches").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["total_count"], 2);
    let newest = &body["data"][0];
    assert_eq!(newest["winner"], "draw");

    let match_id = newest["id"].as_str().unwrap();
    let response = test_app.get(&format!("/matches/{}", match_id)).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], match_id);

    let missing = test_app.get("/matches/does-not-exist").await;
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_match_is_not_stored() {
    let test_app = spawn_app(&["a"]).await;

    let response = test_app.post_json("/matches", &json!({"teamA": ["a"]})).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = test_app.get("/matches").await.json().await.unwrap();
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn zero_award_ids_from_numeric_forms_mean_no_award() {
    let test_app = spawn_app(&["1", "2"]).await;

    let response = test_app
        .post_json("/matches", &json!({
            "teamA": [1],
            "teamB": [2],
            "teamAScore": 2,
            "teamBScore": 1,
            "potmId": 0,
            "gotmId": 0
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["increments"], 4);
    assert_eq!(body["match"]["hasBeenProcessed"], true);
    assert!(body["match"]["potm"].is_null());
    assert!(body["match"]["gotm"].is_null());

    let p1 = test_app.player("1").await;
    assert_eq!((p1.attended, p1.win, p1.motm, p1.gotm), (1, 1, 0, 0));
    let p2 = test_app.player("2").await;
    assert_eq!((p2.attended, p2.loss), (1, 1));
}

use crate::helpers::start_recording_mpv;

use homero::actions::{PlayerAction, load_episode, run_action};

use player_core::catalog::parse_episodes;
use player_core::mpv::MpvClient;

use std::time::Duration;

use serde_json::json;

/// **VALUE**: A multi-command action reaches mpv as separate connections, in order.
///
/// **WHY THIS MATTERS**: `next` relies on the skip happening before the rewind; mpv
/// answers each request on its own connection.
///
/// **BUG THIS CATCHES**: Would catch commands being sent concurrently or batched
/// onto one connection.
#[tokio::test]
async fn given_live_player_when_running_next_then_skip_then_rewind() {
    // GIVEN: A player that answers two requests
    let mpv = start_recording_mpv(2);
    let client = MpvClient::new(mpv.path(), false).with_timeout(Duration::from_secs(2));

    // WHEN
    let exchanges = run_action(&client, PlayerAction::Next).await;

    // THEN: Both succeeded with their own ids
    assert_eq!(exchanges.len(), 2);
    for exchange in &exchanges {
        assert!(exchange.response.is_success(), "{:?}", exchange.response);
        assert_eq!(exchange.response.request_id, exchange.command.request_id());
    }

    // AND: The player saw them in order
    let requests = mpv.requests().await;
    assert_eq!(requests[0]["command"], json!(["playlist-next", "force"]));
    assert_eq!(requests[1]["command"], json!(["set_property", "time-pos", "0"]));
    assert_eq!(
        requests[1]["request_id"].as_u64().unwrap(),
        requests[0]["request_id"].as_u64().unwrap() + 1
    );
}

#[tokio::test]
async fn given_live_player_when_loading_episode_then_path_arrives_as_one_argument() {
    let mpv = start_recording_mpv(1);
    let client = MpvClient::new(mpv.path(), false).with_timeout(Duration::from_secs(2));
    let catalog = parse_episodes("/media/The Simpsons/S03E10_Flaming Moe's.mkv\n");

    let exchange = load_episode(&client, &catalog, 0).await.unwrap();

    assert!(exchange.response.is_success());
    let requests = mpv.requests().await;
    assert_eq!(
        requests[0]["command"],
        json!(["loadfile", "/media/The Simpsons/S03E10_Flaming Moe's.mkv", "replace"])
    );
}

/// **VALUE**: A player that is not running shows up in the results, not as a crash.
#[tokio::test]
async fn given_no_player_when_running_action_then_not_found_response() {
    let dir = tempfile::TempDir::new().unwrap();
    let client = MpvClient::new(dir.path().join("missing.sock"), false);

    let exchanges = run_action(&client, PlayerAction::TogglePause).await;

    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].response.error, "MPV socket not found");
    assert_eq!(
        exchanges[0].response.request_id,
        exchanges[0].command.request_id()
    );
}

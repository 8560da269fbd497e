use crate::helpers::{
    ForbiddenConnector, PeerBehavior, SlowConnector, start_fake_mpv, unbound_socket_path,
};

use player_core::error::IpcError;
use player_core::error::ipc::{
    CONNECTION_REFUSED, EMPTY_RESPONSE, INVALID_JSON_PREFIX, REPLY_TOO_LARGE, SOCKET_NOT_FOUND,
    SOCKET_TIMEOUT,
};
use player_core::mpv::codec::{DRY_RUN, SUCCESS, encode};
use player_core::mpv::{MpvClient, RequestIdSequence};

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

const TEST_TIMEOUT: Duration = Duration::from_millis(300);

// ============================================================================
// Successful exchanges
// ============================================================================

/// **VALUE**: Verifies the full encode → send → receive → decode path against a live socket.
///
/// **WHY THIS MATTERS**: This is the one path every front-end action depends on. If the
/// request is malformed, the half-close is missing, or the reply is misparsed, nothing the
/// user clicks reaches the player.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The request bytes on the wire differ from `encode(command)`
/// - The client waits for more input instead of half-closing
/// - `data` or `request_id` are dropped while decoding
#[tokio::test]
async fn given_player_replies_success_when_send_then_response_decoded_with_matching_id() {
    // GIVEN: A player that answers with a fixed reply for request 101
    let mpv = start_fake_mpv(PeerBehavior::Reply(
        b"{\"error\":\"success\",\"data\":{\"v\":1},\"request_id\":101}\n".to_vec(),
    ));
    let client = MpvClient::new(mpv.path(), false)
        .with_timeout(TEST_TIMEOUT)
        .with_sequence(RequestIdSequence::starting_at(101));

    // WHEN: Sending a command
    let (command, response) = client.send("cycle pause").await;

    // THEN: The reply is decoded and paired with the command that produced it
    assert_eq!(response.error, SUCCESS);
    assert_eq!(response.data, Some(json!({"v": 1})));
    assert_eq!(response.request_id, 101);
    assert_eq!(command.request_id(), response.request_id);
    assert_eq!(command.tokens(), ["cycle", "pause"]);

    // AND: The player saw exactly the encoded command
    let received = mpv.received().await;
    assert_eq!(received.as_bytes(), encode(&command).unwrap().as_slice());
}

/// **VALUE**: A path argument with spaces arrives at the player as one token.
#[tokio::test]
async fn given_loadfile_tokens_when_send_then_path_not_resplit_on_wire() {
    let mpv = start_fake_mpv(PeerBehavior::EchoSuccess(Value::Null));
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);
    let path = "/media/The Simpsons/S04E12_Marge vs. the Monorail.mkv";

    let (command, response) = client.send(["loadfile", path, "replace"]).await;

    assert!(response.is_success(), "got {response:?}");
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());

    let received: Value = serde_json::from_str(mpv.received().await.trim_end()).unwrap();
    assert_eq!(received["command"], json!(["loadfile", path, "replace"]));
}

/// **VALUE**: A reply split across several socket writes is reassembled.
///
/// **BUG THIS CATCHES**: Would catch a client that decodes whatever the first `read`
/// returned, which fails as soon as mpv's reply crosses a buffer boundary.
#[tokio::test]
async fn given_reply_arrives_in_chunks_when_send_then_chunks_joined() {
    let mpv = start_fake_mpv(PeerBehavior::ReplyInChunks(vec![
        br#"{"error":"succ"#.to_vec(),
        br#"ess","data":[1,2,"#.to_vec(),
        b"3],\"request_id\":100}\n".to_vec(),
    ]));
    let client = MpvClient::new(mpv.path(), false).with_timeout(Duration::from_secs(2));

    let (_, response) = client.send("get_property playlist").await;

    assert_eq!(response.error, SUCCESS);
    assert_eq!(response.data, Some(json!([1, 2, 3])));
}

/// **VALUE**: The client stops reading at the first newline even if the peer stays open.
///
/// **WHY THIS MATTERS**: A real mpv keeps the connection alive after answering. Waiting
/// for EOF would turn every successful command into a timeout.
#[tokio::test]
async fn given_peer_answers_but_stays_open_when_send_then_returns_before_timeout() {
    let mpv = start_fake_mpv(PeerBehavior::ReplyAndLinger(
        b"{\"error\":\"success\",\"request_id\":100}\n".to_vec(),
    ));
    let timeout = Duration::from_secs(3);
    let client = MpvClient::new(mpv.path(), false).with_timeout(timeout);

    let started = Instant::now();
    let (_, response) = client.send("cycle mute").await;

    assert_eq!(response.error, SUCCESS);
    assert!(started.elapsed() < timeout, "client waited for EOF");
}

#[tokio::test]
async fn given_reply_followed_by_event_lines_when_send_then_only_first_line_used() {
    let mpv = start_fake_mpv(PeerBehavior::Reply(
        b"{\"error\":\"success\",\"data\":42,\"request_id\":100}\n{\"event\":\"pause\"}\n{garbage\n"
            .to_vec(),
    ));
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    let (_, response) = client.send("get_property volume").await;

    assert_eq!(response.error, SUCCESS);
    assert_eq!(response.data, Some(json!(42)));
}

// ============================================================================
// Failure classification
// ============================================================================

/// **VALUE**: A peer that closes without answering yields the empty-response sentinel.
#[tokio::test]
async fn given_peer_closes_without_reply_when_send_then_empty_response() {
    // GIVEN: A player that reads the request and hangs up
    let mpv = start_fake_mpv(PeerBehavior::CloseSilently);
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    // WHEN: Sending a command
    let (command, response) = client.send("cycle pause").await;

    // THEN: The client reports an empty reply for that command
    assert_eq!(response.error, EMPTY_RESPONSE);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());
}

/// **VALUE**: A player that hangs up before the request is even written still yields the
/// empty-response sentinel.
///
/// **WHY THIS MATTERS**: "accepted, then closed without a byte" is one situation for the
/// caller no matter whether the close lands before or after our write.
///
/// **BUG THIS CATCHES**: Would catch a broken pipe on write (or shutdown) aborting the call
/// as "Connection reset by MPV" before the read reaches EOF.
#[tokio::test]
async fn given_peer_drops_before_request_written_when_send_then_empty_response() {
    // GIVEN: A player that drops the connection on accept, and a connector slow enough
    // that the drop happens before the client writes
    let mpv = start_fake_mpv(PeerBehavior::DropOnAccept);
    let client = MpvClient::new(mpv.path(), false)
        .with_timeout(TEST_TIMEOUT)
        .with_connector(SlowConnector {
            delay: Duration::from_millis(100),
        });

    // WHEN
    let (command, response) = client.send("cycle pause").await;

    // THEN
    assert_eq!(response.error, EMPTY_RESPONSE);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());
    assert_eq!(mpv.received().await, "");
}

#[tokio::test]
async fn given_peer_drops_on_accept_without_delay_when_send_then_empty_response() {
    let mpv = start_fake_mpv(PeerBehavior::DropOnAccept);
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    let (_, response) = client.send("cycle pause").await;

    assert_eq!(response.error, EMPTY_RESPONSE);
}

/// **VALUE**: A reply that never ends its line is cut off at the size limit.
///
/// **BUG THIS CATCHES**: Would catch the read buffer growing without bound until the
/// deadline when a peer streams bytes but never sends a newline.
#[tokio::test]
async fn given_reply_without_newline_past_limit_when_send_then_reply_too_large() {
    // GIVEN: A small limit and a player that sends more than that, then lingers
    let mpv = start_fake_mpv(PeerBehavior::ReplyAndLinger(vec![b'x'; 8 * 1024]));
    let client = MpvClient::new(mpv.path(), false)
        .with_timeout(Duration::from_secs(2))
        .with_reply_limit(1024);

    // WHEN
    let started = Instant::now();
    let (command, response) = client.send("get_property playlist").await;

    // THEN: Rejected as oversized, well before the deadline
    assert_eq!(response.error, REPLY_TOO_LARGE);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn given_whitespace_only_reply_when_send_then_empty_response() {
    let mpv = start_fake_mpv(PeerBehavior::Reply(b"   \r\n{\"error\":\"success\"}\n".to_vec()));
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    let (_, response) = client.send("cycle pause").await;

    assert_eq!(response.error, EMPTY_RESPONSE);
}

/// **VALUE**: A missing socket is reported, not raised.
///
/// **WHY THIS MATTERS**: "mpv isn't running" is the most common failure in practice.
/// It must come back as a value the front-end can display.
#[tokio::test]
async fn given_socket_path_does_not_exist_when_send_then_socket_not_found() {
    let (_dir, path) = unbound_socket_path();
    let client = MpvClient::new(&path, false).with_timeout(TEST_TIMEOUT);

    let (command, response) = client.send("cycle pause").await;

    assert_eq!(response.error, SOCKET_NOT_FOUND);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());
}

/// **VALUE**: A stale socket file with no listener is reported as a refused connection.
///
/// **BUG THIS CATCHES**: Would catch refused connections being folded into "not found",
/// which sends operators looking for a missing file that is actually there.
#[tokio::test]
async fn given_stale_socket_file_when_send_then_connection_refused() {
    // GIVEN: A socket file left behind by a listener that has gone away
    let (_dir, path) = unbound_socket_path();
    drop(std::os::unix::net::UnixListener::bind(&path).expect("Failed to bind"));
    assert!(path.exists(), "socket file should outlive its listener");

    let client = MpvClient::new(&path, false).with_timeout(TEST_TIMEOUT);

    // WHEN / THEN
    let (_, response) = client.send("cycle pause").await;
    assert_eq!(response.error, CONNECTION_REFUSED);
}

/// **VALUE**: A player that never answers cannot stall the caller past the timeout.
///
/// **WHY THIS MATTERS**: A wedged mpv would otherwise hang the HTTP handler that called
/// `send`, and every request queued behind it.
///
/// **BUG THIS CATCHES**: Would catch a timeout applied only to `connect`, leaving the read
/// unbounded.
#[tokio::test]
async fn given_peer_never_writes_or_closes_when_send_then_times_out_within_bound() {
    // GIVEN: A player that accepts and then goes silent
    let mpv = start_fake_mpv(PeerBehavior::Hang);
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    // WHEN: Sending a command
    let started = Instant::now();
    let (command, response) = client.send("cycle pause").await;
    let elapsed = started.elapsed();

    // THEN: The call returns a timeout close to the configured bound
    assert_eq!(response.error, SOCKET_TIMEOUT);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, command.request_id());
    assert!(elapsed >= TEST_TIMEOUT, "returned before the timeout: {elapsed:?}");
    assert!(
        elapsed < TEST_TIMEOUT + Duration::from_secs(2),
        "timeout not enforced: {elapsed:?}"
    );
}

/// **VALUE**: Truncated JSON is reported with the raw text in `data`.
#[tokio::test]
async fn given_truncated_json_reply_when_send_then_invalid_json_with_raw_data() {
    let raw = r#"{"error":"success","data":{"v":"#;
    let mpv = start_fake_mpv(PeerBehavior::Reply(format!("{raw}\n").into_bytes()));
    let client = MpvClient::new(mpv.path(), false).with_timeout(TEST_TIMEOUT);

    let (command, response) = client.send("cycle pause").await;

    assert!(
        response.error.starts_with(INVALID_JSON_PREFIX),
        "unexpected error: {}",
        response.error
    );
    assert_eq!(response.data, Some(Value::String(raw.to_string())));
    assert_eq!(response.request_id, command.request_id());
}

#[tokio::test]
async fn given_missing_socket_when_request_then_typed_not_found_error() {
    let (_dir, path) = unbound_socket_path();
    let client = MpvClient::new(&path, false).with_timeout(TEST_TIMEOUT);

    let (_, outcome) = client.request("cycle pause").await;

    match outcome {
        Err(IpcError::NotFound { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

/// **VALUE**: One failed exchange leaves the client fully usable.
#[tokio::test]
async fn given_failed_call_when_player_appears_then_next_call_succeeds() {
    // GIVEN: A client pointed at a socket that does not exist yet
    let (_dir, path) = unbound_socket_path();
    let client = MpvClient::new(&path, false).with_timeout(Duration::from_secs(2));
    let (first_command, first) = client.send("cycle pause").await;
    assert_eq!(first.error, SOCKET_NOT_FOUND);

    // WHEN: The player starts listening and the caller tries again
    let listener = tokio::net::UnixListener::bind(&path).expect("Failed to bind");
    let player = tokio::spawn(async move {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        stream.read_to_end(&mut request).await.expect("read");
        stream
            .write_all(b"{\"error\":\"success\",\"request_id\":101}\n")
            .await
            .expect("write");
    });
    let (second_command, second) = client.send("cycle pause").await;
    player.await.expect("player task panicked");

    // THEN: The retry succeeds with a fresh id
    assert_eq!(second.error, SUCCESS);
    assert_eq!(first_command.request_id() + 1, second_command.request_id());
}

// ============================================================================
// Dry run
// ============================================================================

/// **VALUE**: Dry-run never touches the connector and always acknowledges locally.
///
/// **WHY THIS MATTERS**: Dry-run is the default configuration and the demo mode. If it ever
/// opened a socket, a misconfigured demo could drive a real player.
///
/// **BUG THIS CATCHES**: Would catch the dry-run check being moved after the connect.
#[tokio::test]
async fn given_dry_run_when_send_repeatedly_then_never_connects_and_ids_differ() {
    // GIVEN: A dry-run client whose connector refuses every call
    let connector = ForbiddenConnector::default();
    let client = MpvClient::new("/nonexistent/mpv.sock", true).with_connector(connector.clone());

    // WHEN: Sending several commands
    let mut previous = None;
    for _ in 0..5 {
        let (command, response) = client.send("playlist-next force").await;

        // THEN: Each is acknowledged locally with a new id
        assert_eq!(response.error, DRY_RUN);
        assert_eq!(response.data, None);
        assert_eq!(response.request_id, command.request_id());
        assert_ne!(previous, Some(command.request_id()));
        previous = Some(command.request_id());
    }

    // AND: No connection was ever attempted
    assert_eq!(connector.attempts(), 0);
}

/// **VALUE**: Concurrent callers never share a request id.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_dry_run_sends_when_awaited_then_ids_unique() {
    let client = MpvClient::new("/nonexistent/mpv.sock", true);

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.send("cycle pause").await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (command, response) = handle.await.expect("send task panicked");
        assert_eq!(command.request_id(), response.request_id);
        assert!(ids.insert(command.request_id()), "duplicate id");
    }

    assert_eq!(ids.len(), 64);
}

#[tokio::test]
async fn given_two_clients_with_default_sequences_when_send_then_ids_independent() {
    let first = MpvClient::new("/a.sock", true);
    let second = MpvClient::new("/b.sock", true);

    let (a, _) = first.send("cycle pause").await;
    let (b, _) = second.send("cycle pause").await;

    assert_eq!(a.request_id(), b.request_id());
    assert_eq!(first.sequence().peek(), second.sequence().peek());
}

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message;

use tourmap::matrix::DistanceMatrix;
use tourmap::model::{City, CitySet};
use tourmap::solver::{
    LinkStatus, SendPolicy, SolveRequest, SolverChannel, SolverConfig, SolverEvent, SolverLink,
    SolverParams, TourUpdate,
};

fn request_for(points: &[(f64, f64)]) -> SolveRequest {
    let cities: CitySet = points.iter().map(|&(x, y)| City::new(x, y)).collect();
    SolveRequest::new(DistanceMatrix::build(&cities), Some(SolverParams::default()))
}

async fn wait_for_status(channel: &mut SolverChannel, status: LinkStatus) -> bool {
    while let Some(event) = channel.next_event().await {
        if event == SolverEvent::Status(status) {
            return true;
        }
    }
    false
}

async fn next_tour(channel: &mut SolverChannel) -> Option<TourUpdate> {
    while let Some(event) = channel.next_event().await {
        if let SolverEvent::Tour(update) = event {
            return Some(update);
        }
    }
    None
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn queued_request_is_flushed_and_tour_comes_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut channel = SolverChannel::connect(SolverConfig::new(format!("ws://{addr}"))).unwrap();
    // Both are submitted before the server accepts; only the latest is sent.
    channel.submit(request_for(&[(0.0, 0.0)])).unwrap();
    channel
        .submit(request_for(&[(0.0, 0.0), (3.0, 4.0)]))
        .unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let first = ws.next().await.unwrap().unwrap();
        let request: serde_json::Value =
            serde_json::from_str(first.into_text().unwrap().as_str()).unwrap();

        // Malformed frames are skipped by the client.
        ws.send(Message::Text("not json".into())).await.unwrap();
        ws.send(Message::Text(r#"{"type":"path","payload":"[1, 0]"}"#.into()))
            .await
            .unwrap();
        // Wait for the client to hang up.
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        request
    });

    let update = timeout(Duration::from_secs(10), next_tour(&mut channel))
        .await
        .expect("tour in time")
        .expect("channel alive");
    assert_eq!(update.kind, "path");
    assert_eq!(update.tour.indices(), &[1, 0]);
    assert_eq!(channel.status(), LinkStatus::Open);

    channel.shutdown().await;
    let request = timeout(Duration::from_secs(10), server)
        .await
        .expect("server finished")
        .unwrap();
    assert_eq!(request["type"], "solve");
    assert_eq!(request["data"], serde_json::json!([[0.0, 5.0], [5.0, 0.0]]));
    assert_eq!(request["params"]["beta"], 2.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drop_policy_discards_requests_made_while_connecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = SolverConfig::new(format!("ws://{addr}")).with_send_policy(SendPolicy::Drop);
    let mut channel = SolverChannel::connect(config).unwrap();
    // The handshake cannot finish before the server accepts.
    channel.submit(request_for(&[(0.0, 0.0)])).unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let first = ws.next().await.unwrap().unwrap();
        let request: serde_json::Value =
            serde_json::from_str(first.into_text().unwrap().as_str()).unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        request
    });

    let opened = timeout(Duration::from_secs(10), wait_for_status(&mut channel, LinkStatus::Open))
        .await
        .expect("open in time");
    assert!(opened);
    assert_eq!(channel.status(), LinkStatus::Open);
    channel
        .submit(request_for(&[(0.0, 0.0), (6.0, 8.0)]))
        .unwrap();

    // Closing only happens after the worker has sent everything before it.
    channel.shutdown().await;
    let request = timeout(Duration::from_secs(10), server)
        .await
        .expect("server finished")
        .unwrap();
    assert_eq!(request["data"], serde_json::json!([[0.0, 10.0], [10.0, 0.0]]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reconnects_after_server_close_and_flushes_queued_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        // First connection is closed right away.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.close(None).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let first = ws.next().await.unwrap().unwrap();
        let request: serde_json::Value =
            serde_json::from_str(first.into_text().unwrap().as_str()).unwrap();
        ws.send(Message::binary(br#"{"type":"path","payload":[0,1,2]}"#.to_vec()))
            .await
            .unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        request
    });

    let config = SolverConfig::new(format!("ws://{addr}"))
        .with_reconnect_delay(Duration::from_millis(20), Duration::from_millis(50));
    let mut channel = SolverChannel::connect(config).unwrap();

    let dropped = timeout(Duration::from_secs(10), async {
        wait_for_status(&mut channel, LinkStatus::Open).await
            && wait_for_status(&mut channel, LinkStatus::Closed).await
    })
    .await
    .expect("first connection closed in time");
    assert!(dropped);

    channel
        .submit(request_for(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]))
        .unwrap();

    let update = timeout(Duration::from_secs(10), next_tour(&mut channel))
        .await
        .expect("tour in time")
        .expect("channel alive");
    assert_eq!(update.kind, "path");
    assert_eq!(update.tour.indices(), &[0, 1, 2]);

    channel.shutdown().await;
    let request = timeout(Duration::from_secs(10), server)
        .await
        .expect("server finished")
        .unwrap();
    assert_eq!(request["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_solver_reports_closed() {
    // Grab a free port, then release it so nothing is listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config = SolverConfig::new(format!("ws://{addr}"))
        .with_send_policy(SendPolicy::Drop)
        .with_reconnect_delay(Duration::from_millis(20), Duration::from_millis(50));
    let mut channel = SolverChannel::connect(config).unwrap();
    channel.submit(request_for(&[(1.0, 1.0)])).unwrap();

    let closed = timeout(Duration::from_secs(10), async {
        while let Some(event) = channel.next_event().await {
            if event == SolverEvent::Status(LinkStatus::Closed) {
                return true;
            }
        }
        false
    })
    .await
    .expect("status in time");
    assert!(closed);

    // Submitting while offline never fails or blocks.
    channel.submit(request_for(&[(2.0, 2.0)])).unwrap();
    channel.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_the_channel() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let channel = SolverChannel::connect(SolverConfig::new(format!("ws://{addr}"))).unwrap();
    timeout(Duration::from_secs(10), channel.shutdown())
        .await
        .expect("shutdown in time");
}

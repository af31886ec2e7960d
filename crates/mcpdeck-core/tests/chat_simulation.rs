use std::time::Duration;

use mcpdeck_core::chat::{ChatSession, ChatTab, ConnectionStatus, Origin, SimulationSettings};
use mcpdeck_core::mcp::McpConnection;
use mcpdeck_core::registry::ServiceRegistry;
use tokio::time::Instant;

fn registry_of(entries: &[(&str, McpConnection)]) -> ServiceRegistry {
    entries
        .iter()
        .map(|(name, conn)| (name.to_string(), conn.clone()))
        .collect()
}

async fn connect_all(chat: &mut ChatSession, registry: &ServiceRegistry) {
    chat.sync(registry);
    while chat.statuses().any(|(_, status)| status.is_connecting()) {
        let event = chat.next_event().await.unwrap();
        chat.apply(event);
    }
}

#[tokio::test(start_paused = true)]
async fn stdio_service_connects_and_announces_once() {
    let registry = registry_of(&[("svc", McpConnection::stdio("python", ["-m", "x"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 7);

    chat.track(&registry);
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Disconnected));

    let started = Instant::now();
    assert_eq!(chat.connect_pending(), 1);
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Connecting));

    let event = chat.next_event().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed <= Duration::from_millis(2000));

    assert!(chat.apply(event));
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Connected));

    let announcements: Vec<_> = chat
        .messages()
        .iter()
        .filter(|m| m.text == "Connected to svc")
        .collect();
    assert_eq!(announcements.len(), 1);
    assert_eq!(announcements[0].origin, Origin::Service("svc".to_string()));
    assert_eq!(chat.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn status_message_gets_one_running_normally_reply() {
    let registry = registry_of(&[("svc", McpConnection::stdio("python", ["-m", "x"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 8);
    connect_all(&mut chat, &registry).await;

    let targets = chat.send("status", &registry).unwrap();
    assert_eq!(targets, vec!["svc"]);
    assert_eq!(chat.messages().last().unwrap().origin, Origin::User);

    let event = chat.next_event().await.unwrap();
    assert!(chat.apply(event));
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(chat.pump(), 0);

    let replies: Vec<_> = chat
        .messages()
        .iter()
        .filter(|m| m.text.contains("running normally"))
        .collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].origin, Origin::Service("svc".to_string()));
}

#[tokio::test(start_paused = true)]
async fn replies_are_staggered_in_name_order() {
    let registry = registry_of(&[
        ("alpha", McpConnection::stdio("node", ["a.js"])),
        ("beta", McpConnection::sse("http://localhost:8000/events")),
    ]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 9);
    connect_all(&mut chat, &registry).await;

    let sent_at = Instant::now();
    chat.send("events", &registry).unwrap();

    let first = chat.next_event().await.unwrap();
    assert_eq!(first.service(), "alpha");
    assert_eq!(sent_at.elapsed(), Duration::from_millis(500));
    chat.apply(first);

    let second = chat.next_event().await.unwrap();
    assert_eq!(second.service(), "beta");
    assert_eq!(sent_at.elapsed(), Duration::from_millis(800));
    chat.apply(second);

    let last = chat.messages().last().unwrap();
    assert!(last.text.starts_with("Last 3 events:"));
}

#[tokio::test(start_paused = true)]
async fn active_tab_narrows_targets_and_view() {
    let registry = registry_of(&[
        ("alpha", McpConnection::stdio("node", ["a.js"])),
        ("beta", McpConnection::stdio("node", ["b.js"])),
    ]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 10);
    connect_all(&mut chat, &registry).await;

    chat.set_active_tab(ChatTab::Service("beta".to_string()))
        .unwrap();
    let targets = chat.send("help", &registry).unwrap();
    assert_eq!(targets, vec!["beta"]);

    let event = chat.next_event().await.unwrap();
    chat.apply(event);

    let visible: Vec<_> = chat.visible_messages().map(|m| m.origin.label()).collect();
    assert!(!visible.contains(&"alpha"));
    assert!(visible.contains(&"beta"));
    assert!(visible.contains(&"user"));
}

#[tokio::test(start_paused = true)]
async fn removed_service_never_updates_again() {
    let registry = registry_of(&[("svc", McpConnection::stdio("node", ["a.js"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 12);
    chat.sync(&registry);
    assert_eq!(chat.pending_tasks(), 1);

    chat.sync(&ServiceRegistry::new());
    assert!(chat.status("svc").is_none());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(chat.try_next_event().is_none());
    assert!(chat.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn readded_service_ignores_queued_connect_event() {
    let registry = registry_of(&[("svc", McpConnection::stdio("node", ["a.js"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 13);
    chat.sync(&registry);

    // The first attempt resolves into the channel without being applied
    tokio::time::sleep(Duration::from_secs(3)).await;
    chat.sync(&ServiceRegistry::new());
    chat.sync(&registry);
    let readded_at = Instant::now();

    assert_eq!(chat.pump(), 0);
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Connecting));
    assert!(chat.messages().is_empty());

    let event = chat.next_event().await.unwrap();
    assert!(readded_at.elapsed() >= Duration::from_millis(1000));
    assert!(chat.apply(event));
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Connected));
    assert_eq!(chat.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn readded_service_ignores_queued_reply() {
    let registry = registry_of(&[("svc", McpConnection::stdio("python", ["-m", "x"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 14);
    connect_all(&mut chat, &registry).await;
    chat.send("status", &registry).unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    chat.sync(&ServiceRegistry::new());
    chat.sync(&registry);

    assert_eq!(chat.pump(), 0);
    assert_eq!(chat.status("svc"), Some(&ConnectionStatus::Connecting));
    assert!(
        !chat
            .messages()
            .iter()
            .any(|m| m.text.contains("running normally"))
    );
}

#[tokio::test(start_paused = true)]
async fn pending_reply_dropped_when_service_removed() {
    let registry = registry_of(&[("svc", McpConnection::stdio("node", ["a.js"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 13);
    connect_all(&mut chat, &registry).await;

    chat.send("hello", &registry).unwrap();
    chat.sync(&ServiceRegistry::new());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(chat.pump(), 0);
    assert_eq!(chat.messages().last().unwrap().origin, Origin::User);
}

#[tokio::test(start_paused = true)]
async fn send_with_no_connected_services_only_records_user_message() {
    let registry = registry_of(&[("svc", McpConnection::stdio("node", ["a.js"]))]);
    let mut chat = ChatSession::with_seed(SimulationSettings::default(), 14);
    chat.track(&registry);

    let targets = chat.send("status", &registry).unwrap();
    assert!(targets.is_empty());
    assert_eq!(chat.messages().len(), 1);
    assert!(chat.send("   ", &registry).is_err());
    assert_eq!(chat.messages().len(), 1);
}

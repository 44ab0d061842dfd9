//! Coordinator scenarios driven through real connection handles.

mod helpers;

use std::time::Duration;

use serde_json::json;

use poker_core::config::rooms::MAX_DURATION_SECONDS;
use poker_core::types::RoomId;
use poker_realtime::coordinator::{
    ADMIN_REMOVAL_NOTICE, KICK_NOTICE, REASON_ADMIN_DELETE, REASON_ADMIN_NUKE, REASON_EXPIRED,
};
use poker_realtime::message::{InboundMessage, OutboundMessage};

use helpers::{ADMIN_SECRET, Harness};

fn expired_notices(messages: &[OutboundMessage]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|msg| match msg {
            OutboundMessage::RoomExpired { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_full_voting_round() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();

    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.member_count(), 1);
    assert_eq!(room.owner, a.id);

    h.register(&b, "Bob");
    h.join(&b, room_id);
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.member_count(), 2);
    assert!(room.users[&b.id].vote.is_none());

    h.vote(&a, room_id, "5");
    h.vote(&b, room_id, "8");
    h.send(&a, InboundMessage::ShowVotes { room_id });
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert!(room.votes_visible);
    assert_eq!(room.users[&a.id].vote.as_deref(), Some("5"));
    assert_eq!(room.users[&b.id].vote.as_deref(), Some("8"));

    h.send(&a, InboundMessage::ResetVotes { room_id });
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert!(!room.votes_visible);
    assert!(room.users.values().all(|u| u.vote.is_none()));

    h.send(&b, InboundMessage::LeaveRoom { room_id });
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.member_count(), 1);
    assert_eq!(room.owner, a.id);

    h.send(&a, InboundMessage::LeaveRoom { room_id });
    assert!(h.coordinator.rooms().get(&room_id).is_none());
}

#[tokio::test]
async fn test_members_receive_full_state() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let mut b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    a.drain();
    b.drain();

    h.vote(&b, room_id, "13");
    let states: Vec<_> = a
        .drain()
        .into_iter()
        .filter_map(|msg| match msg {
            OutboundMessage::RoomStateUpdated(room) => Some(room),
            _ => None,
        })
        .collect();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].users[&b.id].vote.as_deref(), Some("13"));
    assert!(!states[0].votes_visible);
    assert_eq!(b.drain().len(), 1);
}

#[tokio::test]
async fn test_room_name_deduplication() {
    let mut h = Harness::new();
    let mut names = Vec::new();
    for who in ["A", "B", "C"] {
        let c = h.connect();
        h.register(&c, who);
        let id = h.create_room(&c, "Sprint");
        names.push(h.coordinator.rooms().get(&id).unwrap().name.clone());
    }
    assert_eq!(names, ["Sprint", "Sprint - 2", "Sprint - 3"]);
}

#[tokio::test]
async fn test_blank_room_name_and_capacity_defaults() {
    let mut h = Harness::new();
    let a = h.connect();
    h.register(&a, "Alice");
    let id = h.create_room_sized(&a, "   ", Some(0));
    let room = h.coordinator.rooms().get(&id).unwrap();
    assert_eq!(room.name, "Planning Room");
    assert_eq!(room.max_users, 10);

    let b = h.connect();
    h.register(&b, "Bob");
    let id = h.create_room_sized(&b, "Huge", Some(10_000));
    assert_eq!(h.coordinator.rooms().get(&id).unwrap().max_users, 50);
}

#[tokio::test]
async fn test_room_ceiling() {
    let mut h = Harness::new();
    for i in 0..30 {
        let c = h.connect();
        h.register(&c, &format!("user{i}"));
        h.create_room(&c, "Room");
    }
    assert_eq!(h.coordinator.rooms().len(), 30);

    let mut late = h.connect();
    h.register(&late, "Late");
    h.send(
        &late,
        InboundMessage::CreateRoom {
            room_name: Some("One more".into()),
            max_users: None,
            user_name: None,
        },
    );
    assert_eq!(h.coordinator.rooms().len(), 30);
    assert_eq!(
        late.errors(),
        ["Room limit reached (30). Please try again later or join an existing room."]
    );
}

#[tokio::test]
async fn test_create_without_registration_rolls_back() {
    let mut h = Harness::new();
    let mut a = h.connect();
    h.send(
        &a,
        InboundMessage::CreateRoom {
            room_name: Some("Ghost".into()),
            max_users: None,
            user_name: None,
        },
    );
    assert!(h.coordinator.rooms().is_empty());
    assert_eq!(a.errors(), ["Please register a name before joining a room."]);
    assert_eq!(h.metrics.snapshot().rooms_created, 0);
}

#[tokio::test]
async fn test_user_name_on_create_registers() {
    let mut h = Harness::new();
    let a = h.connect();
    h.send(
        &a,
        InboundMessage::CreateRoom {
            room_name: Some("Sprint".into()),
            max_users: None,
            user_name: Some("  Alice  ".into()),
        },
    );
    assert_eq!(h.coordinator.registered_name(&a.id), Some("Alice"));
    let id = h.coordinator.rooms().ids()[0];
    assert_eq!(h.coordinator.rooms().get(&id).unwrap().users[&a.id].name, "Alice");
}

#[tokio::test]
async fn test_join_failures() {
    let mut h = Harness::new();
    let a = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room_sized(&a, "Tiny", Some(1));

    let mut b = h.connect();
    h.join(&b, RoomId::new());
    assert_eq!(b.errors(), ["Room not found."]);

    h.register(&b, "Bob");
    h.join(&b, room_id);
    assert_eq!(b.errors(), ["Room is full."]);

    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.member_count(), 1);
}

#[tokio::test]
async fn test_join_requires_registration() {
    let mut h = Harness::new();
    let a = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");

    let mut b = h.connect();
    h.join(&b, room_id);
    assert_eq!(b.errors(), ["Please register a name before joining a room."]);
    assert_eq!(h.coordinator.rooms().get(&room_id).unwrap().member_count(), 1);
}

#[tokio::test]
async fn test_joining_another_room_leaves_the_first() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let first = h.create_room(&a, "First");
    let second = h.create_room(&b, "Second");

    h.join(&b, first);
    assert!(h.coordinator.rooms().get(&second).is_none());
    assert!(h.coordinator.rooms().get(&first).unwrap().has_member(&b.id));
    assert_eq!(h.coordinator.rooms().rooms_of(&b.id), vec![first]);
}

#[tokio::test]
async fn test_owner_leaving_transfers_to_earliest_member() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    let c = h.connect();
    for (client, name) in [(&a, "Alice"), (&b, "Bob"), (&c, "Carol")] {
        h.register(client, name);
    }
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    h.join(&c, room_id);

    h.send(&a, InboundMessage::LeaveRoom { room_id });
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.owner, b.id);
    assert!(room.has_member(&room.owner));
}

#[tokio::test]
async fn test_non_owner_actions_are_silently_ignored() {
    let mut h = Harness::new();
    let a = h.connect();
    let mut b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    h.vote(&a, room_id, "3");
    b.drain();

    h.send(&b, InboundMessage::ShowVotes { room_id });
    h.send(&b, InboundMessage::ResetVotes { room_id });
    h.send(
        &b,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: a.id,
        },
    );
    assert!(b.drain().is_empty());

    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert!(!room.votes_visible);
    assert_eq!(room.users[&a.id].vote.as_deref(), Some("3"));
    assert_eq!(room.member_count(), 2);
}

#[tokio::test]
async fn test_unauthorized_kick_ack_has_no_message() {
    let mut h = Harness::new();
    let a = h.connect();
    let mut b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    b.drain();

    h.send_acked(
        &b,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: a.id,
        },
        9,
    );
    assert_eq!(
        b.drain_raw(),
        vec![json!({"event": "ack", "data": {"id": 9, "success": false}})]
    );
}

#[tokio::test]
async fn test_vote_validation() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let outsider = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    a.drain();

    h.send(
        &a,
        InboundMessage::Vote {
            room_id,
            vote: json!(5),
        },
    );
    h.send(
        &a,
        InboundMessage::Vote {
            room_id,
            vote: json!("x".repeat(100)),
        },
    );
    assert_eq!(a.errors(), ["Invalid vote.", "Invalid vote."]);

    h.vote(&outsider, room_id, "8");
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert!(room.users[&a.id].vote.is_none());
    assert!(!room.has_member(&outsider.id));
}

#[tokio::test]
async fn test_kick_bans_until_duration_elapses() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let mut b = h.connect_from(Some("10.0.0.2"));
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    a.drain();
    b.drain();

    h.send_acked(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: b.id,
        },
        1,
    );

    let to_target = b.drain();
    assert_eq!(to_target[0], OutboundMessage::room_error(KICK_NOTICE));
    assert_eq!(to_target[1], OutboundMessage::Kicked {});
    assert!(b.handle.is_closed());
    assert!(!h.coordinator.rooms().get(&room_id).unwrap().has_member(&b.id));
    assert!(a.drain().contains(&OutboundMessage::Ack {
        id: 1,
        success: true,
        message: None
    }));
    assert_eq!(h.metrics.snapshot().kicks, 1);

    h.coordinator.disconnect(b.id);

    // Same name from a different address is still banned.
    let mut again = h.connect_from(Some("10.0.0.3"));
    h.register(&again, "Bob");
    h.join(&again, room_id);
    assert_eq!(again.errors(), ["Access denied."]);

    // Different name from the same address too.
    let mut sneaky = h.connect_from(Some("10.0.0.2"));
    h.register(&sneaky, "Robert");
    h.join(&sneaky, room_id);
    assert_eq!(sneaky.errors(), ["Access denied."]);

    h.advance(Duration::from_secs(61));
    h.join(&again, room_id);
    assert!(again.errors().is_empty());
    assert!(h.coordinator.rooms().get(&room_id).unwrap().has_member(&again.id));
}

#[tokio::test]
async fn test_oversized_durations_are_capped() {
    let mut config = helpers::test_config();
    config.rooms.room_ttl_seconds = 4 * 365 * 24 * 3600;
    config.rooms.ban_duration_seconds = u64::MAX;
    let mut h = Harness::with_config(config);
    let a = h.connect();
    let b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");

    let room_id = h.create_room(&a, "Sprint");
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(
        (room.expires_at - room.created_at).num_seconds() as u64,
        MAX_DURATION_SECONDS
    );

    h.join(&b, room_id);
    h.send(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: b.id,
        },
    );
    assert!(!h.coordinator.rooms().get(&room_id).unwrap().has_member(&b.id));
    assert_eq!(h.coordinator.stats().bans, 1);
}

#[tokio::test]
async fn test_owner_cannot_kick_self_or_strangers() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let stranger = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    a.drain();

    h.send_acked(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: a.id,
        },
        1,
    );
    h.send_acked(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: stranger.id,
        },
        2,
    );
    assert_eq!(
        a.drain(),
        vec![
            OutboundMessage::Ack {
                id: 1,
                success: false,
                message: None
            },
            OutboundMessage::Ack {
                id: 2,
                success: false,
                message: Some("User not found.".into())
            },
        ]
    );
    assert_eq!(h.coordinator.rooms().get(&room_id).unwrap().member_count(), 1);
}

#[tokio::test]
async fn test_kicking_a_stale_member() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    b.handle.mark_dead();

    h.send(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: b.id,
        },
    );
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert!(!room.has_member(&b.id));
    assert!(!b.handle.is_closed());
}

#[tokio::test]
async fn test_disconnect_cleans_up() {
    let mut h = Harness::new();
    let a = h.connect();
    let mut b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    b.drain();

    h.coordinator.disconnect(a.id);
    assert!(h.coordinator.registered_name(&a.id).is_none());
    assert!(h.pool.get(&a.id).is_none());
    assert!(a.handle.is_closed());

    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.owner, b.id);
    assert_eq!(room.member_count(), 1);
    assert!(b.drain().iter().any(|m| matches!(m, OutboundMessage::RoomListUpdated(list) if list[0].owner_name == "Bob")));

    h.coordinator.disconnect(b.id);
    assert!(h.coordinator.rooms().is_empty());
}

#[tokio::test]
async fn test_sweep_expires_rooms() {
    let mut h = Harness::new();
    let mut a = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    a.drain();

    assert_eq!(h.coordinator.sweep().rooms_destroyed(), 0);

    h.advance(Duration::from_secs(3600));
    let report = h.coordinator.sweep();
    assert_eq!(report.expired, 1);
    assert!(h.coordinator.rooms().get(&room_id).is_none());

    let messages = a.drain();
    assert_eq!(expired_notices(&messages), [REASON_EXPIRED]);
    assert!(messages.contains(&OutboundMessage::RoomListUpdated(Vec::new())));

    // Already gone: firing the TTL timer later changes nothing.
    assert!(!h.coordinator.expire_room(room_id));
    assert!(a.drain().is_empty());
}

#[tokio::test]
async fn test_sweep_prunes_bans() {
    let mut h = Harness::new();
    let a = h.connect();
    let b = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    h.send(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: b.id,
        },
    );
    assert_eq!(h.coordinator.stats().bans, 1);

    h.advance(Duration::from_secs(120));
    let report = h.coordinator.sweep();
    assert_eq!(report.bans_pruned, 1);
    assert_eq!(h.coordinator.stats().bans, 0);
    assert_eq!(h.coordinator.rooms().len(), 1);
}

#[tokio::test]
async fn test_check_room() {
    let mut h = Harness::new();
    let mut a = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    a.drain();

    h.send(
        &a,
        InboundMessage::CheckRoom {
            room_id: Some(room_id.to_string()),
        },
    );
    h.send(
        &a,
        InboundMessage::CheckRoom {
            room_id: Some("not-a-room".into()),
        },
    );
    let replies = a.drain();
    assert!(matches!(
        &replies[0],
        OutboundMessage::RoomCheckResult { exists: true, room_data: Some(room) } if room.id == room_id
    ));
    assert_eq!(
        replies[1],
        OutboundMessage::RoomCheckResult {
            exists: false,
            room_data: None
        }
    );
}

#[tokio::test]
async fn test_leave_always_republishes_room_list() {
    let mut h = Harness::new();
    let a = h.connect();
    let mut lobby = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    lobby.drain();

    // Leaving a room one never joined still refreshes the lobby.
    h.send(&lobby, InboundMessage::LeaveRoom { room_id });
    let lists: Vec<_> = lobby
        .drain()
        .into_iter()
        .filter(|m| matches!(m, OutboundMessage::RoomListUpdated(_)))
        .collect();
    assert_eq!(lists.len(), 1);
    assert_eq!(h.coordinator.rooms().len(), 1);
}

#[tokio::test]
async fn test_get_room_list_replies_to_caller_only() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let mut b = h.connect();
    h.register(&a, "Alice");
    h.create_room(&a, "Sprint");
    a.drain();
    b.drain();

    h.send(&b, InboundMessage::GetRoomList {});
    assert!(a.drain().is_empty());
    match b.drain().as_slice() {
        [OutboundMessage::RoomListUpdated(list)] => {
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].name, "Sprint");
            assert_eq!(list[0].owner_name, "Alice");
            assert_eq!(list[0].user_count, 1);
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn test_admin_operations_require_auth() {
    let mut h = Harness::new();
    let a = h.connect();
    let mut admin = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    admin.drain();

    h.send(
        &admin,
        InboundMessage::AdminAuth {
            password: Some("wrong".into()),
        },
    );
    h.send(&admin, InboundMessage::AdminGetData {});
    h.send(&admin, InboundMessage::AdminDeleteRoom { room_id });
    h.send(&admin, InboundMessage::AdminNuke {});
    assert_eq!(
        admin.drain(),
        vec![OutboundMessage::AdminAuthResult { success: false }]
    );
    assert!(h.coordinator.rooms().contains(&room_id));
}

#[tokio::test]
async fn test_admin_without_secret_always_fails() {
    let mut config = helpers::test_config();
    config.admin.secret = None;
    let mut h = Harness::with_config(config);
    let mut admin = h.connect();
    for password in [Some(""), None, Some(ADMIN_SECRET)] {
        h.send(
            &admin,
            InboundMessage::AdminAuth {
                password: password.map(str::to_string),
            },
        );
    }
    assert!(
        admin
            .drain()
            .iter()
            .all(|m| *m == OutboundMessage::AdminAuthResult { success: false })
    );
}

#[tokio::test]
async fn test_admin_delete_room_and_user() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let mut b = h.connect();
    let mut admin = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    let room_id = h.create_room(&a, "Sprint");
    h.join(&b, room_id);
    h.send(
        &admin,
        InboundMessage::AdminAuth {
            password: Some(ADMIN_SECRET.into()),
        },
    );
    admin.drain();
    a.drain();

    h.send_acked(
        &admin,
        InboundMessage::AdminDeleteUser {
            room_id,
            user_id: a.id,
        },
        4,
    );
    let room = h.coordinator.rooms().get(&room_id).unwrap();
    assert_eq!(room.owner, b.id);
    assert!(!room.has_member(&a.id));
    assert_eq!(
        a.drain()[..2],
        [
            OutboundMessage::room_error(ADMIN_REMOVAL_NOTICE),
            OutboundMessage::Kicked {}
        ]
    );
    let to_admin = admin.drain();
    assert!(to_admin.contains(&OutboundMessage::Ack {
        id: 4,
        success: true,
        message: None
    }));
    assert!(
        to_admin
            .iter()
            .any(|m| matches!(m, OutboundMessage::AdminDataUpdated(rooms) if rooms[&room_id].member_count() == 1))
    );

    b.drain();
    h.send(&admin, InboundMessage::AdminDeleteRoom { room_id });
    assert!(h.coordinator.rooms().is_empty());
    assert_eq!(expired_notices(&b.drain()), [REASON_ADMIN_DELETE]);

    // Destroying again is a no-op for members and reported to the admin.
    admin.drain();
    h.send(&admin, InboundMessage::AdminDeleteRoom { room_id });
    assert_eq!(admin.errors(), ["Room not found."]);
    assert!(b.drain().is_empty());
}

#[tokio::test]
async fn test_admin_delete_last_stale_member_destroys_room() {
    let mut h = Harness::new();
    let a = h.connect();
    let admin = h.connect();
    h.register(&a, "Alice");
    let room_id = h.create_room(&a, "Sprint");
    a.handle.mark_dead();
    h.send(
        &admin,
        InboundMessage::AdminAuth {
            password: Some(ADMIN_SECRET.into()),
        },
    );

    h.send(
        &admin,
        InboundMessage::AdminDeleteUser {
            room_id,
            user_id: a.id,
        },
    );
    assert!(h.coordinator.rooms().is_empty());
}

#[tokio::test]
async fn test_admin_nuke() {
    let mut h = Harness::new();
    let mut a = h.connect();
    let b = h.connect();
    let c = h.connect();
    let admin = h.connect();
    h.register(&a, "Alice");
    h.register(&b, "Bob");
    h.register(&c, "Carol");
    let room_id = h.create_room(&a, "One");
    h.create_room(&b, "Two");
    h.join(&c, room_id);
    h.send(
        &a,
        InboundMessage::KickUser {
            room_id,
            target_socket_id: c.id,
        },
    );
    assert_eq!(h.coordinator.stats().bans, 1);
    a.drain();

    h.send(
        &admin,
        InboundMessage::AdminAuth {
            password: Some(ADMIN_SECRET.into()),
        },
    );
    h.send(&admin, InboundMessage::AdminNuke {});

    let stats = h.coordinator.stats();
    assert_eq!((stats.rooms, stats.bans), (0, 0));
    assert_eq!(expired_notices(&a.drain()), [REASON_ADMIN_NUKE]);
    assert_eq!(h.metrics.snapshot().rooms_destroyed, 2);
}

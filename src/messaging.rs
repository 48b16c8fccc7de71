use crate::models::message::Message;
use crate::models::profile::ProfileSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A two-party thread as the conversation list shows it. Derived from the
/// message set on every request, never stored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Conversation {
    pub counterpart: ProfileSnapshot,
    pub last_message: Message,
    pub unread_count: usize,
}

/// Collapse the messages visible to `current_user_id` (sent and received)
/// into one entry per counterpart, newest-activity first.
///
/// A message whose counterpart snapshot cannot be resolved never opens a
/// conversation; once an entry exists, later snapshot-less messages of the
/// same counterpart still update it.
pub fn aggregate_conversations(messages: &[Message], current_user_id: &str) -> Vec<Conversation> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut conversations: Vec<Conversation> = Vec::new();

    for msg in messages {
        let (counterpart_id, snapshot) = if msg.sender_id == current_user_id {
            (msg.receiver_id.as_str(), &msg.receiver)
        } else {
            (msg.sender_id.as_str(), &msg.sender)
        };

        let slot = match index.get(counterpart_id) {
            Some(&i) => Some(i),
            None => match snapshot {
                Some(snap) => {
                    index.insert(counterpart_id, conversations.len());
                    conversations.push(Conversation {
                        counterpart: snap.clone(),
                        last_message: msg.clone(),
                        unread_count: 0,
                    });
                    Some(conversations.len() - 1)
                }
                None => {
                    log::debug!(
                        "message {} has no snapshot for counterpart {}, skipping",
                        msg.id,
                        counterpart_id
                    );
                    None
                }
            },
        };

        if let Some(i) = slot {
            let conv = &mut conversations[i];
            if msg.created_at > conv.last_message.created_at {
                conv.last_message = msg.clone();
            }
            // Counted even when this message is not the latest one.
            if msg.receiver_id == current_user_id && !msg.is_read {
                conv.unread_count += 1;
            }
        }
    }

    // Stable sort keeps first-sighting order for equal timestamps.
    conversations.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));
    conversations
}

/// Messages exchanged with one counterpart, oldest first.
pub fn thread_with(messages: &[Message], counterpart_id: &str) -> Vec<Message> {
    let mut thread: Vec<Message> = messages
        .iter()
        .filter(|m| m.sender_id == counterpart_id || m.receiver_id == counterpart_id)
        .cloned()
        .collect();
    thread.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    thread
}

/// Flip every unread message the counterpart sent to `current_user_id` to
/// read. Returns how many flipped; calling again is a no-op.
pub fn mark_thread_read(
    messages: &mut [Message],
    current_user_id: &str,
    counterpart_id: &str,
) -> usize {
    let mut marked = 0;
    for msg in messages.iter_mut() {
        if msg.sender_id == counterpart_id && msg.receiver_id == current_user_id && !msg.is_read {
            msg.is_read = true;
            marked += 1;
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    const ME: &str = "demo-user-1";

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 10, minute, 0).unwrap()
    }

    fn snap(id: &str) -> ProfileSnapshot {
        ProfileSnapshot {
            id: id.to_string(),
            email: format!("{id}@mail.kyutech.jp"),
            full_name: None,
            is_alumni: false,
        }
    }

    fn msg(id: &str, from: &str, to: &str, minute: u32, is_read: bool) -> Message {
        Message {
            id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            content: format!("message {id}"),
            is_read,
            created_at: at(minute),
            sender: Some(snap(from)),
            receiver: Some(snap(to)),
        }
    }

    #[test]
    fn one_entry_per_counterpart_regardless_of_direction() {
        let messages = vec![
            msg("m1", ME, "user-1", 0, true),
            msg("m2", "user-1", ME, 1, true),
            msg("m3", "user-2", ME, 2, false),
            msg("m4", ME, "user-1", 3, false),
        ];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs.len(), 2);
        let ids: Vec<&str> = convs.iter().map(|c| c.counterpart.id.as_str()).collect();
        assert!(ids.contains(&"user-1"));
        assert!(ids.contains(&"user-2"));
    }

    #[test]
    fn last_message_has_max_timestamp_even_out_of_order() {
        let messages = vec![
            msg("m1", "user-1", ME, 5, true),
            msg("m2", ME, "user-1", 2, true),
            msg("m3", "user-1", ME, 9, true),
            msg("m4", ME, "user-1", 7, true),
        ];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].last_message.id, "m3");
    }

    #[test]
    fn unread_counts_only_messages_addressed_to_me() {
        let messages = vec![
            msg("m1", "user-1", ME, 0, false),
            msg("m2", "user-1", ME, 1, false),
            msg("m3", ME, "user-1", 2, false),
            msg("m4", "user-1", ME, 3, true),
        ];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs[0].unread_count, 2);
    }

    #[test]
    fn unread_counted_even_when_a_newer_message_is_last() {
        // The old unread message never becomes the last message but still counts.
        let messages = vec![
            msg("m1", "user-1", ME, 0, false),
            msg("m2", "user-1", ME, 8, true),
        ];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs[0].last_message.id, "m2");
        assert_eq!(convs[0].unread_count, 1);
    }

    #[test]
    fn reply_scenario_leaves_nothing_unread_for_the_sender() {
        // A sent an unread message to B, B replied read: viewed by A there is
        // one conversation, last message is the reply, nothing unread for A.
        let messages = vec![
            msg("m1", ME, "user-1", 1, false),
            msg("m2", "user-1", ME, 2, true),
        ];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].counterpart.id, "user-1");
        assert_eq!(convs[0].last_message.id, "m2");
        assert_eq!(convs[0].unread_count, 0);
    }

    #[test]
    fn conversations_sorted_by_latest_activity() {
        let messages = vec![
            msg("m1", "user-1", ME, 1, true),
            msg("m2", "user-2", ME, 5, true),
            msg("m3", "user-3", ME, 3, true),
        ];
        let convs = aggregate_conversations(&messages, ME);
        let ids: Vec<&str> = convs.iter().map(|c| c.counterpart.id.as_str()).collect();
        assert_eq!(ids, vec!["user-2", "user-3", "user-1"]);
    }

    #[test]
    fn message_without_snapshot_opens_no_conversation() {
        let mut orphan = msg("m1", "user-9", ME, 0, false);
        orphan.sender = None;
        let convs = aggregate_conversations(&[orphan], ME);
        assert!(convs.is_empty());
    }

    #[test]
    fn snapshotless_message_still_updates_an_existing_conversation() {
        let mut follow_up = msg("m2", "user-1", ME, 4, false);
        follow_up.sender = None;
        let messages = vec![msg("m1", "user-1", ME, 1, true), follow_up];
        let convs = aggregate_conversations(&messages, ME);
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].last_message.id, "m2");
        assert_eq!(convs[0].unread_count, 1);
    }

    #[test]
    fn thread_is_chronological_and_scoped_to_the_counterpart() {
        let messages = vec![
            msg("m1", "user-1", ME, 6, true),
            msg("m2", "user-2", ME, 2, true),
            msg("m3", ME, "user-1", 3, true),
        ];
        let thread = thread_with(&messages, "user-1");
        let ids: Vec<&str> = thread.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m1"]);
    }

    #[test]
    fn mark_thread_read_is_scoped_and_idempotent() {
        let mut messages = vec![
            msg("m1", "user-1", ME, 0, false),
            msg("m2", "user-2", ME, 1, false),
            msg("m3", ME, "user-1", 2, false),
        ];
        assert_eq!(mark_thread_read(&mut messages, ME, "user-1"), 1);
        assert!(messages[0].is_read);
        // Other threads and my own outgoing messages are untouched.
        assert!(!messages[1].is_read);
        assert!(!messages[2].is_read);
        assert_eq!(mark_thread_read(&mut messages, ME, "user-1"), 0);
    }
}

//! End-to-end console state tests
//!
//! Drives the application state through the public API the UI uses: chat
//! submission and streaming, store CRUD through the form helpers, and the
//! filter derivations. No audio devices or network are touched.

use aquadesk::inventory::{DeviceFilter, DeviceStatus, TaskStatus};
use aquadesk::messages::Role;
use aquadesk::relay::{ChatCommand, ChatEvent, VoiceEvent, VoicePhase};
use aquadesk::ui::AppState;
use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

struct ChatHarness {
    state: AppState,
    command_rx: Receiver<ChatCommand>,
    event_tx: Sender<ChatEvent>,
}

impl ChatHarness {
    fn new() -> Self {
        let mut state = AppState::new();
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(64);
        state.attach_chat(command_tx, event_rx);
        Self {
            state,
            command_rx,
            event_tx,
        }
    }

    fn submit(&mut self, prompt: &str) -> Option<Uuid> {
        self.state.input_text = prompt.to_string();
        self.state.send_message();
        match self.command_rx.try_recv() {
            Ok(ChatCommand::Generate { request_id, .. }) => Some(request_id),
            _ => None,
        }
    }

    fn stream(&mut self, request_id: Uuid, fragments: &[&str]) {
        for fragment in fragments {
            self.event_tx
                .send(ChatEvent::Fragment {
                    text: fragment.to_string(),
                    request_id,
                })
                .unwrap();
        }
        self.event_tx
            .send(ChatEvent::Completed {
                full_text: fragments.concat(),
                request_id,
            })
            .unwrap();
        self.state.poll_events();
    }
}

#[test]
fn streamed_fragments_concatenate_into_displayed_text() {
    let mut harness = ChatHarness::new();
    let request_id = harness.submit("How is the oxygen level?").unwrap();

    let fragments = ["Dissolved ", "oxygen is ", "stable at 6.8 mg/L."];
    harness.stream(request_id, &fragments);

    let messages = harness.state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, fragments.concat());
    assert!(!harness.state.is_streaming);
}

#[test]
fn whitespace_prompt_issues_no_request_and_no_message() {
    let mut harness = ChatHarness::new();
    assert!(harness.submit("   \t ").is_none());
    assert!(harness.state.messages.is_empty());
}

#[test]
fn failed_request_degrades_to_inline_error() {
    let mut harness = ChatHarness::new();
    let request_id = harness.submit("hello").unwrap();

    harness
        .event_tx
        .send(ChatEvent::Failed {
            notice: "Error: Could not connect to the AI service.".to_string(),
            request_id,
        })
        .unwrap();
    harness.state.poll_events();

    let messages = harness.state.messages.get_all();
    assert!(messages[1].is_error);
    assert_eq!(messages[1].content, "Error: Could not connect to the AI service.");
    // The busy flag must release so the user can retry manually.
    assert!(!harness.state.is_streaming);
}

#[test]
fn second_submission_while_streaming_is_blocked() {
    let mut harness = ChatHarness::new();
    let first = harness.submit("first").unwrap();
    assert!(harness.submit("second").is_none());
    assert_eq!(harness.state.messages.len(), 2);

    harness.stream(first, &["done"]);
    assert!(harness.submit("third").is_some());
}

#[test]
fn device_crud_through_forms() {
    let mut state = AppState::new();
    let seeded = state.devices.len();

    // Validation failure keeps the dialog open and the store untouched.
    state.open_device_add();
    assert!(!state.save_device_form());
    assert_eq!(state.devices.len(), seeded);

    state
        .device_form
        .as_mut()
        .map(|form| {
            form.draft.name = "Backup Aerator".to_string();
            form.draft.pond = "Pond 5".to_string();
        })
        .unwrap();
    assert!(state.save_device_form());
    assert_eq!(state.devices.len(), seeded + 1);

    let id = state.devices.all()[0].id.clone();
    let others: Vec<String> = state.devices.all()[1..]
        .iter()
        .map(|d| d.id.clone())
        .collect();

    // Delete removes exactly the confirmed record.
    state.confirm_delete_device = Some(id.clone());
    state.confirm_device_delete();
    assert_eq!(state.devices.len(), seeded);
    let remaining: Vec<String> = state.devices.all().iter().map(|d| d.id.clone()).collect();
    assert_eq!(remaining, others);
}

#[test]
fn online_filter_returns_online_devices_in_order() {
    let state = AppState::new();
    let filter = DeviceFilter {
        status: Some(DeviceStatus::Online),
        ..DeviceFilter::default()
    };
    let visible = filter.apply(state.devices.all());
    assert!(!visible.is_empty());
    assert!(visible.iter().all(|d| d.status == DeviceStatus::Online));

    let all_online: Vec<&str> = state
        .devices
        .all()
        .iter()
        .filter(|d| d.status == DeviceStatus::Online)
        .map(|d| d.id.as_str())
        .collect();
    let filtered: Vec<&str> = visible.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(filtered, all_online);
}

#[test]
fn task_form_save_then_edit_in_place() {
    let mut state = AppState::new();
    state.open_task_add();
    {
        let form = state.task_form.as_mut().unwrap();
        form.draft.name = "Replace net".to_string();
        form.draft.assignee = "Li".to_string();
    }
    assert!(state.save_task_form());
    let id = state.tasks.all()[0].id.clone();

    state.task_form = None;
    state.open_task_edit(&id);
    {
        let form = state.task_form.as_mut().unwrap();
        assert_eq!(form.draft.name, "Replace net");
        form.draft.status = TaskStatus::Cancelled;
    }
    assert!(state.save_task_form());
    assert_eq!(state.tasks.get(&id).unwrap().status, TaskStatus::Cancelled);
    assert_eq!(state.tasks.all()[0].id, id);
}

#[test]
fn voice_transcripts_coalesce_and_typed_messages_interleave() {
    let mut state = AppState::new();
    let (command_tx, _command_rx) = bounded(16);
    let (event_tx, event_rx) = bounded(64);
    state.attach_voice(command_tx, event_rx);

    for event in [
        VoiceEvent::PhaseChanged(VoicePhase::Listening),
        VoiceEvent::Transcript {
            role: Role::User,
            text: "what's the ".to_string(),
        },
        VoiceEvent::Transcript {
            role: Role::User,
            text: "water temperature".to_string(),
        },
        VoiceEvent::Transcript {
            role: Role::Assistant,
            text: "Sixteen degrees.".to_string(),
        },
    ] {
        event_tx.send(event).unwrap();
    }
    state.poll_events();

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "what's the water temperature");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(state.voice_phase, VoicePhase::Listening);
}

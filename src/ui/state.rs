//! Application state management
//!
//! Central state for the console UI: the chat transcript and busy flag, the
//! device/task stores with their filter state, form state for the add/edit
//! dialogs, and the channel endpoints of the relay pipelines. All mutation
//! happens on the UI thread; worker events are drained once per frame in
//! [`AppState::poll_events`].

use crate::inventory::{
    DeviceDraft, DeviceFilter, DeviceStore, TaskDraft, TaskFilter, TaskStatus, TaskStore,
};
use crate::messages::{ChatMessage, MessageStorage, Role};
use crate::relay::{ChatCommand, ChatEvent, VoiceCommand, VoiceEvent, VoicePhase};
use crossbeam_channel::{unbounded, Receiver, Sender as ChannelSender};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Notice shown when no API credential was configured at startup.
pub const RELAY_UNCONFIGURED_NOTICE: &str =
    "Error: GEMINI_API_KEY is not configured; the AI assistant is unavailable.";

/// Simulated execution delay for the manual task-execute action.
const EXECUTE_DELAY: Duration = Duration::from_secs(2);

/// Simulated duration of the device link test.
const LINK_TEST_DELAY: Duration = Duration::from_secs(2);

/// Top-level view selected in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    Devices,
    Tasks,
}

/// Manual-execute progress inside the task form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    Idle,
    Processing,
    Done,
}

/// Simulated link-test progress inside the device form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTestPhase {
    Idle,
    Testing,
    Ready,
}

/// State of the device add/edit dialog
pub struct DeviceFormState {
    /// Id of the record being edited; None when registering a new one
    pub editing: Option<String>,
    pub draft: DeviceDraft,
    /// Inline validation error
    pub error: Option<String>,
    /// Streamed AI analysis of the draft
    pub analysis: String,
    pub analysis_request: Option<Uuid>,
    pub link_test: LinkTestPhase,
    pub link_log: Vec<String>,
}

impl DeviceFormState {
    pub fn add() -> Self {
        Self {
            editing: None,
            draft: DeviceDraft::default(),
            error: None,
            analysis: String::new(),
            analysis_request: None,
            link_test: LinkTestPhase::Idle,
            link_log: Vec::new(),
        }
    }

    pub fn edit(id: String, draft: DeviceDraft) -> Self {
        let mut form = Self::add();
        form.editing = Some(id);
        form.draft = draft;
        form
    }
}

/// State of the task add/edit dialog
pub struct TaskFormState {
    pub editing: Option<String>,
    pub draft: TaskDraft,
    pub error: Option<String>,
    pub analysis: String,
    pub analysis_request: Option<Uuid>,
    pub execution: ExecutionPhase,
}

impl TaskFormState {
    pub fn add() -> Self {
        Self {
            editing: None,
            draft: TaskDraft::default(),
            error: None,
            analysis: String::new(),
            analysis_request: None,
            execution: ExecutionPhase::Idle,
        }
    }

    pub fn edit(id: String, draft: TaskDraft) -> Self {
        let mut form = Self::add();
        form.editing = Some(id);
        form.draft = draft;
        form
    }
}

/// Completion notices from simulated delays (manual execute, link test)
#[derive(Debug, Clone)]
pub enum TimerEvent {
    TaskExecuted { id: String },
    LinkTestFinished,
}

/// Central application state
pub struct AppState {
    pub view: View,

    /// Chat transcript (thread-safe; shared with nothing else in practice)
    pub messages: MessageStorage,

    /// Current text input
    pub input_text: String,

    /// Advisory busy flag: blocks double-submission while a text stream is
    /// in flight. The relay itself does not enforce it.
    pub is_streaming: bool,
    stream_request: Option<Uuid>,
    stream_accumulator: String,

    /// Voice relay phase as last reported by the worker
    pub voice_phase: VoicePhase,

    pub devices: DeviceStore,
    pub tasks: TaskStore,
    pub device_filter: DeviceFilter,
    pub task_filter: TaskFilter,

    pub device_form: Option<DeviceFormState>,
    pub task_form: Option<TaskFormState>,
    /// Device id awaiting delete confirmation
    pub confirm_delete_device: Option<String>,
    pub confirm_delete_task: Option<String>,
    /// Device id shown in the detail dialog
    pub detail_device: Option<String>,
    pub detail_task: Option<String>,

    /// Pond selected in the data side panel
    pub selected_pond: String,

    pub chat_command_tx: Option<ChannelSender<ChatCommand>>,
    pub chat_event_rx: Option<Receiver<ChatEvent>>,
    pub voice_command_tx: Option<ChannelSender<VoiceCommand>>,
    pub voice_event_rx: Option<Receiver<VoiceEvent>>,

    timer_tx: ChannelSender<TimerEvent>,
    timer_rx: Receiver<TimerEvent>,

    /// Last relay error, shown in the header
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let (timer_tx, timer_rx) = unbounded();
        Self {
            view: View::Chat,
            messages: MessageStorage::new(),
            input_text: String::new(),
            is_streaming: false,
            stream_request: None,
            stream_accumulator: String::new(),
            voice_phase: VoicePhase::Idle,
            devices: DeviceStore::seeded(),
            tasks: TaskStore::seeded(),
            device_filter: DeviceFilter::default(),
            task_filter: TaskFilter::default(),
            device_form: None,
            task_form: None,
            confirm_delete_device: None,
            confirm_delete_task: None,
            detail_device: None,
            detail_task: None,
            selected_pond: "Pond 4".to_string(),
            chat_command_tx: None,
            chat_event_rx: None,
            voice_command_tx: None,
            voice_event_rx: None,
            timer_tx,
            timer_rx,
            last_error: None,
        }
    }

    /// Wire up the relay pipeline endpoints.
    pub fn attach_chat(&mut self, tx: ChannelSender<ChatCommand>, rx: Receiver<ChatEvent>) {
        self.chat_command_tx = Some(tx);
        self.chat_event_rx = Some(rx);
    }

    pub fn attach_voice(&mut self, tx: ChannelSender<VoiceCommand>, rx: Receiver<VoiceEvent>) {
        self.voice_command_tx = Some(tx);
        self.voice_event_rx = Some(rx);
    }

    // -----------------
    // Chat
    // -----------------

    /// Submit the input box to the assistant. Empty or whitespace-only input
    /// is a no-op, as is submitting while a stream is in flight.
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() || self.is_streaming {
            return;
        }

        self.messages.push(ChatMessage::new(Role::User, text.clone()));
        self.input_text.clear();
        self.messages.begin_assistant();

        match &self.chat_command_tx {
            Some(tx) => {
                let request_id = Uuid::new_v4();
                self.stream_request = Some(request_id);
                self.stream_accumulator.clear();
                self.is_streaming = true;
                let _ = tx.send(ChatCommand::Generate {
                    prompt: text,
                    request_id,
                });
            }
            None => {
                self.messages.close_open(Some(RELAY_UNCONFIGURED_NOTICE));
            }
        }
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.is_streaming = false;
        self.stream_request = None;
        self.stream_accumulator.clear();
    }

    // -----------------
    // Voice
    // -----------------

    pub fn toggle_voice(&mut self) {
        let Some(tx) = &self.voice_command_tx else {
            self.last_error = Some(RELAY_UNCONFIGURED_NOTICE.to_string());
            return;
        };
        if self.voice_phase == VoicePhase::Idle {
            let _ = tx.send(VoiceCommand::Start);
        } else {
            let _ = tx.send(VoiceCommand::Stop);
        }
    }

    // -----------------
    // Device forms
    // -----------------

    pub fn open_device_add(&mut self) {
        self.device_form = Some(DeviceFormState::add());
    }

    pub fn open_device_edit(&mut self, id: &str) {
        if let Some(device) = self.devices.get(id) {
            self.device_form = Some(DeviceFormState::edit(
                device.id.clone(),
                DeviceDraft::from_device(device),
            ));
        }
    }

    /// Save the device form. Returns true when the dialog should close.
    pub fn save_device_form(&mut self) -> bool {
        let Some(form) = self.device_form.as_mut() else {
            return false;
        };
        let result = match &form.editing {
            Some(id) => self.devices.update(id, &form.draft).map(|_| ()),
            None => self.devices.create(&form.draft).map(|_| ()),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                form.error = Some(e.user_message());
                false
            }
        }
    }

    pub fn confirm_device_delete(&mut self) {
        if let Some(id) = self.confirm_delete_device.take() {
            self.devices.remove(&id);
        }
    }

    /// Kick off the simulated connectivity test shown in the device form.
    pub fn run_link_test(&mut self) {
        let Some(form) = self.device_form.as_mut() else {
            return;
        };
        if form.link_test == LinkTestPhase::Testing {
            return;
        }
        form.link_test = LinkTestPhase::Testing;
        form.link_log = vec![
            "Connecting to IoT control hub...".to_string(),
            "Requesting device serial authorization...".to_string(),
            "Checking link...".to_string(),
        ];

        let tx = self.timer_tx.clone();
        std::thread::spawn(move || {
            std::thread::sleep(LINK_TEST_DELAY);
            let _ = tx.send(TimerEvent::LinkTestFinished);
        });
    }

    /// Ask the assistant to analyze the device draft, streaming into the form.
    pub fn analyze_device_draft(&mut self) {
        let Some(form) = self.device_form.as_mut() else {
            return;
        };
        if form.draft.description.trim().is_empty() {
            form.error = Some("Enter a device description for the AI to analyze".to_string());
            return;
        }
        let prompt = format!(
            "Analyze this aquaculture device. Name: {}. Description: {}. \
             Explain its purpose, how it should be controlled, and where AI \
             intervention makes sense.",
            form.draft.name, form.draft.description
        );
        Self::request_analysis(
            &self.chat_command_tx,
            &mut form.analysis,
            &mut form.analysis_request,
            prompt,
        );
    }

    // -----------------
    // Task forms
    // -----------------

    pub fn open_task_add(&mut self) {
        self.task_form = Some(TaskFormState::add());
    }

    pub fn open_task_edit(&mut self, id: &str) {
        if let Some(task) = self.tasks.get(id) {
            self.task_form = Some(TaskFormState::edit(task.id.clone(), TaskDraft::from_task(task)));
        }
    }

    /// Save the task form. Returns true when the dialog should close.
    pub fn save_task_form(&mut self) -> bool {
        self.save_task_draft().is_some()
    }

    /// Save the form draft, returning the saved record's id.
    fn save_task_draft(&mut self) -> Option<String> {
        let form = self.task_form.as_mut()?;
        let result = match form.editing.clone() {
            Some(id) => self.tasks.update(&id, &form.draft).map(|_| id),
            None => self.tasks.create(&form.draft).map(|task| task.id),
        };
        match result {
            Ok(id) => {
                // Keep the reference so manual execute targets the new record.
                form.editing = Some(id.clone());
                form.error = None;
                Some(id)
            }
            Err(e) => {
                form.error = Some(e.user_message());
                None
            }
        }
    }

    pub fn confirm_task_delete(&mut self) {
        if let Some(id) = self.confirm_delete_task.take() {
            self.tasks.remove(&id);
        }
    }

    /// Manual execute: save the draft, mark it in progress, and complete it
    /// after a fixed simulated delay. The completion is asserted, not
    /// verified against any real-world effect.
    pub fn execute_task(&mut self) {
        let Some(id) = self.save_task_draft() else {
            return;
        };
        if let Some(form) = self.task_form.as_mut() {
            if form.execution == ExecutionPhase::Processing {
                return;
            }
            form.execution = ExecutionPhase::Processing;
        }
        self.tasks.set_status(&id, TaskStatus::InProgress);

        let tx = self.timer_tx.clone();
        std::thread::spawn(move || {
            std::thread::sleep(EXECUTE_DELAY);
            let _ = tx.send(TimerEvent::TaskExecuted { id });
        });
    }

    /// Ask the assistant to analyze the task draft, streaming into the form.
    pub fn analyze_task_draft(&mut self) {
        let Some(form) = self.task_form.as_mut() else {
            return;
        };
        if form.draft.description.trim().is_empty() {
            form.error = Some("Enter a task description for the AI to analyze".to_string());
            return;
        }
        let prompt = format!(
            "As an aquaculture expert, analyze this task.\nName: {}\nDescription: {}\n\
             Pond: {}\n\nProvide:\n1. Logical execution steps.\n2. Risks and safety notes.\n\
             3. Suggestions to improve efficiency.",
            form.draft.name, form.draft.description, form.draft.pond
        );
        Self::request_analysis(
            &self.chat_command_tx,
            &mut form.analysis,
            &mut form.analysis_request,
            prompt,
        );
    }

    fn request_analysis(
        command_tx: &Option<ChannelSender<ChatCommand>>,
        analysis: &mut String,
        analysis_request: &mut Option<Uuid>,
        prompt: String,
    ) {
        if analysis_request.is_some() {
            return;
        }
        match command_tx {
            Some(tx) => {
                let request_id = Uuid::new_v4();
                analysis.clear();
                *analysis_request = Some(request_id);
                let _ = tx.send(ChatCommand::Generate { prompt, request_id });
            }
            None => {
                *analysis = RELAY_UNCONFIGURED_NOTICE.to_string();
            }
        }
    }

    // -----------------
    // Event polling
    // -----------------

    /// Drain pending worker events. Called once per frame.
    pub fn poll_events(&mut self) {
        self.poll_chat_events();
        self.poll_voice_events();
        self.poll_timer_events();
    }

    fn poll_chat_events(&mut self) {
        let events: Vec<ChatEvent> = match &self.chat_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };

        for event in events {
            match event {
                ChatEvent::Fragment { text, request_id } => {
                    if self.stream_request == Some(request_id) {
                        self.stream_accumulator.push_str(&text);
                        self.messages.set_open_text(&self.stream_accumulator);
                    } else {
                        self.append_analysis_fragment(request_id, &text);
                    }
                }
                ChatEvent::Completed {
                    full_text,
                    request_id,
                } => {
                    if self.stream_request == Some(request_id) {
                        self.messages.set_open_text(&full_text);
                        self.messages.close_open(None);
                        self.stream_request = None;
                        self.is_streaming = false;
                    } else {
                        self.finish_analysis(request_id, None);
                    }
                }
                ChatEvent::Failed { notice, request_id } => {
                    if self.stream_request == Some(request_id) {
                        self.messages.close_open(Some(&notice));
                        self.stream_request = None;
                        self.is_streaming = false;
                    } else {
                        self.finish_analysis(request_id, Some(notice));
                    }
                }
                ChatEvent::Shutdown => {
                    debug!("Text relay shut down");
                }
            }
        }
    }

    fn append_analysis_fragment(&mut self, request_id: Uuid, text: &str) {
        if let Some(form) = self.device_form.as_mut() {
            if form.analysis_request == Some(request_id) {
                form.analysis.push_str(text);
                return;
            }
        }
        if let Some(form) = self.task_form.as_mut() {
            if form.analysis_request == Some(request_id) {
                form.analysis.push_str(text);
            }
        }
    }

    fn finish_analysis(&mut self, request_id: Uuid, failure: Option<String>) {
        if let Some(form) = self.device_form.as_mut() {
            if form.analysis_request == Some(request_id) {
                if let Some(notice) = failure {
                    form.analysis = notice;
                }
                form.analysis_request = None;
                return;
            }
        }
        if let Some(form) = self.task_form.as_mut() {
            if form.analysis_request == Some(request_id) {
                if let Some(notice) = failure {
                    form.analysis = notice;
                }
                form.analysis_request = None;
            }
        }
    }

    fn poll_voice_events(&mut self) {
        let events: Vec<VoiceEvent> = match &self.voice_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };

        for event in events {
            match event {
                VoiceEvent::PhaseChanged(phase) => {
                    self.voice_phase = phase;
                }
                VoiceEvent::Transcript { role, text } => {
                    self.messages.coalesce_voice(role, &text);
                }
                VoiceEvent::Error(message) => {
                    self.last_error = Some(message);
                }
                VoiceEvent::Shutdown => {
                    debug!("Voice relay shut down");
                }
            }
        }
    }

    fn poll_timer_events(&mut self) {
        let events: Vec<TimerEvent> = self.timer_rx.try_iter().collect();
        for event in events {
            match event {
                TimerEvent::TaskExecuted { id } => {
                    self.tasks.set_status(&id, TaskStatus::Completed);
                    if let Some(form) = self.task_form.as_mut() {
                        if form.editing.as_deref() == Some(id.as_str()) {
                            form.execution = ExecutionPhase::Done;
                        }
                    }
                }
                TimerEvent::LinkTestFinished => {
                    if let Some(form) = self.device_form.as_mut() {
                        if form.link_test == LinkTestPhase::Testing {
                            form.link_test = LinkTestPhase::Ready;
                            form.link_log.push("Handshake succeeded".to_string());
                            form.link_log.push("Feedback latency: 24ms".to_string());
                            form.link_log.push("Status: READY".to_string());
                        }
                    }
                }
            }
        }
    }

    /// True while any background affordance should keep the UI repainting.
    pub fn is_busy(&self) -> bool {
        self.is_streaming
            || self.voice_phase != VoicePhase::Idle
            || self
                .device_form
                .as_ref()
                .is_some_and(|f| f.analysis_request.is_some() || f.link_test == LinkTestPhase::Testing)
            || self
                .task_form
                .as_ref()
                .is_some_and(|f| f.analysis_request.is_some() || f.execution == ExecutionPhase::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn state_with_chat() -> (AppState, Receiver<ChatCommand>, ChannelSender<ChatEvent>) {
        let mut state = AppState::new();
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);
        state.attach_chat(command_tx, event_rx);
        (state, command_rx, event_tx)
    }

    #[test]
    fn test_empty_prompt_is_noop() {
        let (mut state, command_rx, _event_tx) = state_with_chat();
        state.input_text = "   ".to_string();
        state.send_message();
        assert!(state.messages.is_empty());
        assert!(command_rx.try_recv().is_err());
        assert!(!state.is_streaming);
    }

    #[test]
    fn test_send_appends_user_and_opens_assistant() {
        let (mut state, command_rx, _event_tx) = state_with_chat();
        state.input_text = "How is Pond 4?".to_string();
        state.send_message();

        let all = state.messages.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].role, Role::User);
        assert_eq!(all[1].role, Role::Assistant);
        assert!(state.is_streaming);
        assert!(state.input_text.is_empty());
        assert!(matches!(
            command_rx.try_recv(),
            Ok(ChatCommand::Generate { .. })
        ));
    }

    #[test]
    fn test_busy_flag_blocks_second_submission() {
        let (mut state, command_rx, _event_tx) = state_with_chat();
        state.input_text = "first".to_string();
        state.send_message();
        let _ = command_rx.try_recv();

        state.input_text = "second".to_string();
        state.send_message();
        assert_eq!(state.input_text, "second");
        assert!(command_rx.try_recv().is_err());
        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn test_fragments_accumulate_into_open_message() {
        let (mut state, command_rx, event_tx) = state_with_chat();
        state.input_text = "hello".to_string();
        state.send_message();
        let request_id = match command_rx.try_recv() {
            Ok(ChatCommand::Generate { request_id, .. }) => request_id,
            _ => panic!("expected generate command"),
        };

        event_tx
            .send(ChatEvent::Fragment {
                text: "Good ".into(),
                request_id,
            })
            .unwrap();
        event_tx
            .send(ChatEvent::Fragment {
                text: "morning.".into(),
                request_id,
            })
            .unwrap();
        state.poll_events();
        assert_eq!(state.messages.get_all()[1].content, "Good morning.");
        assert!(state.is_streaming);

        event_tx
            .send(ChatEvent::Completed {
                full_text: "Good morning.".into(),
                request_id,
            })
            .unwrap();
        state.poll_events();
        assert!(!state.is_streaming);
        assert_eq!(state.messages.get_all()[1].content, "Good morning.");
    }

    #[test]
    fn test_failed_stream_shows_error_message() {
        let (mut state, command_rx, event_tx) = state_with_chat();
        state.input_text = "hello".to_string();
        state.send_message();
        let request_id = match command_rx.try_recv() {
            Ok(ChatCommand::Generate { request_id, .. }) => request_id,
            _ => panic!("expected generate command"),
        };

        event_tx
            .send(ChatEvent::Failed {
                notice: "Error: Could not connect to the AI service.".into(),
                request_id,
            })
            .unwrap();
        state.poll_events();

        let all = state.messages.get_all();
        assert!(all[1].is_error);
        assert!(!state.is_streaming);
    }

    #[test]
    fn test_unconfigured_relay_degrades_to_notice() {
        let mut state = AppState::new();
        state.input_text = "hello".to_string();
        state.send_message();
        let all = state.messages.get_all();
        assert_eq!(all.len(), 2);
        assert!(all[1].is_error);
        assert!(!state.is_streaming);
    }

    #[test]
    fn test_voice_transcripts_coalesce() {
        let mut state = AppState::new();
        let (command_tx, _command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);
        state.attach_voice(command_tx, event_rx);

        for text in ["check ", "the feeder"] {
            event_tx
                .send(VoiceEvent::Transcript {
                    role: Role::User,
                    text: text.into(),
                })
                .unwrap();
        }
        event_tx
            .send(VoiceEvent::PhaseChanged(VoicePhase::Speaking))
            .unwrap();
        state.poll_events();

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages.get_all()[0].content, "check the feeder");
        assert_eq!(state.voice_phase, VoicePhase::Speaking);
    }

    #[test]
    fn test_device_form_validation_blocks_save() {
        let mut state = AppState::new();
        state.open_device_add();
        assert!(!state.save_device_form());
        assert!(state.device_form.as_ref().unwrap().error.is_some());
        assert_eq!(state.devices.len(), 4);
    }

    #[test]
    fn test_task_execute_completes_after_delay() {
        let mut state = AppState::new();
        state.open_task_add();
        {
            let form = state.task_form.as_mut().unwrap();
            form.draft.name = "Drain filter".into();
            form.draft.assignee = "Chen".into();
        }
        state.execute_task();

        let id = state
            .task_form
            .as_ref()
            .unwrap()
            .editing
            .clone()
            .expect("draft saved before execution");
        assert_eq!(state.tasks.get(&id).unwrap().status, TaskStatus::InProgress);

        // The completion notice arrives on the timer channel.
        std::thread::sleep(Duration::from_millis(2300));
        state.poll_events();
        assert_eq!(state.tasks.get(&id).unwrap().status, TaskStatus::Completed);
        assert_eq!(
            state.task_form.as_ref().unwrap().execution,
            ExecutionPhase::Done
        );
    }
}

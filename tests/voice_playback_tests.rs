//! Voice-path tests: wire PCM framing, the session tagged union, and the
//! gapless playback scheduling contract, without touching audio devices or
//! the network.

use aquadesk::audio::{pcm, PlaybackQueue, PlaybackSchedule, DOWNLINK_SAMPLE_RATE};
use aquadesk::relay::protocol::{parse_session_message, SessionEvent};

#[test]
fn wire_frame_round_trips_through_session_message() {
    // Encode a fragment the way the endpoint would, wrap it in a server
    // message, and decode it back to samples.
    let samples: Vec<f32> = (0..480)
        .map(|i| (i as f32 * 0.02).sin() * 0.6)
        .collect();
    let encoded = pcm::encode_frame(&samples);
    let raw = format!(
        r#"{{"serverContent":{{"modelTurn":{{"parts":[{{"inlineData":{{"mimeType":"audio/pcm;rate=24000","data":"{encoded}"}}}}]}}}}}}"#
    );

    let events = parse_session_message(&raw).unwrap();
    let data = match &events[..] {
        [SessionEvent::Audio(data)] => data,
        other => panic!("unexpected events: {other:?}"),
    };
    let decoded = pcm::decode_frame(data).unwrap();
    assert_eq!(decoded.len(), samples.len());
    for (a, b) in samples.iter().zip(decoded.iter()) {
        assert!((a - b).abs() < 1.0e-3);
    }
}

#[test]
fn fragments_schedule_back_to_back_without_overlap() {
    let mut schedule = PlaybackSchedule::new();
    let rate = DOWNLINK_SAMPLE_RATE as f64;

    // Two fragments: d1 = 0.5s, d2 = 0.25s, arriving at t1=0.0 and t2=0.1.
    let d1 = 12_000.0 / rate;
    let d2 = 6_000.0 / rate;
    let s1 = schedule.schedule(0.0, d1);
    let s2 = schedule.schedule(0.1, d2);

    assert_eq!(s1, 0.0);
    // Property: start of the second equals max(arrival, end of the first).
    assert_eq!(s2, f64::max(0.1, s1 + d1));
    // Never overlapping.
    assert!(s2 >= s1 + d1);
}

#[test]
fn fragment_arriving_after_drain_is_not_gapped_artificially() {
    let mut schedule = PlaybackSchedule::new();
    schedule.schedule(0.0, 0.2);
    // Arrival at 0.9, well after the first finished: plays immediately.
    let start = schedule.schedule(0.9, 0.3);
    assert_eq!(start, 0.9);
}

#[test]
fn interruption_clears_pending_audio_and_resets_clock() {
    let mut schedule = PlaybackSchedule::new();
    let queue = PlaybackQueue::new(48_000);

    // Queue two fragments.
    for _ in 0..2 {
        let samples = vec![0.1f32; 2_400];
        let clock = queue.consumed_samples() as f64 / DOWNLINK_SAMPLE_RATE as f64;
        schedule.schedule(clock, samples.len() as f64 / DOWNLINK_SAMPLE_RATE as f64);
        queue.push(&samples);
    }
    // Play part of the first.
    queue.pop(1_000);
    assert!(queue.pending() > 0);

    // Barge-in.
    queue.clear();
    schedule.reset();

    // Nothing pending, clock back at zero, nothing further plays.
    assert!(queue.is_empty());
    assert_eq!(queue.consumed_samples(), 0);
    assert!(queue.pop(1_000).is_empty());
    assert!(schedule.idle_at(0.0));

    // Post-interruption fragments start a fresh timeline.
    let start = schedule.schedule(0.0, 0.1);
    assert_eq!(start, 0.0);
}

#[test]
fn transcript_markers_decode_in_field_order() {
    let raw = r#"{
        "serverContent": {
            "inputTranscription": {"text": "feed pond two"},
            "turnComplete": true
        }
    }"#;
    let events = parse_session_message(raw).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::InputTranscript("feed pond two".to_string()),
            SessionEvent::TurnComplete,
        ]
    );
}

//! Subscriber polling drives cycles only on increases

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use subhop::{Poller, TickOutcome};
use subhop_trigger::{PollError, SubscriberSource, TriggerSettings, YouTubeSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Replays readings in order; `None` simulates a failed request.
struct ScriptedSource {
    readings: Mutex<Vec<Option<u64>>>,
}

impl ScriptedSource {
    fn new(readings: &[Option<u64>]) -> Self {
        let mut readings = readings.to_vec();
        readings.reverse();
        Self {
            readings: Mutex::new(readings),
        }
    }
}

impl SubscriberSource for ScriptedSource {
    async fn fetch(&self) -> Result<u64, PollError> {
        let next = self.readings.lock().unwrap().pop().flatten();
        next.ok_or(PollError::Status(503))
    }
}

#[tokio::test]
async fn fires_once_per_increase() {
    let source = ScriptedSource::new(&[Some(100), Some(100), Some(150), Some(140)]);
    let mut poller = Poller::new();
    let mut fired = 0;
    let mut outcomes = Vec::new();

    for _ in 0..4 {
        let outcome = poller
            .tick(&source, || {
                fired += 1;
                async {}
            })
            .await;
        outcomes.push(outcome);
    }

    assert_eq!(fired, 1);
    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Idle,
            TickOutcome::Idle,
            TickOutcome::Fired {
                previous: 100,
                current: 150
            },
            TickOutcome::Idle,
        ]
    );
    assert_eq!(poller.last_count(), Some(140));
}

#[tokio::test]
async fn failed_fetch_keeps_baseline() {
    let source = ScriptedSource::new(&[Some(10), None, Some(11)]);
    let mut poller = Poller::new();

    assert_eq!(poller.tick(&source, || async {}).await, TickOutcome::Idle);
    assert_eq!(
        poller.tick(&source, || async {}).await,
        TickOutcome::FetchFailed
    );
    assert_eq!(poller.last_count(), Some(10));
    assert_eq!(
        poller.tick(&source, || async {}).await,
        TickOutcome::Fired {
            previous: 10,
            current: 11
        }
    );
}

/// Serves a different subscriber count on each request.
struct CountSequence {
    counts: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl Respond for CountSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let count = self.counts[call.min(self.counts.len() - 1)];
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{ "statistics": { "subscriberCount": count } }]
        }))
    }
}

#[tokio::test]
async fn youtube_source_drives_poller() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .respond_with(CountSequence {
            counts: vec!["1200", "1200", "1201"],
            calls: Arc::clone(&calls),
        })
        .mount(&server)
        .await;

    let settings = TriggerSettings {
        api_key: "key".to_string(),
        channel_id: "UCabc".to_string(),
        endpoint: format!("{}/youtube/v3/channels", server.uri()),
        ..TriggerSettings::default()
    };
    let source = YouTubeSource::new(&settings).unwrap();
    let mut poller = Poller::new();
    let mut fired = Vec::new();

    for _ in 0..3 {
        if let TickOutcome::Fired { current, .. } = poller.tick(&source, || async {}).await {
            fired.push(current);
        }
    }

    assert_eq!(fired, vec![1201]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

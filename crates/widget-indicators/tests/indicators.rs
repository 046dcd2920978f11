use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use widget_indicators::{
    BLINK_CLASS, BLINK_PERIOD, ElementId, Error, FocusChange, Indicators, MP3_MIME, OGG_MIME,
    Options, Outcome, Skip, test_support::MockHost,
};

/// Install a test log subscriber once; later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("widget_indicators=trace")
        .with_test_writer()
        .try_init();
}

/// Host with a title, an input to watch and a div with one pre-existing class.
fn page() -> (Arc<MockHost>, ElementId, ElementId) {
    init_tracing();
    let mock = MockHost::new("Inbox");
    let input = mock.add_element("#input", &[]);
    let div = mock.add_element("#box", &["panel"]);
    (mock, input, div)
}

fn widget_options(input: &ElementId, div: &ElementId) -> Options {
    Options::default().with_elements(input.clone(), div.clone())
}

/// Sleep past the first tick of a blink started at the current instant.
async fn first_tick() {
    sleep(BLINK_PERIOD + Duration::from_millis(50)).await;
}

/// Sleep past the next tick.
async fn next_tick() {
    sleep(BLINK_PERIOD).await;
}

#[tokio::test(start_paused = true)]
async fn alert_scenario_blinks_title_and_element_until_focus_returns() {
    let (mock, input, div) = page();
    let ind = Indicators::new(widget_options(&input, &div), mock.host()).unwrap();

    let report = ind.trigger(Some("Alert"));
    assert_eq!(report.title, Outcome::Started);
    assert_eq!(report.widget, Outcome::Started);
    assert_eq!(report.sound, Outcome::Played);
    assert_eq!(mock.current_title(), "Alert");
    assert!(mock.has_class(&div, BLINK_CLASS));

    first_tick().await;
    assert_eq!(mock.current_title(), "Inbox");
    assert!(!mock.has_class(&div, BLINK_CLASS));

    next_tick().await;
    assert_eq!(mock.current_title(), "Alert");
    assert!(mock.has_class(&div, BLINK_CLASS));

    mock.fire(&input, FocusChange::Focus);
    assert!(ind.is_widget_focused());
    next_tick().await;
    assert!(!ind.is_widget_blinking());
    assert_eq!(mock.classes_of(&div), vec!["panel".to_string()]);

    // The title keeps blinking until the document itself is focused.
    assert!(ind.is_window_blinking());
    mock.set_document_focus(true);
    next_tick().await;
    assert!(!ind.is_window_blinking());
    assert_eq!(mock.current_title(), "Inbox");
}

#[tokio::test(start_paused = true)]
async fn title_blink_start_is_idempotent() {
    let (mock, _, _) = page();
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();

    assert_eq!(ind.trigger(Some("One")).title, Outcome::Started);
    assert_eq!(ind.trigger(Some("Two")).title, Outcome::AlreadyBlinking);
    assert_eq!(mock.current_title(), "One");

    // One ticker only: each tick changes the title exactly once.
    first_tick().await;
    assert_eq!(mock.current_title(), "Inbox");
    assert_eq!(ind.trigger(Some("Three")).title, Outcome::AlreadyBlinking);
    next_tick().await;
    assert_eq!(mock.current_title(), "One");
    assert_eq!(mock.call_count("set_title"), 3);
}

#[tokio::test(start_paused = true)]
async fn regained_document_focus_restores_original_title_exactly() {
    let (mock, _, _) = page();
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();
    ind.trigger(Some("New message"));

    first_tick().await;
    next_tick().await;
    assert_eq!(mock.current_title(), "New message");

    mock.set_document_focus(true);
    next_tick().await;
    assert_eq!(mock.current_title(), "Inbox");
    assert!(!ind.is_window_blinking());

    // No further ticks run.
    let writes = mock.call_count("set_title");
    next_tick().await;
    next_tick().await;
    assert_eq!(mock.call_count("set_title"), writes);
}

#[tokio::test(start_paused = true)]
async fn new_blink_after_cancel_recaptures_title() {
    let (mock, _, _) = page();
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();
    ind.trigger(Some("A"));
    mock.set_document_focus(true);
    first_tick().await;
    assert!(!ind.is_window_blinking());

    mock.replace_title("Drafts");
    mock.set_document_focus(false);
    assert_eq!(ind.trigger(Some("B")).title, Outcome::Started);
    first_tick().await;
    assert_eq!(mock.current_title(), "Drafts");
}

#[tokio::test(start_paused = true)]
async fn title_blink_gates() {
    let (mock, _, _) = page();
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();

    assert_eq!(ind.trigger(None).title, Outcome::Skipped(Skip::NoText));

    let report = ind.trigger(Some(""));
    assert_eq!(report.title, Outcome::Skipped(Skip::MissingText));
    assert_eq!(report.signal(), Some(Error::MissingBlinkText));
    assert!(!ind.is_window_blinking());
    assert_eq!(mock.current_title(), "Inbox");

    mock.set_document_focus(true);
    let report = ind.trigger(Some(""));
    assert_eq!(report.title, Outcome::Skipped(Skip::DocumentFocused));
    assert_eq!(report.signal(), None);
    assert_eq!(
        ind.trigger(Some("Alert")).title,
        Outcome::Skipped(Skip::DocumentFocused)
    );

    let off = Options {
        window_blink: false,
        ..Options::default()
    };
    let quiet = Indicators::new(off, mock.host()).unwrap();
    mock.set_document_focus(false);
    assert_eq!(
        quiet.trigger(Some("Alert")).title,
        Outcome::Skipped(Skip::WindowBlinkOff)
    );
    assert_eq!(mock.call_count("set_title"), 0);
}

#[tokio::test(start_paused = true)]
async fn element_blink_gates() {
    let (mock, input, div) = page();
    let plain = Indicators::new(Options::default(), mock.host()).unwrap();
    assert_eq!(plain.trigger(None).widget, Outcome::Skipped(Skip::NoWidget));

    let ind = Indicators::new(widget_options(&input, &div), mock.host()).unwrap();
    mock.fire(&input, FocusChange::Focus);
    assert_eq!(ind.trigger(None).widget, Outcome::Skipped(Skip::WidgetFocused));
    assert!(!mock.has_class(&div, BLINK_CLASS));

    mock.fire(&input, FocusChange::Blur);
    assert_eq!(ind.trigger(None).widget, Outcome::Started);
    assert_eq!(ind.trigger(None).widget, Outcome::AlreadyBlinking);
    assert_eq!(mock.call_count("add_class"), 1);
}

#[tokio::test(start_paused = true)]
async fn element_blink_toggles_every_tick_and_keeps_other_classes() {
    let (mock, input, div) = page();
    let ind = Indicators::new(widget_options(&input, &div), mock.host()).unwrap();
    ind.trigger(None);

    first_tick().await;
    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(mock.has_class(&div, BLINK_CLASS));
        assert!(mock.has_class(&div, "panel"));
        next_tick().await;
    }
    assert_eq!(seen, vec![false, true, false, true]);

    mock.fire(&input, FocusChange::Focus);
    next_tick().await;
    assert!(!ind.is_widget_blinking());
    assert_eq!(mock.classes_of(&div), vec!["panel".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn sound_plays_only_when_allowed() {
    let (mock, input, div) = page();
    let ind = Indicators::new(widget_options(&input, &div), mock.host()).unwrap();
    assert!(ind.has_audio());

    // Document unfocused: plays regardless of the widget.
    assert_eq!(ind.trigger(None).sound, Outcome::Played);

    // Document focused, widget unfocused: still plays.
    mock.set_document_focus(true);
    assert_eq!(ind.trigger(None).sound, Outcome::Played);

    // Both focused: the user is engaged.
    mock.fire(&input, FocusChange::Focus);
    assert_eq!(ind.trigger(None).sound, Outcome::Skipped(Skip::UserEngaged));

    // Overlapping triggers overlap playback.
    mock.set_document_focus(false);
    ind.trigger(None);
    ind.trigger(None);
    assert_eq!(mock.plays(), 4);
}

#[tokio::test(start_paused = true)]
async fn sound_never_plays_when_disabled_by_option() {
    let (mock, _, _) = page();
    let opts = Options {
        play_sound: false,
        ..Options::default()
    };
    let ind = Indicators::new(opts, mock.host()).unwrap();
    for _ in 0..3 {
        assert_eq!(ind.trigger(Some("x")).sound, Outcome::Skipped(Skip::SoundOff));
    }
    assert_eq!(mock.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn audio_resource_gets_both_sources() {
    let (mock, _, _) = page();
    let _ind = Indicators::new(Options::default(), mock.host()).unwrap();
    let sources = mock.last_sources();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].mime, MP3_MIME);
    assert_eq!(sources[0].url, "sounds/gi-widget-pop.mp3");
    assert_eq!(sources[1].mime, OGG_MIME);
    assert_eq!(sources[1].url, "sounds/gi-widget-pop.ogg");
}

#[tokio::test(start_paused = true)]
async fn missing_audio_disables_sound_silently() {
    let (mock, _, _) = page();
    mock.set_audio_unsupported(true);
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();
    assert!(!ind.has_audio());
    assert!(!mock.calls_contains("create_audio"));
    assert_eq!(ind.trigger(None).sound, Outcome::Skipped(Skip::NoAudio));

    let (mock, _, _) = page();
    mock.set_fail_audio(true);
    let ind = Indicators::new(Options::default(), mock.host()).unwrap();
    assert!(!ind.has_audio());
    assert_eq!(ind.trigger(Some("x")).sound, Outcome::Skipped(Skip::NoAudio));
    // The other indicators are unaffected.
    assert!(ind.is_window_blinking());
}

#[tokio::test(start_paused = true)]
async fn disabled_controller_never_alerts() {
    let (mock, input, div) = page();
    let opts = Options {
        enabled: false,
        ..widget_options(&input, &div)
    };
    let ind = Indicators::new(opts, mock.host()).unwrap();
    assert!(!ind.is_enabled());

    for doc_focus in [false, true] {
        mock.set_document_focus(doc_focus);
        let report = ind.trigger(Some("Alert"));
        assert_eq!(report.title, Outcome::Skipped(Skip::Disabled));
        assert_eq!(report.widget, Outcome::Skipped(Skip::Disabled));
        assert_eq!(report.sound, Outcome::Skipped(Skip::Disabled));
    }
    first_tick().await;
    assert_eq!(mock.current_title(), "Inbox");
    assert!(!mock.has_class(&div, BLINK_CLASS));
    assert_eq!(mock.plays(), 0);
}

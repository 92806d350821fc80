//! Integration tests for today's challenge selection and the dashboard view.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, TimeZone};
use wakeup_core::{
    is_cancellation_allowed, local_date, select_today, ChallengeId, ChallengeRecord, ChallengeSnapshot,
    ChallengeSource, ChallengeStatus, ChallengeStatusEngine, ClockSampler, DisplayStatus, ManualClock,
    SelectionRule, TodaySelection, WindowPolicy, WindowState,
};

fn offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 9).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2025, 8, 9, h, m, s).unwrap()
}

fn pending(id: i64, wake: &str) -> ChallengeRecord {
    ChallengeRecord::new(id, today(), wake, 100.0, ChallengeStatus::Pending)
}

#[test]
fn in_window_pending_beats_later_pending() {
    let records = vec![pending(1, "06:00"), pending(2, "07:00")];
    let now = at(6, 5, 0);
    let sel = select_today(&records, today(), now, &WindowPolicy::default());
    assert_eq!(sel.rule(), Some(SelectionRule::InWindow));
    assert_eq!(sel.record().unwrap().wake_up_time, "06:00");
}

#[test]
fn latest_resolved_wins_when_nothing_pending() {
    let records = vec![
        ChallengeRecord::new(1, today(), "06:00", 100.0, ChallengeStatus::Completed).with_success(false),
        ChallengeRecord::new(2, today(), "07:30", 100.0, ChallengeStatus::Processed).with_success(true),
    ];
    let sel = select_today(&records, today(), at(12, 0, 0), &WindowPolicy::default());
    assert_eq!(sel, TodaySelection::Resolved(&records[1]));
}

#[test]
fn cancellation_lock_ignores_time_of_day() {
    assert!(!is_cancellation_allowed(today(), local_date(at(0, 0, 0))));
    assert!(!is_cancellation_allowed(today(), local_date(at(23, 59, 59))));
    assert!(is_cancellation_allowed(today() + Days::new(1), local_date(at(23, 59, 59))));
}

#[test]
fn empty_input_yields_empty_selection() {
    let records: Vec<ChallengeRecord> = Vec::new();
    let sel = select_today(&records, today(), at(6, 0, 0), &WindowPolicy::default());
    assert!(sel.is_none());
    assert!(sel.record().is_none());
}

#[test]
fn selection_is_id_stable_within_a_tick() {
    let records = vec![pending(10, "06:30"), pending(11, "06:30"), pending(12, "08:00")];
    let now = at(6, 20, 0);
    let a = select_today(&records, today(), now, &WindowPolicy::default());
    let b = select_today(&records, today(), now, &WindowPolicy::default());
    assert_eq!(a.record().map(|r| r.id), Some(ChallengeId(10)));
    assert_eq!(a.record().map(|r| r.id), b.record().map(|r| r.id));
}

#[test]
fn date_lookup_feeds_selector() {
    let mut other_day = pending(3, "06:00");
    other_day.challenge_date = today() - Days::new(1);
    let snapshot = ChallengeSnapshot::from_records(vec![pending(1, "08:00"), other_day]);
    let todays = snapshot.challenges_for_date(today());
    assert_eq!(todays.len(), 1);
    let sel = select_today(todays, today(), at(6, 0, 0), &WindowPolicy::default());
    assert_eq!(sel.record().map(|r| r.id), Some(ChallengeId(1)));
}

/// Drive the engine with a ticking clock across a whole check-in window.
#[test]
fn countdown_walks_through_window() {
    let clock = Arc::new(ManualClock::new(at(6, 44, 58)));
    let mut sampler = ClockSampler::new(clock.clone());
    let snapshot = ChallengeSnapshot::from_records(vec![pending(1, "07:00")]);
    let engine = ChallengeStatusEngine::default();

    let mut observed = Vec::new();
    for step in [0, 1, 1, 1, 1499, 1] {
        clock.advance(Duration::seconds(step));
        let now = sampler.tick();
        let view = engine.evaluate(&snapshot, now);
        let todays = view.today_challenge.expect("challenge today");
        let window = todays.view.window.expect("valid window");
        observed.push((window.state, window.remaining_seconds, todays.view.display_status));
    }

    assert_eq!(
        observed,
        vec![
            (WindowState::Before, 2, DisplayStatus::Pending),
            (WindowState::Before, 1, DisplayStatus::Pending),
            (WindowState::Within, 1500, DisplayStatus::TimeToAct),
            (WindowState::Within, 1499, DisplayStatus::TimeToAct),
            (WindowState::Within, 0, DisplayStatus::TimeToAct),
            (WindowState::After, 0, DisplayStatus::Pending),
        ]
    );
}

#[test]
fn second_pending_takes_over_after_first_window_closes() {
    let snapshot = ChallengeSnapshot::from_records(vec![pending(1, "06:00"), pending(2, "07:00")]);
    let engine = ChallengeStatusEngine::default();

    let early = engine.today(&snapshot, at(6, 5, 0)).unwrap();
    assert_eq!((early.rule, early.view.challenge.id), (SelectionRule::InWindow, ChallengeId(1)));

    // 06:00 window closed, 07:00 not yet open: earliest pending is still 06:00.
    let gap = engine.today(&snapshot, at(6, 30, 0)).unwrap();
    assert_eq!((gap.rule, gap.view.challenge.id), (SelectionRule::Upcoming, ChallengeId(1)));

    let later = engine.today(&snapshot, at(6, 50, 0)).unwrap();
    assert_eq!((later.rule, later.view.challenge.id), (SelectionRule::InWindow, ChallengeId(2)));
}

#[test]
fn snapshot_refresh_is_picked_up_on_next_evaluation() {
    let mut snapshot = ChallengeSnapshot::from_records(vec![pending(1, "07:00")]);
    let engine = ChallengeStatusEngine::default();
    let now = at(7, 0, 0);
    assert_eq!(
        engine.evaluate(&snapshot, now).today_challenge.unwrap().view.display_status,
        DisplayStatus::TimeToAct
    );

    let mut resolved = pending(1, "07:00");
    resolved.status = ChallengeStatus::Completed;
    resolved.is_successful = true;
    snapshot.upsert(resolved);

    let view = engine.evaluate(&snapshot, now);
    let todays = view.today_challenge.unwrap();
    assert_eq!(todays.rule, SelectionRule::Resolved);
    assert_eq!(todays.view.display_status, DisplayStatus::CompletedSuccess);
}

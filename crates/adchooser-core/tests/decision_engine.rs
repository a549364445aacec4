mod common;

use std::sync::Arc;
use std::time::Duration;

use adchooser_core::config::{BlockedPairing, PageBlackout};
use adchooser_core::domain::RepositoryError;
use adchooser_core::impls::{NoopImpressionSink, RecordingImpressionSink};
use adchooser_core::ports::{AdChooser, ManualClock};
use adchooser_core::{
    AdChooserBuilder, ChooserError, ClientId, Decision, EngineConfig, PageId, PlayerId,
};
use chrono::{TimeDelta, Weekday};
use common::{FailingSink, ScriptedRepository, ab_banner, banner, t0};

struct Harness {
    repository: Arc<ScriptedRepository>,
    sink: Arc<RecordingImpressionSink>,
    clock: Arc<ManualClock>,
    chooser: Arc<dyn AdChooser>,
}

fn harness_with(config: EngineConfig, repository: ScriptedRepository) -> Harness {
    let repository = Arc::new(repository);
    let sink = Arc::new(RecordingImpressionSink::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let chooser = AdChooserBuilder::new()
        .config(config)
        .repository(repository.clone())
        .impression_sink(sink.clone())
        .clock(clock.clone())
        .build()
        .unwrap();
    Harness {
        repository,
        sink,
        clock,
        chooser,
    }
}

fn harness() -> Harness {
    harness_with(
        EngineConfig::default(),
        ScriptedRepository::new(banner(500, 2)),
    )
}

fn page(id: &str) -> PageId {
    PageId::from(id)
}

#[tokio::test]
async fn ab_segment_wins_on_excluded_page() {
    let h = harness();
    let decision = h.chooser.get_ad(PlayerId::new(10), &page("profile")).await.unwrap();
    assert_eq!(decision, Decision::Show(ab_banner()));
}

#[tokio::test]
async fn excluded_page_shows_nothing() {
    let h = harness();
    let decision = h.chooser.get_ad(PlayerId::new(7), &page("profile")).await.unwrap();
    assert_eq!(decision, Decision::Suppress);
    assert_eq!(h.repository.total_calls(), 0);
}

#[tokio::test]
async fn fallback_returns_repository_banner_unchanged() {
    let h = harness();
    let decision = h.chooser.get_ad(PlayerId::new(7), &page("top")).await.unwrap();
    assert_eq!(decision, Decision::Show(banner(500, 2)));
    assert_eq!(h.repository.random_picks(), 1);
}

#[tokio::test]
async fn cache_hit_skips_repository() {
    let h = harness();
    let player = PlayerId::new(7);

    let first = h.chooser.get_ad(player, &page("top")).await.unwrap();
    assert_eq!(h.repository.total_calls(), 1);

    h.clock.advance(TimeDelta::minutes(10));
    let second = h.chooser.get_ad(player, &page("top")).await.unwrap();

    assert_eq!(second, first);
    assert_eq!(h.repository.total_calls(), 1);
}

#[tokio::test]
async fn cache_is_keyed_by_player_and_page() {
    let h = harness();
    h.chooser.get_ad(PlayerId::new(7), &page("top")).await.unwrap();
    h.chooser.get_ad(PlayerId::new(7), &page("news")).await.unwrap();
    h.chooser.get_ad(PlayerId::new(8), &page("top")).await.unwrap();
    assert_eq!(h.repository.random_picks(), 3);
}

#[tokio::test]
async fn expired_entry_is_re_evaluated() {
    let h = harness();
    let player = PlayerId::new(7);
    h.chooser.get_ad(player, &page("top")).await.unwrap();

    h.repository.set_random(Ok(banner(501, 3)));
    h.clock.advance(TimeDelta::minutes(30));

    let decision = h.chooser.get_ad(player, &page("top")).await.unwrap();
    assert_eq!(decision, Decision::Show(banner(501, 3)));
    assert_eq!(h.repository.random_picks(), 2);
}

#[tokio::test]
async fn suppress_is_re_evaluated_every_call() {
    let config = EngineConfig {
        blocked_pairings: vec![BlockedPairing {
            client_id: ClientId::new(393),
            player_id: PlayerId::new(36645),
        }],
        ..EngineConfig::default()
    };
    let h = harness_with(config, ScriptedRepository::new(banner(700, 393)));
    let player = PlayerId::new(36645);

    for call in 1..=3 {
        let decision = h.chooser.get_ad(player, &page("top")).await.unwrap();
        assert_eq!(decision, Decision::Suppress);
        assert_eq!(h.repository.random_picks(), call);
    }

    // Another client's banner is shown right away, with no TTL to wait out.
    h.repository.set_random(Ok(banner(701, 400)));
    let decision = h.chooser.get_ad(player, &page("top")).await.unwrap();
    assert_eq!(decision, Decision::Show(banner(701, 400)));
}

#[tokio::test]
async fn blackout_lifts_without_waiting_for_ttl() {
    let config = EngineConfig {
        page_blackouts: vec![PageBlackout {
            page: page("top"),
            weekday: Weekday::Wed,
        }],
        ..EngineConfig::default()
    };
    let h = harness_with(config, ScriptedRepository::new(banner(500, 2)));
    let player = PlayerId::new(7);

    assert_eq!(
        h.chooser.get_ad(player, &page("top")).await.unwrap(),
        Decision::Suppress
    );

    h.clock.advance(TimeDelta::days(1));
    assert_eq!(
        h.chooser.get_ad(player, &page("top")).await.unwrap(),
        Decision::Show(banner(500, 2))
    );
}

#[tokio::test]
async fn banner_cached_before_midnight_is_not_served_on_blackout_day() {
    let config = EngineConfig {
        page_blackouts: vec![PageBlackout {
            page: page("top"),
            weekday: Weekday::Wed,
        }],
        ..EngineConfig::default()
    };
    let h = harness_with(config, ScriptedRepository::new(banner(500, 2)));
    let player = PlayerId::new(7);

    // Tuesday 23:50.
    h.clock.set(t0() - TimeDelta::minutes(12 * 60 + 10));
    assert_eq!(
        h.chooser.get_ad(player, &page("top")).await.unwrap(),
        Decision::Show(banner(500, 2))
    );

    // Wednesday 00:10, well inside the 30 minute TTL.
    h.clock.advance(TimeDelta::minutes(20));
    assert_eq!(
        h.chooser.get_ad(player, &page("top")).await.unwrap(),
        Decision::Suppress
    );
    assert_eq!(h.sink.len().await, 1);

    // Other pages keep their cached banner across midnight.
    h.clock.set(t0() - TimeDelta::minutes(12 * 60 + 10));
    h.chooser.get_ad(player, &page("news")).await.unwrap();
    h.clock.advance(TimeDelta::minutes(20));
    h.chooser.get_ad(player, &page("news")).await.unwrap();
    assert_eq!(h.repository.random_picks(), 2);
}

#[tokio::test]
async fn impressions_follow_shown_banners_including_cache_hits() {
    let h = harness();

    h.chooser.get_ad(PlayerId::new(7), &page("top")).await.unwrap();
    h.chooser.get_ad(PlayerId::new(7), &page("top")).await.unwrap();
    h.chooser.get_ad(PlayerId::new(7), &page("profile")).await.unwrap();
    h.chooser.get_ad(PlayerId::new(10), &page("profile")).await.unwrap();

    let impressions = h.sink.impressions().await;
    assert_eq!(impressions.len(), 3);
    assert_eq!(h.repository.total_calls(), 2);
    assert!(impressions.iter().all(|i| i.shown_at == t0()));
    assert_eq!(impressions[2].banner, ab_banner());
    assert_eq!(impressions[2].page, page("profile"));
}

#[tokio::test]
async fn layers_do_not_change_decisions() {
    let repository = Arc::new(ScriptedRepository::new(banner(500, 2)));
    let builder = AdChooserBuilder::new()
        .repository(repository.clone())
        .impression_sink(Arc::new(NoopImpressionSink))
        .clock(Arc::new(ManualClock::new(t0())));
    let base = builder.build_base().unwrap();
    let full = builder.build().unwrap();

    for player in 0..25 {
        for page_id in ["profile", "top", "news"] {
            let player = PlayerId::new(player);
            let page = page(page_id);
            let plain = base.get_ad(player, &page).await.unwrap();
            // Twice: once filling the cache, once served from it.
            assert_eq!(full.get_ad(player, &page).await.unwrap(), plain);
            assert_eq!(full.get_ad(player, &page).await.unwrap(), plain);
        }
    }
}

#[tokio::test]
async fn repository_failure_surfaces_and_is_not_cached() {
    let h = harness();
    let player = PlayerId::new(7);
    h.repository
        .set_random(Err(RepositoryError::Unavailable("catalogue offline".into())));

    let err = h.chooser.get_ad(player, &page("top")).await.unwrap_err();
    assert_eq!(
        err,
        ChooserError::Repository(RepositoryError::Unavailable("catalogue offline".into()))
    );
    assert!(h.sink.is_empty().await);

    h.repository.set_random(Ok(banner(500, 2)));
    let decision = h.chooser.get_ad(player, &page("top")).await.unwrap();
    assert_eq!(decision, Decision::Show(banner(500, 2)));
    assert_eq!(h.repository.random_picks(), 2);
}

#[tokio::test]
async fn missing_ab_banner_is_an_error_not_suppress() {
    let config = EngineConfig {
        ab_test: adchooser_core::config::AbTestConfig {
            modulus: 5,
            banner_id: adchooser_core::BannerId::new(999),
        },
        ..EngineConfig::default()
    };
    let h = harness_with(config, ScriptedRepository::new(banner(500, 2)));

    let err = h
        .chooser
        .get_ad(PlayerId::new(10), &page("top"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChooserError::Repository(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn failing_sink_does_not_fail_the_request() {
    let repository = Arc::new(ScriptedRepository::new(banner(500, 2)));
    let sink = Arc::new(FailingSink::new());
    let chooser = AdChooserBuilder::new()
        .repository(repository)
        .impression_sink(sink.clone())
        .build()
        .unwrap();

    let decision = chooser.get_ad(PlayerId::new(7), &page("top")).await.unwrap();

    assert_eq!(decision, Decision::Show(banner(500, 2)));
    assert_eq!(sink.attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_share_one_evaluation() {
    let h = harness_with(
        EngineConfig::default(),
        ScriptedRepository::new(banner(500, 2)).with_delay(Duration::from_millis(50)),
    );

    let mut handles = Vec::new();
    for _ in 0..16 {
        let chooser = Arc::clone(&h.chooser);
        handles.push(tokio::spawn(async move {
            chooser.get_ad(PlayerId::new(7), &PageId::from("top")).await
        }));
    }

    for handle in handles {
        let decision = handle.await.unwrap().unwrap();
        assert_eq!(decision, Decision::Show(banner(500, 2)));
    }
    assert_eq!(h.repository.random_picks(), 1);
    assert_eq!(h.sink.len().await, 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_suppress_is_shared_then_forgotten() {
    let config = EngineConfig {
        blocked_pairings: vec![BlockedPairing {
            client_id: ClientId::new(393),
            player_id: PlayerId::new(36645),
        }],
        ..EngineConfig::default()
    };
    let h = harness_with(
        config,
        ScriptedRepository::new(banner(700, 393)).with_delay(Duration::from_millis(50)),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let chooser = Arc::clone(&h.chooser);
        handles.push(tokio::spawn(async move {
            chooser.get_ad(PlayerId::new(36645), &PageId::from("top")).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), Decision::Suppress);
    }
    let after_burst = h.repository.random_picks();
    assert!(after_burst >= 1);

    h.chooser
        .get_ad(PlayerId::new(36645), &page("top"))
        .await
        .unwrap();
    assert_eq!(h.repository.random_picks(), after_burst + 1);
}

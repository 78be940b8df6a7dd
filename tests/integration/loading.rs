//! Index loading: the state machine as seen from the page.

use super::common::{install_corpus, Harness};
use sitesearch::{IndexState, Partition, PipelineOutcome};

#[test]
fn first_focus_requests_all_five_partitions() {
    let mut h = Harness::new(&install_corpus());
    assert_eq!(h.state(), IndexState::Uninitialized);

    let outcome = h.focus_input("");
    assert!(matches!(outcome, PipelineOutcome::LoadStarted(_)));
    assert_eq!(h.state(), IndexState::Loading);
    assert_eq!(h.placeholder(), "Loading...");

    let mut requested = h.source.requested();
    requested.sort();
    assert_eq!(
        requested,
        vec![
            "/search-data/content.cfg.json",
            "/search-data/content.ctx.json",
            "/search-data/content.map.json",
            "/search-data/reg.json",
            "/search-data/store.json",
        ]
    );
}

#[test]
fn loading_starts_once_however_many_events_arrive() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");
    h.keyup("i");
    h.keyup("in");
    h.focus_input("in");
    assert_eq!(h.source.requested().len(), 5);
}

#[test]
fn ready_waits_for_the_delay_after_the_last_partition() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");

    for partition in [Partition::Store, Partition::ContentMap, Partition::Reg, Partition::ContentCtx] {
        assert!(h.respond(partition, 200));
        assert!(h.timer.waiting().is_empty());
    }
    assert!(h.respond(Partition::ContentCfg, 200));
    assert_eq!(h.timer.waiting(), vec![100]);
    assert_eq!(h.state(), IndexState::Loading);
    assert_eq!(h.placeholder(), "Loading...");

    assert_eq!(h.fire_timer(), 1);
    assert_eq!(h.state(), IndexState::Ready);
    assert_eq!(h.placeholder(), "Search...");
}

#[test]
fn http_500_fails_the_session_for_good() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");
    h.respond(Partition::ContentCfg, 200);
    h.respond(Partition::Reg, 500);

    assert!(matches!(h.state(), IndexState::Failed(reason) if reason.contains("HTTP 500")));
    assert_eq!(h.placeholder(), "Error loading search index.");

    // Stragglers are dropped and never complete the set.
    h.respond(Partition::ContentMap, 200);
    h.respond(Partition::ContentCtx, 200);
    h.respond(Partition::Store, 200);
    assert!(h.timer.waiting().is_empty());
    assert!(matches!(h.state(), IndexState::Failed(_)));

    // No retry, no search.
    assert_eq!(h.keyup("install"), PipelineOutcome::NotReady);
    assert_eq!(h.focus_input("install"), PipelineOutcome::NotReady);
    assert_eq!(h.source.requested().len(), 5);
    assert_eq!(h.searches(), 0);
}

#[test]
fn dropped_connection_fails_the_session() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");
    assert!(h.hang_up(Partition::Store));
    assert!(matches!(h.state(), IndexState::Failed(reason) if reason.contains("store")));
}

#[test]
fn malformed_partition_fails_the_session() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");
    h.respond_body(Partition::ContentMap, "{not json");
    assert!(matches!(h.state(), IndexState::Failed(_)));
    assert_eq!(h.placeholder(), "Error loading search index.");
}

#[test]
fn not_found_fails_the_session() {
    let mut h = Harness::new(&install_corpus());
    h.focus_input("");
    h.respond(Partition::ContentCtx, 404);
    assert!(matches!(h.state(), IndexState::Failed(reason) if reason.contains("404")));
}

#[test]
fn custom_base_path_and_delay() {
    let config = sitesearch::WidgetConfig {
        base_path: "/docs/index/".to_string(),
        ready_delay_ms: 0,
        ..Default::default()
    };
    let mut h = Harness::with_config(config, &install_corpus());
    h.focus_input("");
    assert!(h.source.requested().contains(&"/docs/index/reg.json".to_string()));
    h.respond_all();
    assert_eq!(h.timer.waiting(), vec![0]);
    h.fire_timer();
    assert_eq!(h.state(), IndexState::Ready);
}

//! Query pipeline end to end: keystrokes in, rendered rows out.

use super::common::{guide_corpus, install_corpus, Harness, ViewCall};
use sitesearch::{IndexState, PipelineOutcome, ResultItem};

#[test]
fn install_finds_two_of_three_pages_in_rank_order() {
    let mut h = Harness::new(&install_corpus());
    h.load();

    assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 2 });
    let widget = h.widget.borrow();
    let shown = widget.view().shown().expect("panel visible");
    assert_eq!(
        shown,
        &[
            ResultItem {
                index: 0,
                href: "/doc/1#installation".to_string(),
                page_title: "Page 1".to_string(),
                section_title: " > Installation".to_string(),
            },
            ResultItem {
                index: 1,
                href: "/doc/3#upgrading".to_string(),
                page_title: "Page 3".to_string(),
                section_title: " > Upgrading".to_string(),
            },
        ]
    );
}

#[test]
fn query_typed_while_loading_is_searched_once_ready() {
    let mut h = Harness::new(&install_corpus());
    assert!(matches!(h.focus_input("install"), PipelineOutcome::LoadStarted(_)));
    assert_eq!(h.keyup("install"), PipelineOutcome::NotReady);
    h.respond_all();
    assert_eq!(h.keyup("install"), PipelineOutcome::NotReady);
    h.fire_timer();
    assert_eq!(h.state(), IndexState::Ready);

    // Nothing was searched while loading, so the same text is new.
    assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 2 });
    assert_eq!(h.searches(), 1);
}

#[test]
fn repeated_input_is_not_searched_again() {
    let mut h = Harness::new(&install_corpus());
    h.load();

    h.keyup("install");
    // Arrow keys and modifiers fire keyup without changing the text.
    assert_eq!(h.keyup("install"), PipelineOutcome::Unchanged);
    assert_eq!(h.keyup("install"), PipelineOutcome::Unchanged);
    assert_eq!(h.searches(), 1);

    h.keyup("shell");
    h.keyup("install");
    assert_eq!(h.searches(), 3);
}

#[test]
fn empty_input_after_load_is_unchanged() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    assert_eq!(h.keyup(""), PipelineOutcome::Unchanged);
    assert_eq!(h.searches(), 0);
}

#[test]
fn clearing_the_input_hides_the_panel() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    h.keyup("install");
    assert_eq!(h.keyup(""), PipelineOutcome::Rendered { visible: 0 });
    assert!(h.widget.borrow().view().hidden);
    assert!(h.shown_hrefs().is_empty());
}

#[test]
fn no_match_hides_the_panel() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    h.keyup("install");
    assert_eq!(h.keyup("kubernetes"), PipelineOutcome::Rendered { visible: 0 });
    assert_eq!(
        h.widget.borrow().view().calls.last(),
        Some(&ViewCall::Hide)
    );
}

#[test]
fn at_most_nine_rows_are_shown() {
    let mut h = Harness::new(&guide_corpus(12));
    h.load();
    assert_eq!(h.keyup("guide"), PipelineOutcome::Rendered { visible: 9 });
    let hrefs = h.shown_hrefs();
    assert_eq!(hrefs.len(), 9);
    assert_eq!(hrefs[0], "/doc/1#guide-1");
    assert_eq!(hrefs[8], "/doc/9#guide-9");
}

#[test]
fn focus_reruns_pipeline_but_skips_same_query() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    h.keyup("install");
    assert_eq!(h.focus_input("install"), PipelineOutcome::Unchanged);
    assert_eq!(h.searches(), 1);
}

#[test]
fn diacritics_in_query_are_folded() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    assert_eq!(h.keyup("ÍNSTÄLL"), PipelineOutcome::Rendered { visible: 2 });
}

#[test]
fn prefix_matches_while_typing() {
    let mut h = Harness::new(&install_corpus());
    h.load();
    assert_eq!(h.keyup("ins"), PipelineOutcome::Rendered { visible: 2 });
    // Below the minimum term length nothing is searched for.
    assert_eq!(h.keyup("in"), PipelineOutcome::Rendered { visible: 0 });
}

#[test]
fn failed_search_hides_panel_and_same_text_retries() {
    let mut h = Harness::new(&install_corpus());
    h.load();

    h.widget.borrow().store().engine().fail_next_searches(1);
    assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 0 });
    assert_eq!(h.widget.borrow().view().calls.last(), Some(&ViewCall::Hide));

    // Another keyup with the same text, e.g. Shift released.
    assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 2 });
    assert_eq!(h.searches(), 2);
    assert_eq!(h.shown_hrefs(), vec!["/doc/1#installation", "/doc/3#upgrading"]);
}

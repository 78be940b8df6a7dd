//! Readiness under arbitrary partition arrival orders.

use super::common::{install_corpus, Harness};
use proptest::prelude::*;
use sitesearch::{IndexState, Partition, PipelineOutcome};

fn arrival_order() -> impl Strategy<Value = Vec<Partition>> {
    Just(Partition::ALL.to_vec()).prop_shuffle()
}

fn error_status() -> impl Strategy<Value = u16> {
    prop::sample::select(vec![301u16, 403, 404, 500, 502, 503])
}

proptest! {
    /// Ready exactly when every partition is in and the delay has passed,
    /// whatever order the responses arrive in.
    #[test]
    fn ready_only_after_all_partitions_and_delay(order in arrival_order()) {
        let mut h = Harness::new(&install_corpus());
        h.focus_input("");

        for partition in &order {
            prop_assert_eq!(h.state(), IndexState::Loading);
            prop_assert!(h.timer.waiting().is_empty());
            prop_assert_eq!(h.keyup("install"), PipelineOutcome::NotReady);
            h.respond(*partition, 200);
        }

        prop_assert_eq!(h.state(), IndexState::Loading);
        prop_assert_eq!(h.timer.waiting(), vec![100]);
        prop_assert_eq!(h.fire_timer(), 1);
        prop_assert_eq!(h.state(), IndexState::Ready);
        prop_assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 2 });
    }

    /// One bad response anywhere in the sequence is terminal.
    #[test]
    fn any_failure_is_terminal(
        order in arrival_order(),
        failing in 0usize..5,
        status in error_status(),
    ) {
        let mut h = Harness::new(&install_corpus());
        h.focus_input("");

        for (i, partition) in order.iter().enumerate() {
            h.respond(*partition, if i == failing { status } else { 200 });
        }

        prop_assert!(matches!(h.state(), IndexState::Failed(_)), "state: {:?}", h.state());
        prop_assert!(h.timer.waiting().is_empty());
        prop_assert_eq!(h.fire_timer(), 0);
        prop_assert_eq!(h.keyup("install"), PipelineOutcome::NotReady);
        prop_assert_eq!(h.source.requested().len(), 5);
        prop_assert_eq!(h.searches(), 0);
    }

    /// Interleaving keystrokes with arrivals never searches early.
    #[test]
    fn keystrokes_during_load_never_search(
        order in arrival_order(),
        typed in prop::collection::vec("[a-z]{0,8}", 5),
    ) {
        let mut h = Harness::new(&install_corpus());
        h.focus_input("");

        for (partition, text) in order.iter().zip(&typed) {
            h.keyup(text);
            h.respond(*partition, 200);
        }
        h.keyup("install");
        prop_assert_eq!(h.searches(), 0);

        h.fire_timer();
        prop_assert_eq!(h.keyup("install"), PipelineOutcome::Rendered { visible: 2 });
        prop_assert_eq!(h.searches(), 1);
    }
}

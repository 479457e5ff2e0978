// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use soldium_query::{time_remaining, Countdown};

proptest! {
    #[test]
    fn buckets_recompose_to_the_whole_seconds_of_the_delta(delta_ms in 1i64..400 * 86_400_000) {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let target = now + Duration::milliseconds(delta_ms);
        match time_remaining(now, target) {
            Countdown::Remaining(t) => {
                prop_assert!((0..24).contains(&t.hours));
                prop_assert!((0..60).contains(&t.minutes));
                prop_assert!((0..60).contains(&t.seconds));
                let recomposed = ((t.days * 24 + t.hours) * 60 + t.minutes) * 60 + t.seconds;
                prop_assert_eq!(recomposed, delta_ms / 1000);
            }
            Countdown::BurnInProgress => prop_assert!(false, "positive delta must count down"),
        }
    }

    #[test]
    fn past_or_present_targets_are_always_burn_in_progress(back_ms in 0i64..10_000_000_000) {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        prop_assert_eq!(
            time_remaining(now, now - Duration::milliseconds(back_ms)),
            Countdown::BurnInProgress
        );
    }
}

#[test]
fn wire_shape_is_tagged_by_state() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let value = serde_json::to_value(time_remaining(now, now + Duration::seconds(61)))
        .expect("encode");
    assert_eq!(value["state"], "remaining");
    assert_eq!(value["minutes"], 1);
    assert_eq!(value["seconds"], 1);
    assert_eq!(
        serde_json::to_value(Countdown::BurnInProgress).expect("encode")["state"],
        "burn_in_progress"
    );
}

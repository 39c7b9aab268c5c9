use proptest::prelude::*;
use rectregion::region::io_json::{from_session_str, to_session_string};
use rectregion::region::{RegionHandle, Session};

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn session_json_roundtrip_preserves_export(image in proptest_helpers::arb_image(4, 3)) {
        let session = Session::from_images(vec![image]);
        let json = to_session_string(&session).expect("serialize session");
        let restored = from_session_str(&json).expect("parse session");

        let left = proptest_helpers::record_semantics(&session.export_all().expect("export original"));
        let right = proptest_helpers::record_semantics(&restored.export_all().expect("export restored"));
        if let Err(message) = proptest_helpers::assert_records_close(&left, &right) {
            prop_assert!(false, "{}", message);
        }
        for region in restored.images()[0].regions() {
            prop_assert_eq!(region.parent(), Some(restored.images()[0].index()));
        }
    }

    #[test]
    fn last_selection_wins(image in proptest_helpers::arb_image(4, 0), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6)) {
        prop_assume!(!image.regions().is_empty());
        let ids: Vec<_> = image.regions().iter().map(|r| r.id().clone()).collect();
        let mut session = Session::new();
        let index = session.add_image(image);

        let mut last = None;
        for pick in &picks {
            let handle = RegionHandle::new(index, ids[pick.index(ids.len())].clone());
            session.select_region(&handle).expect("select");
            last = Some(handle);
        }

        let last = last.expect("at least one pick");
        prop_assert_eq!(session.highlighted_node(), Some(&last));
        prop_assert_eq!(
            session.image(index).expect("image").selected_region_id(),
            Some(&last.region)
        );
        prop_assert!(session.region(&last).expect("region").is_selected());
    }
}

use proptest::prelude::*;
use rectregion::region::io_results::image_from_records;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn export_fans_out_one_record_per_attachment(image in proptest_helpers::arb_image(4, 3)) {
        let records = image.export_all().expect("export");
        let expected: usize = image
            .regions()
            .iter()
            .map(|region| region.attachments.len().max(1))
            .sum();
        prop_assert_eq!(records.len(), expected);

        for region in image.regions() {
            let own: Vec<_> = records.iter().filter(|r| r.id == region.id().as_str()).collect();
            prop_assert!(own.iter().all(|r| r.geometry() == own[0].geometry()));
            prop_assert!(own.iter().all(|r| r.value.labels.len() <= 1));
        }
    }

    #[test]
    fn export_import_roundtrip_is_stable(image in proptest_helpers::arb_image(4, 3)) {
        let records = image.export_all().expect("export");

        let mut restored = image_from_records(
            image.name.clone(),
            image.natural_width,
            image.natural_height,
            &records,
        )
        .expect("import");
        restored
            .resize(image.natural_width, image.natural_height, image.stage_width, image.stage_height)
            .expect("resize");
        let reexported = restored.export_all().expect("re-export");

        let left = proptest_helpers::record_semantics(&records);
        let right = proptest_helpers::record_semantics(&reexported);
        if let Err(message) = proptest_helpers::assert_records_close(&left, &right) {
            prop_assert!(false, "{}", message);
        }
    }

    #[test]
    fn export_is_relative_to_current_stage(
        image in proptest_helpers::arb_image(3, 1),
        factor in 0.25f64..4.0,
    ) {
        let before = image.export_all().expect("export");

        let mut resized = image.clone();
        resized
            .resize(
                image.natural_width,
                image.natural_height,
                image.stage_width * factor,
                image.stage_height * factor,
            )
            .expect("resize");
        let after = resized.export_all().expect("export after resize");

        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            prop_assert!(proptest_helpers::approx_eq(a.value.x * factor, b.value.x, 1e-9));
            prop_assert!(proptest_helpers::approx_eq(a.value.width * factor, b.value.width, 1e-9));
        }
    }
}

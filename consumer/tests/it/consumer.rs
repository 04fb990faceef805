use ais_consumer::{
    error::{Error, TransportError},
    models::AisMessage,
};
use ais_core::{NavigationStatus, StatusProperty};

use crate::helper::test;

#[tokio::test(flavor = "multi_thread")]
async fn test_position_messages_are_emitted_as_snapshots() {
    test(|helper| async move {
        let message = AisMessage::test_default("257000000");
        helper.ais_source.send_message(&message).await;

        let snapshot = helper.next_snapshot().await;

        assert_eq!(snapshot.unique_vessels, 1);
        assert_eq!(snapshot.vessels.features.len(), 1);

        let feature = &snapshot.vessels.features[0];
        assert_eq!(feature.geometry.coordinates, [24.761767, 37.636665]);
        assert_eq!(feature.properties.mmsi.as_str(), "257000000");
        assert_eq!(feature.properties.ship_name, "SJARKEN");
        assert_eq!(feature.properties.cog, 123.3);
        assert_eq!(
            feature.properties.navigational_status,
            StatusProperty::Known(NavigationStatus::UnderWayUsingEngine)
        );
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nothing_is_emitted_without_updates() {
    test(|helper| async move {
        helper.assert_no_snapshot().await;

        helper
            .ais_source
            .send_message(&AisMessage::test_default("1"))
            .await;
        helper.next_snapshot().await;

        helper.assert_no_snapshot().await;
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_snapshots_hold_the_latest_position_of_every_vessel() {
    test(|helper| async move {
        let mut first = AisMessage::test_default("1");
        let second = AisMessage::test_default("2");

        helper.ais_source.send_message(&first).await;
        helper.ais_source.send_message(&second).await;

        first.position_report.course_over_ground = Some(10.);
        first.position_report.navigational_status = None;
        first.metadata.ship_name = None;
        helper.ais_source.send_message(&first).await;

        let snapshot = helper
            .snapshot_where(|s| {
                s.vessels.features.len() == 2 && s.vessels.features[0].properties.cog == 10.
            })
            .await;

        let updated = &snapshot.vessels.features[0].properties;
        assert_eq!(updated.mmsi.as_str(), "1");
        assert_eq!(updated.ship_name, "N/A");
        assert_eq!(updated.navigational_status, StatusProperty::Unknown);

        let untouched = &snapshot.vessels.features[1].properties;
        assert_eq!(untouched.mmsi.as_str(), "2");
        assert_eq!(untouched.cog, 123.3);

        helper.assert_no_snapshot().await;
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_messages_are_dropped_and_consumption_continues() {
    test(|helper| async move {
        let mut missing_mmsi = AisMessage::test_default("1");
        missing_mmsi.metadata.mmsi = None;

        let mut out_of_range = AisMessage::test_default("2");
        out_of_range.position_report.latitude = 91.;

        helper.ais_source.send_raw("data: not json\n\n".into()).await;
        helper.ais_source.send_message(&missing_mmsi).await;
        helper.ais_source.send_message(&out_of_range).await;
        helper
            .ais_source
            .send_message(&AisMessage::test_default("3"))
            .await;

        let snapshot = helper.next_snapshot().await;

        assert_eq!(snapshot.unique_vessels, 1);
        assert_eq!(snapshot.vessels.features.len(), 1);
        assert_eq!(snapshot.vessels.features[0].properties.mmsi.as_str(), "3");
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unique_vessel_count_only_counts_new_identities() {
    test(|mut helper| async move {
        for mmsi in ["1", "2", "1"] {
            helper
                .ais_source
                .send_message(&AisMessage::test_default(mmsi))
                .await;
        }

        let snapshot = helper
            .snapshot_where(|s| s.vessels.features.len() == 2)
            .await;
        assert_eq!(snapshot.unique_vessels, 2);

        let count = *helper.unique_vessels.borrow_and_update();
        assert_eq!(count, 2);
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_named_events_are_ignored() {
    test(|helper| async move {
        let ignored = serde_json::to_string(&AisMessage::test_default("1")).unwrap();
        helper
            .ais_source
            .send_raw(format!("event: ping\ndata: {ignored}\n\n"))
            .await;
        helper
            .ais_source
            .send_message(&AisMessage::test_default("2"))
            .await;

        let snapshot = helper.next_snapshot().await;

        assert_eq!(snapshot.vessels.features.len(), 1);
        assert_eq!(snapshot.vessels.features[0].properties.mmsi.as_str(), "2");
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_closed_stream_flushes_pending_updates_and_fails_with_transport_error() {
    test(|helper| async move {
        helper
            .ais_source
            .send_message(&AisMessage::test_default("1"))
            .await;
        helper.ais_source.close();

        let result = helper.app.await.unwrap();
        assert!(matches!(
            result,
            Err(Error::Transport {
                source: TransportError::StreamClosed { .. },
                ..
            })
        ));

        let snapshot = helper.snapshots.recv().await.unwrap();
        assert_eq!(snapshot.vessels.features.len(), 1);
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_can_be_requested_more_than_once() {
    test(|helper| async move {
        helper.shutdown.shutdown();
        helper.shutdown.shutdown();

        assert!(helper.shutdown.is_shutdown());
        helper.app.await.unwrap().unwrap();
    })
    .await;
}

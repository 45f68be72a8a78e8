//! End-to-end tests sending real datagrams to a loopback receiver.
//!
//! Run with: `cargo test --test udp_send`

mod common;

use async_trapgen::dispatch::{DispatchPlan, Dispatcher};
use async_trapgen::{TrapDefinition, TrapSender};
use common::*;
use std::sync::Arc;
use std::time::Duration;

const RECEIVE_WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_batch_reaches_receiver() {
    let receiver = TrapReceiver::bind().await;
    let sender = TrapSender::new(&loopback_config(receiver.port()));
    let plan = DispatchPlan {
        count: 5,
        launch_interval: Duration::from_millis(2),
        ..Default::default()
    };

    let batch = Dispatcher::new(sender, plan)
        .run(cisco_definition(), |_| {})
        .await;
    assert_eq!(batch.successes(), 5);

    let datagrams = receiver.receive(5, RECEIVE_WAIT).await;
    assert_eq!(datagrams.len(), 5);
    for data in &datagrams {
        assert_eq!(data[0], 0x30);
        // version 0, community "public", Trap-PDU
        assert_eq!(&data[2..5], &[0x02, 0x01, 0x00]);
        assert_eq!(&data[5..13], b"\x04\x06public");
        assert_eq!(data[13], 0xA4);
        assert!(data.windows(5).any(|w| w == b"hello"));
    }
}

#[tokio::test]
async fn test_trap_fields_on_the_wire() {
    let receiver = TrapReceiver::bind().await;
    let sender = TrapSender::new(&loopback_config(receiver.port()));

    let outcome = sender
        .send(&TrapDefinition::parse_str(CISCO_TRAP).definition)
        .await;
    assert!(outcome.is_success());

    let datagrams = receiver.receive(1, RECEIVE_WAIT).await;
    let data = &datagrams[0];

    let mut enterprise = vec![0x06, 0x06];
    enterprise.extend_from_slice(&cisco_enterprise().to_ber());
    let pdu = &data[15..];
    assert!(pdu.starts_with(&enterprise));

    let after_enterprise = &pdu[enterprise.len()..];
    let mut expected = vec![0x40, 0x04];
    expected.extend_from_slice(&TEST_ENTITY_OCTETS);
    // generic-trap 6, specific-trap 1
    expected.extend_from_slice(&[0x02, 0x01, 0x06, 0x02, 0x01, 0x01]);
    assert!(after_enterprise.starts_with(&expected));
}

#[tokio::test]
async fn test_varbinds_arrive_in_file_order() {
    let receiver = TrapReceiver::bind().await;
    let sender = TrapSender::new(&loopback_config(receiver.port()));
    let definition = Arc::new(TrapDefinition::parse_str(LINK_DOWN_TRAP).definition);

    let batch = Dispatcher::new(sender, DispatchPlan::default())
        .run(definition, |_| {})
        .await;
    assert_eq!(batch.successes(), 1);

    let datagrams = receiver.receive(1, RECEIVE_WAIT).await;
    let data = &datagrams[0];
    let position = |needle: &[u8]| {
        data.windows(needle.len())
            .position(|w| w == needle)
            .expect("value present")
    };

    let index = position(&b"\x04\x017"[..]);
    let descr = position(&b"ge-0/0/7"[..]);
    let status = position(&b"down"[..]);
    assert!(index < descr && descr < status);
}

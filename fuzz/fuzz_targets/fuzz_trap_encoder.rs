#![no_main]

use libfuzzer_sys::fuzz_target;

use async_trapgen::message::TrapMessage;
use async_trapgen::pdu::TrapV1Pdu;
use async_trapgen::TrapDefinition;
use bytes::Bytes;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let definition = TrapDefinition::parse_str(text)
        .definition
        .with_agent_address("192.0.2.1");

    // Anything that validates must encode to a well-formed SEQUENCE
    if definition.validate().is_ok() {
        let Ok(pdu) = TrapV1Pdu::from_definition(&definition, 0) else {
            panic!("validated definition failed to build a PDU");
        };
        let bytes = TrapMessage::v1(Bytes::from_static(b"public"), pdu).encode();
        assert_eq!(bytes[0], 0x30);
    }
});

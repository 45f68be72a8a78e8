#![no_main]

use libfuzzer_sys::fuzz_target;

use async_trapgen::oid::Oid;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Lenient parse never panics; encoding is only defined for validated OIDs
    let _ = Oid::parse(s);

    if let Ok(oid) = Oid::parse_encodable(s) {
        let ber = oid.to_ber();
        assert!(!ber.is_empty());
        // Only the last byte of a subidentifier run has the high bit clear
        assert_eq!(ber[ber.len() - 1] & 0x80, 0);
    }
});

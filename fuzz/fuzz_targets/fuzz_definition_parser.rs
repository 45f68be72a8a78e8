#![no_main]

use libfuzzer_sys::fuzz_target;

use async_trapgen::TrapDefinition;

fuzz_target!(|data: &[u8]| {
    // Reader path: invalid UTF-8 must surface as an error, not a panic
    let from_reader = TrapDefinition::from_reader(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let parsed = TrapDefinition::parse_str(text);
        assert_eq!(parsed, TrapDefinition::parse_str(text));

        let Ok(from_reader) = from_reader else {
            panic!("valid UTF-8 rejected by reader");
        };
        assert_eq!(from_reader, parsed);
    }
});

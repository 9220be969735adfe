#![no_main]
use libfuzzer_sys::fuzz_target;
use mcp_stays::domain::stay::StayRange;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let (check_in, check_out) = text.split_once('|').unwrap_or((text, ""));
        if let Ok(stay) = StayRange::parse(check_in, check_out) {
            assert!(stay.nights() > 0);
            assert!(stay.conflicts_with(&stay));
        }
    }
});

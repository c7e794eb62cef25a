//! Fuzz target for the Packstream value reader.
//!
//! Arbitrary bytes must either decode or fail with a `ReaderError`; neither
//! reading nor skipping may panic or allocate beyond the configured limits.
//!
//! ## Running
//!
//! ```bash
//! cd crates/bw-01-packstream
//! cargo +nightly fuzz run fuzz_read_value
//! ```

#![no_main]

use bw_01_packstream::{PackstreamBuf, PackstreamConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = PackstreamConfig {
        max_string_length: 4096,
        max_bytes_length: 4096,
        max_list_length: 4096,
        max_map_length: 4096,
        max_nesting_depth: 32,
    };

    let mut skipped = PackstreamBuf::wrap(data);
    skipped.set_config(config.clone());
    let _ = skipped.skip();

    let mut buf = PackstreamBuf::wrap(data);
    buf.set_config(config);
    if let Ok(value) = buf.read_value() {
        // re-encoding is stable: encode, decode, encode gives the same bytes
        let mut first = PackstreamBuf::new();
        if first.write_value(&value).is_ok() {
            let encoded = first.as_slice().to_vec();
            let again = first.read_value().expect("re-encoded value must decode");
            let mut second = PackstreamBuf::new();
            second.write_value(&again).expect("decoded value must encode");
            assert_eq!(encoded, second.as_slice());
        }
    }
});

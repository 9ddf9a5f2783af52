#![no_main]
use libfuzzer_sys::fuzz_target;
use passkeep::vault::codec::JsonCodec;
use passkeep::vault::ports::RecordCodec;

fuzz_target!(|data: &[u8]| {
    // Decoders must not panic on arbitrary stored bytes
    let codec = JsonCodec;
    let _ = codec.decode_credentials(data);
    let _ = codec.decode_categories(data);
    let _ = codec.decode_flag(data);
});

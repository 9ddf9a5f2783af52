#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use passkeep::vault::filter::matches_search;
use passkeep::vault::models::Credential;

#[derive(Arbitrary, Debug)]
struct Input {
    service: String,
    username: String,
    description: String,
    term: String,
}

fuzz_target!(|input: Input| {
    let now = chrono::Utc::now();
    let c = Credential {
        id: "x".into(),
        service: input.service,
        username: input.username,
        password: String::new(),
        description: input.description,
        category: "other".into(),
        created_at: now,
        updated_at: now,
    };
    // Case folding over arbitrary Unicode must not panic
    let _ = matches_search(&c, &input.term);
});

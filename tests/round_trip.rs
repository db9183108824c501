use glyphpack::{
    classify_method, verify_round_trip, CompressOptions, DecompressOptions, DictionarySet, Engine,
    Method, PatternEntry, TokenEntry,
};

const SAMPLE: &str = include_str!("../test_fixtures/sample.js");

#[test]
fn fixture_round_trips_through_both_tiers() {
    let engine = Engine::builtin();
    for method in [Method::CharacterTier, Method::PatternTier] {
        let options = CompressOptions::for_method(method).unwrap();
        let compressed = engine.compress(SAMPLE, &options).unwrap();
        assert_eq!(classify_method(&compressed).unwrap(), method);

        let restored = engine
            .decompress(&compressed, &DecompressOptions::default())
            .unwrap();
        verify_round_trip(SAMPLE, &restored).unwrap();
    }
}

#[test]
fn pattern_tier_is_smaller_than_character_tier() {
    let engine = Engine::builtin();
    let character = engine.compress_with_method(SAMPLE, "characterTier").unwrap();
    let pattern = engine.compress_with_method(SAMPLE, "patternTier").unwrap();
    assert!(pattern.chars().count() < character.chars().count());
}

#[test]
fn custom_dictionaries_round_trip() {
    let dictionaries = DictionarySet::new(
        vec![
            TokenEntry::new("const", "常"),
            TokenEntry::new("require", "需"),
        ],
        vec![PatternEntry::new("const $1 = require($2);", "ཀ($2,$1)")],
    );
    let engine = Engine::new(&dictionaries);
    let source = "const a = require('alpha');\nconst b = require('beta');";

    let compressed = engine.compress(source, &CompressOptions::default()).unwrap();
    assert_eq!(compressed, "ཀ('alpha',a)ཀ('beta',b)༄");

    let restored = engine
        .decompress(&compressed, &DecompressOptions::default())
        .unwrap();
    verify_round_trip(source, &restored).unwrap();
}

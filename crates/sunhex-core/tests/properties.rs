use proptest::prelude::*;
use sunhex_core::{
    decode_v1, generate_v1, supported_codes, CodecError, Gender, IdentityRecord, Protocol,
    SinCodec, QUANTUM_VERSION,
};

fn capitalized(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn country() -> impl Strategy<Value = &'static str> {
    let codes = supported_codes();
    (0..codes.len()).prop_map(move |i| codes[i])
}

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

prop_compose! {
    fn identity()(
        first_name in "\\PC{1,20}",
        last_name in "\\PC{1,20}",
        country_code in country(),
        birth_year in 1900u16..=2025,
        birth_month in 1u8..=12,
        birth_day in 1u8..=28,
        gender in gender(),
    ) -> IdentityRecord {
        IdentityRecord {
            first_name,
            last_name,
            country_code: country_code.to_string(),
            birth_year,
            birth_month,
            birth_day,
            gender,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_v1_round_trip(
        first in "[A-Za-z]{1,13}",
        last in "[A-Za-z]{1,13}",
        country in country(),
        year in 1900u32..=2025,
        month in 1u32..=12,
        day in 1u32..=31,
        male in any::<bool>(),
        pin in 0u32..=999_999,
    ) {
        let gender = if male { "Male" } else { "Female" };
        let generated = generate_v1(&first, &last, country, year, month, day, gender, pin);
        prop_assert!(generated.is_success(), "{:?}", generated.message);
        let hex_code = generated.hex_code.unwrap();

        let decoded = decode_v1(&hex_code, pin);
        prop_assert!(decoded.is_success(), "{:?}", decoded.message);
        let info = decoded.personal_info.unwrap();
        prop_assert_eq!(info.first_name, capitalized(&first));
        prop_assert_eq!(info.last_name, capitalized(&last));
        prop_assert_eq!(info.country_code.as_str(), country);
        prop_assert_eq!(info.birth_year, format!("{year:04}"));
        prop_assert_eq!(info.birth_month, format!("{month:02}"));
        prop_assert_eq!(info.birth_day, format!("{day:02}"));
        prop_assert_eq!(info.gender.as_str(), gender);
    }

    #[test]
    fn prop_v1_is_deterministic(
        first in "[A-Za-z]{1,13}",
        pin in 0u32..=999_999,
    ) {
        let a = generate_v1(&first, "Doe", "US", 1990, 5, 15, "Male", pin);
        let b = generate_v1(&first, "Doe", "US", 1990, 5, 15, "Male", pin);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_v1_long_names_overflow(first in "[A-Za-z]{14,40}", pin in 1000u32..=999_999) {
        let generated = generate_v1(&first, "Doe", "US", 1990, 5, 15, "Male", pin);
        let info = decode_v1(generated.hex_code.as_deref().unwrap(), pin)
            .personal_info
            .unwrap();
        prop_assert_eq!(info.first_name, "Overflow");
        prop_assert_eq!(info.last_name, "Doe");
    }

    #[test]
    fn prop_v1_only_first_token_is_kept(first in "[A-Za-z]{1,13}", rest in "[A-Za-z ]{0,20}") {
        let full = format!("{first} {rest}");
        let generated = generate_v1(&full, "Doe", "US", 1990, 5, 15, "Male", 1234);
        let info = decode_v1(generated.hex_code.as_deref().unwrap(), 1234)
            .personal_info
            .unwrap();
        prop_assert_eq!(info.first_name, capitalized(&first));
    }
}

proptest! {
    // Each case runs the full 100 000-round KDF at least twice.
    #![proptest_config(ProptestConfig {
        cases: 12,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_v2_round_trip(record in identity(), pin in "\\PC{0,12}") {
        let codec = SinCodec::default();
        let encoded = codec.generate(&record, &pin, Protocol::V2).unwrap();
        let decoded = codec.decode(&encoded.hex_code, &pin, Protocol::V2).unwrap();
        prop_assert_eq!(decoded.info.to_record(), Some(record));
    }

    #[test]
    fn prop_v2_wrong_pin_rejected(
        record in identity(),
        pin in "[0-9]{4,6}",
        other in "[0-9]{4,6}",
    ) {
        prop_assume!(pin != other);
        let codec = SinCodec::default();
        let encoded = codec.generate(&record, &pin, Protocol::V2).unwrap();
        let result = codec.decode(&encoded.hex_code, &other, Protocol::V2);
        prop_assert!(matches!(result, Err(CodecError::DecryptionFailed)));
    }

    #[test]
    fn prop_v2_tamper_detected(record in identity(), offset in any::<prop::sample::Index>(), bit in 0u8..8) {
        let codec = SinCodec::default();
        let encoded = codec.generate(&record, "1234", Protocol::V2).unwrap();
        let mut frame = hex::decode(&encoded.hex_code).unwrap();
        prop_assert_eq!(frame[0], QUANTUM_VERSION);
        let at = 21 + offset.index(frame.len() - 21);
        frame[at] ^= 1 << bit;
        let result = codec.decode(&hex::encode_upper(&frame), "1234", Protocol::V2);
        prop_assert!(matches!(result, Err(CodecError::DecryptionFailed)));
    }

    #[test]
    fn prop_v2_is_not_deterministic(record in identity()) {
        let codec = SinCodec::default();
        let a = codec.generate(&record, "1234", Protocol::V2).unwrap();
        let b = codec.generate(&record, "1234", Protocol::V2).unwrap();
        prop_assert_ne!(&a.hex_code, &b.hex_code);
        let decoded = codec.decode(&b.hex_code, "1234", Protocol::V2).unwrap();
        prop_assert_eq!(decoded.info.to_record(), Some(record));
    }
}

use crate::content_moderator::{
    check_message, contains_personal_info, contains_profanity, contains_spam, content_score,
    filter_profanity, is_appropriate, validate_name, violations, PolicyViolation,
};

#[test]
fn test_clean_text_is_appropriate() {
    assert!(is_appropriate("Looking forward to meeting new people here"));
    assert_eq!(content_score("Looking forward to meeting new people here"), 100);
}

#[test]
fn test_profanity_detected() {
    assert!(contains_profanity("this is shit"));
    assert!(!contains_profanity("hello"));
    assert!(!contains_profanity("I went to Scunthorpe")); // whole-word matching only
}

#[test]
fn test_leet_speak_profanity_detected() {
    assert!(contains_profanity("sh1t"));
    assert!(contains_profanity("$hit happens"));
    // Substitution-table only: doubled letters and unmapped digits stay unmatched
    assert!(!contains_profanity("what the fuuck"));
    assert!(!contains_profanity("sh2t"));
}

#[test]
fn test_punctuation_stripped_before_matching() {
    assert!(contains_profanity("shit!"));
    assert!(contains_profanity("...shit..."));
}

#[test]
fn test_filter_profanity_preserves_shape() {
    assert_eq!(filter_profanity("what the sh1t!"), "what the ****!");
    assert_eq!(filter_profanity("shit happens"), "**** happens");
    assert_eq!(filter_profanity("no bad words"), "no bad words");
}

#[test]
fn test_spam_patterns() {
    assert!(contains_spam("Follow me on instagram"));
    assert!(contains_spam("visit https://example.org now"));
    assert!(contains_spam("send it via CashApp"));
    assert!(!contains_spam("let's grab coffee sometime"));
}

#[test]
fn test_emoji_flood_is_spam() {
    let flood = "😀".repeat(11);
    assert!(contains_spam(&flood));
    let few = "😀".repeat(10);
    assert!(!contains_spam(&few));
}

#[test]
fn test_personal_info_phone() {
    assert!(contains_personal_info("call me at 555-123-4567"));
    assert!(contains_personal_info("5551234567"));
    assert!(contains_personal_info("555.123.4567"));
    assert!(!contains_personal_info("my lucky number is 7"));
}

#[test]
fn test_personal_info_email() {
    assert!(contains_personal_info("write to alice@example.com"));
    assert!(!contains_personal_info("alice at example dot com"));
}

#[test]
fn test_personal_info_address() {
    assert!(contains_personal_info("I live at 123 Main Street"));
    assert!(contains_personal_info("meet me at 42 Elm St"));
    assert!(!contains_personal_info("main street vibes"));
}

#[test]
fn test_shouting_detection() {
    let found = violations("WHY IS EVERYONE IGNORING ME");
    assert!(found.contains(&PolicyViolation::ExcessiveCaps));
    assert!(!violations("Hello World").contains(&PolicyViolation::ExcessiveCaps));
    // Short all-caps text stays under the letter floor
    assert!(!violations("OK GO").contains(&PolicyViolation::ExcessiveCaps));
}

#[test]
fn test_repetition_detection() {
    assert!(violations("heyyyyy").contains(&PolicyViolation::ExcessiveRepetition));
    assert!(!violations("heyyy").contains(&PolicyViolation::ExcessiveRepetition));
}

#[test]
fn test_content_score_deductions_are_additive() {
    // Profanity (40) + spam (30)
    let score = content_score("shit, follow me on instagram");
    assert_eq!(score, 30);
}

#[test]
fn test_content_score_floors_at_zero() {
    // Profanity + spam + phone + shouting + repetition: 110 points of deductions
    let text = "FUCK THIS BUY NOW CALL 555-123-4567 AAAAAAA";
    assert_eq!(content_score(text), 0);
}

#[test]
fn test_content_score_bounds() {
    for text in ["", "hello", "SHIT SHIT SHIT SHIT!!!", "😀😀😀😀😀😀😀😀😀😀😀😀"] {
        let score = content_score(text);
        assert!(score <= 100);
    }
}

#[test]
fn test_violations_order_is_fixed() {
    let text = "SHIT BUY NOW 555-123-4567 AAAAAAA";
    assert_eq!(
        violations(text),
        vec![
            PolicyViolation::Profanity,
            PolicyViolation::Spam,
            PolicyViolation::PersonalInfo,
            PolicyViolation::ExcessiveCaps,
            PolicyViolation::ExcessiveRepetition,
        ]
    );
}

#[test]
fn test_validate_name_length_bounds() {
    assert!(validate_name("ab").is_valid);
    assert!(!validate_name("a").is_valid);
    assert!(!validate_name(&"a".repeat(51)).is_valid);
    assert!(validate_name(&"a".repeat(50)).is_valid);
}

#[test]
fn test_validate_name_digit_heuristic() {
    let result = validate_name("John123456");
    assert!(!result.is_valid);
    assert!(result.reason.is_some());
    assert!(validate_name("John3").is_valid);
}

#[test]
fn test_validate_name_profanity() {
    let result = validate_name("Bitch Queen");
    assert!(!result.is_valid);
    assert_eq!(
        result.reason.as_deref(),
        Some("name contains inappropriate language")
    );
}

#[test]
fn test_validate_name_blocked_terms() {
    assert!(!validate_name("OfficialSupport").is_valid);
    assert!(!validate_name("Venmo Girl").is_valid);
    assert!(validate_name("John Smith").is_valid);
}

#[test]
fn test_validate_name_contact_details() {
    let result = validate_name("reach.me@mail");
    assert!(!result.is_valid);
    assert_eq!(
        result.reason.as_deref(),
        Some("name may not contain contact details")
    );
    assert!(!validate_name("john.example.com").is_valid);
}

#[test]
fn test_validate_name_special_character_density() {
    assert!(!validate_name("J***per!!").is_valid);
    assert!(validate_name("Mary-Jane O'Neil").is_valid);
}

#[test]
fn test_validate_name_first_failure_reported() {
    // Trips both the blocklist and the density check; the blocklist comes
    // first in the rule order.
    let result = validate_name("Venmo$$$$");
    assert!(!result.is_valid);
    assert_eq!(result.reason.as_deref(), Some("name contains a blocked term"));
}

#[test]
fn test_check_message_rejects_personal_info() {
    let verdict = check_message("text me at 555-123-4567");
    assert!(!verdict.accepted);
    assert!(verdict.violations.contains(&PolicyViolation::PersonalInfo));
}

#[test]
fn test_check_message_rejects_profanity() {
    let verdict = check_message("you are a bitch");
    assert!(!verdict.accepted);
    assert!(verdict.violations.contains(&PolicyViolation::Profanity));
}

#[test]
fn test_check_message_allows_spam_only() {
    // Spam alone is surfaced but does not block a send
    let verdict = check_message("follow me on instagram");
    assert!(verdict.accepted);
    assert!(verdict.violations.contains(&PolicyViolation::Spam));
}

#[test]
fn test_check_message_sanitizes() {
    let verdict = check_message("<script>alert(1)</script>hello");
    assert!(!verdict.sanitized.to_lowercase().contains("<script"));
    assert!(verdict.sanitized.contains("hello"));
    assert!(verdict.accepted);
}

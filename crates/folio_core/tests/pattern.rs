use folio_core::{FilenamePattern, PatternError, Segment};
use pretty_assertions::assert_eq;

#[test]
fn renders_zero_padded_number() {
    let pattern = FilenamePattern::parse("{prefix}_{num:03d}{suffix}.jpg").unwrap();
    assert_eq!(pattern.render("gjuzelev_vasil", 6, ""), "gjuzelev_vasil_006.jpg");
    assert_eq!(pattern.render("book", 6, "_1L"), "book_006_1L.jpg");
}

#[test]
fn wide_numbers_are_not_truncated() {
    let pattern = FilenamePattern::parse("{prefix}_{num:03d}{suffix}.jpg").unwrap();
    assert_eq!(pattern.render("book", 1234, ""), "book_1234.jpg");
}

#[test]
fn from_parts_matches_parsed_template() {
    let built = FilenamePattern::from_parts(" - ", 4, "jpg");
    let parsed = FilenamePattern::parse("{prefix} - {num:04d}{suffix}.jpg").unwrap();
    assert_eq!(built, parsed);
    assert_eq!(built.render("satr_bitie_part2", 4, ""), "satr_bitie_part2 - 0004.jpg");
}

#[test]
fn from_parts_without_separator_or_dot() {
    let pattern = FilenamePattern::from_parts("", 4, ".tif");
    assert_eq!(pattern.render("document", 1, ""), "document0001.tif");
    assert_eq!(pattern.to_string(), "{prefix}{num:04d}{suffix}.tif");
}

#[test]
fn display_round_trips_through_parse() {
    let template = "{{scan}}_{prefix}-{num:05d}{suffix}.png";
    let pattern = FilenamePattern::parse(template).unwrap();
    assert_eq!(pattern.render("p", 12, "x"), "{scan}_p-00012x.png");
    assert_eq!(pattern.to_string(), template);
    assert_eq!(FilenamePattern::parse(&pattern.to_string()).unwrap(), pattern);
}

#[test]
fn unpadded_number_slot() {
    let pattern = FilenamePattern::parse("page{num}.jpg").unwrap();
    assert_eq!(pattern.number_width(), 0);
    assert_eq!(pattern.render("ignored", 42, "ignored"), "page42.jpg");
}

#[test]
fn default_pattern_is_underscore_three_digits_jpg() {
    let pattern = FilenamePattern::default();
    assert_eq!(pattern.to_string(), "{prefix}_{num:03d}{suffix}.jpg");
    assert_eq!(pattern.number_width(), 3);
}

#[test]
fn rejects_malformed_templates() {
    assert_eq!(
        FilenamePattern::parse("{prefix}_{page}.jpg"),
        Err(PatternError::UnknownPlaceholder("page".to_string()))
    );
    assert_eq!(
        FilenamePattern::parse("{prefix}_{num:3x}.jpg"),
        Err(PatternError::InvalidNumberFormat("3x".to_string()))
    );
    assert_eq!(
        FilenamePattern::parse("{prefix}_{num"),
        Err(PatternError::Unterminated(9))
    );
    assert_eq!(
        FilenamePattern::parse("{prefix}}_{num}"),
        Err(PatternError::UnmatchedClose(8))
    );
    assert_eq!(
        FilenamePattern::parse("{prefix}{suffix}.jpg"),
        Err(PatternError::MissingNumber)
    );
    assert_eq!(
        FilenamePattern::from_segments(vec![Segment::Prefix]),
        Err(PatternError::MissingNumber)
    );
}

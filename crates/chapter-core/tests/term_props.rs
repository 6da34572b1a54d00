use chapter_core::{term_code_to_words, words_to_term_code, Season, Term, TermError, INVALID_TERM_CODE};
use proptest::prelude::*;

fn season_strategy() -> impl Strategy<Value = Season> {
    prop_oneof![
        Just(Season::Fall),
        Just(Season::Winter),
        Just(Season::Spring),
        Just(Season::SpringSummer),
        Just(Season::Summer),
    ]
}

proptest! {
    #[test]
    fn prop_term_round_trips(season in season_strategy(), year in 2000..=9999i32) {
        let words = format!("{season} {year}");
        let code = words_to_term_code(&words);
        prop_assert_ne!(code, INVALID_TERM_CODE);
        prop_assert_eq!(term_code_to_words(code).unwrap(), words);
    }

    #[test]
    fn prop_codes_increase_through_the_year(year in 2000..=9998i32) {
        let order = [Season::Winter, Season::Spring, Season::SpringSummer, Season::Summer, Season::Fall];
        let codes: Vec<i32> = order
            .iter()
            .map(|season| Term::new(*season, year).unwrap().code())
            .collect();
        prop_assert!(codes.windows(2).all(|pair| pair[1] - pair[0] == 10));
        let next_winter = Term::new(Season::Winter, year + 1).unwrap().code();
        prop_assert_eq!(next_winter - codes[4], 10);
    }

    #[test]
    fn prop_unknown_season_is_sentinel(word in "[a-z]{3,10}", year in 2000..=9999i32) {
        prop_assume!(word.parse::<Season>().is_err());
        prop_assert_eq!(words_to_term_code(&format!("{word} {year}")), INVALID_TERM_CODE);
    }

    #[test]
    fn prop_decode_never_panics(code in any::<i32>()) {
        let _ = term_code_to_words(code);
    }
}

#[test]
fn test_fall_2024() {
    assert_eq!(words_to_term_code("Fall 2024"), 2510);
    assert_eq!(term_code_to_words(2510).unwrap(), "Fall 2024");
}

#[test]
fn test_blorp_is_sentinel() {
    assert_eq!(words_to_term_code("blorp 2024"), -1);
}

#[test]
fn test_out_of_range_years() {
    assert_eq!(words_to_term_code("Fall 1999"), INVALID_TERM_CODE);
    assert_eq!(words_to_term_code("Fall 10000"), INVALID_TERM_CODE);
    assert!(matches!(
        term_code_to_words(1250),
        Err(TermError::YearOutOfRange { year: 1999, .. })
    ));
}

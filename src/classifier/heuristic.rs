use crate::domain::Confidence;

use super::script::{normalize, ScriptCounts};

/// Outcome of the script heuristic before it is turned into a `ClassificationResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Language(&'static str, Confidence),
    /// Script evidence exists but does not settle the language.
    Uncertain,
    /// Too little script evidence to decide anything.
    Unknown,
}

pub fn classify(text: &str) -> Verdict {
    let counts = ScriptCounts::of(&normalize(text));
    decide(&counts)
}

/// Ordered rules; each rule assumes none of the previous ones fired.
pub fn decide(c: &ScriptCounts) -> Verdict {
    let total = c.total();
    if total < 2 {
        return Verdict::Unknown;
    }

    let kana = c.kana();
    let ratio = |n: usize| n as f64 / total as f64;
    let (hangul_r, kana_r, han_r, latin_r) =
        (ratio(c.hangul), ratio(kana), ratio(c.han), ratio(c.latin));

    if c.hangul >= 2 && (hangul_r >= 0.20 || c.hangul > kana) {
        return Verdict::Language("ko", Confidence::High);
    }
    if c.hangul >= 1 && kana == 0 && c.han == 0 {
        return Verdict::Language("ko", Confidence::Medium);
    }
    if kana >= 2 && c.hangul == 0 && kana_r >= 0.10 {
        return Verdict::Language("ja", Confidence::High);
    }
    if kana >= 1 && c.hangul >= 1 {
        return Verdict::Uncertain;
    }
    if c.han >= 2
        && c.hangul == 0
        && kana == 0
        && (han_r >= 0.30 || (han_r >= 0.20 && latin_r < 0.50))
    {
        return Verdict::Language("zh", Confidence::Medium);
    }
    if latin_r >= 0.30 && c.cjk() == 0 {
        return Verdict::Language("en", Confidence::High);
    }
    if latin_r >= 0.50 && c.cjk() <= 1 {
        return Verdict::Language("en", Confidence::Medium);
    }
    if c.han >= 1 && c.latin >= 1 && c.hangul == 0 && kana == 0 {
        return if han_r > latin_r {
            Verdict::Language("zh", Confidence::Low)
        } else {
            Verdict::Uncertain
        };
    }
    Verdict::Uncertain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(hangul: usize, kana: usize, han: usize, latin: usize) -> ScriptCounts {
        ScriptCounts {
            hangul,
            hiragana: kana,
            katakana: 0,
            han,
            latin,
        }
    }

    #[test]
    fn korean_comment_with_jamo_laughter_is_high_confidence_korean() {
        assert_eq!(
            classify("한글댓글예시 ㅋㅋㅋㅋ"),
            Verdict::Language("ko", Confidence::High)
        );
    }

    #[test]
    fn english_comment_is_high_confidence_english() {
        assert_eq!(
            classify("hello world, nice video!"),
            Verdict::Language("en", Confidence::High)
        );
    }

    #[test]
    fn emoji_and_punctuation_are_unknown() {
        assert_eq!(classify("😂😂!!! ??"), Verdict::Unknown);
        assert_eq!(classify("https://example.com/watch?v=abc"), Verdict::Unknown);
        assert_eq!(classify("a"), Verdict::Unknown);
    }

    #[test]
    fn han_heavy_mix_with_single_latin_letter_hits_chinese_ratio_rule_first() {
        // han 3 of 4 clears the 0.30 ratio, so the mixed han/latin rule is never reached
        assert_eq!(classify("中文字x"), Verdict::Language("zh", Confidence::Medium));
    }

    #[test]
    fn han_and_latin_with_latin_majority_is_uncertain() {
        assert_eq!(decide(&counts(0, 0, 3, 9)), Verdict::Uncertain);
    }

    #[test]
    fn japanese_with_kana_is_high_confidence_japanese() {
        assert_eq!(
            classify("この動画すごく面白い"),
            Verdict::Language("ja", Confidence::High)
        );
    }

    #[test]
    fn single_hangul_with_kana_is_ambiguous() {
        assert_eq!(classify("ㅋあいう"), Verdict::Uncertain);
    }

    #[test]
    fn pure_han_is_medium_confidence_chinese() {
        assert_eq!(classify("这个视频很好"), Verdict::Language("zh", Confidence::Medium));
    }

    #[test]
    fn latin_with_one_cjk_char_is_medium_english() {
        assert_eq!(classify("good 字"), Verdict::Language("en", Confidence::Medium));
    }

    #[test]
    fn balanced_han_and_latin_stays_uncertain() {
        // han 2 of 8 = 0.25, latin 6 of 8 = 0.75 fails rule 5 and 7 (cjk = 2)
        assert_eq!(decide(&counts(0, 0, 2, 6)), Verdict::Uncertain);
    }

    #[test]
    fn hangul_evidence_always_yields_korean_high() {
        for hangul in 2..12 {
            for kana in 0..12 {
                for han in 0..6 {
                    for latin in 0..6 {
                        let c = counts(hangul, kana, han, latin);
                        let ratio = hangul as f64 / c.total() as f64;
                        if ratio >= 0.20 || hangul > kana {
                            assert_eq!(decide(&c), Verdict::Language("ko", Confidence::High));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn never_japanese_with_hangul_and_no_kana() {
        for hangul in 1..8 {
            for han in 0..8 {
                for latin in 0..8 {
                    let verdict = decide(&counts(hangul, 0, han, latin));
                    assert!(!matches!(verdict, Verdict::Language("ja", _)));
                }
            }
        }
    }
}

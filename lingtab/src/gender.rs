//! Gender constants and pronoun data
//!
//! A [`GenderConst`] describes the referent of a pronoun with more detail than
//! a grammatical gender category: whether it is a person, how many there are,
//! and whether the gender is known or guessed. Pronoun variations collapse
//! these constants into a few table keys per usage.

use crate::catalog::WILDCARD;
use serde::{Deserialize, Serialize};

/// Grammatical role a pronoun plays in the sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PronounUsage {
    Object,
    Possessive,
    Reflexive,
    Subject,
}

/// Referent gender as known to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenderConst {
    NotAPerson = 0,
    FemaleSingular = 1,
    MaleSingular = 2,
    FemaleSingularGuess = 3,
    MaleSingularGuess = 4,
    Mixed = 5,
    NeuterSingular = 6,
    UnknownSingular = 7,
    FemalePlural = 8,
    MalePlural = 9,
    NeuterPlural = 10,
    UnknownPlural = 11,
}

impl GenderConst {
    pub const ALL: [GenderConst; 12] = [
        GenderConst::NotAPerson,
        GenderConst::FemaleSingular,
        GenderConst::MaleSingular,
        GenderConst::FemaleSingularGuess,
        GenderConst::MaleSingularGuess,
        GenderConst::Mixed,
        GenderConst::NeuterSingular,
        GenderConst::UnknownSingular,
        GenderConst::FemalePlural,
        GenderConst::MalePlural,
        GenderConst::NeuterPlural,
        GenderConst::UnknownPlural,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// The gender constant whose pronoun a usage of `gender` should take.
///
/// Only four constants survive: NOT_A_PERSON, FEMALE_SINGULAR, MALE_SINGULAR
/// and UNKNOWN_PLURAL.
pub fn pronoun_gender_key(usage: PronounUsage, gender: GenderConst) -> GenderConst {
    match gender {
        GenderConst::NotAPerson => match usage {
            PronounUsage::Object | PronounUsage::Reflexive => GenderConst::NotAPerson,
            _ => GenderConst::UnknownPlural,
        },
        GenderConst::FemaleSingular | GenderConst::FemaleSingularGuess => {
            GenderConst::FemaleSingular
        }
        GenderConst::MaleSingular | GenderConst::MaleSingularGuess => GenderConst::MaleSingular,
        GenderConst::Mixed
        | GenderConst::FemalePlural
        | GenderConst::MalePlural
        | GenderConst::NeuterPlural
        | GenderConst::UnknownPlural => GenderConst::UnknownPlural,
        GenderConst::NeuterSingular | GenderConst::UnknownSingular => {
            if usage == PronounUsage::Reflexive {
                GenderConst::NotAPerson
            } else {
                GenderConst::UnknownPlural
            }
        }
    }
}

/// Table key for a pronoun branch. The unknown-plural bucket is the wildcard.
pub fn pronoun_pivot_key(usage: PronounUsage, gender: GenderConst) -> String {
    match pronoun_gender_key(usage, gender) {
        GenderConst::UnknownPlural => WILDCARD.to_string(),
        key => key.value().to_string(),
    }
}

/// English pronoun for a collapsed gender key and usage
pub fn pronoun_word(usage: PronounUsage, key: GenderConst) -> &'static str {
    match (key, usage) {
        (GenderConst::NotAPerson, PronounUsage::Subject) => "they",
        (GenderConst::NotAPerson, PronounUsage::Possessive) => "their",
        (GenderConst::NotAPerson, PronounUsage::Reflexive) => "themself",
        (GenderConst::NotAPerson, PronounUsage::Object) => "this",
        (GenderConst::FemaleSingular, PronounUsage::Subject) => "she",
        (GenderConst::FemaleSingular, PronounUsage::Possessive) => "her",
        (GenderConst::FemaleSingular, PronounUsage::Reflexive) => "herself",
        (GenderConst::FemaleSingular, PronounUsage::Object) => "her",
        (GenderConst::MaleSingular, PronounUsage::Subject) => "he",
        (GenderConst::MaleSingular, PronounUsage::Possessive) => "his",
        (GenderConst::MaleSingular, PronounUsage::Reflexive) => "himself",
        (GenderConst::MaleSingular, PronounUsage::Object) => "him",
        (_, PronounUsage::Subject) => "they",
        (_, PronounUsage::Possessive) => "their",
        (_, PronounUsage::Reflexive) => "themselves",
        (_, PronounUsage::Object) => "them",
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every `(pivot key, word)` branch a pronoun variation expands into, in
/// gender-constant order with duplicates removed.
pub fn pronoun_branches(usage: PronounUsage, human: bool, capitalized: bool) -> Vec<(String, String)> {
    let mut branches: Vec<(String, String)> = Vec::new();
    for gender in GenderConst::ALL {
        if human && gender == GenderConst::NotAPerson {
            continue;
        }
        let key = pronoun_pivot_key(usage, gender);
        if branches.iter().any(|(k, _)| *k == key) {
            continue;
        }
        let word = pronoun_word(usage, pronoun_gender_key(usage, gender));
        let word = if capitalized {
            capitalize(word)
        } else {
            word.to_string()
        };
        branches.push((key, word));
    }
    branches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_key_collapsing() {
        assert_eq!(
            pronoun_gender_key(PronounUsage::Subject, GenderConst::FemaleSingularGuess),
            GenderConst::FemaleSingular
        );
        assert_eq!(
            pronoun_gender_key(PronounUsage::Possessive, GenderConst::MaleSingularGuess),
            GenderConst::MaleSingular
        );
        assert_eq!(
            pronoun_gender_key(PronounUsage::Object, GenderConst::Mixed),
            GenderConst::UnknownPlural
        );
    }

    #[test]
    fn test_not_a_person_depends_on_usage() {
        assert_eq!(
            pronoun_gender_key(PronounUsage::Object, GenderConst::NotAPerson),
            GenderConst::NotAPerson
        );
        assert_eq!(
            pronoun_gender_key(PronounUsage::Subject, GenderConst::NotAPerson),
            GenderConst::UnknownPlural
        );
        assert_eq!(
            pronoun_gender_key(PronounUsage::Reflexive, GenderConst::UnknownSingular),
            GenderConst::NotAPerson
        );
        assert_eq!(
            pronoun_gender_key(PronounUsage::Possessive, GenderConst::NeuterSingular),
            GenderConst::UnknownPlural
        );
    }

    #[test]
    fn test_pivot_keys() {
        assert_eq!(pronoun_pivot_key(PronounUsage::Subject, GenderConst::FemaleSingular), "1");
        assert_eq!(pronoun_pivot_key(PronounUsage::Subject, GenderConst::MaleSingular), "2");
        assert_eq!(pronoun_pivot_key(PronounUsage::Object, GenderConst::NotAPerson), "0");
        assert_eq!(pronoun_pivot_key(PronounUsage::Subject, GenderConst::MalePlural), "*");
    }

    #[test]
    fn test_possessive_branches() {
        let branches = pronoun_branches(PronounUsage::Possessive, false, false);
        assert_eq!(
            branches,
            vec![
                ("*".to_string(), "their".to_string()),
                ("1".to_string(), "her".to_string()),
                ("2".to_string(), "his".to_string()),
            ]
        );
    }

    #[test]
    fn test_object_branches_for_humans_skip_not_a_person() {
        let all = pronoun_branches(PronounUsage::Object, false, false);
        assert!(all.contains(&("0".to_string(), "this".to_string())));

        let human = pronoun_branches(PronounUsage::Object, true, false);
        assert!(human.iter().all(|(k, _)| k != "0"));
        assert_eq!(human.len(), 3);
    }

    #[test]
    fn test_capitalized_branches() {
        let branches = pronoun_branches(PronounUsage::Subject, true, true);
        let words: Vec<&str> = branches.iter().map(|(_, w)| w.as_str()).collect();
        assert_eq!(words, vec!["She", "He", "They"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("her"), "Her");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éla"), "Éla");
    }
}

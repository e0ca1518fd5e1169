//! Per-locale variation configuration
//!
//! A [`LocaleVariationConfig`] answers two questions for one target locale:
//! which number and gender categories exist, and which category of each axis
//! is the fallback a translation defaults to. Number categories come from ICU
//! plural rules (compiled data, no I/O); gender is either the default
//! three-valued system or the merged system where unknown gender folds into
//! male.

use crate::catalog::{Axis, CategoryValue, GenderCategory, NumberCategory};
use crate::error::{TableError, TableResult};
use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use std::fmt;

/// Languages whose gender system merges unknown gender into male
const MERGED_GENDER_LANGS: [&str; 9] = ["ar", "ks", "lv", "ps", "kab", "dsb", "vec", "sq", "ti"];

/// How a locale treats grammatical gender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderSystem {
    /// Male, female and unknown; unknown is the fallback
    Default,
    /// Male and female only; male is the fallback
    MergedUnknown,
}

impl GenderSystem {
    pub fn for_language(lang: &str) -> Self {
        if MERGED_GENDER_LANGS.contains(&lang) {
            GenderSystem::MergedUnknown
        } else {
            GenderSystem::Default
        }
    }

    pub fn fallback(self) -> GenderCategory {
        match self {
            GenderSystem::Default => GenderCategory::Unknown,
            GenderSystem::MergedUnknown => GenderCategory::Male,
        }
    }

    pub fn categories(self) -> Vec<GenderCategory> {
        match self {
            GenderSystem::Default => vec![
                GenderCategory::Unknown,
                GenderCategory::Male,
                GenderCategory::Female,
            ],
            GenderSystem::MergedUnknown => vec![GenderCategory::Male, GenderCategory::Female],
        }
    }
}

impl From<PluralCategory> for NumberCategory {
    fn from(category: PluralCategory) -> Self {
        match category {
            PluralCategory::Zero => NumberCategory::Zero,
            PluralCategory::One => NumberCategory::One,
            PluralCategory::Two => NumberCategory::Two,
            PluralCategory::Few => NumberCategory::Few,
            PluralCategory::Many => NumberCategory::Many,
            PluralCategory::Other => NumberCategory::Other,
        }
    }
}

/// Number and gender categories valid in one locale, with their fallbacks
pub struct LocaleVariationConfig {
    locale: String,
    plural_rules: PluralRules,
    number_categories: Vec<NumberCategory>,
    gender_system: GenderSystem,
}

impl LocaleVariationConfig {
    /// Resolve the configuration for a locale identifier.
    ///
    /// Both `pt_BR` and `pt-BR` spellings are accepted.
    ///
    /// # Errors
    /// Returns [`TableError::Locale`] if ICU cannot parse the identifier or
    /// has no plural rules for it.
    pub fn for_locale(locale_str: &str) -> TableResult<Self> {
        let normalized = locale_str.replace('_', "-");
        let locale: Locale = normalized.parse().map_err(|e| TableError::Locale {
            locale: locale_str.to_string(),
            reason: format!("{}", e),
        })?;

        let plural_rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
            .map_err(|e| TableError::Locale {
                locale: locale_str.to_string(),
                reason: format!("no plural rules: {}", e),
            })?;

        let number_categories = number_categories_for(&plural_rules);
        let lang = normalized
            .split('-')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let gender_system = GenderSystem::for_language(&lang);

        tracing::debug!(
            locale = locale_str,
            numbers = ?number_categories,
            gender = ?gender_system,
            "resolved locale variation config"
        );

        Ok(LocaleVariationConfig {
            locale: locale_str.to_string(),
            plural_rules,
            number_categories,
            gender_system,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn gender_system(&self) -> GenderSystem {
        self.gender_system
    }

    /// Categories an axis supports in this locale.
    ///
    /// For [`Axis::Number`] the synthetic exactly-one category comes first,
    /// followed by the locale's CLDR categories.
    pub fn categories_for(&self, axis: Axis) -> Vec<CategoryValue> {
        match axis {
            Axis::Number => std::iter::once(CategoryValue::ExactlyOne)
                .chain(
                    self.number_categories
                        .iter()
                        .copied()
                        .map(CategoryValue::Number),
                )
                .collect(),
            Axis::Gender => self
                .gender_system
                .categories()
                .into_iter()
                .map(CategoryValue::Gender)
                .collect(),
        }
    }

    /// Whether a variation value (as a table key) is the fallback of its axis
    pub fn is_default_category(&self, value: &str) -> bool {
        match CategoryValue::from_key(value) {
            Some(CategoryValue::Number(category)) => category == NumberCategory::Other,
            Some(CategoryValue::Gender(category)) => category == self.gender_system.fallback(),
            _ => false,
        }
    }

    /// CLDR category of a count in this locale
    pub fn number_category_for(&self, count: usize) -> NumberCategory {
        self.plural_rules.category_for(count).into()
    }
}

impl fmt::Debug for LocaleVariationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleVariationConfig")
            .field("locale", &self.locale)
            .field("number_categories", &self.number_categories)
            .field("gender_system", &self.gender_system)
            .finish()
    }
}

/// Probe the plural rules with representative counts to find which
/// categories the locale actually uses, in CLDR order.
fn number_categories_for(rules: &PluralRules) -> Vec<NumberCategory> {
    let test_values_by_category = [
        (PluralCategory::Zero, vec![0usize]),
        (PluralCategory::One, vec![1, 21, 31, 41]),
        (PluralCategory::Two, vec![2, 22, 32]),
        (PluralCategory::Few, vec![3, 4, 23, 24]),
        (PluralCategory::Many, vec![5, 11, 101, 1_000_000]),
        (
            PluralCategory::Other,
            vec![6, 7, 8, 9, 10, 25, 100, 1000],
        ),
    ];

    let mut categories = Vec::new();
    for (expected, test_values) in test_values_by_category.iter() {
        if test_values
            .iter()
            .any(|&value| rules.category_for(value) == *expected)
        {
            categories.push(NumberCategory::from(*expected));
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[CategoryValue]) -> Vec<String> {
        values.iter().map(|v| v.key()).collect()
    }

    #[test]
    fn test_english_number_categories() {
        let config = LocaleVariationConfig::for_locale("en_US").unwrap();
        assert_eq!(
            keys(&config.categories_for(Axis::Number)),
            vec!["_1", "4", "24"]
        );
    }

    #[test]
    fn test_russian_number_categories() {
        let config = LocaleVariationConfig::for_locale("ru").unwrap();
        let categories = config.categories_for(Axis::Number);
        assert_eq!(categories[0], CategoryValue::ExactlyOne);
        assert!(categories.contains(&CategoryValue::Number(NumberCategory::One)));
        assert!(categories.contains(&CategoryValue::Number(NumberCategory::Few)));
        assert!(categories.contains(&CategoryValue::Number(NumberCategory::Many)));
    }

    #[test]
    fn test_default_gender_system() {
        let config = LocaleVariationConfig::for_locale("fr-FR").unwrap();
        assert_eq!(config.gender_system(), GenderSystem::Default);
        assert_eq!(keys(&config.categories_for(Axis::Gender)), vec!["3", "1", "2"]);
        assert!(config.is_default_category("3"));
        assert!(!config.is_default_category("1"));
        assert!(config.is_default_category("24"));
        assert!(!config.is_default_category("4"));
        assert!(!config.is_default_category("_1"));
        assert!(!config.is_default_category("*"));
    }

    #[test]
    fn test_merged_gender_system() {
        let config = LocaleVariationConfig::for_locale("ar_AR").unwrap();
        assert_eq!(config.gender_system(), GenderSystem::MergedUnknown);
        assert_eq!(keys(&config.categories_for(Axis::Gender)), vec!["1", "2"]);
        assert!(config.is_default_category("1"));
        assert!(!config.is_default_category("3"));
    }

    #[test]
    fn test_number_fallback_is_default() {
        let config = LocaleVariationConfig::for_locale("en").unwrap();
        assert!(config.is_default_category("24"));
        assert!(!config.is_default_category("4"));
        assert!(!config.is_default_category("*"));
        assert!(!config.is_default_category("_1"));
    }

    #[test]
    fn test_number_category_for_count() {
        let config = LocaleVariationConfig::for_locale("en").unwrap();
        assert_eq!(config.number_category_for(1), NumberCategory::One);
        assert_eq!(config.number_category_for(7), NumberCategory::Other);
    }

    #[test]
    fn test_invalid_locale() {
        let result = LocaleVariationConfig::for_locale("not a locale");
        assert!(matches!(result, Err(TableError::Locale { .. })));
    }
}

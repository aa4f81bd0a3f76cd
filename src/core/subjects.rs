//! Subject catalog and free-text matching
//!
//! The catalog is the only valid vocabulary for a session's subject. Input is
//! compared after normalization so that "matematica", "Matemática." and
//! " MATEMÁTICA " all resolve to the same catalog entry.

use unicode_normalization::UnicodeNormalization;

/// Sorted by normalized name
pub(crate) const SUBJECTS: &[&str] = &[
    "Administração Pública",
    "Artes",
    "Biologia",
    "Contabilidade",
    "Direito Administrativo",
    "Direito Civil",
    "Direito Constitucional",
    "Direito Penal",
    "Direito Processual Civil",
    "Direito Processual Penal",
    "Direito Tributário",
    "Economia",
    "Educação Física",
    "Estatística",
    "Filosofia",
    "Física",
    "Geografia",
    "História",
    "Informática",
    "Inglês",
    "Língua Portuguesa",
    "Literatura",
    "Matemática",
    "Outras",
    "Química",
    "Raciocínio Lógico",
    "Redação",
    "Sociologia",
];

/// Strip diacritics, periods and commas; lowercase; trim
pub(crate) fn normalize_subject(input: &str) -> String {
    let stripped: String = input
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| !matches!(c, '.' | ','))
        .collect();
    stripped.to_lowercase().trim().to_string()
}

/// Exact normalized match against the catalog
pub(crate) fn match_subject(input: &str) -> Option<&'static str> {
    let wanted = normalize_subject(input);
    if wanted.is_empty() {
        return None;
    }
    SUBJECTS
        .iter()
        .copied()
        .find(|s| normalize_subject(s) == wanted)
}

/// Catalog entries starting with the input, then those merely containing it
pub(crate) fn suggest_subjects(input: &str) -> Vec<&'static str> {
    let wanted = normalize_subject(input);
    if wanted.is_empty() {
        return Vec::new();
    }
    let normalized: Vec<(&'static str, String)> = SUBJECTS
        .iter()
        .map(|s| (*s, normalize_subject(s)))
        .collect();

    let starts = normalized
        .iter()
        .filter(|(_, n)| n.starts_with(&wanted))
        .map(|(s, _)| *s);
    let contains = normalized
        .iter()
        .filter(|(_, n)| !n.starts_with(&wanted) && n.contains(&wanted))
        .map(|(s, _)| *s);
    starts.chain(contains).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted_and_unique() {
        let normalized: Vec<String> = SUBJECTS.iter().map(|s| normalize_subject(s)).collect();
        let mut sorted = normalized.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(normalized, sorted);
    }

    #[test]
    fn normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize_subject("Matemática"), "matematica");
        assert_eq!(normalize_subject("  Educação Física. "), "educacao fisica");
        assert_eq!(normalize_subject("Inglês,"), "ingles");
    }

    #[test]
    fn normalize_handles_precomposed_and_decomposed_input() {
        let precomposed = "F\u{00ed}sica";
        let decomposed = "Fi\u{0301}sica";
        assert_eq!(normalize_subject(precomposed), normalize_subject(decomposed));
    }

    #[test]
    fn match_subject_is_accent_and_case_insensitive() {
        assert_eq!(match_subject("matematica"), Some("Matemática"));
        assert_eq!(match_subject("MATEMÁTICA"), Some("Matemática"));
        assert_eq!(match_subject("raciocinio logico."), Some("Raciocínio Lógico"));
    }

    #[test]
    fn match_subject_requires_exact_match() {
        assert_eq!(match_subject("Matem"), None);
        assert_eq!(match_subject("Alquimia"), None);
        assert_eq!(match_subject("   "), None);
    }

    #[test]
    fn suggestions_prefix_before_substring() {
        let s = suggest_subjects("dir");
        assert_eq!(s.first(), Some(&"Direito Administrativo"));
        assert!(s.iter().all(|x| x.starts_with("Direito")));

        let s = suggest_subjects("civil");
        assert_eq!(s, ["Direito Civil", "Direito Processual Civil"]);
    }

    #[test]
    fn suggestions_order_starts_then_contains() {
        // "fisica" starts "Física" and is contained in "Educação Física"
        let s = suggest_subjects("fisica");
        assert_eq!(s, ["Física", "Educação Física"]);
    }

    #[test]
    fn suggestions_empty_input() {
        assert!(suggest_subjects("").is_empty());
        assert!(suggest_subjects(" . ").is_empty());
    }
}

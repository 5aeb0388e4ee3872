//! Removal of shop boilerplate from descriptions
//!
//! Product descriptions end with purchase-size and livestock-guarantee
//! notices that mean nothing outside the shop. Everything from the first
//! notice to the end of the text is cut, in both languages.

use crate::extract::SpeciesRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static ENGLISH_BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?is)Approximate Purchase Size[^.]*?:.*",
        r"(?is)Approx\.\s*Purchase Size[^.]*?:.*",
        r"(?is)Please\s+note\s+that\s+all\s+sizes\s+are\s+approximate.*",
        r"(?is)We\s+guarantee\s+our\s+livestock.*",
    ])
});

static TURKISH_BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?is)(?:Yaklaşık\s+)?Satın\s+Alma\s+Boyutu[^.]*?:.*",
        r"(?is)Yaklaşık\s+Satın\s+Alma\s+Boyutu.*",
        r"(?is)Tam\s+Genişlediğinde\s+Yaklaşık.*",
        r"(?is)Tüm\s+boyutların\s+yaklaşık\s+olduğunu\s+lütfen.*",
        r"(?is)Canlı\s+stoğumuzu\s+garanti\s+ediyoruz.*",
        r"(?is)Lütfen\s+tüm\s+boyutların\s+yaklaşık.*",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid boilerplate pattern"))
        .collect()
}

fn strip(text: &str, patterns: &[Regex]) -> String {
    let mut cleaned = text.to_string();
    for pattern in patterns {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Strips boilerplate from an English description
pub fn clean_english(text: &str) -> String {
    strip(text, &ENGLISH_BOILERPLATE)
}

/// Strips boilerplate from a Turkish description
pub fn clean_turkish(text: &str) -> String {
    strip(text, &TURKISH_BOILERPLATE)
}

/// Cleans both descriptions of a record in place
///
/// Returns whether either description changed.
pub fn clean_record(record: &mut SpeciesRecord) -> bool {
    let description = clean_english(&record.description);
    let description_tr = clean_turkish(&record.description_tr);

    let changed = description != record.description || description_tr != record.description_tr;
    record.description = description;
    record.description_tr = description_tr;
    changed
}

/*!
 * Leipzig Glossing Rules conformance.
 *
 * Rule 2 asks for word-by-word alignment of object language and gloss; rule 4
 * asks for the same number of hyphen- or clitic-separated parts on both
 * sides. Rule 3 lists the standard grammatical category labels.
 */

use std::fmt;
use serde::{Serialize, Serializer};

/// Standard category labels from the rules' appendix
pub const LGR_ABBREVIATIONS: &[&str] = &[
    "1", "2", "3", "A", "ABL", "ABS", "ACC", "ADJ", "ADV", "AGR", "ALL", "ANTIP", "APPL",
    "ART", "AUX", "BEN", "CAUS", "CLF", "COM", "COMP", "COMPL", "COND", "COP", "CVB", "DAT",
    "DECL", "DEF", "DEM", "DET", "DIST", "DISTR", "DU", "DUR", "ERG", "EXCL", "F", "FOC",
    "FUT", "GEN", "IMP", "INCL", "IND", "INDF", "INF", "INS", "INTR", "IPFV", "IRR", "LOC",
    "M", "N", "NEG", "NMLZ", "NOM", "OBJ", "OBL", "P", "PASS", "PFV", "PL", "POSS", "PRED",
    "PRF", "PRS", "PROG", "PROH", "PROX", "PST", "PTCP", "PURP", "Q", "QUOT", "RECP", "REFL",
    "REL", "RES", "S", "SBJ", "SBJV", "SG", "TOP", "TR", "VOC",
];

/// How closely a line follows the alignment rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LgrConformance {
    MorphemeAligned,
    WordAligned,
    #[default]
    Unaligned,
}

impl LgrConformance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MorphemeAligned => "MORPHEME_ALIGNED",
            Self::WordAligned => "WORD_ALIGNED",
            Self::Unaligned => "",
        }
    }
}

impl fmt::Display for LgrConformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LgrConformance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn morpheme_count(segment: &str) -> usize {
    segment.split(['-', '=']).count()
}

/// Conformance marker for parallel word and gloss segments
pub fn conformance(words: &[String], glosses: &[String]) -> LgrConformance {
    if words.is_empty() || words.len() != glosses.len() {
        return LgrConformance::Unaligned;
    }

    let morphemes_match = words
        .iter()
        .zip(glosses)
        .all(|(word, gloss)| morpheme_count(word) == morpheme_count(gloss));

    if morphemes_match {
        LgrConformance::MorphemeAligned
    } else {
        LgrConformance::WordAligned
    }
}

pub fn is_standard_abbreviation(label: &str) -> bool {
    if LGR_ABBREVIATIONS.contains(&label) {
        return true;
    }
    // Person prefixes combine with number labels: 1SG, 3PL
    match label.strip_prefix(['1', '2', '3']) {
        Some(rest) if !rest.is_empty() => LGR_ABBREVIATIONS.contains(&rest),
        _ => false,
    }
}

// Upper-case parts denote grammatical categories, lower-case ones lexical meaning
fn is_grammatical(part: &str) -> bool {
    part.chars().any(|c| c.is_ascii_uppercase() || matches!(c, '1' | '2' | '3'))
        && part.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Share of grammatical gloss parts that use a standard label.
///
/// `None` when the glosses contain no grammatical parts at all.
pub fn abbreviation_ratio<S: AsRef<str>>(glosses: &[S]) -> Option<f64> {
    let mut grammatical = 0usize;
    let mut standard = 0usize;

    for gloss in glosses {
        for part in gloss.as_ref().split(['-', '=', '.', ':', ' ', '\t']) {
            if !is_grammatical(part) {
                continue;
            }
            grammatical += 1;
            if is_standard_abbreviation(part) {
                standard += 1;
            }
        }
    }

    if grammatical == 0 {
        None
    } else {
        Some(standard as f64 / grammatical as f64)
    }
}

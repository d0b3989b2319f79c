//! Rule-based English analyzer.
//!
//! Implements [`LanguageAnalyzer`] without a statistical model: sentences come
//! from Unicode sentence boundaries, names from runs of capitalized words,
//! places from locative prepositions and place nouns, times from a keyword
//! regex, noun chunks from determiner-led phrases, and verbs from the word that
//! follows a subject.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use super::{EntityLabel, EntitySpan, LanguageAnalyzer, RankedVerb, TextAnalysis};

/// Capitalized words that never start a name.
const COMMON_WORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "When", "Where", "What", "Which", "While", "With",
    "From", "Into", "Upon", "About", "After", "Before", "During", "Between", "Through",
    "Against", "Without", "Within", "Along", "Beyond", "Under", "Above", "Below", "Behind",
    "Here", "There", "Then", "Thus", "Also", "Even", "Just", "Only", "Some", "Many", "Much",
    "Most", "Other", "Such", "Each", "Every", "Both", "Either", "Neither", "All", "Any", "Few",
    "More", "Less", "But", "And", "For", "Nor", "Not", "Yet", "His", "Her", "Its", "Our",
    "Your", "Their", "Who", "How", "Why", "Can", "May", "Will", "Shall", "Should", "Would",
    "Could", "Must", "Has", "Have", "Had", "Was", "Were", "Been", "Being", "Are", "Now", "New",
    "Old", "Good", "Great", "Long", "First", "Last", "Next", "Like", "Over", "Still", "Back",
    "Well", "Down", "Off", "Come", "Made", "See", "One", "Two", "Three", "Four", "Five", "Six",
    "Seven", "Eight", "Nine", "Ten", "Chapter", "Part", "He", "She", "They", "We", "You", "It",
    "Him", "Them", "Me", "My", "Yes", "No", "Oh", "Well", "So", "If", "As", "At", "In", "On",
    "Of", "To", "By", "Did", "Do", "Does", "Is", "Let", "Why", "A", "An", "Not", "Nothing",
    "Something", "Everyone", "Someone", "Sir", "Please", "Sorry", "Okay", "OK", "Somewhere",
    "Suddenly", "Perhaps", "Maybe", "Slowly", "Quickly", "Finally", "Meanwhile", "Later", "Soon",
    "Once", "Instead", "Together", "Outside", "Inside", "Everything", "Anyone", "Nobody",
];

/// Lowercase function words that are neither verbs nor chunk heads.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "to", "of", "in", "on", "at",
    "by", "for", "with", "from", "into", "onto", "upon", "up", "down", "out", "off", "over",
    "under", "about", "as", "than", "that", "this", "these", "those", "there", "here", "not",
    "never", "no", "all", "very", "too", "just", "only", "also", "then", "now", "who", "whom",
    "which", "what", "whose", "it", "its", "he", "she", "they", "we", "i", "you", "him", "her",
    "them", "us", "me", "his", "their", "our", "my", "your", "if", "when", "while", "because",
    "though", "although", "again", "still", "even", "back", "away", "around", "through",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "he", "she", "they", "we", "you", "it", "who"];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "his", "her", "their", "its", "my", "your", "our", "this", "that",
];

const LOCATIVE_PREPOSITIONS: &[&str] = &[
    "in", "at", "to", "into", "from", "near", "towards", "toward", "inside", "outside",
    "through", "across", "around", "reach", "reached", "visit", "visited", "leave", "left",
];

/// Lowercase nouns after which `of` introduces a place, as in "the library of London".
const PLACE_HEADS: &[&str] = &[
    "library", "city", "town", "village", "streets", "street", "outskirts", "grounds",
    "corridor", "corridors", "castle", "kingdom", "land", "shores", "gates", "edge", "heart",
    "centre", "center", "north", "south", "east", "west", "ruins", "forest", "halls",
];

const PLACE_NOUNS: &[&str] = &[
    "Street", "Alley", "Castle", "Hall", "School", "House", "Lane", "Forest", "Station", "Road",
    "Village", "Lake", "River", "Tower", "Manor", "Hill", "Valley", "Island", "Bridge", "Inn",
    "Park", "Square", "Drive", "Avenue", "Church", "Palace", "Mountains", "Mountain", "Sea",
    "Bay", "City", "Town", "Pass", "Wood", "Woods", "Harbor", "Harbour", "Gate",
];

const AUXILIARIES: &[&str] = &[
    "be", "have", "do", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
];

/// Irregular inflections mapped to their lemma.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("was", "be"), ("were", "be"), ("is", "be"), ("are", "be"), ("am", "be"), ("been", "be"),
    ("had", "have"), ("has", "have"), ("did", "do"), ("does", "do"), ("done", "do"),
    ("ran", "run"), ("went", "go"), ("gone", "go"), ("goes", "go"), ("said", "say"),
    ("says", "say"), ("saw", "see"), ("seen", "see"), ("took", "take"), ("taken", "take"),
    ("came", "come"), ("got", "get"), ("gotten", "get"), ("knew", "know"), ("known", "know"),
    ("thought", "think"), ("made", "make"), ("felt", "feel"), ("found", "find"),
    ("gave", "give"), ("given", "give"), ("told", "tell"), ("left", "leave"), ("held", "hold"),
    ("stood", "stand"), ("sat", "sit"), ("began", "begin"), ("begun", "begin"),
    ("brought", "bring"), ("caught", "catch"), ("fought", "fight"), ("flew", "fly"),
    ("flown", "fly"), ("fell", "fall"), ("fallen", "fall"), ("heard", "hear"), ("kept", "keep"),
    ("lay", "lie"), ("led", "lead"), ("lost", "lose"), ("met", "meet"), ("paid", "pay"),
    ("put", "put"), ("read", "read"), ("rode", "ride"), ("rose", "rise"), ("sent", "send"),
    ("shook", "shake"), ("slept", "sleep"), ("spoke", "speak"), ("spoken", "speak"),
    ("stole", "steal"), ("struck", "strike"), ("swore", "swear"), ("threw", "throw"),
    ("thrown", "throw"), ("understood", "understand"), ("woke", "wake"), ("won", "win"),
    ("wrote", "write"), ("written", "write"), ("ate", "eat"), ("eaten", "eat"),
    ("drank", "drink"), ("broke", "break"), ("broken", "break"), ("chose", "choose"),
    ("drew", "draw"), ("drove", "drive"), ("forgot", "forget"), ("grew", "grow"),
    ("hid", "hide"), ("hit", "hit"), ("hung", "hang"), ("meant", "mean"), ("sang", "sing"),
    ("sank", "sink"), ("shot", "shoot"), ("shut", "shut"), ("spent", "spend"),
    ("swam", "swim"), ("taught", "teach"), ("tore", "tear"), ("wore", "wear"),
    ("bought", "buy"), ("built", "build"), ("cried", "cry"), ("died", "die"), ("lied", "lie"),
    ("tried", "try"),
];

/// Time keywords and the entity label they produce.
const TIME_WORDS: &[(&str, EntityLabel)] = &[
    ("monday", EntityLabel::Date), ("tuesday", EntityLabel::Date),
    ("wednesday", EntityLabel::Date), ("thursday", EntityLabel::Date),
    ("friday", EntityLabel::Date), ("saturday", EntityLabel::Date),
    ("sunday", EntityLabel::Date), ("january", EntityLabel::Date),
    ("february", EntityLabel::Date), ("march", EntityLabel::Date),
    ("april", EntityLabel::Date), ("june", EntityLabel::Date), ("july", EntityLabel::Date),
    ("august", EntityLabel::Date), ("september", EntityLabel::Date),
    ("october", EntityLabel::Date), ("november", EntityLabel::Date),
    ("december", EntityLabel::Date), ("yesterday", EntityLabel::Date),
    ("today", EntityLabel::Date), ("tomorrow", EntityLabel::Date),
    ("summer", EntityLabel::Date), ("winter", EntityLabel::Date),
    ("spring", EntityLabel::Date), ("autumn", EntityLabel::Date),
    ("morning", EntityLabel::Time), ("afternoon", EntityLabel::Time),
    ("evening", EntityLabel::Time), ("night", EntityLabel::Time),
    ("midnight", EntityLabel::Time), ("noon", EntityLabel::Time),
    ("dawn", EntityLabel::Time), ("dusk", EntityLabel::Time),
    ("tonight", EntityLabel::Time), ("christmas", EntityLabel::Event),
    ("halloween", EntityLabel::Event), ("easter", EntityLabel::Event),
];

/// Rule-based analyzer for English narrative text.
pub struct HeuristicAnalyzer {
    common_words: HashSet<&'static str>,
    function_words: HashSet<&'static str>,
    irregular: HashMap<&'static str, &'static str>,
    time_words: HashMap<&'static str, EntityLabel>,
    time_re: Regex,
}

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        let keywords: Vec<&str> = TIME_WORDS.iter().map(|(w, _)| *w).collect();
        let pattern = format!(
            r"(?i)\b(?:(?:next|last|this|that|one|every)\s+)?(?:{})\b|\b\d{{1,2}}(?::\d{{2}})?\s?(?:am|pm|o'clock)\b",
            keywords.join("|")
        );
        Self {
            common_words: COMMON_WORDS.iter().copied().collect(),
            function_words: FUNCTION_WORDS.iter().copied().collect(),
            irregular: IRREGULAR_VERBS.iter().copied().collect(),
            time_words: TIME_WORDS.iter().copied().collect(),
            time_re: Regex::new(&pattern).expect("valid time pattern"),
        }
    }

    fn time_entities(&self, text: &str) -> Vec<EntitySpan> {
        self.time_re
            .find_iter(text)
            .map(|m| {
                let matched = m.as_str();
                let keyword = matched
                    .unicode_words()
                    .last()
                    .map(|w| w.to_lowercase())
                    .unwrap_or_default();
                let label = self
                    .time_words
                    .get(keyword.as_str())
                    .copied()
                    .unwrap_or(EntityLabel::Time);
                let span = EntitySpan::new(matched, label);
                match text[..m.start()].unicode_words().last() {
                    Some(prev) => span.preceded_by(prev),
                    None => span,
                }
            })
            .collect()
    }

    fn is_time_word(&self, word: &str) -> bool {
        self.time_words.contains_key(word.to_lowercase().as_str())
    }

    fn starts_name(&self, word: &str) -> bool {
        let bare = without_possessive(word).unwrap_or(word);
        bare.chars().count() >= 2
            && bare.chars().next().is_some_and(char::is_uppercase)
            && !bare.chars().all(char::is_uppercase)
            && !self.common_words.contains(bare)
            && !self.is_time_word(bare)
    }

    fn is_open_word(&self, word: &str) -> bool {
        word.chars().all(|c| c.is_alphabetic() && c.is_lowercase())
            && !self.function_words.contains(word)
    }

    /// Reduce an inflected verb to its dictionary form.
    fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.irregular.get(lower.as_str()) {
            return (*lemma).to_string();
        }
        if let Some(stem) = lower.strip_suffix("ied") {
            return format!("{stem}y");
        }
        if let Some(stem) = lower.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["ing", "ed"] {
            if let Some(stem) = lower.strip_suffix(suffix) {
                if stem.len() < 2 {
                    break;
                }
                return restore_stem(stem);
            }
        }
        for suffix in ["ches", "shes", "sses", "xes"] {
            if lower.ends_with(suffix) {
                return lower[..lower.len() - 2].to_string();
            }
        }
        if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            return lower[..lower.len() - 1].to_string();
        }
        lower
    }

    /// Pick the verb following a subject at `start`, stepping over one adverb and
    /// through an auxiliary when a participle follows it.
    fn verb_after(&self, words: &[&str], start: usize) -> Option<String> {
        let mut i = start;
        if words.get(i).is_some_and(|w| w.ends_with("ly")) {
            i += 1;
        }
        let word = *words.get(i)?;
        if !self.is_open_word(word) && !self.irregular.contains_key(word) {
            return None;
        }
        let lemma = self.lemmatize(word);
        if AUXILIARIES.contains(&lemma.as_str()) {
            if let Some(next) = words.get(i + 1) {
                let participle = next.ends_with("ed")
                    || next.ends_with("ing")
                    || self.irregular.contains_key(*next);
                if participle && self.is_open_word(next) {
                    return Some(self.lemmatize(next));
                }
            }
        }
        Some(lemma)
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// The word without a trailing `'s` or `’s`, if it has one.
fn without_possessive(word: &str) -> Option<&str> {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
}

/// Whether the words before a name end in a locative preposition. `of` only
/// counts after a place noun.
fn is_locative(before: &[&str]) -> bool {
    let Some(prev) = before.last().map(|w| w.to_lowercase()) else {
        return false;
    };
    if prev == "of" {
        return before.len() >= 2
            && PLACE_HEADS.contains(&before[before.len() - 2].to_lowercase().as_str());
    }
    LOCATIVE_PREPOSITIONS.contains(&prev.as_str())
}

/// Undo consonant doubling and restore a dropped `e` after stripping a suffix.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 2 && chars[n - 1] == chars[n - 2] && !matches!(chars[n - 1], 'l' | 's' | 'f' | 'z') {
        return chars[..n - 1].iter().collect();
    }
    if matches!(chars[n - 1], 'v' | 'z' | 'u') || stem.ends_with("at") || stem.ends_with("iz") {
        return format!("{stem}e");
    }
    stem.to_string()
}

impl LanguageAnalyzer for HeuristicAnalyzer {
    fn analyze(&self, text: &str) -> Result<TextAnalysis> {
        if text.trim().is_empty() {
            bail!("cannot analyze empty text");
        }

        let mut analysis = TextAnalysis {
            entities: self.time_entities(text),
            ..TextAnalysis::default()
        };

        // lemma -> (occurrences, first position)
        let mut verb_stats: HashMap<String, (usize, usize)> = HashMap::new();
        let mut position = 0usize;

        for sentence in text.unicode_sentences() {
            let words: Vec<&str> = sentence.unicode_words().collect();
            if words.is_empty() {
                continue;
            }
            analysis.sentence_count += 1;

            let mut i = 0;
            while i < words.len() {
                let word = words[i];
                let lower = word.to_lowercase();
                let mut subject_end = None;

                if self.starts_name(word) {
                    let start = i;
                    while i < words.len() && self.starts_name(words[i]) {
                        i += 1;
                        if without_possessive(words[i - 1]).is_some() {
                            break;
                        }
                    }
                    let run = words[start..i].join(" ");
                    let preceding = start.checked_sub(1).map(|p| words[p]);
                    let last = without_possessive(words[i - 1]).unwrap_or(words[i - 1]);
                    let label = if PLACE_NOUNS.contains(&last) {
                        EntityLabel::Facility
                    } else if is_locative(&words[..start]) {
                        EntityLabel::Gpe
                    } else {
                        EntityLabel::Person
                    };
                    let span = EntitySpan::new(run, label);
                    analysis.entities.push(match preceding {
                        Some(p) => span.preceded_by(p),
                        None => span,
                    });
                    if label == EntityLabel::Person {
                        subject_end = Some(i);
                    }
                } else if DETERMINERS.contains(&lower.as_str()) {
                    let mut j = i + 1;
                    while j < words.len() && j <= i + 2 && self.is_open_word(words[j]) {
                        j += 1;
                    }
                    if j > i + 1 {
                        let chunk = std::iter::once(lower.as_str())
                            .chain(words[i + 1..j].iter().copied())
                            .collect::<Vec<_>>()
                            .join(" ");
                        analysis.noun_chunks.push(chunk);
                        i = j;
                    } else {
                        i += 1;
                    }
                } else {
                    if SUBJECT_PRONOUNS.contains(&lower.as_str()) {
                        subject_end = Some(i + 1);
                    }
                    i += 1;
                }

                if let Some(end) = subject_end {
                    if let Some(lemma) = self.verb_after(&words, end) {
                        let entry = verb_stats.entry(lemma).or_insert((0, position + end));
                        entry.0 += 1;
                    }
                }
            }
            position += words.len();
        }

        let mut verbs: Vec<RankedVerb> = verb_stats
            .into_iter()
            .map(|(lemma, (count, first))| RankedVerb {
                lemma,
                rank: count as f64 + 1.0 / (first as f64 + 2.0),
            })
            .collect();
        verbs.sort_by(|a, b| b.rank.total_cmp(&a.rank).then_with(|| a.lemma.cmp(&b.lemma)));
        analysis.verbs = verbs;

        Ok(analysis)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

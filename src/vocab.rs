//! Strict parser for the model's vocabulary reply.
//!
//! The LLM is instructed to answer with one `word | translation | context`
//! line per entry, but its output is untrusted free text. The grammar here
//! is deliberately unforgiving: a line is kept only if splitting on `|`
//! yields exactly three fields, all non-empty after trimming. Everything
//! else is silently discarded; there is no fuzzy repair and no error path.

use crate::models::VocabularyEntry;
use tracing::debug;

/// Parse model output into vocabulary entries. Never fails: malformed or
/// empty input yields an empty list.
pub fn parse_vocabulary(model_output: &str) -> Vec<VocabularyEntry> {
    let entries: Vec<VocabularyEntry> = model_output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains('|'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('|').map(str::trim).collect();
            match fields.as_slice() {
                [word, translation, context]
                    if !word.is_empty() && !translation.is_empty() && !context.is_empty() =>
                {
                    Some(VocabularyEntry {
                        word: word.to_string(),
                        translation: translation.to_string(),
                        context: context.to_string(),
                    })
                }
                _ => None,
            }
        })
        .collect();

    debug!(count = entries.len(), "parsed vocabulary entries");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_well_formed_lines_and_drops_malformed() {
        let output = "danser | to dance | Je danse avec le vent\ncoeur | heart | Mon coeur bat pour toi\nmalformed line";
        let entries = parse_vocabulary(output);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "danser");
        assert_eq!(entries[0].translation, "to dance");
        assert_eq!(entries[0].context, "Je danse avec le vent");
        assert_eq!(entries[1].word, "coeur");
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(parse_vocabulary("").is_empty());
        assert!(parse_vocabulary("\n\n  \n").is_empty());
    }

    #[test]
    fn test_wrong_field_count_is_discarded() {
        assert!(parse_vocabulary("word | translation").is_empty());
        assert!(parse_vocabulary("a | b | c | d").is_empty());
    }

    #[test]
    fn test_empty_fields_are_discarded() {
        assert!(parse_vocabulary("word |  | context").is_empty());
        assert!(parse_vocabulary(" | translation | context").is_empty());
        assert!(parse_vocabulary("word | translation | ").is_empty());
    }

    #[test]
    fn test_surrounding_chatter_is_ignored() {
        let output = "Here are the vocabulary words you asked for:\n\nvoler | to fly | Je vole au dessus des nuages\n\nI hope this helps with your studies!";
        let entries = parse_vocabulary(output);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "voler");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let output = "nuit | night | Toute la nuit\nnuit | night | Toute la nuit";
        assert_eq!(parse_vocabulary(output).len(), 2);
    }
}

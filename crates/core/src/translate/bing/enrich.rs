use super::api::{BingApi, DictEntry, ExampleEntry, LookupQuery};
use futures::join;

const MAX_EXAMPLES: usize = 3;

/// Optional single-word extras. Either side may be absent on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub dict: Option<Vec<String>>,
    pub example: Option<Vec<String>>,
}

/// Run the dictionary and example lookups concurrently. Both are awaited;
/// a failed side degrades to `None` without affecting the other, and the
/// caller's primary result is never at risk.
pub async fn fetch_enrichment<A: BingApi + ?Sized>(
    api: &A,
    query: LookupQuery,
    translation: String,
) -> Enrichment {
    let (dict, example) = join!(api.dictionary(query.clone()), api.examples(query, translation));

    Enrichment {
        dict: dict
            .ok()
            .map(format_dict)
            .filter(|lines| !lines.is_empty()),
        example: example
            .ok()
            .map(format_examples)
            .filter(|lines| !lines.is_empty()),
    }
}

/// One line per part-of-speech tag, tags in first-seen order, targets for
/// a tag joined with a comma.
pub(crate) fn format_dict(entries: Vec<DictEntry>) -> Vec<String> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(tag, _)| *tag == entry.pos_tag) {
            Some((_, targets)) => targets.push(entry.normalized_target),
            None => groups.push((entry.pos_tag, vec![entry.normalized_target])),
        }
    }
    groups
        .into_iter()
        .map(|(tag, targets)| format!("{tag}: {}", targets.join(", ")))
        .collect()
}

pub(crate) fn format_examples(entries: Vec<ExampleEntry>) -> Vec<String> {
    entries
        .into_iter()
        .take(MAX_EXAMPLES)
        .map(|e| format!("{}{}{}", e.source_prefix, e.source_term, e.source_suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_entry(tag: &str, target: &str) -> DictEntry {
        DictEntry {
            pos_tag: tag.to_owned(),
            normalized_target: target.to_owned(),
        }
    }

    fn example_entry(prefix: &str, term: &str, suffix: &str) -> ExampleEntry {
        ExampleEntry {
            source_prefix: prefix.to_owned(),
            source_term: term.to_owned(),
            source_suffix: suffix.to_owned(),
        }
    }

    #[test]
    fn dict_groups_by_tag_in_first_seen_order() {
        let lines = format_dict(vec![
            dict_entry("verb", "run"),
            dict_entry("verb", "jog"),
            dict_entry("noun", "race"),
        ]);
        assert_eq!(lines, vec!["verb: run, jog", "noun: race"]);
    }

    #[test]
    fn dict_with_no_entries_formats_to_nothing() {
        assert!(format_dict(Vec::new()).is_empty());
    }

    #[test]
    fn examples_are_concatenated_and_capped_at_three() {
        let lines = format_examples(vec![
            example_entry("I ", "run", " fast."),
            example_entry("We ", "run", " daily."),
            example_entry("They ", "run", " home."),
            example_entry("You ", "run", " too."),
        ]);
        assert_eq!(
            lines,
            vec!["I run fast.", "We run daily.", "They run home."]
        );
    }
}

use horizon_common::KeywordMap;

/// Multi-label keyword tagger. Every label with at least one keyword found in
/// the title is returned; there is no scoring and no exclusivity.
pub struct KeywordTagger<'a> {
    map: &'a KeywordMap,
}

impl<'a> KeywordTagger<'a> {
    pub fn new(map: &'a KeywordMap) -> Self {
        Self { map }
    }

    pub fn tag(&self, title: &str) -> Vec<String> {
        let title = title.to_lowercase();
        self.map
            .entries()
            .iter()
            .filter(|entry| entry.keywords.iter().any(|k| title.contains(k.as_str())))
            .map(|entry| entry.label.clone())
            .collect()
    }
}

//! Documentation search collaborator.
//!
//! The toolkit ships a docs site whose search box queries a prebuilt
//! full-text index over the component reference pages. The index engine is
//! pluggable behind [`SearchIndex`]; this module owns the corpus, feeding
//! records into the index at build time and shaping raw hits into the
//! category-grouped result list the docs UI renders.
//!
//! Records that fail to load ([`Error::SearchDocUnavailable`]) are skipped
//! with a warning; one broken page never takes down search for the rest.

use std::collections::HashMap;

use tracing::warn;

use crate::error::Result;

/// One searchable documentation page.
#[derive(Clone, Debug, PartialEq)]
pub struct DocRecord {
    /// Stable reference the index reports hits under.
    pub id: String,
    pub title: String,
    /// Full page text fed to the index, never rendered.
    pub body: String,
    /// Section the page belongs to (`"Components"`, `"Utilities"`, ...).
    pub category: String,
    pub url: String,
}

/// A raw index hit, best first.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub doc_ref: String,
    pub score: f32,
}

/// Pluggable full-text index engine.
pub trait SearchIndex {
    /// Add one record to the index.
    fn add(&mut self, record: &DocRecord);

    /// Query the index; hits come back ordered by descending score.
    fn search(&self, query: &str) -> Vec<Hit>;
}

/// A grouped slice of results as the docs UI renders them: one heading per
/// category, entries in rank order within it.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub entries: Vec<ResultEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultEntry {
    pub title: String,
    pub url: String,
}

/// The record store backing an index.
#[derive(Debug, Default)]
pub struct Corpus {
    records: HashMap<String, DocRecord>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `records` into `index`, keeping each for later hit resolution.
    ///
    /// Unavailable documents are skipped with a warning. Returns how many
    /// records were indexed.
    pub fn build<I>(&mut self, records: I, index: &mut impl SearchIndex) -> usize
    where
        I: IntoIterator<Item = Result<DocRecord>>,
    {
        let mut indexed = 0;
        for record in records {
            match record {
                Ok(record) => {
                    index.add(&record);
                    self.records.insert(record.id.clone(), record);
                    indexed += 1;
                }
                Err(err) => {
                    warn!(error = %err, "skipping unavailable search document");
                }
            }
        }
        indexed
    }

    pub fn get(&self, doc_ref: &str) -> Option<&DocRecord> {
        self.records.get(doc_ref)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shape raw hits into category groups.
    ///
    /// Groups appear in the order their first hit ranked; entries keep rank
    /// order within each group. Hits referencing unknown documents are
    /// dropped.
    pub fn group_hits(&self, hits: &[Hit]) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = Vec::new();
        for hit in hits {
            let Some(record) = self.get(&hit.doc_ref) else {
                continue;
            };
            let entry = ResultEntry {
                title: record.title.clone(),
                url: record.url.clone(),
            };
            match groups.iter_mut().find(|g| g.category == record.category) {
                Some(group) => group.entries.push(entry),
                None => groups.push(CategoryGroup {
                    category: record.category.clone(),
                    entries: vec![entry],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Substring matcher standing in for a real index engine.
    #[derive(Default)]
    struct SubstringIndex {
        docs: Vec<(String, String)>,
    }

    impl SearchIndex for SubstringIndex {
        fn add(&mut self, record: &DocRecord) {
            let haystack = format!("{} {}", record.title, record.body).to_lowercase();
            self.docs.push((record.id.clone(), haystack));
        }

        fn search(&self, query: &str) -> Vec<Hit> {
            let needle = query.to_lowercase();
            self.docs
                .iter()
                .filter(|(_, haystack)| haystack.contains(&needle))
                .map(|(id, _)| Hit {
                    doc_ref: id.clone(),
                    score: 1.0,
                })
                .collect()
        }
    }

    fn doc(id: &str, title: &str, body: &str, category: &str) -> Result<DocRecord> {
        Ok(DocRecord {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            category: category.to_string(),
            url: format!("/docs/{id}.html"),
        })
    }

    #[test]
    fn test_build_skips_unavailable_docs() {
        let mut corpus = Corpus::new();
        let mut index = SubstringIndex::default();
        let records = vec![
            doc("modal", "Modal", "dialog overlay backdrop", "Components"),
            Err(Error::SearchDocUnavailable {
                doc_ref: "broken".to_string(),
                reason: "read failed".to_string(),
            }),
            doc("spacing", "Spacing", "margin padding scale", "Utilities"),
        ];

        assert_eq!(corpus.build(records, &mut index), 2);
        assert_eq!(corpus.len(), 2);
        assert_eq!(index.search("overlay").len(), 1);
    }

    #[test]
    fn test_group_hits_by_category_in_rank_order() {
        let mut corpus = Corpus::new();
        let mut index = SubstringIndex::default();
        corpus.build(
            vec![
                doc("modal", "Modal", "show hide dialog", "Components"),
                doc("toast", "Toast", "show dismiss stack", "Components"),
                doc("colors", "Colors", "show palette tokens", "Utilities"),
            ],
            &mut index,
        );

        let hits = index.search("show");
        let groups = corpus.group_hits(&hits);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Components");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[0].title, "Modal");
        assert_eq!(groups[1].category, "Utilities");
        assert_eq!(groups[1].entries[0].url, "/docs/colors.html");
    }

    #[test]
    fn test_unknown_hit_refs_are_dropped() {
        let corpus = Corpus::new();
        let hits = vec![Hit {
            doc_ref: "ghost".to_string(),
            score: 0.5,
        }];
        assert!(corpus.group_hits(&hits).is_empty());
    }
}

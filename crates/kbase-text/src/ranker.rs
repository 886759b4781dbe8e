use std::time::Instant;

use tantivy::collector::TopDocs;
use tantivy::schema::{Field, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{doc, Index, IndexReader, IndexWriter, TantivyDocument, TantivyError};
use tracing::{debug, info};

use kbase_core::config::RankerSettings;
use kbase_core::traits::Retriever;
use kbase_core::{Category, DocumentStore, Error, KnowledgeItem, Result, SearchResult};

use crate::highlight::extract_highlights;
use crate::query::{build_query, FieldBoost, MatchOptions};
use crate::tantivy_utils::{build_schema, register_tokenizer, CATEGORY, CONTENT, ID, SUMMARY, TITLE};

const WRITER_HEAP_BYTES: usize = 50_000_000;

fn index_err(e: TantivyError) -> Error {
	Error::Index(e.to_string())
}

/// In-memory lexical ranker over a [`DocumentStore`].
///
/// The index is built once in [`build`](Self::build) and never written again,
/// so `&SearchRanker` can be shared freely across threads.
pub struct SearchRanker {
	store: DocumentStore,
	index: Index,
	reader: IndexReader,
	id_field: Field,
	title_field: Field,
	fields: Vec<FieldBoost>,
	options: MatchOptions,
	max_highlights: usize,
}

impl SearchRanker {
	pub fn build(store: DocumentStore, settings: &RankerSettings) -> Result<Self> {
		let started = Instant::now();
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);

		let id_field = schema.get_field(ID).map_err(index_err)?;
		let title_field = schema.get_field(TITLE).map_err(index_err)?;
		let summary_field = schema.get_field(SUMMARY).map_err(index_err)?;
		let category_field = schema.get_field(CATEGORY).map_err(index_err)?;
		let content_field = schema.get_field(CONTENT).map_err(index_err)?;

		{
			// one indexing thread keeps a single segment in store order, so score
			// ties always resolve the same way for a given corpus
			let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES).map_err(index_err)?;
			for item in store.items() {
				writer.add_document(doc!(
					id_field => item.id.clone(),
					title_field => item.title.clone(),
					summary_field => item.summary.clone(),
					category_field => item.category.as_str().to_string(),
					content_field => item.content.clone(),
				)).map_err(index_err)?;
			}
			writer.commit().map_err(index_err)?;
		}
		let reader = index.reader().map_err(index_err)?;

		let fields = vec![
			FieldBoost { field: title_field, boost: settings.title_boost },
			FieldBoost { field: summary_field, boost: settings.summary_boost },
			FieldBoost { field: category_field, boost: settings.category_boost },
			FieldBoost { field: content_field, boost: settings.content_boost },
		];
		info!(documents = store.len(), elapsed_ms = started.elapsed().as_millis() as u64, "built search index");
		Ok(Self {
			store,
			index,
			reader,
			id_field,
			title_field,
			fields,
			options: MatchOptions { fuzzy: settings.fuzzy, prefix: settings.prefix },
			max_highlights: settings.max_highlights,
		})
	}

	/// Top `k` documents for `query`, best first. An empty result means nothing
	/// relevant, not a failure.
	pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
		if query.trim().is_empty() {
			return Err(Error::InvalidQuery("query is empty".to_string()));
		}
		if k == 0 {
			return Err(Error::InvalidQuery("k must be at least 1".to_string()));
		}
		let started = Instant::now();
		let terms = self.analyze(query)?;
		let Some(q) = build_query(&terms, &self.fields, self.options) else {
			debug!(query, "query has no searchable terms");
			return Ok(Vec::new());
		};

		let searcher = self.reader.searcher();
		let top_docs = searcher.search(&*q, &TopDocs::with_limit(k)).map_err(index_err)?;
		let mut results = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr).map_err(index_err)?;
			let id = doc
				.get_first(self.id_field)
				.and_then(|v| v.as_str())
				.ok_or_else(|| Error::Index(format!("hit {addr:?} has no stored id")))?;
			let item = self.store.get(id).ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
			results.push(SearchResult {
				item: item.clone(),
				score,
				highlights: extract_highlights(query, &item.content, self.max_highlights),
			});
		}
		debug!(query, terms = terms.len(), hits = results.len(), elapsed_us = started.elapsed().as_micros() as u64, "search");
		Ok(results)
	}

	/// Run `text` through the index analyser; distinct terms in query order.
	fn analyze(&self, text: &str) -> Result<Vec<String>> {
		let mut analyzer = self.index.tokenizer_for_field(self.title_field).map_err(index_err)?;
		let mut stream = analyzer.token_stream(text);
		let mut terms: Vec<String> = Vec::new();
		while stream.advance() {
			let token = &stream.token().text;
			if !terms.contains(token) { terms.push(token.clone()); }
		}
		Ok(terms)
	}

	pub fn get_document_by_id(&self, id: &str) -> Option<&KnowledgeItem> {
		self.store.get(id)
	}

	pub fn get_documents_by_category(&self, category: Category) -> Vec<&KnowledgeItem> {
		self.store.by_category(category)
	}

	pub fn all_documents(&self) -> &[KnowledgeItem] {
		self.store.items()
	}

	pub fn store(&self) -> &DocumentStore {
		&self.store
	}
}

impl Retriever for SearchRanker {
	fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> { Self::search(self, query, k) }
	fn get_document_by_id(&self, id: &str) -> Option<&KnowledgeItem> { Self::get_document_by_id(self, id) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(id: &str, title: &str, category: Category, summary: &str, content: &str) -> KnowledgeItem {
		KnowledgeItem {
			id: id.into(),
			title: title.into(),
			url: format!("https://example.com/{id}"),
			category,
			summary: summary.into(),
			content: content.into(),
		}
	}

	fn ranker(items: Vec<KnowledgeItem>) -> SearchRanker {
		SearchRanker::build(DocumentStore::from_items(items).unwrap(), &RankerSettings::default()).unwrap()
	}

	fn sample() -> SearchRanker {
		ranker(vec![
			item("frameworks", "Supported Frameworks", Category::Compliance, "Frameworks covered", "Drata supports SOC 2 and ISO 27001."),
			item("integrations", "Integrations", Category::Integrations, "Connect your stack", "Connect AWS, Okta and GitHub to collect evidence."),
			item("pricing", "Pricing", Category::Pricing, "Plans for startups", "Pricing scales with company size."),
		])
	}

	#[test]
	fn rejects_blank_query_and_zero_k() {
		let r = sample();
		assert!(matches!(r.search("   ", 4), Err(Error::InvalidQuery(_))));
		assert!(matches!(r.search("soc", 0), Err(Error::InvalidQuery(_))));
	}

	#[test]
	fn short_words_prefix_match_and_stay_searchable() {
		let hits = sample().search("in", 4).unwrap();
		assert!(hits.iter().any(|h| h.item.id == "integrations"), "{:?}", hits.iter().map(|h| &h.item.id).collect::<Vec<_>>());

		let r = ranker(vec![
			item("timeline", "How Long SOC 2 Takes", Category::Compliance, "Timelines", "Most teams finish within months."),
			item("pricing", "Pricing", Category::Pricing, "Plans", "Pricing scales with company size."),
		]);
		let hits = r.search("how", 4).unwrap();
		assert_eq!(hits.first().map(|h| h.item.id.as_str()), Some("timeline"));
	}

	#[test]
	fn punctuation_only_query_is_empty() {
		assert!(sample().search("?!", 4).unwrap().is_empty());
	}

	#[test]
	fn hit_missing_from_store_is_an_error() {
		let built = sample();
		let other = DocumentStore::from_items(
			built.all_documents().iter().filter(|d| d.id != "pricing").cloned().collect(),
		)
		.unwrap();
		let r = SearchRanker { store: other, ..built };
		assert!(matches!(r.search("pricing", 4), Err(Error::DocumentNotFound(id)) if id == "pricing"));
	}

	#[test]
	fn title_outranks_content() {
		let r = ranker(vec![
			item("body", "Overview", Category::Product, "General", "Audit readiness made simple."),
			item("head", "Audit", Category::Product, "General", "Everything in one place."),
		]);
		let hits = r.search("audit", 2).unwrap();
		assert_eq!(hits[0].item.id, "head");
	}

	#[test]
	fn category_field_is_searchable() {
		let hits = sample().search("pricing", 4).unwrap();
		assert_eq!(hits[0].item.id, "pricing");
	}

	#[test]
	fn lookups() {
		let r = sample();
		assert_eq!(r.get_document_by_id("pricing").unwrap().title, "Pricing");
		assert!(r.get_document_by_id("missing").is_none());
		assert_eq!(r.get_documents_by_category(Category::Integrations).len(), 1);
		assert!(r.get_documents_by_category(Category::Security).is_empty());
		assert_eq!(r.all_documents().len(), 3);
	}
}

use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer};
use tantivy::Index;

pub const TOKENIZER: &str = "kb_text";

pub const ID: &str = "id";
pub const TITLE: &str = "title";
pub const SUMMARY: &str = "summary";
pub const CATEGORY: &str = "category";
pub const CONTENT: &str = "content";

/// Raw `id` for lookups, plus the four searchable text fields. Only the id is
/// stored: everything else is read back from the document store.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(ID, STRING | STORED);
	let indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(indexing);
	for name in [TITLE, SUMMARY, CATEGORY, CONTENT] {
		schema_builder.add_text_field(name, text_options.clone());
	}
	schema_builder.build()
}

/// Lowercased word tokens. Every word is kept: short words still prefix-match
/// longer indexed terms.
pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_has_all_fields() {
		let schema = build_schema();
		for name in [ID, TITLE, SUMMARY, CATEGORY, CONTENT] {
			assert!(schema.get_field(name).is_ok(), "missing {name}");
		}
	}
}

//! Query construction: every analysed term is tried exactly, with a bounded
//! edit distance, and as a prefix, in every searchable field, each field
//! carrying its own boost.
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::Term;

/// Levenshtein automata in tantivy are only built up to this distance.
pub const MAX_EDIT_DISTANCE: u8 = 2;

#[derive(Debug, Clone, Copy)]
pub struct FieldBoost {
	pub field: Field,
	pub boost: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
	/// Allowed edits as a fraction of the term length.
	pub fuzzy: f32,
	pub prefix: bool,
}

pub fn max_edit_distance(term: &str, fuzzy: f32) -> u8 {
	let len = term.chars().count() as f32;
	((len * fuzzy).round() as u8).min(MAX_EDIT_DISTANCE)
}

fn term_query(field: Field, text: &str, options: MatchOptions) -> Box<dyn Query> {
	let term = Term::from_field_text(field, text);
	let mut clauses: Vec<(Occur, Box<dyn Query>)> = vec![(Occur::Should, Box::new(TermQuery::new(term.clone(), IndexRecordOption::WithFreqs)))];
	let distance = max_edit_distance(text, options.fuzzy);
	if distance > 0 {
		clauses.push((Occur::Should, Box::new(FuzzyTermQuery::new(term.clone(), distance, true))));
	}
	if options.prefix {
		clauses.push((Occur::Should, Box::new(FuzzyTermQuery::new_prefix(term, 0, true))));
	}
	if clauses.len() == 1 {
		clauses.remove(0).1
	} else {
		Box::new(BooleanQuery::new(clauses))
	}
}

/// Any term in any field may match; `None` when there is nothing to search for.
pub fn build_query(terms: &[String], fields: &[FieldBoost], options: MatchOptions) -> Option<Box<dyn Query>> {
	let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
	for text in terms {
		for fb in fields {
			let q = term_query(fb.field, text, options);
			clauses.push((Occur::Should, Box::new(BoostQuery::new(q, fb.boost))));
		}
	}
	if clauses.is_empty() {
		None
	} else {
		Some(Box::new(BooleanQuery::new(clauses)))
	}
}

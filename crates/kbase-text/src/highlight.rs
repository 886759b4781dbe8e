/// Pick up to `max` sentences of `content` that mention the most distinct
/// query words. Matching is a case-insensitive substring test; ties keep
/// sentence order. Sentences with no query word are never returned.
pub fn extract_highlights(query: &str, content: &str, max: usize) -> Vec<String> {
	let lowered = query.to_lowercase();
	let mut words: Vec<&str> = Vec::new();
	for w in lowered.split_whitespace() {
		if !words.contains(&w) { words.push(w); }
	}
	if words.is_empty() || max == 0 { return Vec::new(); }

	let mut scored: Vec<(usize, &str)> = content
		.split(&['.', '!', '?'][..])
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.filter_map(|sentence| {
			let lower = sentence.to_lowercase();
			let score = words.iter().filter(|w| lower.contains(*w)).count();
			(score > 0).then_some((score, sentence))
		})
		.collect();

	// sort_by is stable, so equal scores stay in document order
	scored.sort_by(|a, b| b.0.cmp(&a.0));
	scored.into_iter().take(max).map(|(_, s)| s.to_string()).collect()
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trending news item as returned by the model.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub url: String,
}

impl Headline {
  /// Both fields must be non-empty for the record to be shown.
  pub fn is_renderable(&self) -> bool {
    !self.title.trim().is_empty() && !self.url.trim().is_empty()
  }

  pub fn host_label(&self) -> String {
    display_host(&self.url)
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseFailure {
  #[error("no JSON array delimiters in response text")]
  NoArrayFound,

  #[error("delimited text is not a JSON array: {0}")]
  NotAnArray(String),
}

/// What one fetch cycle produced. Every spawned fetch task resolves to
/// exactly one of these, so delivering the outcome doubles as clearing
/// the loading indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
  /// At least one usable record.
  Headlines(Vec<Headline>),
  /// The array parsed but held no usable records.
  NoneAvailable,
  /// Extraction failed; show the raw response text instead.
  RawText(String),
  /// No AI client was constructed at startup.
  ClientMissing,
  /// The service answered with empty text.
  EmptyResponse,
  /// The call itself failed; details are in the logs.
  ServiceFailed,
}

/// The fixed instruction sent to the text service.
pub fn instruction(count: usize) -> String {
  format!(
    "List the top {count} trending news headlines worldwide right now. \
     Respond with a JSON array of objects, each with a \"title\" field and a \"url\" field."
  )
}

/// Tolerant extraction of a headline array from free-form model output:
/// slice from the first `[` to the last `]` and parse that. Prose that
/// itself contains brackets will defeat this; that fragility is a known
/// property of the strategy, traded for not demanding strict JSON from
/// the model.
pub fn extract_headlines(text: &str) -> Result<Vec<Headline>, ParseFailure> {
  let start = text.find('[').ok_or(ParseFailure::NoArrayFound)?;
  let end = text.rfind(']').ok_or(ParseFailure::NoArrayFound)?;
  if end < start {
    return Err(ParseFailure::NoArrayFound);
  }

  let candidate = &text[start..=end];
  let values: Vec<serde_json::Value> =
    serde_json::from_str(candidate).map_err(|e| ParseFailure::NotAnArray(e.to_string()))?;

  // Records that are not objects or are missing a field are skipped,
  // not fatal for the batch.
  let headlines = values
    .into_iter()
    .filter_map(|value| serde_json::from_value::<Headline>(value).ok())
    .filter(Headline::is_renderable)
    .collect();

  Ok(headlines)
}

/// Classify a non-erroring service response into a render outcome.
pub fn outcome_from_response(text: &str) -> FetchOutcome {
  if text.trim().is_empty() {
    return FetchOutcome::EmptyResponse;
  }

  match extract_headlines(text) {
    Ok(headlines) if headlines.is_empty() => FetchOutcome::NoneAvailable,
    Ok(headlines) => FetchOutcome::Headlines(headlines),
    Err(failure) => {
      log::warn!("Tolerant extraction failed ({failure}); falling back to raw text");
      FetchOutcome::RawText(text.to_string())
    },
  }
}

/// Derive the display label for a card: the URL with its scheme and a
/// leading `www.` stripped, cut at the first path/query/fragment
/// character, leaving a bare host name.
pub fn display_host(url: &str) -> String {
  let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
  let rest = rest.strip_prefix("www.").unwrap_or(rest);
  match rest.find(['/', '?', '#']) {
    Some(idx) => rest[..idx].to_string(),
    None => rest.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn extracts_array_embedded_in_prose() {
    let text = r#"Here are headlines: [{"title":"A","url":"https://www.example.com/a"}] enjoy"#;
    let headlines = extract_headlines(text).unwrap();
    assert_eq!(
      headlines,
      vec![Headline { title: "A".to_string(), url: "https://www.example.com/a".to_string() }]
    );
    assert_eq!(headlines[0].host_label(), "example.com");
  }

  #[test]
  fn empty_array_is_no_news_not_an_error() {
    assert_eq!(outcome_from_response("[]"), FetchOutcome::NoneAvailable);
  }

  #[test]
  fn missing_delimiters_fall_back_to_raw_text() {
    let text = "no brackets here";
    assert_eq!(extract_headlines(text), Err(ParseFailure::NoArrayFound));
    assert_eq!(outcome_from_response(text), FetchOutcome::RawText(text.to_string()));
  }

  #[test]
  fn reversed_delimiters_fall_back_to_raw_text() {
    assert_eq!(extract_headlines("] oops ["), Err(ParseFailure::NoArrayFound));
  }

  #[test]
  fn records_missing_a_field_are_skipped_without_aborting_the_batch() {
    let text = r#"[{"title":"no url"},{"title":"B","url":"https://b.example"},{"url":"https://no-title.example"}]"#;
    let headlines = extract_headlines(text).unwrap();
    assert_eq!(headlines.len(), 1);
    assert_eq!(headlines[0].title, "B");
  }

  #[test]
  fn non_object_elements_are_skipped() {
    let text = r#"[1, "two", {"title":"C","url":"https://c.example"}]"#;
    let headlines = extract_headlines(text).unwrap();
    assert_eq!(headlines.len(), 1);
    assert_eq!(headlines[0].title, "C");
  }

  #[test]
  fn brackets_in_surrounding_prose_defeat_extraction() {
    // Known fragility of first-to-last bracket slicing: the slice below
    // starts at "[1]" and is not valid JSON, so the whole response is
    // surfaced as raw text.
    let text = r#"sources [1] and [2] say: [{"title":"D","url":"https://d.example"}]"#;
    assert_eq!(outcome_from_response(text), FetchOutcome::RawText(text.to_string()));
  }

  #[test]
  fn empty_response_text_is_its_own_outcome() {
    assert_eq!(outcome_from_response(""), FetchOutcome::EmptyResponse);
    assert_eq!(outcome_from_response("   \n"), FetchOutcome::EmptyResponse);
  }

  #[test]
  fn host_labels_strip_scheme_www_and_path() {
    assert_eq!(display_host("https://www.example.com/a"), "example.com");
    assert_eq!(display_host("http://example.org"), "example.org");
    assert_eq!(display_host("https://news.example.net/story?id=1"), "news.example.net");
    assert_eq!(display_host("example.com/path"), "example.com");
    assert_eq!(display_host("https://example.com#frag"), "example.com");
  }

  #[test]
  fn instruction_mentions_count_and_fields() {
    let prompt = instruction(5);
    assert!(prompt.contains("top 5"));
    assert!(prompt.contains("\"title\""));
    assert!(prompt.contains("\"url\""));
  }
}

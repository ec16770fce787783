//! HTML rendering for the exported headlines page. Everything the model
//! returns is untrusted text and passes through [`escape`] exactly once
//! on its way into markup.

use crate::headlines::Headline;

/// Replace `& < > " '` with their entity equivalents, left to right.
/// `&` is handled like every other character in a single pass, so one
/// application never double-encodes. Applying it twice does
/// (`&` -> `&amp;` -> `&amp;amp;`); callers escape each value once.
pub fn escape(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

/// One focusable card per renderable headline: escaped title, escaped
/// host label, opening in a new browsing context without opener access.
pub fn render_cards(headlines: &[Headline]) -> String {
  let mut out = String::new();
  for headline in headlines {
    if !headline.is_renderable() {
      continue;
    }
    out.push_str(&format!(
      "<a class=\"headline-card\" href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">\n  <h3>{title}</h3>\n  <span class=\"headline-host\">{host}</span>\n</a>\n",
      href = escape(&headline.url),
      title = escape(&headline.title),
      host = escape(&headline.host_label()),
    ));
  }
  out
}

/// The raw-text fallback: escaped verbatim response with line breaks
/// preserved as visual breaks.
pub fn render_fallback(text: &str) -> String {
  let escaped = escape(text);
  format!("<p class=\"headline-fallback\">{}</p>\n", escaped.replace('\n', "<br>\n"))
}

/// Wrap a rendered fragment into a standalone page.
pub fn render_page(title: &str, body: &str) -> String {
  format!(
    "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
    title = escape(title),
    body = body,
  )
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::headlines::Headline;

  #[test]
  fn escapes_all_five_characters() {
    assert_eq!(escape("&<>\"'"), "&amp;&lt;&gt;&quot;&#39;");
    assert_eq!(escape("a & b < c > d \"e\" 'f'"), "a &amp; b &lt; c &gt; d &quot;e&quot; &#39;f&#39;");
  }

  #[test]
  fn escape_is_identity_on_clean_input() {
    assert_eq!(escape("plain text, no markup"), "plain text, no markup");
    assert_eq!(escape(""), "");
  }

  #[test]
  fn escaped_output_has_no_raw_special_characters() {
    let out = escape("<script>alert('&')</script>");
    assert!(!out.contains('<'));
    assert!(!out.contains('>'));
    assert!(!out.contains('"'));
    assert!(!out.contains('\''));
    // The only ampersands left are the ones starting entities.
    assert_eq!(out.matches('&').count(), out.matches("&amp;").count() + out.matches("&lt;").count() + out.matches("&gt;").count() + out.matches("&#39;").count());
  }

  #[test]
  fn double_application_double_encodes() {
    assert_eq!(escape(&escape("&")), "&amp;amp;");
  }

  #[test]
  fn cards_escape_model_text_and_deny_opener_access() {
    let headlines = vec![Headline {
      title: "<b>Breaking</b> & entering".to_string(),
      url: "https://www.example.com/story".to_string(),
    }];
    let fragment = render_cards(&headlines);
    assert!(fragment.contains("&lt;b&gt;Breaking&lt;/b&gt; &amp; entering"));
    assert!(fragment.contains(">example.com<"));
    assert!(fragment.contains("target=\"_blank\" rel=\"noopener noreferrer\""));
    assert!(!fragment.contains("<b>"));
  }

  #[test]
  fn cards_skip_records_with_empty_fields() {
    let headlines = vec![
      Headline { title: String::new(), url: "https://example.com".to_string() },
      Headline { title: "Kept".to_string(), url: "https://example.com/kept".to_string() },
    ];
    let fragment = render_cards(&headlines);
    assert_eq!(fragment.matches("headline-card").count(), 1);
    assert!(fragment.contains("Kept"));
  }

  #[test]
  fn fallback_preserves_line_breaks() {
    let fragment = render_fallback("line one\nline <two>");
    assert_eq!(fragment, "<p class=\"headline-fallback\">line one<br>\nline &lt;two&gt;</p>\n");
  }

  #[test]
  fn page_wraps_fragment() {
    let page = render_page("Trending & Co", "<a>x</a>");
    assert!(page.starts_with("<!doctype html>"));
    assert!(page.contains("<title>Trending &amp; Co</title>"));
    assert!(page.contains("<a>x</a>"));
  }
}

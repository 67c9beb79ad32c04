//! Streaming feed parser for RSS 2.0 and Atom documents.
//!
//! Walks `quick-xml` events and fills one [`FeedEntry`] per `<item>` (RSS)
//! or `<entry>` (Atom). Only direct children of an entry are read:
//!
//! | Field | RSS | Atom |
//! |-------|-----|------|
//! | title | `<title>` | `<title>` |
//! | link | `<link>` text | `<link href>` (`rel` absent or `alternate`) |
//! | published | `<pubDate>` | `<published>` |
//! | summary | `<description>` | `<summary>` |
//! | source | `<source>` text | `<source><title>` |
//!
//! Values are kept as the provider wrote them (entities and CDATA resolved,
//! surrounding whitespace stripped). Dates are not parsed. An empty
//! `<title>` or `<link>` is kept as an empty string; the other fields are
//! absent when empty.
//!
//! Parsing is lenient in the way feeds in the wild need: bare `&`,
//! mismatched or stray closing tags and unclosed inline HTML such as `<br>`
//! are accepted. Anything worse stops the walk, and the entries completed
//! so far are returned with the error logged.

use crate::models::{EntrySource, FeedEntry, ParsedFeed};
use quick_xml::Reader;
use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::error::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
    Summary,
    SourceText,
    SourceTitle,
}

impl Field {
    /// Required fields keep an empty value; the rest treat it as absent.
    fn keeps_empty(self) -> bool {
        matches!(self, Field::Title | Field::Link)
    }
}

/// Parser state for the entry currently open.
#[derive(Debug)]
struct OpenEntry {
    depth: usize,
    entry: FeedEntry,
    source_depth: Option<usize>,
}

#[derive(Debug, Default)]
struct FeedWalker {
    /// Names of the currently open elements, outermost first.
    stack: Vec<Vec<u8>>,
    open: Option<OpenEntry>,
    capture: Option<(Field, usize)>,
    text: String,
    entries: Vec<FeedEntry>,
}

/// Parse a feed document into raw entries.
#[instrument(level = "info", skip_all, fields(bytes = xml.len()))]
pub fn parse_feed(xml: &str) -> ParsedFeed {
    let mut walker = FeedWalker::default();
    if let Err(e) = walker.walk(xml) {
        warn!(
            error = %e,
            parsed = walker.entries.len(),
            "Malformed feed; keeping entries parsed so far"
        );
    }
    debug!(entries = walker.entries.len(), "Parsed feed");
    ParsedFeed {
        entries: walker.entries,
    }
}

impl FeedWalker {
    fn walk(&mut self, xml: &str) -> Result<(), Box<dyn Error>> {
        let mut reader = Reader::from_str(xml);
        let config = reader.config_mut();
        config.allow_dangling_amp = true;
        config.allow_unmatched_ends = true;
        config.check_end_names = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    self.stack.push(e.name().as_ref().to_vec());
                    self.on_start(&e)?;
                }
                Event::Empty(e) => {
                    self.stack.push(e.name().as_ref().to_vec());
                    self.on_start(&e)?;
                    self.on_end();
                    self.stack.pop();
                }
                Event::End(e) => {
                    let name = e.name();
                    // Close everything opened since the matching start tag;
                    // a closing tag with no open counterpart is ignored.
                    if let Some(pos) = self.stack.iter().rposition(|n| n.as_slice() == name.as_ref()) {
                        while self.stack.len() > pos {
                            self.on_end();
                            self.stack.pop();
                        }
                    }
                }
                Event::Text(t) => {
                    if self.capture.is_some() {
                        self.text.push_str(&t.decode()?);
                    }
                }
                Event::CData(c) => {
                    if self.capture.is_some() {
                        self.text.push_str(&c.decode()?);
                    }
                }
                Event::GeneralRef(r) => {
                    if self.capture.is_some() {
                        self.push_reference(&r)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    /// Append a `&...;` reference, resolved when it is a character or a
    /// predefined XML entity and kept literally otherwise.
    fn push_reference(&mut self, r: &BytesRef) -> Result<(), Box<dyn Error>> {
        if let Ok(Some(ch)) = r.resolve_char_ref() {
            self.text.push(ch);
            return Ok(());
        }
        let name = r.decode()?;
        match resolve_xml_entity(&name) {
            Some(resolved) => self.text.push_str(resolved),
            None => {
                self.text.push('&');
                self.text.push_str(&name);
                self.text.push(';');
            }
        }
        Ok(())
    }

    fn on_start(&mut self, e: &BytesStart) -> Result<(), Box<dyn Error>> {
        let depth = self.stack.len();
        let name = e.name();
        let name = name.as_ref();

        let Some(open) = self.open.as_mut() else {
            if name == b"item" || name == b"entry" {
                self.open = Some(OpenEntry {
                    depth,
                    entry: FeedEntry::default(),
                    source_depth: None,
                });
            }
            return Ok(());
        };

        if let Some(source_depth) = open.source_depth {
            if depth == source_depth + 1 && name == b"title" {
                self.capture = Some((Field::SourceTitle, depth));
                self.text.clear();
            }
            return Ok(());
        }

        if self.capture.is_some() || depth != open.depth + 1 {
            return Ok(());
        }

        let field = match name {
            b"title" => Field::Title,
            b"link" if has_href(e) => {
                if open.entry.link.is_none() {
                    open.entry.link = atom_link_href(e)?;
                }
                return Ok(());
            }
            b"link" => Field::Link,
            b"pubDate" | b"published" => Field::Published,
            b"description" | b"summary" => Field::Summary,
            b"source" => {
                open.source_depth = Some(depth);
                open.entry.source.get_or_insert_with(EntrySource::default);
                Field::SourceText
            }
            _ => return Ok(()),
        };
        self.capture = Some((field, depth));
        self.text.clear();
        Ok(())
    }

    fn on_end(&mut self) {
        let depth = self.stack.len();
        let Some(open) = self.open.as_mut() else {
            return;
        };

        if let Some((field, capture_depth)) = self.capture {
            if capture_depth == depth {
                let value = self.text.trim().to_string();
                let value = Some(value).filter(|v| field.keeps_empty() || !v.is_empty());
                let entry = &mut open.entry;
                let slot = match field {
                    Field::Title => &mut entry.title,
                    Field::Link => &mut entry.link,
                    Field::Published => &mut entry.published,
                    Field::Summary => &mut entry.summary,
                    Field::SourceText | Field::SourceTitle => {
                        &mut entry.source.get_or_insert_with(EntrySource::default).title
                    }
                };
                if slot.is_none() {
                    *slot = value;
                }
                self.capture = None;
                self.text.clear();
            }
        }

        if open.source_depth == Some(depth) {
            open.source_depth = None;
            if matches!(self.capture, Some((Field::SourceText, _))) {
                self.capture = None;
            }
        }

        if open.depth == depth {
            if let Some(open) = self.open.take() {
                self.entries.push(open.entry);
            }
        }
    }
}

fn has_href(e: &BytesStart) -> bool {
    e.attributes().flatten().any(|attr| attr.key.as_ref() == b"href")
}

/// `href` of an Atom `<link>`, if it points at the entry's own page.
///
/// Values that do not unescape cleanly (a bare `&` in a query string) are
/// kept raw.
fn atom_link_href(e: &BytesStart) -> Result<Option<String>, Box<dyn Error>> {
    let mut href = None;
    for attr in e.attributes().flatten() {
        let raw = std::str::from_utf8(&attr.value)?;
        let value = unescape(raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        match attr.key.as_ref() {
            b"href" => href = Some(value),
            b"rel" if value != "alternate" => return Ok(None),
            _ => {}
        }
    }
    Ok(href.filter(|h| !h.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_NEWS_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <generator>NFE/5.0</generator>
    <title>Top stories - Google News</title>
    <link>https://news.google.com/?hl=en-US&amp;gl=US&amp;ceid=US:en</link>
    <description>Google News</description>
    <item>
      <title>Markets rally on rate hopes - Reuters</title>
      <link>https://news.google.com/rss/articles/CBMiAAA?oc=5</link>
      <guid isPermaLink="false">CBMiAAA</guid>
      <pubDate>Tue, 06 May 2025 08:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/CBMiAAA?oc=5"&gt;Markets rally&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Reuters&lt;/font&gt;</description>
      <source url="https://www.reuters.com">Reuters - Asia Edition</source>
    </item>
    <item>
      <title><![CDATA[Tom & Jerry return]]></title>
      <link>https://news.google.com/rss/articles/CBMiBBB?oc=5</link>
      <source url="https://example.com">Example Daily</source>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn test_parses_google_news_items() {
        let feed = parse_feed(GOOGLE_NEWS_RSS);
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.title.as_deref(), Some("Markets rally on rate hopes - Reuters"));
        assert_eq!(
            first.link.as_deref(),
            Some("https://news.google.com/rss/articles/CBMiAAA?oc=5")
        );
        assert_eq!(first.published.as_deref(), Some("Tue, 06 May 2025 08:00:00 GMT"));
        assert_eq!(
            first.summary.as_deref(),
            Some(r##"<a href="https://news.google.com/rss/articles/CBMiAAA?oc=5">Markets rally</a>&nbsp;&nbsp;<font color="#6f6f6f">Reuters</font>"##)
        );
        assert_eq!(
            first.source,
            Some(EntrySource {
                title: Some("Reuters - Asia Edition".into())
            })
        );
    }

    #[test]
    fn test_optional_fields_absent() {
        let feed = parse_feed(GOOGLE_NEWS_RSS);
        let second = &feed.entries[1];
        assert_eq!(second.title.as_deref(), Some("Tom & Jerry return"));
        assert_eq!(second.published, None);
        assert_eq!(second.summary, None);
    }

    #[test]
    fn test_channel_fields_are_not_entries() {
        let xml = r#"<rss><channel><title>Feed</title><link>https://x</link></channel></rss>"#;
        assert!(parse_feed(xml).entries.is_empty());
    }

    #[test]
    fn test_entities_between_words_keep_spacing() {
        let xml = "<rss><channel><item><title>AT&amp;T and T-Mobile &#8211; deal</title><link>https://x</link></item></channel></rss>";
        let feed = parse_feed(xml);
        assert_eq!(
            feed.entries[0].title.as_deref(),
            Some("AT&T and T-Mobile \u{2013} deal")
        );
    }

    #[test]
    fn test_nested_elements_do_not_leak_into_fields() {
        let xml = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:content url="https://img"><media:title>Photo caption</media:title></media:content>
            <title>Real title</title>
            <link>https://x</link>
        </item></channel></rss>"#;
        let feed = parse_feed(xml);
        assert_eq!(feed.entries[0].title.as_deref(), Some("Real title"));
    }

    #[test]
    fn test_empty_source_element() {
        let xml = r#"<rss><channel><item><title>T</title><link>https://x</link><source url="https://s"/></item></channel></rss>"#;
        let feed = parse_feed(xml);
        assert_eq!(feed.entries[0].source, Some(EntrySource { title: None }));
    }

    #[test]
    fn test_parses_atom_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <link href="https://example.com/"/>
  <entry>
    <title type="html">Atom &amp; friends</title>
    <link rel="enclosure" href="https://example.com/a.mp3"/>
    <link rel="alternate" href="https://example.com/posts/1?a=1&amp;b=2"/>
    <published>2025-05-06T08:00:00Z</published>
    <updated>2025-05-06T09:00:00Z</updated>
    <summary>  Short summary  </summary>
    <source>
      <title>Example Wire - Europe</title>
      <link href="https://wire.example.com"/>
    </source>
  </entry>
</feed>"#;
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 1);
        let entry = &feed.entries[0];
        assert_eq!(entry.title.as_deref(), Some("Atom & friends"));
        assert_eq!(entry.link.as_deref(), Some("https://example.com/posts/1?a=1&b=2"));
        assert_eq!(entry.published.as_deref(), Some("2025-05-06T08:00:00Z"));
        assert_eq!(entry.summary.as_deref(), Some("Short summary"));
        assert_eq!(
            entry.source,
            Some(EntrySource {
                title: Some("Example Wire - Europe".into())
            })
        );
    }

    #[test]
    fn test_truncated_feed_keeps_completed_entries() {
        let xml = "<rss><channel><item><title>One</title><link>https://1</link></item><item><title>Tw";
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].title.as_deref(), Some("One"));
    }

    #[test]
    fn test_bare_ampersand_in_link() {
        let xml = "<rss><channel>\
            <item><title>A</title><link>https://x/?a=1&b=2</link></item>\
            <item><title>B</title><link>https://y</link></item>\
            </channel></rss>";
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].link.as_deref(), Some("https://x/?a=1&b=2"));
        assert_eq!(feed.entries[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_unclosed_inline_html_in_description() {
        let xml = "<rss><channel>\
            <item><title>A</title><description>Hi<br>there</description><link>https://x</link></item>\
            <item><title>B</title><link>https://y</link></item>\
            </channel></rss>";
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].summary.as_deref(), Some("Hithere"));
        assert_eq!(feed.entries[0].link.as_deref(), Some("https://x"));
        assert_eq!(feed.entries[1].link.as_deref(), Some("https://y"));
    }

    #[test]
    fn test_stray_closing_tag_is_ignored() {
        let xml = "<rss><channel><item><title>Two</wrong></title><link>https://2</link></item></channel></rss>";
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].title.as_deref(), Some("Two"));
        assert_eq!(feed.entries[0].link.as_deref(), Some("https://2"));
    }

    #[test]
    fn test_atom_href_with_bare_ampersand() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <title>A</title><link href="https://x/?a=1&b=2"/>
            </entry></feed>"#;
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].link.as_deref(), Some("https://x/?a=1&b=2"));
    }

    #[test]
    fn test_empty_required_fields_are_kept_empty() {
        let xml = "<rss><channel>\
            <item><title></title><link>https://1</link><description></description><pubDate/></item>\
            <item><title/><link>https://2</link></item>\
            </channel></rss>";
        let feed = parse_feed(xml);
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].title.as_deref(), Some(""));
        assert_eq!(feed.entries[0].summary, None);
        assert_eq!(feed.entries[0].published, None);
        assert_eq!(feed.entries[1].title.as_deref(), Some(""));
    }

    #[test]
    fn test_not_xml_at_all() {
        assert!(parse_feed("<html><body>502 Bad Gateway</body></html>").entries.is_empty());
        assert!(parse_feed("").entries.is_empty());
    }
}

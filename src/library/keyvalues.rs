//! Lenient reader for Valve's KeyValues text format (`.vdf` / `.acf`).
//!
//! Steam writes these files one token group per line:
//!
//! ```text
//! "AppState"
//! {
//!     "appid"       "620"
//!     "installdir"  "Portal 2"
//!     "name"        "Portal 2"
//!     "InstalledDepots"
//!     {
//!         "621" { "manifest" "..." }
//!     }
//! }
//! ```
//!
//! Only `"key" "value"` pairs are kept, each tagged with the brace depth it
//! appeared at, in file order. Braces drive the depth counter and section
//! headers are dropped. A line that cannot be tokenized is skipped whole.

/// A single `"key" "value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Number of enclosing `{` blocks
    pub depth: usize,
    pub key: String,
    pub value: String,
}

/// Flattened view of a KeyValues file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Text(String),
}

impl Document {
    /// Parse KeyValues text. Never fails; malformed lines are ignored.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut depth = 0usize;

        for line in text.lines() {
            let Some(tokens) = tokenize(line) else {
                tracing::trace!(line, "skipping malformed keyvalues line");
                continue;
            };

            let mut tokens = tokens.into_iter().peekable();
            while let Some(token) = tokens.next() {
                match token {
                    Token::Open => depth += 1,
                    Token::Close => depth = depth.saturating_sub(1),
                    Token::Text(key) => {
                        if let Some(Token::Text(_)) = tokens.peek() {
                            if let Some(Token::Text(value)) = tokens.next() {
                                entries.push(Entry { depth, key, value });
                            }
                        }
                        // A lone text token is a section header; its block
                        // is opened by the following `{`.
                    }
                }
            }
        }

        Self { entries }
    }

    /// All pairs in file order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Value of the first pair named `key`, at any depth.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Value of the first pair named `key` at exactly `depth`.
    pub fn first_at_depth(&self, key: &str, depth: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.depth == depth && e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Value of the last pair named `key` at exactly `depth`.
    pub fn last_at_depth(&self, key: &str, depth: usize) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.depth == depth && e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Every value stored under `key`, at any depth, in file order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

/// Split one line into tokens. Returns `None` for an unterminated string.
fn tokenize(line: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '}' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '/' if starts_comment(&chars) => break,
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some('t') => text.push('\t'),
                            Some(other) => text.push(other),
                            None => return None,
                        },
                        other => text.push(other),
                    }
                }
                if !closed {
                    return None;
                }
                tokens.push(Token::Text(text));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | '"') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                // Platform conditionals such as `[$WIN32]` qualify the
                // preceding pair and carry no data of their own.
                if !word.starts_with('[') {
                    tokens.push(Token::Text(word));
                }
            }
        }
    }

    Some(tokens)
}

fn starts_comment(chars: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    ahead.next();
    ahead.peek() == Some(&'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
"AppState"
{
	"appid"		"620"
	"Universe"		"1"
	"name"		"Portal 2"
	"installdir"		"Portal 2"
	"InstalledDepots"
	{
		"621"
		{
			"manifest"		"1234"
			"size"		"42"
		}
	}
	"UserConfig"
	{
		"name"		"Portal 2 (beta)"
		"appid"		"999"
	}
}
"#;

    #[test]
    fn test_pairs_carry_depth() {
        let doc = Document::parse(MANIFEST);
        let appid = &doc.entries()[0];
        assert_eq!(appid.key, "appid");
        assert_eq!(appid.value, "620");
        assert_eq!(appid.depth, 1);

        let manifest = doc.entries().iter().find(|e| e.key == "manifest").unwrap();
        assert_eq!(manifest.depth, 3);
    }

    #[test]
    fn test_first_and_last_lookup() {
        let doc = Document::parse(MANIFEST);
        assert_eq!(doc.first("appid"), Some("620"));
        assert_eq!(doc.first_at_depth("name", 1), Some("Portal 2"));
        assert_eq!(doc.last_at_depth("name", 2), Some("Portal 2 (beta)"));
        assert_eq!(doc.values("appid").collect::<Vec<_>>(), vec!["620", "999"]);
        assert_eq!(doc.first("missing"), None);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "\"ok\" \"1\"\n\"key\" \"value\n\"after\" \"2\"\n";
        let doc = Document::parse(text);
        let keys: Vec<_> = doc.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ok", "after"]);
    }

    #[test]
    fn test_escapes_comments_and_conditionals() {
        let text = r#"
"root"
{
	// a comment line
	"path"		"C:\\Games\\Steam"	// trailing comment
	"quote"		"say \"hi\""
	"os"		"linux"		[$LINUX]
}
"#;
        let doc = Document::parse(text);
        assert_eq!(doc.first("path"), Some("C:\\Games\\Steam"));
        assert_eq!(doc.first("quote"), Some("say \"hi\""));
        assert_eq!(doc.first("os"), Some("linux"));
        assert_eq!(doc.entries().len(), 3);
    }

    #[test]
    fn test_inline_blocks_and_unbalanced_close() {
        let doc = Document::parse("}\n\"a\" { \"b\" \"c\" }\n\"d\" \"e\"");
        assert_eq!(
            doc.entries(),
            &[
                Entry { depth: 1, key: "b".into(), value: "c".into() },
                Entry { depth: 0, key: "d".into(), value: "e".into() },
            ]
        );
    }
}

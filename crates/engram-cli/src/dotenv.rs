//! Minimal `.env` loader for `~/.engram/.env`.
//!
//! `KEY=VALUE` lines only; `#` comments and blank lines are skipped, and
//! single or double quotes around the value are stripped. Variables already
//! set in the process environment take priority.

use engram_types::config::engram_home;
use tracing::debug;

/// Load `~/.engram/.env` into the process environment.
pub fn load_dotenv() {
    let path = engram_home().join(".env");
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return;
    };
    let mut loaded = 0;
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, &value);
            loaded += 1;
        }
    }
    if loaded > 0 {
        debug!(path = %path.display(), count = loaded, "Loaded environment variables");
    }
}

/// Parse `KEY=VALUE` pairs out of dotenv-format text.
fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        pairs.push((key.to_string(), value.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_pairs() {
        let pairs = parse_dotenv("OPENAI_API_KEY=sk-test\nMODEL=gpt-4o-mini\n");
        assert_eq!(
            pairs,
            vec![
                ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
                ("MODEL".to_string(), "gpt-4o-mini".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let pairs = parse_dotenv("# comment\n\nKEY=value\n  # indented comment\n");
        assert_eq!(pairs, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_parse_strips_quotes() {
        let pairs = parse_dotenv("A=\"quoted\"\nB='single'\nC=un\"balanced\n");
        assert_eq!(pairs[0].1, "quoted");
        assert_eq!(pairs[1].1, "single");
        assert_eq!(pairs[2].1, "un\"balanced");
    }

    #[test]
    fn test_parse_value_may_contain_equals() {
        let pairs = parse_dotenv("URL=https://x/y?a=b\n");
        assert_eq!(pairs[0].1, "https://x/y?a=b");
    }
}

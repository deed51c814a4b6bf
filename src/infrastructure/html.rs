//! Flattens an HTML document into its visible text

use regex::{Captures, Regex};
use std::sync::LazyLock;

static HIDDEN_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
        .expect("Invalid regex")
});

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid regex"));

static ENTITIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("Invalid regex"));

/// Text content of `html` with markup removed and entities decoded.
///
/// Tags are dropped without inserting separators, so adjacent text nodes are
/// concatenated exactly as they appear in the document.
pub fn flatten_text(html: &str) -> String {
    let without_hidden = HIDDEN_BLOCKS.replace_all(html, "");
    let without_tags = TAGS.replace_all(&without_hidden, "");
    decode_entities(&without_tags)
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            decode_entity(entity).map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    let ch = match entity {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "ccedil" => 'ç',
        "Ccedil" => 'Ç',
        "ouml" => 'ö',
        "Ouml" => 'Ö',
        "uuml" => 'ü',
        "Uuml" => 'Ü',
        _ => return None,
    };
    Some(ch)
}

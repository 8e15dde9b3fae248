use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::NamingConfig;

pub const DEFAULT_DIGIT_PREFIX: &str = "S";

pub const DEFAULT_RESERVED_WORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
    "var",
    "record",
    "yield",
    "sealed",
    "permits",
    "non-sealed",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Please enter a screen name.")]
    Empty,
    #[error("Screen name is too long (max {max} characters).")]
    TooLong { max: usize },
    #[error("Screen name is invalid. Please use letters/numbers/spaces/underscore.")]
    NoUsableCharacters,
    #[error("Invalid class name: '{name}'. Use only letters, digits, and underscore.")]
    InvalidIdentifier { name: String },
    #[error("Class name cannot be a reserved word: '{name}'.")]
    ReservedWord { name: String },
}

/// Class names derived from one raw screen name.
///
/// Always rebuilt from raw text; never feed `screen_class()` or `test_class()`
/// back into [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    base: String,
    screen: String,
    test: String,
}

impl ClassNames {
    pub fn derive(raw: &str, naming: &NamingConfig) -> Result<Self, NameError> {
        let trimmed = validate_raw_input(raw, naming.max_input_length)?;

        let base = normalize_with_prefix(trimmed, &naming.digit_prefix);
        if base.is_empty() {
            return Err(NameError::NoUsableCharacters);
        }

        validate_identifier(&base, &naming.reserved_words)?;

        Ok(Self {
            screen: format!("{base}{}", naming.screen_suffix),
            test: format!("{base}{}", naming.test_suffix),
            base,
        })
    }

    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn screen_class(&self) -> &str {
        &self.screen
    }

    pub fn test_class(&self) -> &str {
        &self.test
    }

    pub fn screen_file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.screen)
    }

    pub fn test_file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.test)
    }
}

pub fn validate_raw_input(raw: &str, max_length: usize) -> Result<&str, NameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    if trimmed.chars().count() > max_length {
        return Err(NameError::TooLong { max: max_length });
    }

    Ok(trimmed)
}

pub fn normalize(raw: &str) -> String {
    normalize_with_prefix(raw, DEFAULT_DIGIT_PREFIX)
}

/// PascalCase conversion of raw user text.
///
/// Returns an empty string when nothing usable remains.
pub fn normalize_with_prefix(raw: &str, digit_prefix: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|character| {
            if character.is_alphabetic() || character.is_numeric() || character.is_whitespace() {
                character
            } else {
                // '-' and '_' separate tokens exactly like punctuation does.
                ' '
            }
        })
        .collect();

    let mut joined = String::with_capacity(cleaned.len());
    for token in cleaned.split_whitespace() {
        let lowered = token.to_lowercase();
        let mut characters = lowered.chars();
        if let Some(first) = characters.next() {
            push_title_case(&mut joined, first);
            joined.push_str(characters.as_str());
        }
    }

    match joined.chars().next() {
        Some(first) if first.is_numeric() => format!("{digit_prefix}{joined}"),
        _ => joined,
    }
}

/// Title case of a single character: the first char of its uppercase form,
/// with any remainder lowercased (`ß` → `Ss`, `ﬁ` → `Fi`).
fn push_title_case(out: &mut String, character: char) {
    let titled = match character {
        'Ǆ' | 'ǅ' | 'ǆ' => Some('ǅ'),
        'Ǉ' | 'ǈ' | 'ǉ' => Some('ǈ'),
        'Ǌ' | 'ǋ' | 'ǌ' => Some('ǋ'),
        'Ǳ' | 'ǲ' | 'ǳ' => Some('ǲ'),
        _ => None,
    };
    if let Some(titled) = titled {
        out.push(titled);
        return;
    }

    let mut upper = character.to_uppercase();
    if let Some(head) = upper.next() {
        out.push(head);
    }
    for rest in upper {
        out.extend(rest.to_lowercase());
    }
}

pub fn validate_identifier(name: &str, reserved_words: &[String]) -> Result<(), NameError> {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let identifier =
        IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

    if !identifier.is_match(name) {
        return Err(NameError::InvalidIdentifier {
            name: name.to_string(),
        });
    }

    if reserved_words.iter().any(|word| word == name) {
        return Err(NameError::ReservedWord {
            name: name.to_string(),
        });
    }

    Ok(())
}

pub fn is_identifier(name: &str) -> bool {
    validate_identifier(name, &[]).is_ok()
}

pub fn lower_first_char(name: &str) -> String {
    let mut characters = name.chars();
    match characters.next() {
        Some(first) => first.to_lowercase().chain(characters).collect(),
        None => String::new(),
    }
}

pub fn default_reserved_words() -> Vec<String> {
    DEFAULT_RESERVED_WORDS
        .iter()
        .map(|word| (*word).to_string())
        .collect()
}

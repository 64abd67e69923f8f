use crate::error::{Result, SaveError};
use crate::statics;
use crate::value::{MapValue, typed_field};
use indexmap::IndexMap;
use std::{cell::RefCell, rc::Rc};

const RECORD: &str = "symbol";

/// The letters of a full symbol legend, in display order.
pub const SYMBOL_LETTERS: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Supplies the live text of one legend entry (typically an editable field
/// owned by the presentation layer).
pub trait SymbolSource {
    fn current_text(&self) -> String;
}

impl SymbolSource for RefCell<String> {
    fn current_text(&self) -> String {
        self.borrow().clone()
    }
}

impl<F: Fn() -> String> SymbolSource for F {
    fn current_text(&self) -> String {
        self()
    }
}

/// A legend entry: one uppercase letter and what it means on this map.
#[derive(Clone)]
pub struct SymbolData {
    pub letter: char,
    /// Initial text for the live field, as loaded from a save.
    pub default_value: String,
    source: Option<Rc<dyn SymbolSource>>,
}

impl std::fmt::Debug for SymbolData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolData")
            .field("letter", &self.letter)
            .field("default_value", &self.default_value)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// A symbol record as it appears in a save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub value: String,
}

impl SymbolRecord {
    pub fn from_value(value: &MapValue) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| SaveError::InvalidField {
            record: RECORD,
            field: statics::MAP_SYMBOLS.to_string(),
            expected: "a mapping of objects",
        })?;
        let text = typed_field(RECORD, obj, statics::SYMBOL_VALUE, "a string", |v| {
            v.as_str().map(str::to_owned)
        })?
        .ok_or(SaveError::MissingField {
            record: RECORD,
            field: statics::SYMBOL_VALUE,
        })?;
        Ok(Self { value: text })
    }
}

/// Parses a symbols-mapping key into its letter.
pub fn parse_letter(key: &str) -> Result<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Ok(c),
        _ => Err(SaveError::InvalidField {
            record: RECORD,
            field: key.to_string(),
            expected: "keyed by a single uppercase letter",
        }),
    }
}

impl SymbolData {
    /// An unbound entry with no text.
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            default_value: String::new(),
            source: None,
        }
    }

    pub fn bind_retrieval(&mut self, source: Rc<dyn SymbolSource>) {
        self.source = Some(source);
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Current live text. Calling this before [`SymbolData::bind_retrieval`] is a
    /// programming error and yields [`SaveError::UnboundSymbol`].
    pub fn get_value(&self) -> Result<String> {
        match &self.source {
            Some(source) => Ok(source.current_text()),
            None => {
                tracing::error!(letter = %self.letter, "symbol read before a value source was bound");
                Err(SaveError::UnboundSymbol(self.letter))
            }
        }
    }

    /// Builds a loaded entry. Until the presentation layer rebinds it, the
    /// entry reports its loaded text as its current value.
    pub fn from_record(letter: char, record: SymbolRecord) -> Self {
        let loaded = record.value;
        let snapshot = loaded.clone();
        Self {
            letter,
            default_value: loaded,
            source: Some(Rc::new(move || snapshot.clone())),
        }
    }

    pub fn decode(key: &str, value: &MapValue) -> Result<Self> {
        let letter = parse_letter(key)?;
        let record = SymbolRecord::from_value(value)?;
        Ok(Self::from_record(letter, record))
    }

    pub fn encode(&self) -> Result<MapValue> {
        let mut map = IndexMap::new();
        map.insert(
            statics::SYMBOL_VALUE.to_string(),
            MapValue::String(self.get_value()?),
        );
        Ok(MapValue::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolData, parse_letter};
    use crate::error::SaveError;
    use crate::value::MapValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn get_value_before_binding_is_an_error() {
        let symbol = SymbolData::new('K');
        assert!(!symbol.is_bound());
        assert!(matches!(
            symbol.get_value(),
            Err(SaveError::UnboundSymbol('K'))
        ));
    }

    #[test]
    fn get_value_reads_live_source() {
        let field = Rc::new(RefCell::new(String::from("door")));
        let mut symbol = SymbolData::new('D');
        let live = field.clone();
        symbol.bind_retrieval(Rc::new(move || live.borrow().clone()));

        assert_eq!(symbol.get_value().unwrap(), "door");
        *field.borrow_mut() = "secret door".to_string();
        assert_eq!(symbol.get_value().unwrap(), "secret door");
    }

    #[test]
    fn bound_text_buffer_is_read_live() {
        let field = Rc::new(RefCell::new(String::new()));
        let mut symbol = SymbolData::new('W');
        symbol.bind_retrieval(field.clone());
        assert!(symbol.is_bound());

        assert_eq!(symbol.get_value().unwrap(), "");
        field.borrow_mut().push_str("well");
        assert_eq!(symbol.get_value().unwrap(), "well");
    }

    #[test]
    fn decode_requires_value_field() {
        let value = MapValue::parse_json5("{ note: 'x' }").unwrap();
        assert!(matches!(
            SymbolData::decode("T", &value),
            Err(SaveError::MissingField { field: "value", .. })
        ));
    }

    #[test]
    fn decode_sets_default_and_encodes_it_back() {
        let value = MapValue::parse_json5("{ value: 'trap', extra: 1 }").unwrap();
        let symbol = SymbolData::decode("T", &value).unwrap();
        assert_eq!(symbol.letter, 'T');
        assert_eq!(symbol.default_value, "trap");
        assert_eq!(
            symbol.encode().unwrap(),
            MapValue::parse_json5("{ value: 'trap' }").unwrap()
        );
    }

    #[test]
    fn symbol_keys_must_be_single_uppercase_letters() {
        assert_eq!(parse_letter("Q").unwrap(), 'Q');
        for bad in ["", "q", "AB", "1"] {
            assert!(parse_letter(bad).is_err(), "{bad:?}");
        }
    }
}

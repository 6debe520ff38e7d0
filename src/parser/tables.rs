//! Packed parse tables and their binary form.
//!
//! The raw generator output is packed into dense `u16` cells: shifts and
//! reduces share one table with an even/odd tag, which keeps a row to
//! `Term::COUNT` cells and makes the hot `action()` lookup a single index.
//! The packed tables serialize to a versioned big-endian byte stream so a
//! build can cache them instead of regenerating on every start; the decoder
//! validates the header and sizes and refuses anything inconsistent.
//!
//! Rule metadata (lhs, length, minimum source level) rides along so the
//! automaton can run states-only, without the grammar in hand. That is what
//! the speculative lookahead probes use.

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::parser::diagnostics::LevelCell;
use crate::parser::grammar::{build_grammar, Grammar, NonTerm};
use crate::parser::lalr::{self, Action, NO_GOTO};
use crate::parser::lexer::Term;

const MAGIC: &[u8; 4] = b"JPTB";
const FORMAT_VERSION: u16 = 1;

const CELL_ERROR: u16 = 0;
const CELL_ACCEPT: u16 = 1;

fn pack_action(action: Action) -> u16 {
    match action {
        Action::Error => CELL_ERROR,
        Action::Accept => CELL_ACCEPT,
        Action::Shift(state) => 2 + state * 2,
        Action::Reduce(rule) => 3 + rule * 2,
    }
}

fn unpack_action(cell: u16) -> Action {
    match cell {
        CELL_ERROR => Action::Error,
        CELL_ACCEPT => Action::Accept,
        even if even % 2 == 0 => Action::Shift((even - 2) / 2),
        odd => Action::Reduce((odd - 3) / 2),
    }
}

/// Immutable parse tables shared by every parser instance.
pub struct ParserTables {
    state_count: usize,
    actions: Vec<u16>,
    gotos: Vec<u16>,
    rule_lhs: Vec<u16>,
    rule_len: Vec<u8>,
    /// 8-byte cells; levels are compared, not arithmetic, but the width is
    /// part of the serialized format.
    rule_min_level: Vec<LevelCell>,
}

impl ParserTables {
    /// Pack generator output.
    pub fn from_raw(raw: lalr::RawTables, grammar: &Grammar) -> ParserTables {
        ParserTables {
            state_count: raw.state_count,
            actions: raw.actions.into_iter().map(pack_action).collect(),
            gotos: raw.gotos,
            rule_lhs: grammar.rules.iter().map(|r| r.lhs as u16).collect(),
            rule_len: grammar.rules.iter().map(|r| r.rhs.len() as u8).collect(),
            rule_min_level: grammar.rules.iter().map(|r| r.min_level).collect(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn rule_count(&self) -> usize {
        self.rule_lhs.len()
    }

    #[inline]
    pub fn action(&self, state: u16, term: Term) -> Action {
        unpack_action(self.actions[state as usize * Term::COUNT + term.index()])
    }

    #[inline]
    pub fn goto(&self, state: u16, nt: NonTerm) -> Option<u16> {
        let cell = self.gotos[state as usize * NonTerm::COUNT + nt.index()];
        if cell == NO_GOTO {
            None
        } else {
            Some(cell)
        }
    }

    pub fn rule_lhs(&self, rule: u16) -> NonTerm {
        NonTerm::from_index(self.rule_lhs[rule as usize] as usize)
    }

    pub fn rule_len(&self, rule: u16) -> usize {
        self.rule_len[rule as usize] as usize
    }

    pub fn rule_min_level(&self, rule: u16) -> LevelCell {
        self.rule_min_level[rule as usize]
    }

    /// Terminals with a defined action in `state`, for expected-token
    /// diagnostics. Synthetic and selector terminals are internal and never
    /// reported.
    pub fn expected_terms(&self, state: u16) -> Vec<Term> {
        let row = state as usize * Term::COUNT;
        let mut out = Vec::new();
        for idx in 0..Term::COUNT {
            let term = Term::from_index(idx);
            if term_is_internal(term) {
                continue;
            }
            if self.actions[row + idx] != CELL_ERROR {
                out.push(term);
            }
        }
        out
    }

    /// Serialize to the versioned byte stream.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            16 + 2 * (self.actions.len() + self.gotos.len() + self.rule_lhs.len())
                + self.rule_len.len()
                + 8 * self.rule_min_level.len(),
        );
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
        out.extend_from_slice(&(self.state_count as u32).to_be_bytes());
        out.extend_from_slice(&(self.rule_lhs.len() as u32).to_be_bytes());
        for &cell in &self.actions {
            out.extend_from_slice(&cell.to_be_bytes());
        }
        for &cell in &self.gotos {
            out.extend_from_slice(&cell.to_be_bytes());
        }
        for &lhs in &self.rule_lhs {
            out.extend_from_slice(&lhs.to_be_bytes());
        }
        out.extend_from_slice(&self.rule_len);
        for &cell in &self.rule_min_level {
            out.extend_from_slice(&cell.to_be_bytes());
        }
        out
    }

    /// Deserialize a stream produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<ParserTables> {
        let mut cursor = Cursor { bytes, at: 0 };
        let magic = cursor.take(4)?;
        if magic != MAGIC {
            return Err(Error::tables("bad magic"));
        }
        let version = cursor.u16()?;
        if version != FORMAT_VERSION {
            return Err(Error::tables(format!("unsupported table format {version}")));
        }
        let state_count = cursor.u32()? as usize;
        let rule_count = cursor.u32()? as usize;
        if state_count == 0 || state_count > u16::MAX as usize {
            return Err(Error::tables("state count out of range"));
        }

        let actions = cursor.u16_vec(state_count * Term::COUNT)?;
        let gotos = cursor.u16_vec(state_count * NonTerm::COUNT)?;
        let rule_lhs = cursor.u16_vec(rule_count)?;
        let rule_len = cursor.take(rule_count)?.to_vec();
        let rule_min_level = cursor.u64_vec(rule_count)?;
        if cursor.at != bytes.len() {
            return Err(Error::tables("trailing bytes"));
        }
        for &lhs in &rule_lhs {
            if lhs as usize >= NonTerm::COUNT {
                return Err(Error::tables("rule lhs out of range"));
            }
        }
        Ok(ParserTables { state_count, actions, gotos, rule_lhs, rule_len, rule_min_level })
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.at + n > self.bytes.len() {
            return Err(Error::tables("truncated table stream"));
        }
        let out = &self.bytes[self.at..self.at + n];
        self.at += n;
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u16_vec(&mut self, n: usize) -> Result<Vec<u16>> {
        let raw = self.take(n * 2)?;
        Ok(raw.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect())
    }

    fn u64_vec(&mut self, n: usize) -> Result<Vec<LevelCell>> {
        let raw = self.take(n * 8)?;
        Ok(raw
            .chunks_exact(8)
            .map(|c| LevelCell::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect())
    }
}

fn term_is_internal(term: Term) -> bool {
    matches!(
        term,
        Term::BeginLambda
            | Term::TypeArgLt
            | Term::AtType
            | Term::GoalCompilationUnit
            | Term::GoalClassBodyDeclarations
            | Term::GoalBlockStatements
            | Term::GoalExpression
            | Term::GoalHeaders
            | Term::ErrorSentinel
    )
}

/// Terminals that can open a statement or member declaration. Error recovery
/// fast-forwards to one of these when it abandons the current construct.
pub fn starts_statement_or_member(term: Term) -> bool {
    matches!(
        term,
        Term::Identifier
            | Term::Abstract
            | Term::Assert
            | Term::Boolean
            | Term::Break
            | Term::Byte
            | Term::Char
            | Term::Class
            | Term::Continue
            | Term::Do
            | Term::Double
            | Term::Enum
            | Term::Final
            | Term::Float
            | Term::For
            | Term::If
            | Term::Import
            | Term::Int
            | Term::Interface
            | Term::Long
            | Term::Native
            | Term::New
            | Term::Package
            | Term::Private
            | Term::Protected
            | Term::Public
            | Term::Return
            | Term::Short
            | Term::Static
            | Term::Strictfp
            | Term::Super
            | Term::Switch
            | Term::Synchronized
            | Term::This
            | Term::Throw
            | Term::Transient
            | Term::Try
            | Term::Void
            | Term::Volatile
            | Term::While
            | Term::At
            | Term::LBrace
            | Term::RBrace
            | Term::Semicolon
    )
}

/// Overrides for the generated symbol display names, keyed by the raw symbol
/// name. The resource ships inside the crate; entries missing from it fall
/// back to the spelling derived from the symbol itself.
static SYMBOL_NAME_OVERRIDES: Lazy<std::collections::HashMap<&'static str, &'static str>> =
    Lazy::new(|| {
        let mut map = std::collections::HashMap::new();
        for line in include_str!("symbols.properties").lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                map.insert(key.trim(), value.trim());
            }
        }
        map
    });

/// Human-readable name of a grammar symbol, for diagnostics.
///
/// The default spelling is derived from the raw symbol name: an `Opt` suffix
/// drops and the camel-case words separate in lowercase, so
/// `LocalVariableDeclaration` reads "local variable declaration". The
/// embedded properties resource overrides individual entries.
pub fn symbol_display_name(nt: NonTerm) -> String {
    let raw = format!("{:?}", nt);
    if let Some(name) = SYMBOL_NAME_OVERRIDES.get(raw.as_str()) {
        return (*name).to_string();
    }
    let trimmed = raw.strip_suffix("Opt").unwrap_or(&raw);
    let mut name = String::with_capacity(trimmed.len() + 8);
    for (i, ch) in trimmed.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                name.push(' ');
            }
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// Grammar singleton; reduce actions are looked up here by rule index.
pub static GRAMMAR: Lazy<Grammar> = Lazy::new(build_grammar);

/// Table singleton, generated once per process on first use.
pub static TABLES: Lazy<ParserTables> =
    Lazy::new(|| ParserTables::from_raw(lalr::generate(&GRAMMAR), &GRAMMAR));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_pack_round_trip() {
        for action in [
            Action::Error,
            Action::Accept,
            Action::Shift(0),
            Action::Shift(1731),
            Action::Reduce(0),
            Action::Reduce(299),
        ] {
            assert_eq!(unpack_action(pack_action(action)), action);
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let tables = &*TABLES;
        let bytes = tables.encode();
        let decoded = ParserTables::decode(&bytes).unwrap();
        assert_eq!(decoded.state_count(), tables.state_count());
        assert_eq!(decoded.actions, tables.actions);
        assert_eq!(decoded.gotos, tables.gotos);
        assert_eq!(decoded.rule_min_level, tables.rule_min_level);
    }

    #[test]
    fn test_level_cells_serialize_eight_bytes_wide() {
        let tables = &*TABLES;
        let bytes = tables.encode();
        let expected = 4 + 2 + 4 + 4
            + 2 * tables.actions.len()
            + 2 * tables.gotos.len()
            + 2 * tables.rule_lhs.len()
            + tables.rule_len.len()
            + 8 * tables.rule_min_level.len();
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = TABLES.encode();
        bytes[0] = b'X';
        assert!(ParserTables::decode(&bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let bytes = TABLES.encode();
        assert!(ParserTables::decode(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn test_symbol_display_names() {
        assert_eq!(symbol_display_name(NonTerm::LocalVariableDeclaration), "local variable declaration");
        // Opt suffix drops in the derived spelling.
        assert_eq!(symbol_display_name(NonTerm::PackageDeclarationOpt), "package declaration");
        // Overridden by the embedded properties resource.
        assert_eq!(symbol_display_name(NonTerm::SuperOpt), "extends clause");
        assert_eq!(symbol_display_name(NonTerm::TypeArguments), "type arguments");
    }

    #[test]
    fn test_expected_terms_never_internal() {
        let tables = &*TABLES;
        for state in 0..tables.state_count().min(64) as u16 {
            for term in tables.expected_terms(state) {
                assert!(!term_is_internal(term), "{:?} leaked into expected set", term);
            }
        }
    }
}

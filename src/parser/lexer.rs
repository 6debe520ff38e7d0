//! Lexical analysis and the token source the automaton consumes.
//!
//! The [`Token`] enum is the raw `logos` classification; [`Term`] is the dense
//! terminal alphabet of the parser tables, which additionally contains the
//! synthetic disambiguation markers, the goal selector pseudo-tokens and the
//! end-of-input/error sentinels. The scanner never produces a marker on its
//! own; markers are substituted by the driver after consulting the oracle.

use logos::Logos;

use super::diagnostics::{Problem, ProblemKind};
use super::span::Span;

/// Raw token classification.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Token {
    // Keywords
    #[token("abstract")]
    Abstract,
    #[token("assert")]
    Assert,
    #[token("boolean")]
    Boolean,
    #[token("break")]
    Break,
    #[token("byte")]
    Byte,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("char")]
    Char,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("do")]
    Do,
    #[token("double")]
    Double,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("float")]
    Float,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("instanceof")]
    Instanceof,
    #[token("int")]
    Int,
    #[token("interface")]
    Interface,
    #[token("long")]
    Long,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("short")]
    Short,
    #[token("static")]
    Static,
    #[token("strictfp")]
    Strictfp,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("synchronized")]
    Synchronized,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("transient")]
    Transient,
    #[token("try")]
    Try,
    #[token("void")]
    Void,
    #[token("volatile")]
    Volatile,
    #[token("while")]
    While,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,
    #[token("::")]
    ColonColon,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    LShiftAssign,
    #[token(">>=")]
    RShiftAssign,
    #[token(">>>=")]
    URShiftAssign,

    // Literals
    #[regex(r"(0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[0-7_]+|0|[1-9][0-9_]*)[lL]", priority = 6)]
    LongLiteral,
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[0-7_]+|0|[1-9][0-9_]*", priority = 5)]
    IntLiteral,
    #[regex(
        r"([0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*([eE][+-]?[0-9]+)?)[fF]",
        priority = 7
    )]
    FloatLiteral,
    #[regex(
        r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?[dD]?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[dD]?|[0-9][0-9_]*[eE][+-]?[0-9]+[dD]?|[0-9][0-9_]*[dD]",
        priority = 6
    )]
    DoubleLiteral,
    #[regex(r"'([^'\\\n]|\\u[0-9a-fA-F]{4}|\\.)'")]
    CharLiteral,
    #[regex(r#""([^"\\\n]|\\u[0-9a-fA-F]{4}|\\.)*""#)]
    StringLiteral,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    // Trivia
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 3)]
    BlockComment,
    #[regex(r"[ \t\n\r\u{000C}]+", priority = 3)]
    Whitespace,
    #[token("\u{FEFF}")]
    Bom,
}

impl Token {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Bom | Token::LineComment | Token::BlockComment
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }
}

/// Dense terminal index consumed by the parser tables.
///
/// Discriminant order is load-bearing for table indexing; new terminals go at
/// the end of their group and `ALL`/`COUNT` must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Term {
    Identifier,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,

    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
    True,
    False,
    Null,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    At,
    Ellipsis,
    ColonColon,

    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Inc,
    Dec,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    LShift,
    RShift,
    URShift,
    AndAnd,
    OrOr,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Question,
    Colon,
    Arrow,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    LShiftAssign,
    RShiftAssign,
    URShiftAssign,

    /// Synthetic marker: the upcoming `(` opens a lambda parameter list.
    BeginLambda,
    /// Synthetic marker: this `<` opens a type-argument list.
    TypeArgLt,
    /// Synthetic marker: this `@` starts a type annotation.
    AtType,
    /// Synthetic marker: `default` used as a modifier or annotation-element
    /// default, not a switch label.
    DefaultModifier,

    /// Goal selector pseudo-tokens; reserved, never produced by the scanner.
    GoalCompilationUnit,
    GoalClassBodyDeclarations,
    GoalBlockStatements,
    GoalExpression,
    GoalHeaders,

    /// Forced-error stand-in for input the scanner could not tokenize.
    ErrorSentinel,
    Eof,
}

impl Term {
    pub const COUNT: usize = Term::Eof as usize + 1;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Term {
        ALL_TERMS[index]
    }

    /// Display name used in expected-token diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            Term::Identifier => "identifier",
            Term::IntLiteral => "int literal",
            Term::LongLiteral => "long literal",
            Term::FloatLiteral => "float literal",
            Term::DoubleLiteral => "double literal",
            Term::CharLiteral => "char literal",
            Term::StringLiteral => "string literal",
            Term::Abstract => "abstract",
            Term::Assert => "assert",
            Term::Boolean => "boolean",
            Term::Break => "break",
            Term::Byte => "byte",
            Term::Case => "case",
            Term::Catch => "catch",
            Term::Char => "char",
            Term::Class => "class",
            Term::Continue => "continue",
            Term::Default => "default",
            Term::Do => "do",
            Term::Double => "double",
            Term::Else => "else",
            Term::Enum => "enum",
            Term::Extends => "extends",
            Term::Final => "final",
            Term::Finally => "finally",
            Term::Float => "float",
            Term::For => "for",
            Term::If => "if",
            Term::Implements => "implements",
            Term::Import => "import",
            Term::Instanceof => "instanceof",
            Term::Int => "int",
            Term::Interface => "interface",
            Term::Long => "long",
            Term::Native => "native",
            Term::New => "new",
            Term::Package => "package",
            Term::Private => "private",
            Term::Protected => "protected",
            Term::Public => "public",
            Term::Return => "return",
            Term::Short => "short",
            Term::Static => "static",
            Term::Strictfp => "strictfp",
            Term::Super => "super",
            Term::Switch => "switch",
            Term::Synchronized => "synchronized",
            Term::This => "this",
            Term::Throw => "throw",
            Term::Throws => "throws",
            Term::Transient => "transient",
            Term::Try => "try",
            Term::Void => "void",
            Term::Volatile => "volatile",
            Term::While => "while",
            Term::True => "true",
            Term::False => "false",
            Term::Null => "null",
            Term::LParen => "(",
            Term::RParen => ")",
            Term::LBrace => "{",
            Term::RBrace => "}",
            Term::LBracket => "[",
            Term::RBracket => "]",
            Term::Semicolon => ";",
            Term::Comma => ",",
            Term::Dot => ".",
            Term::At => "@",
            Term::Ellipsis => "...",
            Term::ColonColon => "::",
            Term::Assign => "=",
            Term::Plus => "+",
            Term::Minus => "-",
            Term::Star => "*",
            Term::Slash => "/",
            Term::Percent => "%",
            Term::Inc => "++",
            Term::Dec => "--",
            Term::Bang => "!",
            Term::Tilde => "~",
            Term::Amp => "&",
            Term::Pipe => "|",
            Term::Caret => "^",
            Term::LShift => "<<",
            Term::RShift => ">>",
            Term::URShift => ">>>",
            Term::AndAnd => "&&",
            Term::OrOr => "||",
            Term::EqEq => "==",
            Term::Ne => "!=",
            Term::Lt => "<",
            Term::Le => "<=",
            Term::Gt => ">",
            Term::Ge => ">=",
            Term::Question => "?",
            Term::Colon => ":",
            Term::Arrow => "->",
            Term::PlusAssign => "+=",
            Term::MinusAssign => "-=",
            Term::StarAssign => "*=",
            Term::SlashAssign => "/=",
            Term::PercentAssign => "%=",
            Term::AmpAssign => "&=",
            Term::PipeAssign => "|=",
            Term::CaretAssign => "^=",
            Term::LShiftAssign => "<<=",
            Term::RShiftAssign => ">>=",
            Term::URShiftAssign => ">>>=",
            Term::BeginLambda => "<lambda>",
            Term::TypeArgLt => "<",
            Term::AtType => "@",
            Term::DefaultModifier => "default",
            Term::GoalCompilationUnit
            | Term::GoalClassBodyDeclarations
            | Term::GoalBlockStatements
            | Term::GoalExpression
            | Term::GoalHeaders => "<goal>",
            Term::ErrorSentinel => "<invalid>",
            Term::Eof => "end of file",
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Term::Boolean
                | Term::Byte
                | Term::Short
                | Term::Int
                | Term::Long
                | Term::Char
                | Term::Float
                | Term::Double
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Term::IntLiteral
                | Term::LongLiteral
                | Term::FloatLiteral
                | Term::DoubleLiteral
                | Term::CharLiteral
                | Term::StringLiteral
                | Term::True
                | Term::False
                | Term::Null
        )
    }
}

/// Every terminal in discriminant order; backs [`Term::from_index`].
pub(crate) static ALL_TERMS: [Term; Term::COUNT] = [
    Term::Identifier,
    Term::IntLiteral,
    Term::LongLiteral,
    Term::FloatLiteral,
    Term::DoubleLiteral,
    Term::CharLiteral,
    Term::StringLiteral,
    Term::Abstract,
    Term::Assert,
    Term::Boolean,
    Term::Break,
    Term::Byte,
    Term::Case,
    Term::Catch,
    Term::Char,
    Term::Class,
    Term::Continue,
    Term::Default,
    Term::Do,
    Term::Double,
    Term::Else,
    Term::Enum,
    Term::Extends,
    Term::Final,
    Term::Finally,
    Term::Float,
    Term::For,
    Term::If,
    Term::Implements,
    Term::Import,
    Term::Instanceof,
    Term::Int,
    Term::Interface,
    Term::Long,
    Term::Native,
    Term::New,
    Term::Package,
    Term::Private,
    Term::Protected,
    Term::Public,
    Term::Return,
    Term::Short,
    Term::Static,
    Term::Strictfp,
    Term::Super,
    Term::Switch,
    Term::Synchronized,
    Term::This,
    Term::Throw,
    Term::Throws,
    Term::Transient,
    Term::Try,
    Term::Void,
    Term::Volatile,
    Term::While,
    Term::True,
    Term::False,
    Term::Null,
    Term::LParen,
    Term::RParen,
    Term::LBrace,
    Term::RBrace,
    Term::LBracket,
    Term::RBracket,
    Term::Semicolon,
    Term::Comma,
    Term::Dot,
    Term::At,
    Term::Ellipsis,
    Term::ColonColon,
    Term::Assign,
    Term::Plus,
    Term::Minus,
    Term::Star,
    Term::Slash,
    Term::Percent,
    Term::Inc,
    Term::Dec,
    Term::Bang,
    Term::Tilde,
    Term::Amp,
    Term::Pipe,
    Term::Caret,
    Term::LShift,
    Term::RShift,
    Term::URShift,
    Term::AndAnd,
    Term::OrOr,
    Term::EqEq,
    Term::Ne,
    Term::Lt,
    Term::Le,
    Term::Gt,
    Term::Ge,
    Term::Question,
    Term::Colon,
    Term::Arrow,
    Term::PlusAssign,
    Term::MinusAssign,
    Term::StarAssign,
    Term::SlashAssign,
    Term::PercentAssign,
    Term::AmpAssign,
    Term::PipeAssign,
    Term::CaretAssign,
    Term::LShiftAssign,
    Term::RShiftAssign,
    Term::URShiftAssign,
    Term::BeginLambda,
    Term::TypeArgLt,
    Term::AtType,
    Term::DefaultModifier,
    Term::GoalCompilationUnit,
    Term::GoalClassBodyDeclarations,
    Term::GoalBlockStatements,
    Term::GoalExpression,
    Term::GoalHeaders,
    Term::ErrorSentinel,
    Term::Eof,
];

/// Map a raw token to its terminal index.
pub fn term_of(token: Token) -> Term {
    match token {
        Token::Identifier => Term::Identifier,
        Token::IntLiteral => Term::IntLiteral,
        Token::LongLiteral => Term::LongLiteral,
        Token::FloatLiteral => Term::FloatLiteral,
        Token::DoubleLiteral => Term::DoubleLiteral,
        Token::CharLiteral => Term::CharLiteral,
        Token::StringLiteral => Term::StringLiteral,
        Token::Abstract => Term::Abstract,
        Token::Assert => Term::Assert,
        Token::Boolean => Term::Boolean,
        Token::Break => Term::Break,
        Token::Byte => Term::Byte,
        Token::Case => Term::Case,
        Token::Catch => Term::Catch,
        Token::Char => Term::Char,
        Token::Class => Term::Class,
        Token::Continue => Term::Continue,
        Token::Default => Term::Default,
        Token::Do => Term::Do,
        Token::Double => Term::Double,
        Token::Else => Term::Else,
        Token::Enum => Term::Enum,
        Token::Extends => Term::Extends,
        Token::Final => Term::Final,
        Token::Finally => Term::Finally,
        Token::Float => Term::Float,
        Token::For => Term::For,
        Token::If => Term::If,
        Token::Implements => Term::Implements,
        Token::Import => Term::Import,
        Token::Instanceof => Term::Instanceof,
        Token::Int => Term::Int,
        Token::Interface => Term::Interface,
        Token::Long => Term::Long,
        Token::Native => Term::Native,
        Token::New => Term::New,
        Token::Package => Term::Package,
        Token::Private => Term::Private,
        Token::Protected => Term::Protected,
        Token::Public => Term::Public,
        Token::Return => Term::Return,
        Token::Short => Term::Short,
        Token::Static => Term::Static,
        Token::Strictfp => Term::Strictfp,
        Token::Super => Term::Super,
        Token::Switch => Term::Switch,
        Token::Synchronized => Term::Synchronized,
        Token::This => Term::This,
        Token::Throw => Term::Throw,
        Token::Throws => Term::Throws,
        Token::Transient => Term::Transient,
        Token::Try => Term::Try,
        Token::Void => Term::Void,
        Token::Volatile => Term::Volatile,
        Token::While => Term::While,
        Token::True => Term::True,
        Token::False => Term::False,
        Token::Null => Term::Null,
        Token::LParen => Term::LParen,
        Token::RParen => Term::RParen,
        Token::LBrace => Term::LBrace,
        Token::RBrace => Term::RBrace,
        Token::LBracket => Term::LBracket,
        Token::RBracket => Term::RBracket,
        Token::Semicolon => Term::Semicolon,
        Token::Comma => Term::Comma,
        Token::Dot => Term::Dot,
        Token::At => Term::At,
        Token::Ellipsis => Term::Ellipsis,
        Token::ColonColon => Term::ColonColon,
        Token::Assign => Term::Assign,
        Token::Plus => Term::Plus,
        Token::Minus => Term::Minus,
        Token::Star => Term::Star,
        Token::Slash => Term::Slash,
        Token::Percent => Term::Percent,
        Token::Inc => Term::Inc,
        Token::Dec => Term::Dec,
        Token::Bang => Term::Bang,
        Token::Tilde => Term::Tilde,
        Token::Amp => Term::Amp,
        Token::Pipe => Term::Pipe,
        Token::Caret => Term::Caret,
        Token::LShift => Term::LShift,
        Token::RShift => Term::RShift,
        Token::URShift => Term::URShift,
        Token::AndAnd => Term::AndAnd,
        Token::OrOr => Term::OrOr,
        Token::EqEq => Term::EqEq,
        Token::Ne => Term::Ne,
        Token::Lt => Term::Lt,
        Token::Le => Term::Le,
        Token::Gt => Term::Gt,
        Token::Ge => Term::Ge,
        Token::Question => Term::Question,
        Token::Colon => Term::Colon,
        Token::Arrow => Term::Arrow,
        Token::PlusAssign => Term::PlusAssign,
        Token::MinusAssign => Term::MinusAssign,
        Token::StarAssign => Term::StarAssign,
        Token::SlashAssign => Term::SlashAssign,
        Token::PercentAssign => Term::PercentAssign,
        Token::AmpAssign => Term::AmpAssign,
        Token::PipeAssign => Term::PipeAssign,
        Token::CaretAssign => Term::CaretAssign,
        Token::LShiftAssign => Term::LShiftAssign,
        Token::RShiftAssign => Term::RShiftAssign,
        Token::URShiftAssign => Term::URShiftAssign,
        Token::LineComment | Token::BlockComment | Token::Whitespace | Token::Bom => {
            // trivia is filtered before terminal mapping
            Term::ErrorSentinel
        }
    }
}

/// A scanned terminal with its source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub term: Term,
    pub span: Span,
}

impl Scanned {
    pub fn new(term: Term, span: Span) -> Self {
        Self { term, span }
    }
}

/// The token source the automaton pulls from.
///
/// Wraps a `logos` lexer over a `[start, limit)` window of the source buffer,
/// filters trivia (recording comment ranges), supports a small pushback stack
/// for token splitting and marker insertion, and can fast-forward over an
/// entire `{...}` body in diet mode.
#[derive(Clone)]
pub struct TokenSource<'a> {
    source: &'a str,
    lexer: logos::Lexer<'a, Token>,
    /// Offset of the current lexing window inside `source`.
    base: u32,
    limit: u32,
    pushback: Vec<Scanned>,
    /// Comment spans seen so far, in source order.
    pub comments: Vec<Span>,
    /// When set, the next `{` shifted for a method body is skipped wholesale.
    pub diet: bool,
    lex_problems: Vec<Problem>,
}

impl<'a> TokenSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: Token::lexer(source),
            base: 0,
            limit: source.len() as u32,
            pushback: Vec::new(),
            comments: Vec::new(),
            diet: false,
            lex_problems: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Re-scope scanning to the `[start, end)` byte sub-range of the same
    /// buffer. Used to re-parse a single body out of a diet-parsed unit.
    pub fn rescope(&mut self, start: u32, end: u32) {
        let end = end.min(self.source.len() as u32);
        let start = start.min(end);
        self.base = start;
        self.limit = end;
        self.lexer = Token::lexer(&self.source[start as usize..end as usize]);
        self.pushback.clear();
    }

    /// The text of a previously scanned token.
    pub fn text(&self, span: Span) -> &'a str {
        span.source_text(self.source)
    }

    /// Push one token back; it will be returned by the next `next()` call.
    pub fn unget(&mut self, scanned: Scanned) {
        self.pushback.push(scanned);
    }

    /// Drain lexical problems recorded since the last call.
    pub fn take_problems(&mut self) -> Vec<Problem> {
        std::mem::take(&mut self.lex_problems)
    }

    /// Next terminal, trivia filtered. Lexical failures are recorded as
    /// problems and surface as a single `ErrorSentinel` terminal so the
    /// automaton has a well-defined symbol to react to.
    pub fn next(&mut self) -> Scanned {
        if let Some(scanned) = self.pushback.pop() {
            return scanned;
        }
        loop {
            let Some(result) = self.lexer.next() else {
                return Scanned::new(Term::Eof, Span::at(self.limit));
            };
            let range = self.lexer.span();
            let span = Span::new(self.base + range.start as u32, self.base + range.end as u32);
            match result {
                Ok(token) if token.is_comment() => {
                    self.comments.push(span);
                }
                Ok(token) if token.is_trivia() => {}
                Ok(token) => return Scanned::new(term_of(token), span),
                Err(()) => {
                    let text = span.source_text(self.source);
                    let kind = if text.starts_with("/*") {
                        ProblemKind::UnterminatedComment
                    } else if text.starts_with('"') {
                        ProblemKind::UnterminatedString
                    } else {
                        ProblemKind::InvalidToken { text: text.to_string() }
                    };
                    // A zero-length error slice would loop forever; skip a char.
                    if span.is_empty() {
                        if let Some(c) = self.lexer.remainder().chars().next() {
                            self.lexer.bump(c.len_utf8());
                        }
                    }
                    let span = if span.is_empty() {
                        Span::new(span.start, span.start + 1)
                    } else {
                        span
                    };
                    self.lex_problems.push(Problem::new(kind, span));
                    return Scanned::new(Term::ErrorSentinel, span);
                }
            }
        }
    }

    /// Fast-forward over a method/initializer body whose `{` has just been
    /// consumed, without delivering its tokens. Returns the span from the
    /// first skipped token to the matching `}` (exclusive), and ungets the
    /// closing `}` so the automaton still sees an empty body.
    pub fn jump_over_body(&mut self) -> Span {
        let mut depth = 1usize;
        let start = self.offset();
        let mut last_end = start;
        loop {
            let scanned = self.next();
            match scanned.term {
                Term::LBrace => depth += 1,
                Term::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.unget(scanned);
                        return Span::new(start, last_end);
                    }
                }
                Term::Eof => return Span::new(start, last_end),
                _ => {}
            }
            last_end = scanned.span.end;
        }
    }

    /// Current scan offset (start of the next unscanned token region).
    pub fn offset(&self) -> u32 {
        if let Some(scanned) = self.pushback.last() {
            scanned.span.start
        } else {
            self.base + self.lexer.span().end as u32
        }
    }
}

/// Decoded numeric literal, with the flags the version gate cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerLiteral {
    /// Magnitude as scanned; sign is applied by the unary-minus fold.
    pub magnitude: u64,
    pub has_underscores: bool,
    pub is_binary: bool,
}

/// Parse an integer/long literal body (suffix already stripped by the caller).
pub fn parse_integer_literal(text: &str) -> IntegerLiteral {
    let has_underscores = text.contains('_');
    let cleaned: String;
    let digits: &str = if has_underscores {
        cleaned = text.replace('_', "");
        &cleaned
    } else {
        text
    };
    let (radix, body, is_binary) = if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, rest, false)
    } else if let Some(rest) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        (2, rest, true)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..], false)
    } else {
        (10, digits, false)
    };
    // Wrapping matches the two's-complement overflow the language defines for
    // hex/octal/binary literals; decimal overflow is a downstream range check.
    let mut magnitude: u64 = 0;
    for c in body.chars() {
        if let Some(d) = c.to_digit(radix) {
            magnitude = magnitude.wrapping_mul(radix as u64).wrapping_add(d as u64);
        }
    }
    IntegerLiteral { magnitude, has_underscores, is_binary }
}

/// Unescape a char/string literal body (quotes already stripped).
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{0008}'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if let Ok(code) = u32::from_str_radix(&hex, 16) {
                    if let Some(ch) = char::from_u32(code) {
                        out.push(ch);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str) -> Vec<Term> {
        let mut ts = TokenSource::new(source);
        let mut terms = Vec::new();
        loop {
            let scanned = ts.next();
            if scanned.term == Term::Eof {
                break;
            }
            terms.push(scanned.term);
        }
        terms
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let terms = scan_all("public class Test extends Object");
        assert_eq!(
            terms,
            vec![Term::Public, Term::Class, Term::Identifier, Term::Extends, Term::Identifier]
        );
    }

    #[test]
    fn test_literals() {
        let terms = scan_all(r#"42 42L 0x1F 1.5 1.5f "hi" 'c' true null"#);
        assert_eq!(
            terms,
            vec![
                Term::IntLiteral,
                Term::LongLiteral,
                Term::IntLiteral,
                Term::DoubleLiteral,
                Term::FloatLiteral,
                Term::StringLiteral,
                Term::CharLiteral,
                Term::True,
                Term::Null,
            ]
        );
    }

    #[test]
    fn test_operator_maximal_munch() {
        let terms = scan_all(">> >>> >= > >>=");
        assert_eq!(
            terms,
            vec![Term::RShift, Term::URShift, Term::Ge, Term::Gt, Term::RShiftAssign]
        );
    }

    #[test]
    fn test_comments_are_recorded_not_delivered() {
        let mut ts = TokenSource::new("a /* one */ b // two\nc");
        let mut terms = Vec::new();
        loop {
            let s = ts.next();
            if s.term == Term::Eof {
                break;
            }
            terms.push(s.term);
        }
        assert_eq!(terms, vec![Term::Identifier, Term::Identifier, Term::Identifier]);
        assert_eq!(ts.comments.len(), 2);
    }

    #[test]
    fn test_unget_round_trip() {
        let mut ts = TokenSource::new("a b");
        let a = ts.next();
        ts.unget(a);
        assert_eq!(ts.next(), a);
        assert_eq!(ts.next().term, Term::Identifier);
        assert_eq!(ts.next().term, Term::Eof);
    }

    #[test]
    fn test_rescope() {
        let source = "class A { int x; } class B { }";
        let mut ts = TokenSource::new(source);
        ts.rescope(10, 16); // the "int x;" region
        assert_eq!(ts.next().term, Term::Int);
        let name = ts.next();
        assert_eq!(name.term, Term::Identifier);
        assert_eq!(ts.text(name.span), "x");
    }

    #[test]
    fn test_jump_over_body() {
        let source = "{ int x = 1; { nested(); } } rest";
        let mut ts = TokenSource::new(source);
        assert_eq!(ts.next().term, Term::LBrace);
        let skipped = ts.jump_over_body();
        assert!(skipped.len() > 0);
        assert_eq!(ts.next().term, Term::RBrace);
        assert_eq!(ts.next().term, Term::Identifier);
    }

    #[test]
    fn test_lexical_error_produces_sentinel() {
        let mut ts = TokenSource::new("a # b");
        assert_eq!(ts.next().term, Term::Identifier);
        assert_eq!(ts.next().term, Term::ErrorSentinel);
        assert_eq!(ts.take_problems().len(), 1);
        assert_eq!(ts.next().term, Term::Identifier);
    }

    #[test]
    fn test_integer_literal_decoding() {
        assert_eq!(parse_integer_literal("2147483648").magnitude, 2147483648);
        assert_eq!(parse_integer_literal("0x10").magnitude, 16);
        assert_eq!(parse_integer_literal("010").magnitude, 8);
        let lit = parse_integer_literal("0b1010");
        assert_eq!(lit.magnitude, 10);
        assert!(lit.is_binary);
        assert!(parse_integer_literal("1_000").has_underscores);
    }

    #[test]
    fn test_term_table_is_in_discriminant_order() {
        for (i, term) in ALL_TERMS.iter().enumerate() {
            assert_eq!(term.index(), i);
        }
    }
}

//! Token kinds.

/// Every token the scanner can produce. Contextual keywords (`of`,
/// `from`, `async`, `static`) scan as `Identifier`; the parser checks
/// their text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Identifier,
    NumericLiteral,
    StringLiteral,
    /// `` `text${ ``
    TemplateHead,
    /// `}text${`
    TemplateMiddle,
    /// `` }text` ``
    TemplateTail,
    /// `` `text` ``
    NoSubstitutionTemplate,

    // Keywords
    Var,
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    New,
    Delete,
    Typeof,
    Void,
    In,
    Instanceof,
    This,
    Null,
    True,
    False,
    Class,
    Extends,
    Import,
    Export,
    Default,
    Try,
    Catch,
    Finally,
    Throw,
    Switch,
    Case,
    Await,
    Yield,
    Debugger,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    /// `#{`
    HashLBrace,
    /// `#[`
    HashLBracket,
    Semicolon,
    Comma,
    Dot,
    DotDotDot,
    Colon,
    Question,
    Arrow,
    At,

    // Operators
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LtLt,
    GtGt,
    GtGtGt,
    Amp,
    Bar,
    Caret,
    Bang,
    Tilde,
    AmpAmp,
    BarBar,
    QuestionQuestion,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,
    AmpEq,
    BarEq,
    CaretEq,
    AmpAmpEq,
    BarBarEq,
    QuestionQuestionEq,
}

impl TokenKind {
    /// True for tokens that may begin an expression.
    pub fn starts_expression(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | NumericLiteral
                | StringLiteral
                | TemplateHead
                | NoSubstitutionTemplate
                | This
                | Null
                | True
                | False
                | Function
                | Class
                | New
                | Delete
                | Typeof
                | Void
                | Await
                | Yield
                | LParen
                | LBrace
                | LBracket
                | HashLBrace
                | HashLBracket
                | Plus
                | Minus
                | Bang
                | Tilde
                | PlusPlus
                | MinusMinus
        )
    }
}

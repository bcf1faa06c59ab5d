use chumsky::prelude::*;

/// One lexical token of the contract-prose surface.
///
/// The keyword and particle sets are closed; any other run of characters
/// that is not a digit, whitespace, or punctuation becomes an `Ident`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals and identifiers
    Number(i64),
    Ident(String),

    // Particles
    /// は
    Topic,
    /// を
    Object,
    /// に
    Dative,
    /// から
    Ablative,
    /// と
    Comitative,
    /// の
    Genitive,
    /// で
    Instrumental,
    /// が
    Subject,

    // Keywords
    /// とする
    Assign,
    /// 出力する
    Print,
    /// 回
    Times,
    /// 以下を行う
    BlockBegin,
    /// 以上
    BlockEnd,
    /// 定義する
    Define,
    /// 関数として
    AsFunction,
    /// 関数
    Function,
    /// もし
    If,
    /// なら / ならば
    Then,
    /// でなければ
    Unless,
    /// そうでなければ
    Else,
    /// 加えた数
    Added,
    /// 減じた数 / 差し引いた数
    Subtracted,
    /// 積
    Product,
    /// 除した数 / 割った数
    Quotient,
    /// 以下 (alias form)
    Following,
    /// という
    Called,

    // Punctuation
    /// 。 or .
    End,
    /// 、 or ,
    Comma,
    /// ( or （
    LParen,
    /// ) or ）
    RParen,
    /// 「
    LQuote,
    /// 」
    RQuote,
}

fn punct_char(c: char) -> bool {
    matches!(
        c,
        '。' | '.' | '、' | ',' | '(' | ')' | '（' | '）' | '「' | '」'
    )
}

/// Accumulates a digit run without panicking on absurdly long literals.
fn digits_to_i64(s: &str) -> i64 {
    s.bytes().fold(0i64, |acc, b| {
        acc.wrapping_mul(10).wrapping_add(i64::from(b - b'0'))
    })
}

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Number(digits_to_i64(s)));

    // Longest match first, so a longer keyword is never shadowed by a
    // shorter prefix that is also a keyword (とする before と, ならば
    // before なら, 以下を行う before 以下, そうでなければ before
    // でなければ before で). Particles come after every keyword.
    let keyword = choice((
        just("そうでなければ").to(Token::Else),
        just("差し引いた数").to(Token::Subtracted),
        just("でなければ").to(Token::Unless),
        just("以下を行う").to(Token::BlockBegin),
        just("関数として").to(Token::AsFunction),
        just("出力する").to(Token::Print),
        just("定義する").to(Token::Define),
        just("加えた数").to(Token::Added),
        just("減じた数").to(Token::Subtracted),
        just("除した数").to(Token::Quotient),
        just("割った数").to(Token::Quotient),
        just("という").to(Token::Called),
        just("とする").to(Token::Assign),
        just("ならば").to(Token::Then),
        just("なら").to(Token::Then),
        just("もし").to(Token::If),
        just("以下").to(Token::Following),
        just("以上").to(Token::BlockEnd),
        just("関数").to(Token::Function),
        just("から").to(Token::Ablative),
        just("積").to(Token::Product),
        just("回").to(Token::Times),
    ))
    .or(choice((
        just("は").to(Token::Topic),
        just("を").to(Token::Object),
        just("に").to(Token::Dative),
        just("と").to(Token::Comitative),
        just("の").to(Token::Genitive),
        just("で").to(Token::Instrumental),
        just("が").to(Token::Subject),
    )));

    let punct = choice((
        just('。').to(Token::End),
        just('.').to(Token::End),
        just('、').to(Token::Comma),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just('（').to(Token::LParen),
        just(')').to(Token::RParen),
        just('）').to(Token::RParen),
        just('「').to(Token::LQuote),
        just('」').to(Token::RQuote),
    ));

    // An identifier is a maximal run of characters that are not digits,
    // whitespace, or punctuation, stopping as soon as a keyword or
    // particle matches at the current position.
    let ident = any()
        .filter(|c: &char| {
            !c.is_whitespace()
                && !c.is_ascii_digit()
                && !c.is_ascii_punctuation()
                && !punct_char(*c)
        })
        .and_is(keyword.clone().not())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(Token::Ident);

    // Annotation lines: ※ … or （注）… to end of line.
    let comment = choice((just("※"), just("（注）"), just("(注)")))
        .then(any().and_is(just('\n').not()).repeated())
        .padded();

    let token = number
        .or(keyword)
        .or(punct)
        .or(ident)
        .map_with(|tok, e| (tok, e.span()))
        .padded_by(comment.clone().repeated())
        .padded();

    // The outer padding covers sources that are nothing but annotations.
    token
        .repeated()
        .collect()
        .padded_by(comment.repeated())
        .padded()
        .then_ignore(end())
}

//! 制限付き数式評価（再帰下降パーサ）
//!
//! 文法（優先順位の低い順）:
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/" | "//" | "%") unary)*
//! unary   := ("+" | "-") unary | power
//! power   := primary (("**" | "^") unary)?
//! primary := number | name | name "(" expr ("," expr)* ")" | "(" expr ")"
//! ```
//!
//! 字句解析はパーサが必要になった時点で 1 トークンずつ行う。
//! 未知の関数名はその引数を読む前に拒否する。

use crate::ports::outbound::{EvaluationError, ExpressionEvaluator};

/// 入力の最大文字数
pub const MAX_EXPRESSION_LEN: usize = 256;
/// 括弧・単項演算子の最大ネスト
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictedEvaluator;

impl RestrictedEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for RestrictedEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvaluationError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(EvaluationError::Empty);
        }
        if expression.chars().count() > MAX_EXPRESSION_LEN {
            return Err(EvaluationError::TooLong(MAX_EXPRESSION_LEN));
        }
        let mut parser = Parser::new(expression);
        let value = parser.expr()?;
        match parser.next()? {
            Token::End => {}
            other => return Err(EvaluationError::UnexpectedToken(other.describe())),
        }
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(&'static str),
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Ident(s) => s.clone(),
            Token::Op(op) => op.to_string(),
            Token::End => "end of expression".to_string(),
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    peeked: Option<Token>,
    depth: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            peeked: None,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Result<&Token, EvaluationError> {
        if self.peeked.is_none() {
            let tok = self.lex()?;
            self.peeked = Some(tok);
        }
        Ok(self.peeked.get_or_insert(Token::End))
    }

    fn next(&mut self) -> Result<Token, EvaluationError> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.lex(),
        }
    }

    /// 次のトークンが `op` なら読み進めて true
    fn eat(&mut self, op: &str) -> Result<bool, EvaluationError> {
        if matches!(self.peek()?, Token::Op(o) if *o == op) {
            self.peeked = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, op: &str) -> Result<(), EvaluationError> {
        match self.next()? {
            Token::Op(o) if o == op => Ok(()),
            Token::End => Err(EvaluationError::UnexpectedEnd),
            other => Err(EvaluationError::UnexpectedToken(other.describe())),
        }
    }

    fn enter(&mut self) -> Result<(), EvaluationError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvaluationError::TooDeep);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn lex(&mut self) -> Result<Token, EvaluationError> {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
        let Some(&c) = self.chars.get(self.pos) else {
            return Ok(Token::End);
        };
        if c.is_ascii_digit() || c == '.' {
            return self.lex_number();
        }
        if c.is_alphabetic() || c == '_' {
            let start = self.pos;
            while self
                .chars
                .get(self.pos)
                .is_some_and(|c| c.is_alphanumeric() || *c == '_')
            {
                self.pos += 1;
            }
            return Ok(Token::Ident(self.chars[start..self.pos].iter().collect()));
        }
        let next = self.chars.get(self.pos + 1).copied();
        let (op, len) = match (c, next) {
            ('*', Some('*')) => ("**", 2),
            ('/', Some('/')) => ("//", 2),
            ('+', _) => ("+", 1),
            ('-', _) => ("-", 1),
            ('*', _) => ("*", 1),
            ('/', _) => ("/", 1),
            ('%', _) => ("%", 1),
            ('^', _) => ("^", 1),
            ('(', _) => ("(", 1),
            (')', _) => (")", 1),
            (',', _) => (",", 1),
            _ => return Err(EvaluationError::UnexpectedChar(c, self.pos)),
        };
        self.pos += len;
        Ok(Token::Op(op))
    }

    fn lex_number(&mut self) -> Result<Token, EvaluationError> {
        let start = self.pos;
        let digits = |p: &mut Self| {
            while p.chars.get(p.pos).is_some_and(|c| c.is_ascii_digit()) {
                p.pos += 1;
            }
        };
        digits(self);
        if self.chars.get(self.pos) == Some(&'.') {
            self.pos += 1;
            digits(self);
        }
        // 指数部は直後に数字（符号付き可）が続くときだけ
        if matches!(self.chars.get(self.pos), Some('e' | 'E')) {
            let after = match self.chars.get(self.pos + 1) {
                Some('+' | '-') => self.pos + 2,
                _ => self.pos + 1,
            };
            if self.chars.get(after).is_some_and(|c| c.is_ascii_digit()) {
                self.pos = after;
                digits(self);
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Token::Num)
            .map_err(|_| EvaluationError::InvalidNumber(text))
    }

    fn expr(&mut self) -> Result<f64, EvaluationError> {
        let mut acc = self.term()?;
        loop {
            if self.eat("+")? {
                acc += self.term()?;
            } else if self.eat("-")? {
                acc -= self.term()?;
            } else {
                return Ok(acc);
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvaluationError> {
        let mut acc = self.unary()?;
        loop {
            if self.eat("*")? {
                acc *= self.unary()?;
            } else if self.eat("//")? {
                let rhs = nonzero(self.unary()?)?;
                acc = (acc / rhs).floor();
            } else if self.eat("/")? {
                let rhs = nonzero(self.unary()?)?;
                acc /= rhs;
            } else if self.eat("%")? {
                let rhs = nonzero(self.unary()?)?;
                // 結果の符号は除数に合わせる
                acc -= rhs * (acc / rhs).floor();
            } else {
                return Ok(acc);
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvaluationError> {
        let sign = if self.eat("-")? {
            -1.0
        } else if self.eat("+")? {
            1.0
        } else {
            return self.power();
        };
        self.enter()?;
        let v = self.unary()?;
        self.leave();
        Ok(sign * v)
    }

    fn power(&mut self) -> Result<f64, EvaluationError> {
        let base = self.primary()?;
        if self.eat("**")? || self.eat("^")? {
            self.enter()?;
            let exp = self.unary()?;
            self.leave();
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvaluationError> {
        match self.next()? {
            Token::Num(n) => Ok(n),
            Token::Op("(") => {
                self.enter()?;
                let v = self.expr()?;
                self.expect(")")?;
                self.leave();
                Ok(v)
            }
            Token::Ident(name) => {
                if matches!(self.peek()?, Token::Op("(")) {
                    self.call(&name)
                } else {
                    constant(&name).ok_or(EvaluationError::UnknownIdentifier(name))
                }
            }
            Token::End => Err(EvaluationError::UnexpectedEnd),
            other => Err(EvaluationError::UnexpectedToken(other.describe())),
        }
    }

    fn call(&mut self, name: &str) -> Result<f64, EvaluationError> {
        let f = function(name).ok_or_else(|| EvaluationError::UnknownFunction(name.to_string()))?;
        self.expect("(")?;
        self.enter()?;
        let mut args = vec![self.expr()?];
        while self.eat(",")? {
            args.push(self.expr()?);
        }
        self.expect(")")?;
        self.leave();
        f.apply(name, &args)
    }
}

fn nonzero(v: f64) -> Result<f64, EvaluationError> {
    if v == 0.0 {
        Err(EvaluationError::DivisionByZero)
    } else {
        Ok(v)
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        _ => None,
    }
}

enum Function {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    /// log(x) / log(x, base)
    Log,
    /// 1 個以上の引数を畳み込む（min / max）
    Fold(fn(f64, f64) -> f64),
}

fn function(name: &str) -> Option<Function> {
    use Function::*;
    let f = match name {
        "sqrt" => Unary(f64::sqrt),
        "abs" => Unary(f64::abs),
        "floor" => Unary(f64::floor),
        "ceil" => Unary(f64::ceil),
        "round" => Unary(f64::round),
        "exp" => Unary(f64::exp),
        "ln" => Unary(f64::ln),
        "log10" => Unary(f64::log10),
        "log2" => Unary(f64::log2),
        "sin" => Unary(f64::sin),
        "cos" => Unary(f64::cos),
        "tan" => Unary(f64::tan),
        "asin" => Unary(f64::asin),
        "acos" => Unary(f64::acos),
        "atan" => Unary(f64::atan),
        "pow" => Binary(f64::powf),
        "log" => Log,
        "min" => Fold(f64::min),
        "max" => Fold(f64::max),
        _ => return None,
    };
    Some(f)
}

impl Function {
    fn apply(&self, name: &str, args: &[f64]) -> Result<f64, EvaluationError> {
        let arity = |expected: &str| EvaluationError::Arity {
            name: name.to_string(),
            expected: expected.to_string(),
            got: args.len(),
        };
        match (self, args) {
            (Function::Unary(f), [x]) => Ok(f(*x)),
            (Function::Unary(_), _) => Err(arity("1")),
            (Function::Binary(f), [x, y]) => Ok(f(*x, *y)),
            (Function::Binary(_), _) => Err(arity("2")),
            (Function::Log, [x]) => Ok(x.ln()),
            (Function::Log, [x, base]) => Ok(x.log(*base)),
            (Function::Log, _) => Err(arity("1 or 2")),
            (Function::Fold(f), [first, rest @ ..]) => Ok(rest.iter().fold(*first, |a, b| f(a, *b))),
            (Function::Fold(_), []) => Err(arity("at least 1")),
        }
    }
}

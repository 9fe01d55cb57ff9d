//! Inline arithmetic: `a <op> b` anywhere in the input

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*([-+*/^])\s*(\d+(?:\.\d+)?)").expect("math pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            "^" => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }
}

/// A binary expression found in free text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub lhs: f64,
    pub op: Operator,
    pub rhs: f64,
}

impl Expression {
    /// First `a <op> b` in the text
    pub fn find(text: &str) -> Option<Self> {
        let captures = EXPRESSION.captures(text)?;
        Some(Self {
            lhs: captures[1].parse().ok()?,
            op: Operator::parse(&captures[2])?,
            rhs: captures[3].parse().ok()?,
        })
    }

    /// Division by zero evaluates to 0
    pub fn evaluate(&self) -> f64 {
        match self.op {
            Operator::Add => self.lhs + self.rhs,
            Operator::Sub => self.lhs - self.rhs,
            Operator::Mul => self.lhs * self.rhs,
            Operator::Div if self.rhs == 0.0 => 0.0,
            Operator::Div => self.lhs / self.rhs,
            Operator::Pow => self.lhs.powf(self.rhs),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = **{:.2}**", self.lhs, self.op.symbol(), self.rhs, self.evaluate())
    }
}

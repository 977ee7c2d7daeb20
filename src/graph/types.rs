//
//  types.rs
//  Traffic
//
//  Created by hak (tharun)
//

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrafficError};

/// Outgoing edges of one vertex: destination -> weight, in insertion order.
pub type Adjacency = IndexMap<String, f64>;

/// Exported adjacency data: source -> outgoing edges, in insertion order.
///
/// Vertices that only ever appear as destinations have no key of their own.
pub type GraphData = IndexMap<String, Adjacency>;

/// Arithmetic operator of a relative weight update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Apply the operator to the current weight.
    pub fn apply(self, current: f64, operand: f64) -> f64 {
        match self {
            Operator::Add => current + operand,
            Operator::Subtract => current - operand,
            Operator::Multiply => current * operand,
            Operator::Divide => current / operand,
        }
    }

    /// Textual prefix used in update expressions (`+=`, `-=`, `*=`, `/=`).
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+=",
            Operator::Subtract => "-=",
            Operator::Multiply => "*=",
            Operator::Divide => "/=",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+=" => Some(Operator::Add),
            "-=" => Some(Operator::Subtract),
            "*=" => Some(Operator::Multiply),
            "/=" => Some(Operator::Divide),
            _ => None,
        }
    }
}

/// New value for an edge weight.
///
/// `Relative` updates are evaluated against the edge's current weight, which is
/// `0` when the edge does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUpdate", into = "RawUpdate")]
pub enum WeightUpdate {
    Absolute(f64),
    Relative(Operator, f64),
}

impl WeightUpdate {
    pub fn add(operand: f64) -> Self {
        WeightUpdate::Relative(Operator::Add, operand)
    }

    pub fn subtract(operand: f64) -> Self {
        WeightUpdate::Relative(Operator::Subtract, operand)
    }

    pub fn multiply(operand: f64) -> Self {
        WeightUpdate::Relative(Operator::Multiply, operand)
    }

    pub fn divide(operand: f64) -> Self {
        WeightUpdate::Relative(Operator::Divide, operand)
    }

    /// Compute the weight to store given the edge's current weight, if any.
    pub fn resolve(self, current: Option<f64>) -> f64 {
        match self {
            WeightUpdate::Absolute(weight) => weight,
            WeightUpdate::Relative(op, operand) => op.apply(current.unwrap_or(0.0), operand),
        }
    }
}

impl From<f64> for WeightUpdate {
    fn from(weight: f64) -> Self {
        WeightUpdate::Absolute(weight)
    }
}

impl From<i32> for WeightUpdate {
    fn from(weight: i32) -> Self {
        WeightUpdate::Absolute(f64::from(weight))
    }
}

/// Parses `"2.5"` as absolute and `"+=1"`, `"-=1"`, `"*=2"`, `"/=4"` as relative updates.
impl FromStr for WeightUpdate {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self> {
        let expr = s.trim();
        let invalid = || TrafficError::InvalidExpression(s.to_string());

        if let Ok(weight) = expr.parse::<f64>() {
            if weight.is_nan() {
                return Err(invalid());
            }
            return Ok(WeightUpdate::Absolute(weight));
        }

        let op = expr
            .get(..2)
            .and_then(Operator::from_symbol)
            .ok_or_else(invalid)?;
        let operand = expr[2..]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(invalid)?;

        Ok(WeightUpdate::Relative(op, operand))
    }
}

impl fmt::Display for WeightUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUpdate::Absolute(weight) => write!(f, "{}", weight),
            WeightUpdate::Relative(op, operand) => write!(f, "{}{}", op.symbol(), operand),
        }
    }
}

/// Wire form of a [`WeightUpdate`]: a JSON number or an expression string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawUpdate {
    Number(f64),
    Expression(String),
}

impl TryFrom<RawUpdate> for WeightUpdate {
    type Error = TrafficError;

    fn try_from(raw: RawUpdate) -> Result<Self> {
        match raw {
            RawUpdate::Number(weight) => Ok(WeightUpdate::Absolute(weight)),
            RawUpdate::Expression(expr) => expr.parse(),
        }
    }
}

impl From<WeightUpdate> for RawUpdate {
    fn from(update: WeightUpdate) -> Self {
        match update {
            WeightUpdate::Absolute(weight) => RawUpdate::Number(weight),
            relative => RawUpdate::Expression(relative.to_string()),
        }
    }
}

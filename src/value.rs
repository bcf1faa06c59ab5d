use std::fmt;

/// A runtime number. Integers are the native currency of the language; a
/// real only appears when a division does not come out even.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
}

impl Value {
    pub fn as_int(self) -> i64 {
        match self {
            Value::Int(n) => n,
            Value::Real(r) => r as i64,
        }
    }

    pub fn as_real(self) -> f64 {
        match self {
            Value::Int(n) => n as f64,
            Value::Real(r) => r,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Value::Int(n) => n == 0,
            Value::Real(r) => r == 0.0,
        }
    }

    pub fn add(self, other: Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            _ => Value::Real(self.as_real() + other.as_real()),
        }
    }

    pub fn sub(self, other: Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            _ => Value::Real(self.as_real() - other.as_real()),
        }
    }

    pub fn mul(self, other: Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_mul(b)),
            _ => Value::Real(self.as_real() * other.as_real()),
        }
    }

    /// An even integer division stays an integer; anything else falls back
    /// to a real. `None` when the divisor is zero.
    pub fn div(self, other: Value) -> Option<Value> {
        if other.is_zero() {
            return None;
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) if a.checked_rem(b) == Some(0) => {
                Some(Value::Int(a.wrapping_div(b)))
            }
            _ => Some(Value::Real(self.as_real() / other.as_real())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Real(r) => write!(f, "{}", r),
        }
    }
}
